use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::dto::chat_dto::{CreateConversationRequest, PostMessageRequest};
use crate::handler::{pagination, parse_id, parse_optional_id};
use crate::service::chat_service::{ChatService, ChatServiceImpl};
use crate::util::error::HandlerError;

pub async fn create_conversation_handler(
    State(service): State<Arc<ChatServiceImpl>>,
    Json(payload): Json<CreateConversationRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    payload
        .validate()
        .map_err(|e| HandlerError::validation(format!("Validation error: {}", e)))?;
    let conversation = service
        .create_conversation(payload)
        .await
        .map_err(HandlerError::from)?;
    Ok((StatusCode::CREATED, Json(conversation)))
}

pub async fn list_conversations_handler(
    State(service): State<Arc<ChatServiceImpl>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, HandlerError> {
    let agency_id = parse_optional_id(&params, "agency_id")?;
    let (page, limit) = pagination(&params);
    let conversations = service
        .list_conversations(agency_id, page, limit)
        .await
        .map_err(HandlerError::from)?;
    Ok(Json(conversations))
}

pub async fn get_conversation_handler(
    State(service): State<Arc<ChatServiceImpl>>,
    Path((id,)): Path<(String,)>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_id(&id, "conversation id")?;
    let conversation = service.get_conversation(id).await.map_err(HandlerError::from)?;
    Ok(Json(conversation))
}

pub async fn delete_conversation_handler(
    State(service): State<Arc<ChatServiceImpl>>,
    Path((id,)): Path<(String,)>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_id(&id, "conversation id")?;
    service.delete_conversation(id).await.map_err(HandlerError::from)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn post_message_handler(
    State(service): State<Arc<ChatServiceImpl>>,
    Path((id,)): Path<(String,)>,
    Json(payload): Json<PostMessageRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_id(&id, "conversation id")?;
    payload
        .validate()
        .map_err(|e| HandlerError::validation(format!("Validation error: {}", e)))?;
    let message = service.post_message(id, payload).await.map_err(HandlerError::from)?;
    Ok((StatusCode::CREATED, Json(message)))
}

pub async fn list_messages_handler(
    State(service): State<Arc<ChatServiceImpl>>,
    Path((id,)): Path<(String,)>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_id(&id, "conversation id")?;
    let messages = service.list_messages(id).await.map_err(HandlerError::from)?;
    Ok(Json(messages))
}
