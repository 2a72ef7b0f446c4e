use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::dto::quote_dto::{CreateQuoteRequest, UpdateQuoteRequest, UpdateQuoteStatusRequest};
use crate::handler::{pagination, parse_id, parse_optional_id};
use crate::model::quote::QuoteStatus;
use crate::service::quote_service::{QuoteService, QuoteServiceImpl};
use crate::util::error::HandlerError;

pub async fn create_quote_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    Json(payload): Json<CreateQuoteRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    payload
        .validate()
        .map_err(|e| HandlerError::validation(format!("Validation error: {}", e)))?;
    let quote = service.create_quote(payload).await.map_err(HandlerError::from)?;
    Ok((StatusCode::CREATED, Json(quote)))
}

pub async fn list_quotes_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, HandlerError> {
    let agency_id = parse_optional_id(&params, "agency_id")?;
    let client_id = parse_optional_id(&params, "client_id")?;
    let status = params
        .get("status")
        .map(|raw| {
            QuoteStatus::parse(raw)
                .ok_or_else(|| HandlerError::bad_request(format!("Unknown quote status: {}", raw)))
        })
        .transpose()?;
    let (page, limit) = pagination(&params);
    let quotes = service
        .list_quotes(agency_id, client_id, status, page, limit)
        .await
        .map_err(HandlerError::from)?;
    Ok(Json(quotes))
}

pub async fn get_quote_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    Path((id,)): Path<(String,)>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_id(&id, "quote id")?;
    let quote = service.get_quote(id).await.map_err(HandlerError::from)?;
    Ok(Json(quote))
}

pub async fn update_quote_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    Path((id,)): Path<(String,)>,
    Json(payload): Json<UpdateQuoteRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_id(&id, "quote id")?;
    payload
        .validate()
        .map_err(|e| HandlerError::validation(format!("Validation error: {}", e)))?;
    let quote = service.update_quote(id, payload).await.map_err(HandlerError::from)?;
    Ok(Json(quote))
}

pub async fn delete_quote_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    Path((id,)): Path<(String,)>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_id(&id, "quote id")?;
    service.delete_quote(id).await.map_err(HandlerError::from)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Setting `approved` runs the transactional project/task handoff behind
/// the same endpoint the public approval view already calls.
pub async fn update_quote_status_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    Path((id,)): Path<(String,)>,
    Json(payload): Json<UpdateQuoteStatusRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_id(&id, "quote id")?;
    let quote = service
        .update_quote_status(id, payload.status)
        .await
        .map_err(HandlerError::from)?;
    Ok(Json(quote))
}

pub async fn send_quote_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    Path((id,)): Path<(String,)>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_id(&id, "quote id")?;
    let quote = service.send_quote(id).await.map_err(HandlerError::from)?;
    Ok(Json(quote))
}
