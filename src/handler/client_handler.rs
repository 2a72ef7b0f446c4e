use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::dto::client_dto::{CreateClientRequest, UpdateClientRequest};
use crate::handler::{pagination, parse_id, parse_optional_id};
use crate::model::client::ClientStatus;
use crate::service::client_service::{ClientService, ClientServiceImpl};
use crate::util::error::HandlerError;

pub async fn create_client_handler(
    State(service): State<Arc<ClientServiceImpl>>,
    Json(payload): Json<CreateClientRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    payload
        .validate()
        .map_err(|e| HandlerError::validation(format!("Validation error: {}", e)))?;
    let client = service.create_client(payload).await.map_err(HandlerError::from)?;
    Ok((StatusCode::CREATED, Json(client)))
}

pub async fn list_clients_handler(
    State(service): State<Arc<ClientServiceImpl>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, HandlerError> {
    let agency_id = parse_optional_id(&params, "agency_id")?;
    let status = params
        .get("status")
        .map(|raw| {
            ClientStatus::parse(raw)
                .ok_or_else(|| HandlerError::bad_request(format!("Unknown client status: {}", raw)))
        })
        .transpose()?;
    let (page, limit) = pagination(&params);
    let clients = service
        .list_clients(agency_id, status, page, limit)
        .await
        .map_err(HandlerError::from)?;
    Ok(Json(clients))
}

pub async fn get_client_handler(
    State(service): State<Arc<ClientServiceImpl>>,
    Path((id,)): Path<(String,)>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_id(&id, "client id")?;
    let client = service.get_client(id).await.map_err(HandlerError::from)?;
    Ok(Json(client))
}

pub async fn update_client_handler(
    State(service): State<Arc<ClientServiceImpl>>,
    Path((id,)): Path<(String,)>,
    Json(payload): Json<UpdateClientRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_id(&id, "client id")?;
    payload
        .validate()
        .map_err(|e| HandlerError::validation(format!("Validation error: {}", e)))?;
    let client = service.update_client(id, payload).await.map_err(HandlerError::from)?;
    Ok(Json(client))
}

pub async fn delete_client_handler(
    State(service): State<Arc<ClientServiceImpl>>,
    Path((id,)): Path<(String,)>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_id(&id, "client id")?;
    service.delete_client(id).await.map_err(HandlerError::from)?;
    Ok(StatusCode::NO_CONTENT)
}
