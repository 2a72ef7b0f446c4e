use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::dto::agency_dto::{CreateAgencyRequest, UpdateAgencyRequest};
use crate::handler::{pagination, parse_id};
use crate::service::agency_service::{AgencyService, AgencyServiceImpl};
use crate::util::error::HandlerError;

pub async fn create_agency_handler(
    State(service): State<Arc<AgencyServiceImpl>>,
    Json(payload): Json<CreateAgencyRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    payload
        .validate()
        .map_err(|e| HandlerError::validation(format!("Validation error: {}", e)))?;
    let agency = service.create_agency(payload).await.map_err(HandlerError::from)?;
    Ok((StatusCode::CREATED, Json(agency)))
}

pub async fn list_agencies_handler(
    State(service): State<Arc<AgencyServiceImpl>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, HandlerError> {
    let (page, limit) = pagination(&params);
    let agencies = service.list_agencies(page, limit).await.map_err(HandlerError::from)?;
    Ok(Json(agencies))
}

pub async fn get_agency_handler(
    State(service): State<Arc<AgencyServiceImpl>>,
    Path((id,)): Path<(String,)>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_id(&id, "agency id")?;
    let agency = service.get_agency(id).await.map_err(HandlerError::from)?;
    Ok(Json(agency))
}

pub async fn update_agency_handler(
    State(service): State<Arc<AgencyServiceImpl>>,
    Path((id,)): Path<(String,)>,
    Json(payload): Json<UpdateAgencyRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_id(&id, "agency id")?;
    payload
        .validate()
        .map_err(|e| HandlerError::validation(format!("Validation error: {}", e)))?;
    let agency = service.update_agency(id, payload).await.map_err(HandlerError::from)?;
    Ok(Json(agency))
}

pub async fn delete_agency_handler(
    State(service): State<Arc<AgencyServiceImpl>>,
    Path((id,)): Path<(String,)>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_id(&id, "agency id")?;
    service.delete_agency(id).await.map_err(HandlerError::from)?;
    Ok(StatusCode::NO_CONTENT)
}
