use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::dto::lead_dto::{ConvertLeadRequest, CreateLeadRequest, UpdateLeadRequest};
use crate::handler::{pagination, parse_id, parse_optional_id};
use crate::model::common::Priority;
use crate::model::lead::LeadStatus;
use crate::repository::lead_repo::LeadFilter;
use crate::service::lead_service::{LeadService, LeadServiceImpl};
use crate::util::error::HandlerError;

pub async fn create_lead_handler(
    State(service): State<Arc<LeadServiceImpl>>,
    Json(payload): Json<CreateLeadRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    payload
        .validate()
        .map_err(|e| HandlerError::validation(format!("Validation error: {}", e)))?;
    let lead = service.create_lead(payload).await.map_err(HandlerError::from)?;
    Ok((StatusCode::CREATED, Json(lead)))
}

pub async fn list_leads_handler(
    State(service): State<Arc<LeadServiceImpl>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, HandlerError> {
    let filter = lead_filter(&params)?;
    let (page, limit) = pagination(&params);
    let leads = service
        .list_leads(filter, page, limit)
        .await
        .map_err(HandlerError::from)?;
    Ok(Json(leads))
}

pub async fn lead_stats_handler(
    State(service): State<Arc<LeadServiceImpl>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, HandlerError> {
    let agency_id = parse_optional_id(&params, "agency_id")?;
    let stats = service.lead_stats(agency_id).await.map_err(HandlerError::from)?;
    Ok(Json(stats))
}

pub async fn get_lead_handler(
    State(service): State<Arc<LeadServiceImpl>>,
    Path((id,)): Path<(String,)>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_id(&id, "lead id")?;
    let lead = service.get_lead(id).await.map_err(HandlerError::from)?;
    Ok(Json(lead))
}

pub async fn update_lead_handler(
    State(service): State<Arc<LeadServiceImpl>>,
    Path((id,)): Path<(String,)>,
    Json(payload): Json<UpdateLeadRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_id(&id, "lead id")?;
    payload
        .validate()
        .map_err(|e| HandlerError::validation(format!("Validation error: {}", e)))?;
    let lead = service.update_lead(id, payload).await.map_err(HandlerError::from)?;
    Ok(Json(lead))
}

pub async fn delete_lead_handler(
    State(service): State<Arc<LeadServiceImpl>>,
    Path((id,)): Path<(String,)>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_id(&id, "lead id")?;
    service.delete_lead(id).await.map_err(HandlerError::from)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn convert_lead_handler(
    State(service): State<Arc<LeadServiceImpl>>,
    Path((id,)): Path<(String,)>,
    Json(payload): Json<ConvertLeadRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_id(&id, "lead id")?;
    payload
        .validate()
        .map_err(|e| HandlerError::validation(format!("Validation error: {}", e)))?;
    let client = service.convert_lead(id, payload).await.map_err(HandlerError::from)?;
    Ok((StatusCode::CREATED, Json(client)))
}

fn lead_filter(params: &HashMap<String, String>) -> Result<LeadFilter, HandlerError> {
    let status = params
        .get("status")
        .map(|raw| {
            LeadStatus::parse(raw)
                .ok_or_else(|| HandlerError::bad_request(format!("Unknown lead status: {}", raw)))
        })
        .transpose()?;
    let priority = params
        .get("priority")
        .map(|raw| {
            Priority::parse(raw)
                .ok_or_else(|| HandlerError::bad_request(format!("Unknown priority: {}", raw)))
        })
        .transpose()?;
    Ok(LeadFilter {
        agency_id: parse_optional_id(params, "agency_id")?,
        status,
        platform: params.get("platform").cloned(),
        priority,
        search: params.get("search").cloned(),
    })
}
