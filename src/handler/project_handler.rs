use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::dto::project_dto::{CreateProjectRequest, UpdateProjectRequest};
use crate::handler::{pagination, parse_id, parse_optional_id};
use crate::service::project_service::{ProjectService, ProjectServiceImpl};
use crate::util::error::HandlerError;

pub async fn create_project_handler(
    State(service): State<Arc<ProjectServiceImpl>>,
    Json(payload): Json<CreateProjectRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    payload
        .validate()
        .map_err(|e| HandlerError::validation(format!("Validation error: {}", e)))?;
    let project = service.create_project(payload).await.map_err(HandlerError::from)?;
    Ok((StatusCode::CREATED, Json(project)))
}

pub async fn list_projects_handler(
    State(service): State<Arc<ProjectServiceImpl>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, HandlerError> {
    let agency_id = parse_optional_id(&params, "agency_id")?;
    let client_id = parse_optional_id(&params, "client_id")?;
    let (page, limit) = pagination(&params);
    let projects = service
        .list_projects(agency_id, client_id, page, limit)
        .await
        .map_err(HandlerError::from)?;
    Ok(Json(projects))
}

pub async fn get_project_handler(
    State(service): State<Arc<ProjectServiceImpl>>,
    Path((id,)): Path<(String,)>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_id(&id, "project id")?;
    let project = service.get_project(id).await.map_err(HandlerError::from)?;
    Ok(Json(project))
}

pub async fn update_project_handler(
    State(service): State<Arc<ProjectServiceImpl>>,
    Path((id,)): Path<(String,)>,
    Json(payload): Json<UpdateProjectRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_id(&id, "project id")?;
    payload
        .validate()
        .map_err(|e| HandlerError::validation(format!("Validation error: {}", e)))?;
    let project = service.update_project(id, payload).await.map_err(HandlerError::from)?;
    Ok(Json(project))
}

pub async fn delete_project_handler(
    State(service): State<Arc<ProjectServiceImpl>>,
    Path((id,)): Path<(String,)>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_id(&id, "project id")?;
    service.delete_project(id).await.map_err(HandlerError::from)?;
    Ok(StatusCode::NO_CONTENT)
}
