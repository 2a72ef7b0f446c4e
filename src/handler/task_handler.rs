use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::dto::task_dto::{CreateTaskRequest, UpdateTaskRequest};
use crate::handler::{pagination, parse_id, parse_optional_id};
use crate::repository::task_repo::TaskFilter;
use crate::service::task_service::{TaskService, TaskServiceImpl};
use crate::util::error::HandlerError;

pub async fn create_task_handler(
    State(service): State<Arc<TaskServiceImpl>>,
    Json(payload): Json<CreateTaskRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    payload
        .validate()
        .map_err(|e| HandlerError::validation(format!("Validation error: {}", e)))?;
    let task = service.create_task(payload).await.map_err(HandlerError::from)?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn list_tasks_handler(
    State(service): State<Arc<TaskServiceImpl>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, HandlerError> {
    let filter = TaskFilter {
        project_id: parse_optional_id(&params, "project_id")?,
        client_id: parse_optional_id(&params, "client_id")?,
    };
    let (page, limit) = pagination(&params);
    let tasks = service
        .list_tasks(filter, page, limit)
        .await
        .map_err(HandlerError::from)?;
    Ok(Json(tasks))
}

pub async fn get_task_handler(
    State(service): State<Arc<TaskServiceImpl>>,
    Path((id,)): Path<(String,)>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_id(&id, "task id")?;
    let task = service.get_task(id).await.map_err(HandlerError::from)?;
    Ok(Json(task))
}

pub async fn update_task_handler(
    State(service): State<Arc<TaskServiceImpl>>,
    Path((id,)): Path<(String,)>,
    Json(payload): Json<UpdateTaskRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_id(&id, "task id")?;
    payload
        .validate()
        .map_err(|e| HandlerError::validation(format!("Validation error: {}", e)))?;
    let task = service.update_task(id, payload).await.map_err(HandlerError::from)?;
    Ok(Json(task))
}

pub async fn delete_task_handler(
    State(service): State<Arc<TaskServiceImpl>>,
    Path((id,)): Path<(String,)>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_id(&id, "task id")?;
    service.delete_task(id).await.map_err(HandlerError::from)?;
    Ok(StatusCode::NO_CONTENT)
}
