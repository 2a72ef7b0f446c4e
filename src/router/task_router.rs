use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

use crate::handler::task_handler::{
    create_task_handler, delete_task_handler, get_task_handler, list_tasks_handler,
    update_task_handler,
};
use crate::service::task_service::TaskServiceImpl;

pub fn task_router(service: Arc<TaskServiceImpl>) -> Router {
    Router::new()
        .route("/tasks", post(create_task_handler))
        .route("/tasks", get(list_tasks_handler))
        .route("/tasks/{id}", get(get_task_handler))
        .route("/tasks/{id}", put(update_task_handler))
        .route("/tasks/{id}", delete(delete_task_handler))
        .with_state(service)
}
