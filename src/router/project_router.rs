use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

use crate::handler::project_handler::{
    create_project_handler, delete_project_handler, get_project_handler, list_projects_handler,
    update_project_handler,
};
use crate::service::project_service::ProjectServiceImpl;

pub fn project_router(service: Arc<ProjectServiceImpl>) -> Router {
    Router::new()
        .route("/projects", post(create_project_handler))
        .route("/projects", get(list_projects_handler))
        .route("/projects/{id}", get(get_project_handler))
        .route("/projects/{id}", put(update_project_handler))
        .route("/projects/{id}", delete(delete_project_handler))
        .with_state(service)
}
