use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

use crate::handler::agency_handler::{
    create_agency_handler, delete_agency_handler, get_agency_handler, list_agencies_handler,
    update_agency_handler,
};
use crate::service::agency_service::AgencyServiceImpl;

pub fn agency_router(service: Arc<AgencyServiceImpl>) -> Router {
    Router::new()
        .route("/agencies", post(create_agency_handler))
        .route("/agencies", get(list_agencies_handler))
        .route("/agencies/{id}", get(get_agency_handler))
        .route("/agencies/{id}", put(update_agency_handler))
        .route("/agencies/{id}", delete(delete_agency_handler))
        .with_state(service)
}
