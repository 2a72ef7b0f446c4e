use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

use crate::handler::lead_handler::{
    convert_lead_handler, create_lead_handler, delete_lead_handler, get_lead_handler,
    lead_stats_handler, list_leads_handler, update_lead_handler,
};
use crate::service::lead_service::LeadServiceImpl;

pub fn lead_router(service: Arc<LeadServiceImpl>) -> Router {
    Router::new()
        .route("/leads", post(create_lead_handler))
        .route("/leads", get(list_leads_handler))
        .route("/leads/stats", get(lead_stats_handler))
        .route("/leads/{id}", get(get_lead_handler))
        .route("/leads/{id}", put(update_lead_handler))
        .route("/leads/{id}", delete(delete_lead_handler))
        .route("/leads/{id}/convert", post(convert_lead_handler))
        .with_state(service)
}
