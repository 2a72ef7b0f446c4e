use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

use crate::handler::asset_handler::{
    create_asset_handler, delete_asset_handler, get_asset_handler, list_assets_handler,
    update_asset_handler,
};
use crate::service::asset_service::AssetServiceImpl;

pub fn asset_router(service: Arc<AssetServiceImpl>) -> Router {
    Router::new()
        .route("/assets", post(create_asset_handler))
        .route("/assets", get(list_assets_handler))
        .route("/assets/{id}", get(get_asset_handler))
        .route("/assets/{id}", put(update_asset_handler))
        .route("/assets/{id}", delete(delete_asset_handler))
        .with_state(service)
}
