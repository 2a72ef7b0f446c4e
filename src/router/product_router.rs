use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

use crate::handler::product_handler::{
    create_product_handler, delete_product_handler, get_product_handler, list_products_handler,
    update_product_handler,
};
use crate::service::product_service::ProductServiceImpl;

pub fn product_router(service: Arc<ProductServiceImpl>) -> Router {
    Router::new()
        .route("/products", post(create_product_handler))
        .route("/products", get(list_products_handler))
        .route("/products/{id}", get(get_product_handler))
        .route("/products/{id}", put(update_product_handler))
        .route("/products/{id}", delete(delete_product_handler))
        .with_state(service)
}
