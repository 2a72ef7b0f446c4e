use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::dto::product_dto::{CreateProductRequest, UpdateProductRequest};
use crate::handler::{pagination, parse_id, parse_optional_id};
use crate::service::product_service::{ProductService, ProductServiceImpl};
use crate::util::error::HandlerError;

pub async fn create_product_handler(
    State(service): State<Arc<ProductServiceImpl>>,
    Json(payload): Json<CreateProductRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    payload
        .validate()
        .map_err(|e| HandlerError::validation(format!("Validation error: {}", e)))?;
    let product = service.create_product(payload).await.map_err(HandlerError::from)?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn list_products_handler(
    State(service): State<Arc<ProductServiceImpl>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, HandlerError> {
    let agency_id = parse_optional_id(&params, "agency_id")?;
    let active_only = params
        .get("active")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false);
    let (page, limit) = pagination(&params);
    let products = service
        .list_products(agency_id, active_only, page, limit)
        .await
        .map_err(HandlerError::from)?;
    Ok(Json(products))
}

pub async fn get_product_handler(
    State(service): State<Arc<ProductServiceImpl>>,
    Path((id,)): Path<(String,)>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_id(&id, "product id")?;
    let product = service.get_product(id).await.map_err(HandlerError::from)?;
    Ok(Json(product))
}

pub async fn update_product_handler(
    State(service): State<Arc<ProductServiceImpl>>,
    Path((id,)): Path<(String,)>,
    Json(payload): Json<UpdateProductRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_id(&id, "product id")?;
    payload
        .validate()
        .map_err(|e| HandlerError::validation(format!("Validation error: {}", e)))?;
    let product = service.update_product(id, payload).await.map_err(HandlerError::from)?;
    Ok(Json(product))
}

pub async fn delete_product_handler(
    State(service): State<Arc<ProductServiceImpl>>,
    Path((id,)): Path<(String,)>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_id(&id, "product id")?;
    service.delete_product(id).await.map_err(HandlerError::from)?;
    Ok(StatusCode::NO_CONTENT)
}
