use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::dto::asset_dto::{CreateAssetRequest, UpdateAssetRequest};
use crate::handler::{pagination, parse_id, parse_optional_id};
use crate::service::asset_service::{AssetService, AssetServiceImpl};
use crate::util::error::HandlerError;

pub async fn create_asset_handler(
    State(service): State<Arc<AssetServiceImpl>>,
    Json(payload): Json<CreateAssetRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    payload
        .validate()
        .map_err(|e| HandlerError::validation(format!("Validation error: {}", e)))?;
    let asset = service.create_asset(payload).await.map_err(HandlerError::from)?;
    Ok((StatusCode::CREATED, Json(asset)))
}

pub async fn list_assets_handler(
    State(service): State<Arc<AssetServiceImpl>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, HandlerError> {
    let agency_id = parse_optional_id(&params, "agency_id")?;
    let client_id = parse_optional_id(&params, "client_id")?;
    let (page, limit) = pagination(&params);
    let assets = service
        .list_assets(agency_id, client_id, page, limit)
        .await
        .map_err(HandlerError::from)?;
    Ok(Json(assets))
}

pub async fn get_asset_handler(
    State(service): State<Arc<AssetServiceImpl>>,
    Path((id,)): Path<(String,)>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_id(&id, "asset id")?;
    let asset = service.get_asset(id).await.map_err(HandlerError::from)?;
    Ok(Json(asset))
}

pub async fn update_asset_handler(
    State(service): State<Arc<AssetServiceImpl>>,
    Path((id,)): Path<(String,)>,
    Json(payload): Json<UpdateAssetRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_id(&id, "asset id")?;
    payload
        .validate()
        .map_err(|e| HandlerError::validation(format!("Validation error: {}", e)))?;
    let asset = service.update_asset(id, payload).await.map_err(HandlerError::from)?;
    Ok(Json(asset))
}

pub async fn delete_asset_handler(
    State(service): State<Arc<AssetServiceImpl>>,
    Path((id,)): Path<(String,)>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_id(&id, "asset id")?;
    service.delete_asset(id).await.map_err(HandlerError::from)?;
    Ok(StatusCode::NO_CONTENT)
}
