use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use tracing::{info, instrument};

use crate::dto::asset_dto::{CreateAssetRequest, UpdateAssetRequest};
use crate::model::asset::DigitalAsset;
use crate::repository::asset_repo::AssetRepository;
use crate::service::lead_service::parse_object_id;
use crate::util::error::ServiceError;
use crate::util::money::Money;

#[async_trait]
pub trait AssetService: Send + Sync {
    async fn create_asset(&self, request: CreateAssetRequest) -> Result<DigitalAsset, ServiceError>;
    async fn get_asset(&self, id: ObjectId) -> Result<DigitalAsset, ServiceError>;
    async fn update_asset(
        &self,
        id: ObjectId,
        request: UpdateAssetRequest,
    ) -> Result<DigitalAsset, ServiceError>;
    async fn delete_asset(&self, id: ObjectId) -> Result<(), ServiceError>;
    async fn list_assets(
        &self,
        agency_id: Option<ObjectId>,
        client_id: Option<ObjectId>,
        page: u32,
        limit: u32,
    ) -> Result<Vec<DigitalAsset>, ServiceError>;
}

pub struct AssetServiceImpl {
    asset_repo: Arc<dyn AssetRepository>,
}

impl AssetServiceImpl {
    pub fn new(asset_repo: Arc<dyn AssetRepository>) -> Self {
        AssetServiceImpl { asset_repo }
    }
}

#[async_trait]
impl AssetService for AssetServiceImpl {
    #[instrument(skip(self, request))]
    async fn create_asset(&self, request: CreateAssetRequest) -> Result<DigitalAsset, ServiceError> {
        info!("Creating digital asset");
        let agency_id = parse_object_id(&request.agency_id, "agency id")?;
        let client_id = request
            .client_id
            .as_deref()
            .map(|raw| parse_object_id(raw, "client id"))
            .transpose()?;

        let asset = DigitalAsset {
            id: None,
            agency_id,
            client_id,
            name: request.name,
            asset_type: request.asset_type,
            url: request.url,
            cost: request.cost.map(Money::from_minor),
            purchase_date: request.purchase_date,
            renewal_date: request.renewal_date,
            notes: request.notes,
            is_active: true,
            created_at: None,
            updated_at: None,
        };

        self.asset_repo.create(asset).await.map_err(ServiceError::from)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn get_asset(&self, id: ObjectId) -> Result<DigitalAsset, ServiceError> {
        self.asset_repo.get_by_id(id).await.map_err(ServiceError::from)
    }

    #[instrument(skip(self, request), fields(id = %id))]
    async fn update_asset(
        &self,
        id: ObjectId,
        request: UpdateAssetRequest,
    ) -> Result<DigitalAsset, ServiceError> {
        let mut asset = self.asset_repo.get_by_id(id).await?;

        if let Some(name) = request.name {
            asset.name = name;
        }
        if let Some(asset_type) = request.asset_type {
            asset.asset_type = asset_type;
        }
        if let Some(url) = request.url {
            asset.url = Some(url);
        }
        if let Some(cost) = request.cost {
            asset.cost = Some(Money::from_minor(cost));
        }
        if let Some(purchase_date) = request.purchase_date {
            asset.purchase_date = Some(purchase_date);
        }
        if let Some(renewal_date) = request.renewal_date {
            asset.renewal_date = Some(renewal_date);
        }
        if let Some(notes) = request.notes {
            asset.notes = Some(notes);
        }
        if let Some(is_active) = request.is_active {
            asset.is_active = is_active;
        }

        self.asset_repo.update(id, asset).await.map_err(ServiceError::from)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn delete_asset(&self, id: ObjectId) -> Result<(), ServiceError> {
        self.asset_repo.delete(id).await.map_err(ServiceError::from)
    }

    #[instrument(skip(self))]
    async fn list_assets(
        &self,
        agency_id: Option<ObjectId>,
        client_id: Option<ObjectId>,
        page: u32,
        limit: u32,
    ) -> Result<Vec<DigitalAsset>, ServiceError> {
        self.asset_repo
            .list(agency_id, client_id, page, limit)
            .await
            .map_err(ServiceError::from)
    }
}
