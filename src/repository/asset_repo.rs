use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{doc, Document};
use futures::stream::StreamExt;
use mongodb::options::FindOptions;
use mongodb::Collection;
use tracing::error;

use crate::model::asset::DigitalAsset;
use crate::repository::mongo::{collections, now_rfc3339, MongoStore};
use crate::repository::repository_error::{RepositoryError, RepositoryResult};

#[async_trait]
pub trait AssetRepository: Send + Sync {
    async fn create(&self, asset: DigitalAsset) -> RepositoryResult<DigitalAsset>;
    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<DigitalAsset>;
    async fn update(&self, id: ObjectId, asset: DigitalAsset) -> RepositoryResult<DigitalAsset>;
    async fn delete(&self, id: ObjectId) -> RepositoryResult<()>;
    async fn list(
        &self,
        agency_id: Option<ObjectId>,
        client_id: Option<ObjectId>,
        page: u32,
        limit: u32,
    ) -> RepositoryResult<Vec<DigitalAsset>>;
}

pub struct MongoAssetRepository {
    assets: Collection<DigitalAsset>,
}

impl MongoAssetRepository {
    pub fn new(store: Arc<MongoStore>) -> Self {
        MongoAssetRepository {
            assets: store.collection::<DigitalAsset>(collections::DIGITAL_ASSETS),
        }
    }
}

#[async_trait]
impl AssetRepository for MongoAssetRepository {
    #[tracing::instrument(skip(self, asset))]
    async fn create(&self, asset: DigitalAsset) -> RepositoryResult<DigitalAsset> {
        let mut new_asset = asset;
        new_asset.id = Some(ObjectId::new());
        let now = now_rfc3339();
        new_asset.created_at = Some(now.clone());
        new_asset.updated_at = Some(now);

        self.assets
            .insert_one(new_asset.clone(), None)
            .await
            .map_err(RepositoryError::from)?;
        Ok(new_asset)
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<DigitalAsset> {
        match self.assets.find_one(doc! { "_id": id }, None).await {
            Ok(Some(asset)) => Ok(asset),
            Ok(None) => Err(RepositoryError::not_found(format!("Asset not found for ID: {}", id))),
            Err(e) => {
                error!("Failed to fetch asset by ID: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self, asset), fields(id = %id))]
    async fn update(&self, id: ObjectId, asset: DigitalAsset) -> RepositoryResult<DigitalAsset> {
        let mut updated = asset;
        updated.updated_at = Some(now_rfc3339());
        let mut document = bson::to_document(&updated)?;
        document.remove("_id");

        let result = self
            .assets
            .update_one(doc! { "_id": id }, doc! { "$set": document }, None)
            .await;
        match result {
            Ok(update_result) if update_result.matched_count > 0 => Ok(updated),
            Ok(_) => Err(RepositoryError::not_found(format!("No asset to update for ID: {}", id))),
            Err(e) => Err(RepositoryError::from(e)),
        }
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    async fn delete(&self, id: ObjectId) -> RepositoryResult<()> {
        let result = self.assets.delete_one(doc! { "_id": id }, None).await;
        match result {
            Ok(delete_result) if delete_result.deleted_count > 0 => Ok(()),
            Ok(_) => Err(RepositoryError::not_found(format!("No asset to delete for ID: {}", id))),
            Err(e) => Err(RepositoryError::from(e)),
        }
    }

    #[tracing::instrument(skip(self), fields(page = page, limit = limit))]
    async fn list(
        &self,
        agency_id: Option<ObjectId>,
        client_id: Option<ObjectId>,
        page: u32,
        limit: u32,
    ) -> RepositoryResult<Vec<DigitalAsset>> {
        let mut filter = Document::new();
        if let Some(agency_id) = agency_id {
            filter.insert("agency_id", agency_id);
        }
        if let Some(client_id) = client_id {
            filter.insert("client_id", client_id);
        }
        let options = FindOptions::builder()
            .skip(u64::from(page.saturating_sub(1)) * u64::from(limit))
            .limit(i64::from(limit))
            .sort(doc! { "created_at": -1 })
            .build();
        let mut cursor = self
            .assets
            .find(filter, options)
            .await
            .map_err(RepositoryError::from)?;
        let mut assets = Vec::new();
        while let Some(asset) = cursor.next().await {
            assets.push(asset.map_err(RepositoryError::from)?);
        }
        Ok(assets)
    }
}
