use std::sync::Arc;

use async_trait::async_trait;
use bson::doc;
use bson::oid::ObjectId;
use futures::stream::StreamExt;
use mongodb::options::FindOptions;
use mongodb::Collection;
use tracing::error;

use crate::model::agency::Agency;
use crate::repository::mongo::{collections, now_rfc3339, MongoStore};
use crate::repository::repository_error::{RepositoryError, RepositoryResult};

#[async_trait]
pub trait AgencyRepository: Send + Sync {
    async fn create(&self, agency: Agency) -> RepositoryResult<Agency>;
    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<Agency>;
    async fn update(&self, id: ObjectId, agency: Agency) -> RepositoryResult<Agency>;
    async fn delete(&self, id: ObjectId) -> RepositoryResult<()>;
    async fn list(&self, page: u32, limit: u32) -> RepositoryResult<Vec<Agency>>;
}

pub struct MongoAgencyRepository {
    agencies: Collection<Agency>,
}

impl MongoAgencyRepository {
    pub fn new(store: Arc<MongoStore>) -> Self {
        MongoAgencyRepository {
            agencies: store.collection::<Agency>(collections::AGENCIES),
        }
    }
}

#[async_trait]
impl AgencyRepository for MongoAgencyRepository {
    #[tracing::instrument(skip(self, agency))]
    async fn create(&self, agency: Agency) -> RepositoryResult<Agency> {
        let mut new_agency = agency;
        new_agency.id = Some(ObjectId::new());
        let now = now_rfc3339();
        new_agency.created_at = Some(now.clone());
        new_agency.updated_at = Some(now);

        self.agencies
            .insert_one(new_agency.clone(), None)
            .await
            .map_err(RepositoryError::from)?;
        Ok(new_agency)
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<Agency> {
        match self.agencies.find_one(doc! { "_id": id }, None).await {
            Ok(Some(agency)) => Ok(agency),
            Ok(None) => Err(RepositoryError::not_found(format!("Agency not found for ID: {}", id))),
            Err(e) => {
                error!("Failed to fetch agency by ID: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self, agency), fields(id = %id))]
    async fn update(&self, id: ObjectId, agency: Agency) -> RepositoryResult<Agency> {
        let mut updated = agency;
        updated.updated_at = Some(now_rfc3339());
        let mut document = bson::to_document(&updated)?;
        document.remove("_id");

        let result = self
            .agencies
            .update_one(doc! { "_id": id }, doc! { "$set": document }, None)
            .await;
        match result {
            Ok(update_result) if update_result.matched_count > 0 => Ok(updated),
            Ok(_) => Err(RepositoryError::not_found(format!("No agency to update for ID: {}", id))),
            Err(e) => Err(RepositoryError::from(e)),
        }
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    async fn delete(&self, id: ObjectId) -> RepositoryResult<()> {
        let result = self.agencies.delete_one(doc! { "_id": id }, None).await;
        match result {
            Ok(delete_result) if delete_result.deleted_count > 0 => Ok(()),
            Ok(_) => Err(RepositoryError::not_found(format!("No agency to delete for ID: {}", id))),
            Err(e) => Err(RepositoryError::from(e)),
        }
    }

    #[tracing::instrument(skip(self), fields(page = page, limit = limit))]
    async fn list(&self, page: u32, limit: u32) -> RepositoryResult<Vec<Agency>> {
        let options = FindOptions::builder()
            .skip(u64::from(page.saturating_sub(1)) * u64::from(limit))
            .limit(i64::from(limit))
            .sort(doc! { "name": 1 })
            .build();
        let mut cursor = self
            .agencies
            .find(None, options)
            .await
            .map_err(RepositoryError::from)?;
        let mut agencies = Vec::new();
        while let Some(agency) = cursor.next().await {
            agencies.push(agency.map_err(RepositoryError::from)?);
        }
        Ok(agencies)
    }
}
