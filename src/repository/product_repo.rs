use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{doc, Document};
use futures::stream::StreamExt;
use mongodb::options::FindOptions;
use mongodb::Collection;
use tracing::{error, info};

use crate::model::product::Product;
use crate::repository::mongo::{collections, now_rfc3339, MongoStore};
use crate::repository::repository_error::{RepositoryError, RepositoryResult};

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create(&self, product: Product) -> RepositoryResult<Product>;
    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<Product>;
    async fn update(&self, id: ObjectId, product: Product) -> RepositoryResult<Product>;
    /// Hard delete. Historical quote items keep their snapshot; their
    /// `product_id` is allowed to dangle afterwards.
    async fn delete(&self, id: ObjectId) -> RepositoryResult<()>;
    async fn list(
        &self,
        agency_id: Option<ObjectId>,
        active_only: bool,
        page: u32,
        limit: u32,
    ) -> RepositoryResult<Vec<Product>>;
}

pub struct MongoProductRepository {
    products: Collection<Product>,
}

impl MongoProductRepository {
    pub fn new(store: Arc<MongoStore>) -> Self {
        MongoProductRepository {
            products: store.collection::<Product>(collections::PRODUCTS),
        }
    }
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    #[tracing::instrument(skip(self, product))]
    async fn create(&self, product: Product) -> RepositoryResult<Product> {
        let mut new_product = product;
        new_product.id = Some(ObjectId::new());
        let now = now_rfc3339();
        new_product.created_at = Some(now.clone());
        new_product.updated_at = Some(now);

        match self.products.insert_one(new_product.clone(), None).await {
            Ok(_) => {
                info!(product_id = ?new_product.id, "Product created");
                Ok(new_product)
            }
            Err(e) => {
                error!("Failed to create product: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<Product> {
        match self.products.find_one(doc! { "_id": id }, None).await {
            Ok(Some(product)) => Ok(product),
            Ok(None) => Err(RepositoryError::not_found(format!("Product not found for ID: {}", id))),
            Err(e) => {
                error!("Failed to fetch product by ID: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self, product), fields(id = %id))]
    async fn update(&self, id: ObjectId, product: Product) -> RepositoryResult<Product> {
        let mut updated = product;
        updated.updated_at = Some(now_rfc3339());
        let mut document = bson::to_document(&updated)?;
        document.remove("_id");

        let result = self
            .products
            .update_one(doc! { "_id": id }, doc! { "$set": document }, None)
            .await;
        match result {
            Ok(update_result) if update_result.matched_count > 0 => Ok(updated),
            Ok(_) => Err(RepositoryError::not_found(format!("No product to update for ID: {}", id))),
            Err(e) => {
                error!("Failed to update product: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    async fn delete(&self, id: ObjectId) -> RepositoryResult<()> {
        let result = self.products.delete_one(doc! { "_id": id }, None).await;
        match result {
            Ok(delete_result) if delete_result.deleted_count > 0 => Ok(()),
            Ok(_) => Err(RepositoryError::not_found(format!("No product to delete for ID: {}", id))),
            Err(e) => {
                error!("Failed to delete product: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(page = page, limit = limit))]
    async fn list(
        &self,
        agency_id: Option<ObjectId>,
        active_only: bool,
        page: u32,
        limit: u32,
    ) -> RepositoryResult<Vec<Product>> {
        let mut filter = Document::new();
        if let Some(agency_id) = agency_id {
            filter.insert("agency_id", agency_id);
        }
        if active_only {
            filter.insert("is_active", true);
        }
        let options = FindOptions::builder()
            .skip(u64::from(page.saturating_sub(1)) * u64::from(limit))
            .limit(i64::from(limit))
            .sort(doc! { "name": 1 })
            .build();

        let mut cursor = self
            .products
            .find(filter, options)
            .await
            .map_err(RepositoryError::from)?;
        let mut products = Vec::new();
        while let Some(product) = cursor.next().await {
            products.push(product.map_err(RepositoryError::from)?);
        }
        Ok(products)
    }
}
