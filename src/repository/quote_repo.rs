use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{doc, Document};
use futures::stream::StreamExt;
use mongodb::options::FindOptions;
use mongodb::Collection;
use tracing::{error, info};

use crate::model::quote::{Quote, QuoteStatus};
use crate::repository::mongo::{collections, now_rfc3339, MongoStore};
use crate::repository::repository_error::{RepositoryError, RepositoryResult};

#[async_trait]
pub trait QuoteRepository: Send + Sync {
    async fn create(&self, quote: Quote) -> RepositoryResult<Quote>;
    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<Quote>;
    async fn update(&self, id: ObjectId, quote: Quote) -> RepositoryResult<Quote>;
    async fn update_status(&self, id: ObjectId, status: QuoteStatus) -> RepositoryResult<Quote>;
    async fn delete(&self, id: ObjectId) -> RepositoryResult<()>;
    async fn list(
        &self,
        agency_id: Option<ObjectId>,
        client_id: Option<ObjectId>,
        status: Option<QuoteStatus>,
        page: u32,
        limit: u32,
    ) -> RepositoryResult<Vec<Quote>>;
}

pub struct MongoQuoteRepository {
    quotes: Collection<Quote>,
}

impl MongoQuoteRepository {
    pub fn new(store: Arc<MongoStore>) -> Self {
        MongoQuoteRepository {
            quotes: store.collection::<Quote>(collections::QUOTES),
        }
    }
}

#[async_trait]
impl QuoteRepository for MongoQuoteRepository {
    #[tracing::instrument(skip(self, quote))]
    async fn create(&self, quote: Quote) -> RepositoryResult<Quote> {
        let mut new_quote = quote;
        new_quote.id = Some(ObjectId::new());
        let now = now_rfc3339();
        new_quote.created_at = Some(now.clone());
        new_quote.updated_at = Some(now);

        match self.quotes.insert_one(new_quote.clone(), None).await {
            Ok(_) => {
                info!(quote_id = ?new_quote.id, "Quote created");
                Ok(new_quote)
            }
            Err(e) => {
                error!("Failed to create quote: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<Quote> {
        match self.quotes.find_one(doc! { "_id": id }, None).await {
            Ok(Some(quote)) => Ok(quote),
            Ok(None) => Err(RepositoryError::not_found(format!("Quote not found for ID: {}", id))),
            Err(e) => {
                error!("Failed to fetch quote by ID: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self, quote), fields(id = %id))]
    async fn update(&self, id: ObjectId, quote: Quote) -> RepositoryResult<Quote> {
        let mut updated = quote;
        updated.updated_at = Some(now_rfc3339());
        let mut document = bson::to_document(&updated)?;
        document.remove("_id");

        let result = self
            .quotes
            .update_one(doc! { "_id": id }, doc! { "$set": document }, None)
            .await;
        match result {
            Ok(update_result) if update_result.matched_count > 0 => {
                info!(quote_id = %id, "Quote updated");
                Ok(updated)
            }
            Ok(_) => Err(RepositoryError::not_found(format!("No quote to update for ID: {}", id))),
            Err(e) => {
                error!("Failed to update quote: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(id = %id, status = %status))]
    async fn update_status(&self, id: ObjectId, status: QuoteStatus) -> RepositoryResult<Quote> {
        let update = doc! { "$set": {
            "status": bson::to_bson(&status)?,
            "updated_at": now_rfc3339(),
        } };
        let result = self.quotes.update_one(doc! { "_id": id }, update, None).await;
        match result {
            Ok(update_result) if update_result.matched_count > 0 => {
                info!(quote_id = %id, status = %status, "Quote status updated");
                self.get_by_id(id).await
            }
            Ok(_) => Err(RepositoryError::not_found(format!(
                "No quote to update status for ID: {}",
                id
            ))),
            Err(e) => {
                error!("Failed to update quote status: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    async fn delete(&self, id: ObjectId) -> RepositoryResult<()> {
        let result = self.quotes.delete_one(doc! { "_id": id }, None).await;
        match result {
            Ok(delete_result) if delete_result.deleted_count > 0 => Ok(()),
            Ok(_) => Err(RepositoryError::not_found(format!("No quote to delete for ID: {}", id))),
            Err(e) => {
                error!("Failed to delete quote: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(page = page, limit = limit))]
    async fn list(
        &self,
        agency_id: Option<ObjectId>,
        client_id: Option<ObjectId>,
        status: Option<QuoteStatus>,
        page: u32,
        limit: u32,
    ) -> RepositoryResult<Vec<Quote>> {
        let mut filter = Document::new();
        if let Some(agency_id) = agency_id {
            filter.insert("agency_id", agency_id);
        }
        if let Some(client_id) = client_id {
            filter.insert("client_id", client_id);
        }
        if let Some(status) = status {
            filter.insert("status", bson::to_bson(&status)?);
        }
        let options = FindOptions::builder()
            .skip(u64::from(page.saturating_sub(1)) * u64::from(limit))
            .limit(i64::from(limit))
            .sort(doc! { "created_at": -1 })
            .build();

        let mut cursor = self
            .quotes
            .find(filter, options)
            .await
            .map_err(RepositoryError::from)?;
        let mut quotes = Vec::new();
        while let Some(quote) = cursor.next().await {
            quotes.push(quote.map_err(RepositoryError::from)?);
        }
        info!(count = quotes.len(), "Fetched quotes");
        Ok(quotes)
    }
}
