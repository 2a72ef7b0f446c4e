use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{doc, Document};
use futures::stream::StreamExt;
use mongodb::options::FindOptions;
use mongodb::Collection;
use tracing::{error, info};

use crate::model::client::{Client, ClientStatus};
use crate::repository::mongo::{collections, now_rfc3339, MongoStore};
use crate::repository::repository_error::{RepositoryError, RepositoryResult};

#[async_trait]
pub trait ClientRepository: Send + Sync {
    async fn create(&self, client: Client) -> RepositoryResult<Client>;
    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<Client>;
    async fn update(&self, id: ObjectId, client: Client) -> RepositoryResult<Client>;
    async fn delete(&self, id: ObjectId) -> RepositoryResult<()>;
    async fn list(
        &self,
        agency_id: Option<ObjectId>,
        status: Option<ClientStatus>,
        page: u32,
        limit: u32,
    ) -> RepositoryResult<Vec<Client>>;
}

pub struct MongoClientRepository {
    clients: Collection<Client>,
}

impl MongoClientRepository {
    pub fn new(store: Arc<MongoStore>) -> Self {
        MongoClientRepository {
            clients: store.collection::<Client>(collections::CLIENTS),
        }
    }
}

#[async_trait]
impl ClientRepository for MongoClientRepository {
    #[tracing::instrument(skip(self, client))]
    async fn create(&self, client: Client) -> RepositoryResult<Client> {
        let mut new_client = client;
        new_client.id = Some(ObjectId::new());
        let now = now_rfc3339();
        new_client.created_at = Some(now.clone());
        new_client.updated_at = Some(now);

        match self.clients.insert_one(new_client.clone(), None).await {
            Ok(_) => {
                info!(client_id = ?new_client.id, "Client created");
                Ok(new_client)
            }
            Err(e) => {
                error!("Failed to create client: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<Client> {
        match self.clients.find_one(doc! { "_id": id }, None).await {
            Ok(Some(client)) => Ok(client),
            Ok(None) => Err(RepositoryError::not_found(format!("Client not found for ID: {}", id))),
            Err(e) => {
                error!("Failed to fetch client by ID: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self, client), fields(id = %id))]
    async fn update(&self, id: ObjectId, client: Client) -> RepositoryResult<Client> {
        let mut updated = client;
        updated.updated_at = Some(now_rfc3339());
        let mut document = bson::to_document(&updated)?;
        document.remove("_id");

        let result = self
            .clients
            .update_one(doc! { "_id": id }, doc! { "$set": document }, None)
            .await;
        match result {
            Ok(update_result) if update_result.matched_count > 0 => Ok(updated),
            Ok(_) => Err(RepositoryError::not_found(format!("No client to update for ID: {}", id))),
            Err(e) => {
                error!("Failed to update client: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    async fn delete(&self, id: ObjectId) -> RepositoryResult<()> {
        let result = self.clients.delete_one(doc! { "_id": id }, None).await;
        match result {
            Ok(delete_result) if delete_result.deleted_count > 0 => Ok(()),
            Ok(_) => Err(RepositoryError::not_found(format!("No client to delete for ID: {}", id))),
            Err(e) => {
                error!("Failed to delete client: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(page = page, limit = limit))]
    async fn list(
        &self,
        agency_id: Option<ObjectId>,
        status: Option<ClientStatus>,
        page: u32,
        limit: u32,
    ) -> RepositoryResult<Vec<Client>> {
        let mut filter = Document::new();
        if let Some(agency_id) = agency_id {
            filter.insert("agency_id", agency_id);
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
            .clients
            .find(filter, options)
            .await
            .map_err(RepositoryError::from)?;
        let mut clients = Vec::new();
        while let Some(client) = cursor.next().await {
            clients.push(client.map_err(RepositoryError::from)?);
        }
        Ok(clients)
    }
}
