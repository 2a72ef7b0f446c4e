use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{doc, Document};
use futures::stream::StreamExt;
use mongodb::options::FindOptions;
use mongodb::Collection;
use tracing::{error, info};

use crate::model::client::Client;
use crate::model::common::Priority;
use crate::model::lead::{Lead, LeadStats, LeadStatus};
use crate::repository::mongo::{collections, escape_regex, now_rfc3339, MongoStore};
use crate::repository::repository_error::{RepositoryError, RepositoryResult};

/// Read-side lead filter; all present fields are combined with AND, and
/// `search` is a case-insensitive substring match over the contact fields.
#[derive(Debug, Clone, Default)]
pub struct LeadFilter {
    pub agency_id: Option<ObjectId>,
    pub status: Option<LeadStatus>,
    pub platform: Option<String>,
    pub priority: Option<Priority>,
    pub search: Option<String>,
}

#[async_trait]
pub trait LeadRepository: Send + Sync {
    async fn create(&self, lead: Lead) -> RepositoryResult<Lead>;
    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<Lead>;
    async fn update(&self, id: ObjectId, lead: Lead) -> RepositoryResult<Lead>;
    async fn delete(&self, id: ObjectId) -> RepositoryResult<()>;
    async fn list(&self, filter: LeadFilter, page: u32, limit: u32) -> RepositoryResult<Vec<Lead>>;
    async fn stats(&self, agency_id: Option<ObjectId>) -> RepositoryResult<LeadStats>;
    /// Persists the converted client and marks the lead won in one
    /// transaction, so a failure leaves neither an orphaned client nor a
    /// half-converted lead.
    async fn convert(&self, id: ObjectId, client: Client) -> RepositoryResult<Client>;
}

pub struct MongoLeadRepository {
    store: Arc<MongoStore>,
    leads: Collection<Lead>,
    clients: Collection<Client>,
}

impl MongoLeadRepository {
    pub fn new(store: Arc<MongoStore>) -> Self {
        let leads = store.collection::<Lead>(collections::LEADS);
        let clients = store.collection::<Client>(collections::CLIENTS);
        MongoLeadRepository { store, leads, clients }
    }

    fn filter_document(filter: &LeadFilter) -> RepositoryResult<Document> {
        let mut document = Document::new();
        if let Some(agency_id) = filter.agency_id {
            document.insert("agency_id", agency_id);
        }
        if let Some(status) = filter.status {
            document.insert("status", bson::to_bson(&status)?);
        }
        if let Some(ref platform) = filter.platform {
            document.insert("platform", platform.as_str());
        }
        if let Some(priority) = filter.priority {
            document.insert("priority", bson::to_bson(&priority)?);
        }
        if let Some(ref search) = filter.search {
            let pattern = escape_regex(search);
            let matches = |field: &str| doc! { field: { "$regex": &pattern, "$options": "i" } };
            document.insert(
                "$or",
                vec![
                    matches("lead_data.name"),
                    matches("lead_data.email"),
                    matches("lead_data.phone"),
                ],
            );
        }
        Ok(document)
    }
}

#[async_trait]
impl LeadRepository for MongoLeadRepository {
    #[tracing::instrument(skip(self, lead))]
    async fn create(&self, lead: Lead) -> RepositoryResult<Lead> {
        let mut new_lead = lead;
        new_lead.id = Some(ObjectId::new());
        let now = now_rfc3339();
        new_lead.created_at = Some(now.clone());
        new_lead.updated_at = Some(now);

        match self.leads.insert_one(new_lead.clone(), None).await {
            Ok(_) => {
                info!(lead_id = ?new_lead.id, "Lead created");
                Ok(new_lead)
            }
            Err(e) => {
                error!("Failed to create lead: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<Lead> {
        match self.leads.find_one(doc! { "_id": id }, None).await {
            Ok(Some(lead)) => Ok(lead),
            Ok(None) => Err(RepositoryError::not_found(format!("Lead not found for ID: {}", id))),
            Err(e) => {
                error!("Failed to fetch lead by ID: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self, lead), fields(id = %id))]
    async fn update(&self, id: ObjectId, lead: Lead) -> RepositoryResult<Lead> {
        let mut updated = lead;
        updated.updated_at = Some(now_rfc3339());
        let mut document = bson::to_document(&updated)?;
        document.remove("_id");

        let result = self
            .leads
            .update_one(doc! { "_id": id }, doc! { "$set": document }, None)
            .await;
        match result {
            Ok(update_result) if update_result.matched_count > 0 => {
                info!(lead_id = %id, "Lead updated");
                Ok(updated)
            }
            Ok(_) => Err(RepositoryError::not_found(format!("No lead to update for ID: {}", id))),
            Err(e) => {
                error!("Failed to update lead: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    async fn delete(&self, id: ObjectId) -> RepositoryResult<()> {
        let result = self.leads.delete_one(doc! { "_id": id }, None).await;
        match result {
            Ok(delete_result) if delete_result.deleted_count > 0 => {
                info!(lead_id = %id, "Lead deleted");
                Ok(())
            }
            Ok(_) => Err(RepositoryError::not_found(format!("No lead to delete for ID: {}", id))),
            Err(e) => {
                error!("Failed to delete lead: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self, filter), fields(page = page, limit = limit))]
    async fn list(&self, filter: LeadFilter, page: u32, limit: u32) -> RepositoryResult<Vec<Lead>> {
        let document = Self::filter_document(&filter)?;
        let options = FindOptions::builder()
            .skip(u64::from(page.saturating_sub(1)) * u64::from(limit))
            .limit(i64::from(limit))
            .sort(doc! { "created_at": -1 })
            .build();

        let mut cursor = self
            .leads
            .find(document, options)
            .await
            .map_err(RepositoryError::from)?;
        let mut leads = Vec::new();
        while let Some(lead) = cursor.next().await {
            leads.push(lead.map_err(RepositoryError::from)?);
        }
        info!(count = leads.len(), "Fetched leads");
        Ok(leads)
    }

    #[tracing::instrument(skip(self))]
    async fn stats(&self, agency_id: Option<ObjectId>) -> RepositoryResult<LeadStats> {
        let filter = agency_id.map(|id| doc! { "agency_id": id });
        let mut cursor = self
            .leads
            .find(filter, None)
            .await
            .map_err(RepositoryError::from)?;
        let mut stats = LeadStats::default();
        while let Some(lead) = cursor.next().await {
            stats.record(&lead.map_err(RepositoryError::from)?);
        }
        Ok(stats)
    }

    #[tracing::instrument(skip(self, client), fields(id = %id))]
    async fn convert(&self, id: ObjectId, client: Client) -> RepositoryResult<Client> {
        let client_id = ObjectId::new();
        let now = now_rfc3339();
        let mut new_client = client;
        new_client.id = Some(client_id);
        new_client.created_at = Some(now.clone());
        new_client.updated_at = Some(now.clone());

        let mut session = self.store.session().await?;
        session
            .start_transaction(None)
            .await
            .map_err(RepositoryError::from)?;

        let outcome: RepositoryResult<()> = async {
            self.clients
                .insert_one_with_session(new_client.clone(), None, &mut session)
                .await?;
            let update = doc! { "$set": {
                "status": bson::to_bson(&LeadStatus::Won)?,
                "converted_client_id": client_id,
                "updated_at": &now,
            } };
            let result = self
                .leads
                .update_one_with_session(doc! { "_id": id }, update, None, &mut session)
                .await?;
            if result.matched_count == 0 {
                return Err(RepositoryError::not_found(format!(
                    "Lead not found for ID: {}",
                    id
                )));
            }
            Ok(())
        }
        .await;

        match outcome {
            Ok(()) => {
                session
                    .commit_transaction()
                    .await
                    .map_err(RepositoryError::from)?;
                info!(lead_id = %id, client_id = %client_id, "Lead converted to client");
                Ok(new_client)
            }
            Err(e) => {
                let _ = session.abort_transaction().await;
                error!("Lead conversion aborted: {}", e);
                Err(e)
            }
        }
    }
}
