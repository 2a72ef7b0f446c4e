use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use tracing::{error, info, instrument};

use crate::dto::lead_dto::{ConvertLeadRequest, CreateLeadRequest, UpdateLeadRequest};
use crate::model::client::{Client, ClientStatus};
use crate::model::lead::{Lead, LeadData, LeadStats, LeadStatus};
use crate::repository::lead_repo::{LeadFilter, LeadRepository};
use crate::util::error::ServiceError;
use crate::util::money::Money;

#[async_trait]
pub trait LeadService: Send + Sync {
    async fn create_lead(&self, request: CreateLeadRequest) -> Result<Lead, ServiceError>;
    async fn get_lead(&self, id: ObjectId) -> Result<Lead, ServiceError>;
    async fn update_lead(&self, id: ObjectId, request: UpdateLeadRequest)
        -> Result<Lead, ServiceError>;
    async fn delete_lead(&self, id: ObjectId) -> Result<(), ServiceError>;
    async fn list_leads(
        &self,
        filter: LeadFilter,
        page: u32,
        limit: u32,
    ) -> Result<Vec<Lead>, ServiceError>;
    async fn lead_stats(&self, agency_id: Option<ObjectId>) -> Result<LeadStats, ServiceError>;
    async fn convert_lead(
        &self,
        id: ObjectId,
        request: ConvertLeadRequest,
    ) -> Result<Client, ServiceError>;
}

pub struct LeadServiceImpl {
    lead_repo: Arc<dyn LeadRepository>,
}

impl LeadServiceImpl {
    pub fn new(lead_repo: Arc<dyn LeadRepository>) -> Self {
        LeadServiceImpl { lead_repo }
    }

    /// Client record for a converted lead: explicit override fields win over
    /// the lead's captured contact data.
    fn client_from(lead: &Lead, overrides: ConvertLeadRequest) -> Result<Client, ServiceError> {
        let name = overrides
            .name
            .or_else(|| lead.lead_data.name.clone())
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| {
                ServiceError::InvalidInput(
                    "A client name is required: the lead has none and no override was given"
                        .to_string(),
                )
            })?;

        Ok(Client {
            id: None,
            agency_id: lead.agency_id,
            name,
            contact_name: overrides.contact_name,
            email: overrides.email.or_else(|| lead.lead_data.email.clone()),
            phone: overrides.phone.or_else(|| lead.lead_data.phone.clone()),
            industry: overrides.industry,
            status: ClientStatus::Active,
            notes: overrides.notes.or_else(|| lead.notes.clone()),
            custom_fields: None,
            created_at: None,
            updated_at: None,
        })
    }
}

#[async_trait]
impl LeadService for LeadServiceImpl {
    #[instrument(skip(self, request))]
    async fn create_lead(&self, request: CreateLeadRequest) -> Result<Lead, ServiceError> {
        info!("Creating lead");
        let agency_id = parse_object_id(&request.agency_id, "agency id")?;

        let lead_data = LeadData {
            name: request.lead_data.name,
            email: request.lead_data.email,
            phone: request.lead_data.phone,
            extra: request.lead_data.extra,
        };
        if !lead_data.has_contact() {
            return Err(ServiceError::InvalidInput(
                "A lead needs at least one contact field (name, email or phone)".to_string(),
            ));
        }

        let lead = Lead {
            id: None,
            agency_id,
            converted_client_id: None,
            platform: request.platform,
            external_id: request.external_id,
            lead_data,
            status: LeadStatus::New,
            priority: request.priority.unwrap_or_default(),
            value: request.value.map(Money::from_minor),
            assigned_to: request.assigned_to,
            notes: request.notes,
            created_at: None,
            updated_at: None,
        };

        self.lead_repo.create(lead).await.map_err(ServiceError::from)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn get_lead(&self, id: ObjectId) -> Result<Lead, ServiceError> {
        self.lead_repo.get_by_id(id).await.map_err(ServiceError::from)
    }

    #[instrument(skip(self, request), fields(id = %id))]
    async fn update_lead(
        &self,
        id: ObjectId,
        request: UpdateLeadRequest,
    ) -> Result<Lead, ServiceError> {
        let mut lead = self.lead_repo.get_by_id(id).await?;

        if let Some(next) = request.status {
            if next != lead.status && !lead.status.can_transition_to(next) {
                return Err(ServiceError::Conflict(format!(
                    "Lead status cannot change from {} to {}",
                    lead.status, next
                )));
            }
            lead.status = next;
        }
        if let Some(platform) = request.platform {
            lead.platform = Some(platform);
        }
        if let Some(external_id) = request.external_id {
            lead.external_id = Some(external_id);
        }
        if let Some(data) = request.lead_data {
            let lead_data = LeadData {
                name: data.name.or(lead.lead_data.name),
                email: data.email.or(lead.lead_data.email),
                phone: data.phone.or(lead.lead_data.phone),
                extra: data.extra.or(lead.lead_data.extra),
            };
            if !lead_data.has_contact() {
                return Err(ServiceError::InvalidInput(
                    "A lead needs at least one contact field (name, email or phone)".to_string(),
                ));
            }
            lead.lead_data = lead_data;
        }
        if let Some(priority) = request.priority {
            lead.priority = priority;
        }
        if let Some(value) = request.value {
            lead.value = Some(Money::from_minor(value));
        }
        if let Some(assigned_to) = request.assigned_to {
            lead.assigned_to = Some(assigned_to);
        }
        if let Some(notes) = request.notes {
            lead.notes = Some(notes);
        }

        self.lead_repo.update(id, lead).await.map_err(ServiceError::from)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn delete_lead(&self, id: ObjectId) -> Result<(), ServiceError> {
        self.lead_repo.delete(id).await.map_err(ServiceError::from)
    }

    #[instrument(skip(self, filter))]
    async fn list_leads(
        &self,
        filter: LeadFilter,
        page: u32,
        limit: u32,
    ) -> Result<Vec<Lead>, ServiceError> {
        self.lead_repo
            .list(filter, page, limit)
            .await
            .map_err(ServiceError::from)
    }

    #[instrument(skip(self))]
    async fn lead_stats(&self, agency_id: Option<ObjectId>) -> Result<LeadStats, ServiceError> {
        self.lead_repo.stats(agency_id).await.map_err(ServiceError::from)
    }

    #[instrument(skip(self, request), fields(id = %id))]
    async fn convert_lead(
        &self,
        id: ObjectId,
        request: ConvertLeadRequest,
    ) -> Result<Client, ServiceError> {
        info!("Converting lead to client");
        let lead = self.lead_repo.get_by_id(id).await?;

        // A second conversion must fail deterministically, never mint a
        // second client.
        if lead.status.is_terminal() {
            error!(status = %lead.status, "Refusing to convert a closed lead");
            return Err(ServiceError::Conflict(format!(
                "Lead is already {} and cannot be converted",
                lead.status
            )));
        }

        let client = Self::client_from(&lead, request)?;
        let created = self.lead_repo.convert(id, client).await?;
        info!(client_id = ?created.id, "Lead converted");
        Ok(created)
    }
}

pub(crate) fn parse_object_id(value: &str, what: &str) -> Result<ObjectId, ServiceError> {
    ObjectId::parse_str(value)
        .map_err(|_| ServiceError::InvalidInput(format!("Invalid {}: {}", what, value)))
}
