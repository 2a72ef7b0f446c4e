use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use tracing::{info, instrument};

use crate::dto::client_dto::{CreateClientRequest, UpdateClientRequest};
use crate::model::client::{Client, ClientStatus};
use crate::repository::client_repo::ClientRepository;
use crate::service::lead_service::parse_object_id;
use crate::util::error::ServiceError;

#[async_trait]
pub trait ClientService: Send + Sync {
    async fn create_client(&self, request: CreateClientRequest) -> Result<Client, ServiceError>;
    async fn get_client(&self, id: ObjectId) -> Result<Client, ServiceError>;
    async fn update_client(
        &self,
        id: ObjectId,
        request: UpdateClientRequest,
    ) -> Result<Client, ServiceError>;
    async fn delete_client(&self, id: ObjectId) -> Result<(), ServiceError>;
    async fn list_clients(
        &self,
        agency_id: Option<ObjectId>,
        status: Option<ClientStatus>,
        page: u32,
        limit: u32,
    ) -> Result<Vec<Client>, ServiceError>;
}

pub struct ClientServiceImpl {
    client_repo: Arc<dyn ClientRepository>,
}

impl ClientServiceImpl {
    pub fn new(client_repo: Arc<dyn ClientRepository>) -> Self {
        ClientServiceImpl { client_repo }
    }
}

#[async_trait]
impl ClientService for ClientServiceImpl {
    #[instrument(skip(self, request))]
    async fn create_client(&self, request: CreateClientRequest) -> Result<Client, ServiceError> {
        info!("Creating client");
        let agency_id = parse_object_id(&request.agency_id, "agency id")?;

        let client = Client {
            id: None,
            agency_id,
            name: request.name,
            contact_name: request.contact_name,
            email: request.email,
            phone: request.phone,
            industry: request.industry,
            status: request.status.unwrap_or_default(),
            notes: request.notes,
            custom_fields: request.custom_fields,
            created_at: None,
            updated_at: None,
        };

        self.client_repo.create(client).await.map_err(ServiceError::from)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn get_client(&self, id: ObjectId) -> Result<Client, ServiceError> {
        self.client_repo.get_by_id(id).await.map_err(ServiceError::from)
    }

    #[instrument(skip(self, request), fields(id = %id))]
    async fn update_client(
        &self,
        id: ObjectId,
        request: UpdateClientRequest,
    ) -> Result<Client, ServiceError> {
        let mut client = self.client_repo.get_by_id(id).await?;

        if let Some(name) = request.name {
            client.name = name;
        }
        if let Some(contact_name) = request.contact_name {
            client.contact_name = Some(contact_name);
        }
        if let Some(email) = request.email {
            client.email = Some(email);
        }
        if let Some(phone) = request.phone {
            client.phone = Some(phone);
        }
        if let Some(industry) = request.industry {
            client.industry = Some(industry);
        }
        if let Some(status) = request.status {
            client.status = status;
        }
        if let Some(notes) = request.notes {
            client.notes = Some(notes);
        }
        if let Some(custom_fields) = request.custom_fields {
            client.custom_fields = Some(custom_fields);
        }

        self.client_repo.update(id, client).await.map_err(ServiceError::from)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn delete_client(&self, id: ObjectId) -> Result<(), ServiceError> {
        self.client_repo.delete(id).await.map_err(ServiceError::from)
    }

    #[instrument(skip(self))]
    async fn list_clients(
        &self,
        agency_id: Option<ObjectId>,
        status: Option<ClientStatus>,
        page: u32,
        limit: u32,
    ) -> Result<Vec<Client>, ServiceError> {
        self.client_repo
            .list(agency_id, status, page, limit)
            .await
            .map_err(ServiceError::from)
    }
}
