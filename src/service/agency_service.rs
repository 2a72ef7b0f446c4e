use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use tracing::{info, instrument};

use crate::dto::agency_dto::{CreateAgencyRequest, UpdateAgencyRequest};
use crate::model::agency::Agency;
use crate::repository::agency_repo::AgencyRepository;
use crate::util::error::ServiceError;

#[async_trait]
pub trait AgencyService: Send + Sync {
    async fn create_agency(&self, request: CreateAgencyRequest) -> Result<Agency, ServiceError>;
    async fn get_agency(&self, id: ObjectId) -> Result<Agency, ServiceError>;
    async fn update_agency(
        &self,
        id: ObjectId,
        request: UpdateAgencyRequest,
    ) -> Result<Agency, ServiceError>;
    async fn delete_agency(&self, id: ObjectId) -> Result<(), ServiceError>;
    async fn list_agencies(&self, page: u32, limit: u32) -> Result<Vec<Agency>, ServiceError>;
}

pub struct AgencyServiceImpl {
    agency_repo: Arc<dyn AgencyRepository>,
}

impl AgencyServiceImpl {
    pub fn new(agency_repo: Arc<dyn AgencyRepository>) -> Self {
        AgencyServiceImpl { agency_repo }
    }
}

#[async_trait]
impl AgencyService for AgencyServiceImpl {
    #[instrument(skip(self, request))]
    async fn create_agency(&self, request: CreateAgencyRequest) -> Result<Agency, ServiceError> {
        info!("Creating agency");
        let agency = Agency {
            id: None,
            name: request.name,
            email: request.email,
            phone: request.phone,
            logo_url: request.logo_url,
            is_active: true,
            created_at: None,
            updated_at: None,
        };
        self.agency_repo.create(agency).await.map_err(ServiceError::from)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn get_agency(&self, id: ObjectId) -> Result<Agency, ServiceError> {
        self.agency_repo.get_by_id(id).await.map_err(ServiceError::from)
    }

    #[instrument(skip(self, request), fields(id = %id))]
    async fn update_agency(
        &self,
        id: ObjectId,
        request: UpdateAgencyRequest,
    ) -> Result<Agency, ServiceError> {
        let mut agency = self.agency_repo.get_by_id(id).await?;

        if let Some(name) = request.name {
            agency.name = name;
        }
        if let Some(email) = request.email {
            agency.email = Some(email);
        }
        if let Some(phone) = request.phone {
            agency.phone = Some(phone);
        }
        if let Some(logo_url) = request.logo_url {
            agency.logo_url = Some(logo_url);
        }
        if let Some(is_active) = request.is_active {
            agency.is_active = is_active;
        }

        self.agency_repo.update(id, agency).await.map_err(ServiceError::from)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn delete_agency(&self, id: ObjectId) -> Result<(), ServiceError> {
        self.agency_repo.delete(id).await.map_err(ServiceError::from)
    }

    #[instrument(skip(self))]
    async fn list_agencies(&self, page: u32, limit: u32) -> Result<Vec<Agency>, ServiceError> {
        self.agency_repo.list(page, limit).await.map_err(ServiceError::from)
    }
}
