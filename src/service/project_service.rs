use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use tracing::{info, instrument};

use crate::dto::project_dto::{CreateProjectRequest, UpdateProjectRequest};
use crate::model::project::{Project, ProjectStatus};
use crate::repository::client_repo::ClientRepository;
use crate::repository::project_repo::ProjectRepository;
use crate::service::lead_service::parse_object_id;
use crate::util::error::ServiceError;
use crate::util::money::Money;

#[async_trait]
pub trait ProjectService: Send + Sync {
    async fn create_project(&self, request: CreateProjectRequest) -> Result<Project, ServiceError>;
    async fn get_project(&self, id: ObjectId) -> Result<Project, ServiceError>;
    async fn update_project(
        &self,
        id: ObjectId,
        request: UpdateProjectRequest,
    ) -> Result<Project, ServiceError>;
    async fn delete_project(&self, id: ObjectId) -> Result<(), ServiceError>;
    async fn list_projects(
        &self,
        agency_id: Option<ObjectId>,
        client_id: Option<ObjectId>,
        page: u32,
        limit: u32,
    ) -> Result<Vec<Project>, ServiceError>;
}

pub struct ProjectServiceImpl {
    project_repo: Arc<dyn ProjectRepository>,
    client_repo: Arc<dyn ClientRepository>,
}

impl ProjectServiceImpl {
    pub fn new(
        project_repo: Arc<dyn ProjectRepository>,
        client_repo: Arc<dyn ClientRepository>,
    ) -> Self {
        ProjectServiceImpl { project_repo, client_repo }
    }
}

#[async_trait]
impl ProjectService for ProjectServiceImpl {
    #[instrument(skip(self, request))]
    async fn create_project(&self, request: CreateProjectRequest) -> Result<Project, ServiceError> {
        info!("Creating project");
        let agency_id = parse_object_id(&request.agency_id, "agency id")?;
        let client_id = parse_object_id(&request.client_id, "client id")?;

        self.client_repo.get_by_id(client_id).await?;

        let project = Project {
            id: None,
            agency_id,
            client_id,
            source_quote_id: None,
            name: request.name,
            description: request.description,
            status: ProjectStatus::Planning,
            priority: request.priority.unwrap_or_default(),
            start_date: request.start_date,
            end_date: request.end_date,
            budget: request.budget.map(Money::from_minor),
            assigned_to: request.assigned_to,
            created_at: None,
            updated_at: None,
        };

        self.project_repo.create(project).await.map_err(ServiceError::from)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn get_project(&self, id: ObjectId) -> Result<Project, ServiceError> {
        self.project_repo.get_by_id(id).await.map_err(ServiceError::from)
    }

    #[instrument(skip(self, request), fields(id = %id))]
    async fn update_project(
        &self,
        id: ObjectId,
        request: UpdateProjectRequest,
    ) -> Result<Project, ServiceError> {
        let mut project = self.project_repo.get_by_id(id).await?;

        if let Some(next) = request.status {
            if next != project.status && !project.status.can_transition_to(next) {
                return Err(ServiceError::Conflict(format!(
                    "Project status cannot change from {} to {}",
                    project.status, next
                )));
            }
            project.status = next;
        }
        if let Some(name) = request.name {
            project.name = name;
        }
        if let Some(description) = request.description {
            project.description = Some(description);
        }
        if let Some(priority) = request.priority {
            project.priority = priority;
        }
        if let Some(start_date) = request.start_date {
            project.start_date = Some(start_date);
        }
        if let Some(end_date) = request.end_date {
            project.end_date = Some(end_date);
        }
        if let Some(budget) = request.budget {
            project.budget = Some(Money::from_minor(budget));
        }
        if let Some(assigned_to) = request.assigned_to {
            project.assigned_to = Some(assigned_to);
        }

        self.project_repo.update(id, project).await.map_err(ServiceError::from)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn delete_project(&self, id: ObjectId) -> Result<(), ServiceError> {
        self.project_repo.delete(id).await.map_err(ServiceError::from)
    }

    #[instrument(skip(self))]
    async fn list_projects(
        &self,
        agency_id: Option<ObjectId>,
        client_id: Option<ObjectId>,
        page: u32,
        limit: u32,
    ) -> Result<Vec<Project>, ServiceError> {
        self.project_repo
            .list(agency_id, client_id, page, limit)
            .await
            .map_err(ServiceError::from)
    }
}
