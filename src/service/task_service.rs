use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use tracing::{info, instrument};

use crate::dto::task_dto::{CreateTaskRequest, UpdateTaskRequest};
use crate::model::task::{Task, TaskStatus};
use crate::repository::task_repo::{TaskFilter, TaskRepository};
use crate::service::lead_service::parse_object_id;
use crate::util::error::ServiceError;

#[async_trait]
pub trait TaskService: Send + Sync {
    async fn create_task(&self, request: CreateTaskRequest) -> Result<Task, ServiceError>;
    async fn get_task(&self, id: ObjectId) -> Result<Task, ServiceError>;
    async fn update_task(&self, id: ObjectId, request: UpdateTaskRequest)
        -> Result<Task, ServiceError>;
    async fn delete_task(&self, id: ObjectId) -> Result<(), ServiceError>;
    async fn list_tasks(
        &self,
        filter: TaskFilter,
        page: u32,
        limit: u32,
    ) -> Result<Vec<Task>, ServiceError>;
}

pub struct TaskServiceImpl {
    task_repo: Arc<dyn TaskRepository>,
}

impl TaskServiceImpl {
    pub fn new(task_repo: Arc<dyn TaskRepository>) -> Self {
        TaskServiceImpl { task_repo }
    }
}

#[async_trait]
impl TaskService for TaskServiceImpl {
    #[instrument(skip(self, request))]
    async fn create_task(&self, request: CreateTaskRequest) -> Result<Task, ServiceError> {
        info!("Creating task");
        let project_id = request
            .project_id
            .as_deref()
            .map(|raw| parse_object_id(raw, "project id"))
            .transpose()?;
        let client_id = request
            .client_id
            .as_deref()
            .map(|raw| parse_object_id(raw, "client id"))
            .transpose()?;

        let task = Task {
            id: None,
            project_id,
            client_id,
            title: request.title,
            description: request.description,
            status: TaskStatus::New,
            priority: request.priority.unwrap_or_default(),
            assigned_to: request.assigned_to,
            due_date: request.due_date,
            estimated_hours: request.estimated_hours,
            actual_hours: None,
            tags: request.tags,
            source_product_id: None,
            template_index: None,
            created_at: None,
            updated_at: None,
        };

        self.task_repo.create(task).await.map_err(ServiceError::from)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn get_task(&self, id: ObjectId) -> Result<Task, ServiceError> {
        self.task_repo.get_by_id(id).await.map_err(ServiceError::from)
    }

    #[instrument(skip(self, request), fields(id = %id))]
    async fn update_task(
        &self,
        id: ObjectId,
        request: UpdateTaskRequest,
    ) -> Result<Task, ServiceError> {
        let mut task = self.task_repo.get_by_id(id).await?;

        if let Some(next) = request.status {
            if next != task.status && !task.status.can_transition_to(next) {
                return Err(ServiceError::Conflict(format!(
                    "Task status cannot change from {} to {}",
                    task.status, next
                )));
            }
            task.status = next;
        }
        if let Some(title) = request.title {
            task.title = title;
        }
        if let Some(description) = request.description {
            task.description = Some(description);
        }
        if let Some(priority) = request.priority {
            task.priority = priority;
        }
        if let Some(assigned_to) = request.assigned_to {
            task.assigned_to = Some(assigned_to);
        }
        if let Some(due_date) = request.due_date {
            task.due_date = Some(due_date);
        }
        if let Some(estimated_hours) = request.estimated_hours {
            task.estimated_hours = Some(estimated_hours);
        }
        if let Some(actual_hours) = request.actual_hours {
            task.actual_hours = Some(actual_hours);
        }
        if let Some(tags) = request.tags {
            task.tags = tags;
        }

        self.task_repo.update(id, task).await.map_err(ServiceError::from)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn delete_task(&self, id: ObjectId) -> Result<(), ServiceError> {
        self.task_repo.delete(id).await.map_err(ServiceError::from)
    }

    #[instrument(skip(self, filter))]
    async fn list_tasks(
        &self,
        filter: TaskFilter,
        page: u32,
        limit: u32,
    ) -> Result<Vec<Task>, ServiceError> {
        self.task_repo
            .list(filter, page, limit)
            .await
            .map_err(ServiceError::from)
    }
}
