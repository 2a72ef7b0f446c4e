use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{doc, Document};
use futures::stream::StreamExt;
use mongodb::options::FindOptions;
use mongodb::Collection;
use tracing::{error, info};

use crate::model::task::Task;
use crate::repository::mongo::{collections, now_rfc3339, MongoStore};
use crate::repository::repository_error::{RepositoryError, RepositoryResult};

#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub project_id: Option<ObjectId>,
    pub client_id: Option<ObjectId>,
}

#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn create(&self, task: Task) -> RepositoryResult<Task>;
    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<Task>;
    async fn update(&self, id: ObjectId, task: Task) -> RepositoryResult<Task>;
    async fn delete(&self, id: ObjectId) -> RepositoryResult<()>;
    async fn list(&self, filter: TaskFilter, page: u32, limit: u32) -> RepositoryResult<Vec<Task>>;
}

pub struct MongoTaskRepository {
    tasks: Collection<Task>,
}

impl MongoTaskRepository {
    pub fn new(store: Arc<MongoStore>) -> Self {
        MongoTaskRepository {
            tasks: store.collection::<Task>(collections::TASKS),
        }
    }
}

#[async_trait]
impl TaskRepository for MongoTaskRepository {
    #[tracing::instrument(skip(self, task))]
    async fn create(&self, task: Task) -> RepositoryResult<Task> {
        let mut new_task = task;
        new_task.id = Some(ObjectId::new());
        let now = now_rfc3339();
        new_task.created_at = Some(now.clone());
        new_task.updated_at = Some(now);

        match self.tasks.insert_one(new_task.clone(), None).await {
            Ok(_) => {
                info!(task_id = ?new_task.id, "Task created");
                Ok(new_task)
            }
            Err(e) => {
                error!("Failed to create task: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<Task> {
        match self.tasks.find_one(doc! { "_id": id }, None).await {
            Ok(Some(task)) => Ok(task),
            Ok(None) => Err(RepositoryError::not_found(format!("Task not found for ID: {}", id))),
            Err(e) => {
                error!("Failed to fetch task by ID: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self, task), fields(id = %id))]
    async fn update(&self, id: ObjectId, task: Task) -> RepositoryResult<Task> {
        let mut updated = task;
        updated.updated_at = Some(now_rfc3339());
        let mut document = bson::to_document(&updated)?;
        document.remove("_id");

        let result = self
            .tasks
            .update_one(doc! { "_id": id }, doc! { "$set": document }, None)
            .await;
        match result {
            Ok(update_result) if update_result.matched_count > 0 => Ok(updated),
            Ok(_) => Err(RepositoryError::not_found(format!("No task to update for ID: {}", id))),
            Err(e) => {
                error!("Failed to update task: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    async fn delete(&self, id: ObjectId) -> RepositoryResult<()> {
        let result = self.tasks.delete_one(doc! { "_id": id }, None).await;
        match result {
            Ok(delete_result) if delete_result.deleted_count > 0 => Ok(()),
            Ok(_) => Err(RepositoryError::not_found(format!("No task to delete for ID: {}", id))),
            Err(e) => {
                error!("Failed to delete task: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self, filter), fields(page = page, limit = limit))]
    async fn list(&self, filter: TaskFilter, page: u32, limit: u32) -> RepositoryResult<Vec<Task>> {
        let mut document = Document::new();
        if let Some(project_id) = filter.project_id {
            document.insert("project_id", project_id);
        }
        if let Some(client_id) = filter.client_id {
            document.insert("client_id", client_id);
        }
        let options = FindOptions::builder()
            .skip(u64::from(page.saturating_sub(1)) * u64::from(limit))
            .limit(i64::from(limit))
            .sort(doc! { "created_at": -1 })
            .build();

        let mut cursor = self
            .tasks
            .find(document, options)
            .await
            .map_err(RepositoryError::from)?;
        let mut tasks = Vec::new();
        while let Some(task) = cursor.next().await {
            tasks.push(task.map_err(RepositoryError::from)?);
        }
        Ok(tasks)
    }
}
