use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{doc, Document};
use futures::stream::StreamExt;
use mongodb::options::FindOptions;
use mongodb::Collection;
use tracing::{error, info};

use crate::model::project::Project;
use crate::model::quote::{Quote, QuoteStatus};
use crate::model::task::Task;
use crate::repository::mongo::{collections, now_rfc3339, MongoStore};
use crate::repository::repository_error::{RepositoryError, RepositoryResult};

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn create(&self, project: Project) -> RepositoryResult<Project>;
    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<Project>;
    async fn update(&self, id: ObjectId, project: Project) -> RepositoryResult<Project>;
    async fn delete(&self, id: ObjectId) -> RepositoryResult<()>;
    async fn list(
        &self,
        agency_id: Option<ObjectId>,
        client_id: Option<ObjectId>,
        page: u32,
        limit: u32,
    ) -> RepositoryResult<Vec<Project>>;
    /// The approval idempotency probe: at most one project exists per quote.
    async fn find_by_quote(&self, quote_id: ObjectId) -> RepositoryResult<Option<Project>>;
    /// Quote-approval handoff: inserts the project, attaches and inserts the
    /// seeded tasks, and marks the quote approved, all in one transaction.
    /// `project.source_quote_id` names the quote being approved.
    async fn create_from_quote(
        &self,
        project: Project,
        tasks: Vec<Task>,
    ) -> RepositoryResult<Project>;
}

pub struct MongoProjectRepository {
    store: Arc<MongoStore>,
    projects: Collection<Project>,
    tasks: Collection<Task>,
    quotes: Collection<Quote>,
}

impl MongoProjectRepository {
    pub fn new(store: Arc<MongoStore>) -> Self {
        let projects = store.collection::<Project>(collections::PROJECTS);
        let tasks = store.collection::<Task>(collections::TASKS);
        let quotes = store.collection::<Quote>(collections::QUOTES);
        MongoProjectRepository { store, projects, tasks, quotes }
    }
}

#[async_trait]
impl ProjectRepository for MongoProjectRepository {
    #[tracing::instrument(skip(self, project))]
    async fn create(&self, project: Project) -> RepositoryResult<Project> {
        let mut new_project = project;
        new_project.id = Some(ObjectId::new());
        let now = now_rfc3339();
        new_project.created_at = Some(now.clone());
        new_project.updated_at = Some(now);

        match self.projects.insert_one(new_project.clone(), None).await {
            Ok(_) => {
                info!(project_id = ?new_project.id, "Project created");
                Ok(new_project)
            }
            Err(e) => {
                error!("Failed to create project: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<Project> {
        match self.projects.find_one(doc! { "_id": id }, None).await {
            Ok(Some(project)) => Ok(project),
            Ok(None) => Err(RepositoryError::not_found(format!("Project not found for ID: {}", id))),
            Err(e) => {
                error!("Failed to fetch project by ID: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self, project), fields(id = %id))]
    async fn update(&self, id: ObjectId, project: Project) -> RepositoryResult<Project> {
        let mut updated = project;
        updated.updated_at = Some(now_rfc3339());
        let mut document = bson::to_document(&updated)?;
        document.remove("_id");

        let result = self
            .projects
            .update_one(doc! { "_id": id }, doc! { "$set": document }, None)
            .await;
        match result {
            Ok(update_result) if update_result.matched_count > 0 => Ok(updated),
            Ok(_) => Err(RepositoryError::not_found(format!("No project to update for ID: {}", id))),
            Err(e) => {
                error!("Failed to update project: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    async fn delete(&self, id: ObjectId) -> RepositoryResult<()> {
        let result = self.projects.delete_one(doc! { "_id": id }, None).await;
        match result {
            Ok(delete_result) if delete_result.deleted_count > 0 => Ok(()),
            Ok(_) => Err(RepositoryError::not_found(format!("No project to delete for ID: {}", id))),
            Err(e) => {
                error!("Failed to delete project: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(page = page, limit = limit))]
    async fn list(
        &self,
        agency_id: Option<ObjectId>,
        client_id: Option<ObjectId>,
        page: u32,
        limit: u32,
    ) -> RepositoryResult<Vec<Project>> {
        let mut filter = Document::new();
        if let Some(agency_id) = agency_id {
            filter.insert("agency_id", agency_id);
        }
        if let Some(client_id) = client_id {
            filter.insert("client_id", client_id);
        }
        let options = FindOptions::builder()
            .skip(u64::from(page.saturating_sub(1)) * u64::from(limit))
            .limit(i64::from(limit))
            .sort(doc! { "created_at": -1 })
            .build();

        let mut cursor = self
            .projects
            .find(filter, options)
            .await
            .map_err(RepositoryError::from)?;
        let mut projects = Vec::new();
        while let Some(project) = cursor.next().await {
            projects.push(project.map_err(RepositoryError::from)?);
        }
        Ok(projects)
    }

    #[tracing::instrument(skip(self), fields(quote_id = %quote_id))]
    async fn find_by_quote(&self, quote_id: ObjectId) -> RepositoryResult<Option<Project>> {
        self.projects
            .find_one(doc! { "source_quote_id": quote_id }, None)
            .await
            .map_err(RepositoryError::from)
    }

    #[tracing::instrument(skip(self, project, tasks), fields(task_count = tasks.len()))]
    async fn create_from_quote(
        &self,
        project: Project,
        tasks: Vec<Task>,
    ) -> RepositoryResult<Project> {
        let quote_id = project.source_quote_id.ok_or_else(|| {
            RepositoryError::validation("Project created from a quote must carry its quote id")
        })?;

        let project_id = ObjectId::new();
        let now = now_rfc3339();
        let mut new_project = project;
        new_project.id = Some(project_id);
        new_project.created_at = Some(now.clone());
        new_project.updated_at = Some(now.clone());

        let seeded: Vec<Task> = tasks
            .into_iter()
            .map(|mut task| {
                task.id = Some(ObjectId::new());
                task.project_id = Some(project_id);
                task.created_at = Some(now.clone());
                task.updated_at = Some(now.clone());
                task
            })
            .collect();
        let task_count = seeded.len();

        let mut session = self.store.session().await?;
        session
            .start_transaction(None)
            .await
            .map_err(RepositoryError::from)?;

        let outcome: RepositoryResult<()> = async {
            self.projects
                .insert_one_with_session(new_project.clone(), None, &mut session)
                .await?;
            if !seeded.is_empty() {
                self.tasks
                    .insert_many_with_session(seeded, None, &mut session)
                    .await?;
            }
            let update = doc! { "$set": {
                "status": bson::to_bson(&QuoteStatus::Approved)?,
                "updated_at": &now,
            } };
            let result = self
                .quotes
                .update_one_with_session(doc! { "_id": quote_id }, update, None, &mut session)
                .await?;
            if result.matched_count == 0 {
                return Err(RepositoryError::not_found(format!(
                    "Quote not found for ID: {}",
                    quote_id
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
                info!(
                    project_id = %project_id,
                    quote_id = %quote_id,
                    task_count,
                    "Project created from approved quote"
                );
                Ok(new_project)
            }
            Err(e) => {
                let _ = session.abort_transaction().await;
                error!("Quote approval handoff aborted: {}", e);
                Err(e)
            }
        }
    }
}
