use axum::{routing::get, Router};
use std::sync::Arc;
use tracing::info;

use crate::config::app_conf::AppConfig;
use crate::config::email_conf::EmailConfig;
use crate::config::mongo_conf::MongoConfig;
use crate::repository::agency_repo::{AgencyRepository, MongoAgencyRepository};
use crate::repository::asset_repo::{AssetRepository, MongoAssetRepository};
use crate::repository::chat_repo::{ChatRepository, MongoChatRepository};
use crate::repository::client_repo::{ClientRepository, MongoClientRepository};
use crate::repository::lead_repo::{LeadRepository, MongoLeadRepository};
use crate::repository::mongo::MongoStore;
use crate::repository::product_repo::{MongoProductRepository, ProductRepository};
use crate::repository::project_repo::{MongoProjectRepository, ProjectRepository};
use crate::repository::quote_repo::{MongoQuoteRepository, QuoteRepository};
use crate::repository::task_repo::{MongoTaskRepository, TaskRepository};
use crate::router::agency_router::agency_router;
use crate::router::asset_router::asset_router;
use crate::router::chat_router::chat_router;
use crate::router::client_router::client_router;
use crate::router::lead_router::lead_router;
use crate::router::product_router::product_router;
use crate::router::project_router::project_router;
use crate::router::quote_router::quote_router;
use crate::router::task_router::task_router;
use crate::service::agency_service::AgencyServiceImpl;
use crate::service::asset_service::AssetServiceImpl;
use crate::service::chat_service::ChatServiceImpl;
use crate::service::client_service::ClientServiceImpl;
use crate::service::lead_service::LeadServiceImpl;
use crate::service::product_service::ProductServiceImpl;
use crate::service::project_service::ProjectServiceImpl;
use crate::service::quote_service::QuoteServiceImpl;
use crate::service::task_service::TaskServiceImpl;
use crate::util::email::{EmailService, SmtpEmailService};
use crate::util::render::{HtmlQuoteRenderer, QuoteRenderer};

pub struct App {
    config: AppConfig,
    router: Router,
}

impl App {
    pub async fn new() -> Self {
        let config = AppConfig::from_env();
        let mongo_config = MongoConfig::from_env().expect("Mongo config error");
        let email_config = EmailConfig::from_env().expect("Email config error");

        let store = Arc::new(
            MongoStore::connect(&mongo_config)
                .await
                .expect("MongoDB connection error"),
        );

        let agency_repo: Arc<dyn AgencyRepository> =
            Arc::new(MongoAgencyRepository::new(store.clone()));
        let lead_repo: Arc<dyn LeadRepository> = Arc::new(MongoLeadRepository::new(store.clone()));
        let client_repo: Arc<dyn ClientRepository> =
            Arc::new(MongoClientRepository::new(store.clone()));
        let product_repo: Arc<dyn ProductRepository> =
            Arc::new(MongoProductRepository::new(store.clone()));
        let quote_repo: Arc<dyn QuoteRepository> = Arc::new(MongoQuoteRepository::new(store.clone()));
        let project_repo: Arc<dyn ProjectRepository> =
            Arc::new(MongoProjectRepository::new(store.clone()));
        let task_repo: Arc<dyn TaskRepository> = Arc::new(MongoTaskRepository::new(store.clone()));
        let asset_repo: Arc<dyn AssetRepository> = Arc::new(MongoAssetRepository::new(store.clone()));
        let chat_repo: Arc<dyn ChatRepository> = Arc::new(MongoChatRepository::new(store));

        let mailer: Arc<dyn EmailService> =
            Arc::new(SmtpEmailService::new(email_config).expect("Email service error"));
        let renderer: Arc<dyn QuoteRenderer> = Arc::new(HtmlQuoteRenderer::new());

        let agency_service = Arc::new(AgencyServiceImpl::new(agency_repo.clone()));
        let lead_service = Arc::new(LeadServiceImpl::new(lead_repo));
        let client_service = Arc::new(ClientServiceImpl::new(client_repo.clone()));
        let product_service = Arc::new(ProductServiceImpl::new(product_repo.clone()));
        let quote_service = Arc::new(QuoteServiceImpl::new(
            quote_repo,
            client_repo.clone(),
            product_repo,
            project_repo.clone(),
            agency_repo,
            mailer,
            renderer,
        ));
        let project_service = Arc::new(ProjectServiceImpl::new(project_repo, client_repo));
        let task_service = Arc::new(TaskServiceImpl::new(task_repo));
        let asset_service = Arc::new(AssetServiceImpl::new(asset_repo));
        let chat_service = Arc::new(ChatServiceImpl::new(chat_repo));

        let router = Router::new()
            .merge(agency_router(agency_service))
            .merge(lead_router(lead_service))
            .merge(client_router(client_service))
            .merge(product_router(product_service))
            .merge(quote_router(quote_service))
            .merge(project_router(project_service))
            .merge(task_router(task_service))
            .merge(asset_router(asset_service))
            .merge(chat_router(chat_service))
            .route("/health", get(|| async { "OK" }));

        App { config, router }
    }

    pub async fn start(self) {
        let addr = self.config.bind_addr().expect("Invalid host");
        info!("🚀 Server running at http://{}", addr);
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .expect("Failed to bind address");
        axum::serve(listener, self.router)
            .await
            .expect("Failed to start server");
    }
}
