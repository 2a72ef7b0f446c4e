#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bson::oid::ObjectId;

use agency_crm_backend::model::agency::Agency;
use agency_crm_backend::model::client::{Client, ClientStatus};
use agency_crm_backend::model::lead::{Lead, LeadStats, LeadStatus};
use agency_crm_backend::model::product::{Product, TaskTemplate};
use agency_crm_backend::model::project::Project;
use agency_crm_backend::model::quote::{Quote, QuoteStatus};
use agency_crm_backend::model::task::Task;
use agency_crm_backend::repository::agency_repo::AgencyRepository;
use agency_crm_backend::repository::client_repo::ClientRepository;
use agency_crm_backend::repository::lead_repo::{LeadFilter, LeadRepository};
use agency_crm_backend::repository::product_repo::ProductRepository;
use agency_crm_backend::repository::project_repo::ProjectRepository;
use agency_crm_backend::repository::quote_repo::QuoteRepository;
use agency_crm_backend::repository::repository_error::{RepositoryError, RepositoryResult};
use agency_crm_backend::service::lead_service::LeadServiceImpl;
use agency_crm_backend::service::product_service::ProductServiceImpl;
use agency_crm_backend::service::quote_service::QuoteServiceImpl;
use agency_crm_backend::util::email::{EmailError, EmailMessage, EmailService};
use agency_crm_backend::util::money::Money;
use agency_crm_backend::util::render::HtmlQuoteRenderer;

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

fn page_slice<T: Clone>(items: Vec<T>, page: u32, limit: u32) -> Vec<T> {
    items
        .into_iter()
        .skip(((page.saturating_sub(1)) * limit) as usize)
        .take(limit as usize)
        .collect()
}

#[derive(Default)]
pub struct Store {
    pub agencies: HashMap<ObjectId, Agency>,
    pub leads: HashMap<ObjectId, Lead>,
    pub clients: HashMap<ObjectId, Client>,
    pub products: HashMap<ObjectId, Product>,
    pub quotes: HashMap<ObjectId, Quote>,
    pub projects: HashMap<ObjectId, Project>,
    pub tasks: HashMap<ObjectId, Task>,
}

/// One shared map-backed store per test, so the transactional fakes can
/// touch several "collections" at once the way the Mongo repositories do.
#[derive(Default)]
pub struct InMemoryDb(pub Mutex<Store>);

impl InMemoryDb {
    pub fn new() -> Arc<Self> {
        Arc::new(InMemoryDb::default())
    }

    pub fn seed_agency(&self, name: &str) -> Agency {
        let agency = Agency {
            id: Some(ObjectId::new()),
            name: name.to_string(),
            email: Some("hello@agency.example".to_string()),
            phone: None,
            logo_url: None,
            is_active: true,
            created_at: Some(now()),
            updated_at: Some(now()),
        };
        self.0
            .lock()
            .unwrap()
            .agencies
            .insert(agency.id.unwrap(), agency.clone());
        agency
    }

    pub fn seed_client(&self, agency_id: ObjectId, name: &str, email: Option<&str>) -> Client {
        let client = Client {
            id: Some(ObjectId::new()),
            agency_id,
            name: name.to_string(),
            contact_name: None,
            email: email.map(str::to_string),
            phone: None,
            industry: None,
            status: ClientStatus::Active,
            notes: None,
            custom_fields: None,
            created_at: Some(now()),
            updated_at: Some(now()),
        };
        self.0
            .lock()
            .unwrap()
            .clients
            .insert(client.id.unwrap(), client.clone());
        client
    }

    pub fn seed_product(
        &self,
        agency_id: ObjectId,
        name: &str,
        price_minor: i64,
        templates: Vec<(&str, Option<&str>)>,
    ) -> Product {
        let product = Product {
            id: Some(ObjectId::new()),
            agency_id,
            name: name.to_string(),
            description: None,
            category: None,
            price: Money::from_minor(price_minor),
            unit: "project".to_string(),
            is_active: true,
            predefined_tasks: templates
                .into_iter()
                .map(|(title, assigned_to)| TaskTemplate {
                    title: title.to_string(),
                    description: None,
                    estimated_hours: Some(4.0),
                    assigned_to: assigned_to.map(str::to_string),
                })
                .collect(),
            created_at: Some(now()),
            updated_at: Some(now()),
        };
        self.0
            .lock()
            .unwrap()
            .products
            .insert(product.id.unwrap(), product.clone());
        product
    }

    pub fn task_count(&self) -> usize {
        self.0.lock().unwrap().tasks.len()
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.0.lock().unwrap().tasks.values().cloned().collect()
    }

    pub fn quote(&self, id: ObjectId) -> Option<Quote> {
        self.0.lock().unwrap().quotes.get(&id).cloned()
    }

    pub fn quote_count(&self) -> usize {
        self.0.lock().unwrap().quotes.len()
    }

    pub fn projects(&self) -> Vec<Project> {
        self.0.lock().unwrap().projects.values().cloned().collect()
    }

    pub fn client_count(&self) -> usize {
        self.0.lock().unwrap().clients.len()
    }
}

// ---------------------------------------------------------------------------
// Repository fakes
// ---------------------------------------------------------------------------

pub struct InMemoryLeadRepository {
    pub db: Arc<InMemoryDb>,
}

fn lead_matches(lead: &Lead, filter: &LeadFilter) -> bool {
    if let Some(agency_id) = filter.agency_id {
        if lead.agency_id != agency_id {
            return false;
        }
    }
    if let Some(status) = filter.status {
        if lead.status != status {
            return false;
        }
    }
    if let Some(ref platform) = filter.platform {
        if lead.platform.as_deref() != Some(platform.as_str()) {
            return false;
        }
    }
    if let Some(priority) = filter.priority {
        if lead.priority != priority {
            return false;
        }
    }
    if let Some(ref search) = filter.search {
        let needle = search.to_lowercase();
        let hit = [
            &lead.lead_data.name,
            &lead.lead_data.email,
            &lead.lead_data.phone,
        ]
        .into_iter()
        .any(|field| {
            field
                .as_deref()
                .is_some_and(|value| value.to_lowercase().contains(&needle))
        });
        if !hit {
            return false;
        }
    }
    true
}

#[async_trait]
impl LeadRepository for InMemoryLeadRepository {
    async fn create(&self, lead: Lead) -> RepositoryResult<Lead> {
        let mut stored = lead;
        stored.id = Some(ObjectId::new());
        stored.created_at = Some(now());
        stored.updated_at = Some(now());
        self.db
            .0
            .lock()
            .unwrap()
            .leads
            .insert(stored.id.unwrap(), stored.clone());
        Ok(stored)
    }

    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<Lead> {
        self.db
            .0
            .lock()
            .unwrap()
            .leads
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found(format!("Lead not found for ID: {}", id)))
    }

    async fn update(&self, id: ObjectId, lead: Lead) -> RepositoryResult<Lead> {
        let mut store = self.db.0.lock().unwrap();
        if !store.leads.contains_key(&id) {
            return Err(RepositoryError::not_found(format!(
                "No lead to update for ID: {}",
                id
            )));
        }
        let mut updated = lead;
        updated.id = Some(id);
        updated.updated_at = Some(now());
        store.leads.insert(id, updated.clone());
        Ok(updated)
    }

    async fn delete(&self, id: ObjectId) -> RepositoryResult<()> {
        self.db
            .0
            .lock()
            .unwrap()
            .leads
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::not_found(format!("No lead to delete for ID: {}", id)))
    }

    async fn list(&self, filter: LeadFilter, page: u32, limit: u32) -> RepositoryResult<Vec<Lead>> {
        let leads: Vec<Lead> = self
            .db
            .0
            .lock()
            .unwrap()
            .leads
            .values()
            .filter(|lead| lead_matches(lead, &filter))
            .cloned()
            .collect();
        Ok(page_slice(leads, page, limit))
    }

    async fn stats(&self, agency_id: Option<ObjectId>) -> RepositoryResult<LeadStats> {
        let mut stats = LeadStats::default();
        for lead in self.db.0.lock().unwrap().leads.values() {
            if agency_id.is_some_and(|id| lead.agency_id != id) {
                continue;
            }
            stats.record(lead);
        }
        Ok(stats)
    }

    async fn convert(&self, id: ObjectId, client: Client) -> RepositoryResult<Client> {
        let mut store = self.db.0.lock().unwrap();
        let Some(lead) = store.leads.get(&id).cloned() else {
            return Err(RepositoryError::not_found(format!(
                "Lead not found for ID: {}",
                id
            )));
        };
        let mut stored = client;
        stored.id = Some(ObjectId::new());
        stored.created_at = Some(now());
        stored.updated_at = Some(now());
        store.clients.insert(stored.id.unwrap(), stored.clone());

        let mut converted = lead;
        converted.status = LeadStatus::Won;
        converted.converted_client_id = stored.id;
        converted.updated_at = Some(now());
        store.leads.insert(id, converted);
        Ok(stored)
    }
}

pub struct InMemoryClientRepository {
    pub db: Arc<InMemoryDb>,
}

#[async_trait]
impl ClientRepository for InMemoryClientRepository {
    async fn create(&self, client: Client) -> RepositoryResult<Client> {
        let mut stored = client;
        stored.id = Some(ObjectId::new());
        stored.created_at = Some(now());
        stored.updated_at = Some(now());
        self.db
            .0
            .lock()
            .unwrap()
            .clients
            .insert(stored.id.unwrap(), stored.clone());
        Ok(stored)
    }

    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<Client> {
        self.db
            .0
            .lock()
            .unwrap()
            .clients
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found(format!("Client not found for ID: {}", id)))
    }

    async fn update(&self, id: ObjectId, client: Client) -> RepositoryResult<Client> {
        let mut store = self.db.0.lock().unwrap();
        if !store.clients.contains_key(&id) {
            return Err(RepositoryError::not_found(format!(
                "No client to update for ID: {}",
                id
            )));
        }
        let mut updated = client;
        updated.id = Some(id);
        updated.updated_at = Some(now());
        store.clients.insert(id, updated.clone());
        Ok(updated)
    }

    async fn delete(&self, id: ObjectId) -> RepositoryResult<()> {
        self.db
            .0
            .lock()
            .unwrap()
            .clients
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| {
                RepositoryError::not_found(format!("No client to delete for ID: {}", id))
            })
    }

    async fn list(
        &self,
        agency_id: Option<ObjectId>,
        status: Option<ClientStatus>,
        page: u32,
        limit: u32,
    ) -> RepositoryResult<Vec<Client>> {
        let clients: Vec<Client> = self
            .db
            .0
            .lock()
            .unwrap()
            .clients
            .values()
            .filter(|client| {
                agency_id.map_or(true, |id| client.agency_id == id)
                    && status.map_or(true, |s| client.status == s)
            })
            .cloned()
            .collect();
        Ok(page_slice(clients, page, limit))
    }
}

pub struct InMemoryProductRepository {
    pub db: Arc<InMemoryDb>,
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, product: Product) -> RepositoryResult<Product> {
        let mut stored = product;
        stored.id = Some(ObjectId::new());
        stored.created_at = Some(now());
        stored.updated_at = Some(now());
        self.db
            .0
            .lock()
            .unwrap()
            .products
            .insert(stored.id.unwrap(), stored.clone());
        Ok(stored)
    }

    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<Product> {
        self.db
            .0
            .lock()
            .unwrap()
            .products
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found(format!("Product not found for ID: {}", id)))
    }

    async fn update(&self, id: ObjectId, product: Product) -> RepositoryResult<Product> {
        let mut store = self.db.0.lock().unwrap();
        if !store.products.contains_key(&id) {
            return Err(RepositoryError::not_found(format!(
                "No product to update for ID: {}",
                id
            )));
        }
        let mut updated = product;
        updated.id = Some(id);
        updated.updated_at = Some(now());
        store.products.insert(id, updated.clone());
        Ok(updated)
    }

    async fn delete(&self, id: ObjectId) -> RepositoryResult<()> {
        self.db
            .0
            .lock()
            .unwrap()
            .products
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| {
                RepositoryError::not_found(format!("No product to delete for ID: {}", id))
            })
    }

    async fn list(
        &self,
        agency_id: Option<ObjectId>,
        active_only: bool,
        page: u32,
        limit: u32,
    ) -> RepositoryResult<Vec<Product>> {
        let products: Vec<Product> = self
            .db
            .0
            .lock()
            .unwrap()
            .products
            .values()
            .filter(|product| {
                agency_id.map_or(true, |id| product.agency_id == id)
                    && (!active_only || product.is_active)
            })
            .cloned()
            .collect();
        Ok(page_slice(products, page, limit))
    }
}

pub struct InMemoryQuoteRepository {
    pub db: Arc<InMemoryDb>,
}

#[async_trait]
impl QuoteRepository for InMemoryQuoteRepository {
    async fn create(&self, quote: Quote) -> RepositoryResult<Quote> {
        let mut stored = quote;
        stored.id = Some(ObjectId::new());
        stored.created_at = Some(now());
        stored.updated_at = Some(now());
        self.db
            .0
            .lock()
            .unwrap()
            .quotes
            .insert(stored.id.unwrap(), stored.clone());
        Ok(stored)
    }

    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<Quote> {
        self.db
            .0
            .lock()
            .unwrap()
            .quotes
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found(format!("Quote not found for ID: {}", id)))
    }

    async fn update(&self, id: ObjectId, quote: Quote) -> RepositoryResult<Quote> {
        let mut store = self.db.0.lock().unwrap();
        if !store.quotes.contains_key(&id) {
            return Err(RepositoryError::not_found(format!(
                "No quote to update for ID: {}",
                id
            )));
        }
        let mut updated = quote;
        updated.id = Some(id);
        updated.updated_at = Some(now());
        store.quotes.insert(id, updated.clone());
        Ok(updated)
    }

    async fn update_status(&self, id: ObjectId, status: QuoteStatus) -> RepositoryResult<Quote> {
        let mut store = self.db.0.lock().unwrap();
        let Some(quote) = store.quotes.get_mut(&id) else {
            return Err(RepositoryError::not_found(format!(
                "No quote to update status for ID: {}",
                id
            )));
        };
        quote.status = status;
        quote.updated_at = Some(now());
        Ok(quote.clone())
    }

    async fn delete(&self, id: ObjectId) -> RepositoryResult<()> {
        self.db
            .0
            .lock()
            .unwrap()
            .quotes
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::not_found(format!("No quote to delete for ID: {}", id)))
    }

    async fn list(
        &self,
        agency_id: Option<ObjectId>,
        client_id: Option<ObjectId>,
        status: Option<QuoteStatus>,
        page: u32,
        limit: u32,
    ) -> RepositoryResult<Vec<Quote>> {
        let quotes: Vec<Quote> = self
            .db
            .0
            .lock()
            .unwrap()
            .quotes
            .values()
            .filter(|quote| {
                agency_id.map_or(true, |id| quote.agency_id == id)
                    && client_id.map_or(true, |id| quote.client_id == id)
                    && status.map_or(true, |s| quote.status == s)
            })
            .cloned()
            .collect();
        Ok(page_slice(quotes, page, limit))
    }
}

pub struct InMemoryProjectRepository {
    pub db: Arc<InMemoryDb>,
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepository {
    async fn create(&self, project: Project) -> RepositoryResult<Project> {
        let mut stored = project;
        stored.id = Some(ObjectId::new());
        stored.created_at = Some(now());
        stored.updated_at = Some(now());
        self.db
            .0
            .lock()
            .unwrap()
            .projects
            .insert(stored.id.unwrap(), stored.clone());
        Ok(stored)
    }

    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<Project> {
        self.db
            .0
            .lock()
            .unwrap()
            .projects
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found(format!("Project not found for ID: {}", id)))
    }

    async fn update(&self, id: ObjectId, project: Project) -> RepositoryResult<Project> {
        let mut store = self.db.0.lock().unwrap();
        if !store.projects.contains_key(&id) {
            return Err(RepositoryError::not_found(format!(
                "No project to update for ID: {}",
                id
            )));
        }
        let mut updated = project;
        updated.id = Some(id);
        updated.updated_at = Some(now());
        store.projects.insert(id, updated.clone());
        Ok(updated)
    }

    async fn delete(&self, id: ObjectId) -> RepositoryResult<()> {
        self.db
            .0
            .lock()
            .unwrap()
            .projects
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| {
                RepositoryError::not_found(format!("No project to delete for ID: {}", id))
            })
    }

    async fn list(
        &self,
        agency_id: Option<ObjectId>,
        client_id: Option<ObjectId>,
        page: u32,
        limit: u32,
    ) -> RepositoryResult<Vec<Project>> {
        let projects: Vec<Project> = self
            .db
            .0
            .lock()
            .unwrap()
            .projects
            .values()
            .filter(|project| {
                agency_id.map_or(true, |id| project.agency_id == id)
                    && client_id.map_or(true, |id| project.client_id == id)
            })
            .cloned()
            .collect();
        Ok(page_slice(projects, page, limit))
    }

    async fn find_by_quote(&self, quote_id: ObjectId) -> RepositoryResult<Option<Project>> {
        Ok(self
            .db
            .0
            .lock()
            .unwrap()
            .projects
            .values()
            .find(|project| project.source_quote_id == Some(quote_id))
            .cloned())
    }

    async fn create_from_quote(
        &self,
        project: Project,
        tasks: Vec<Task>,
    ) -> RepositoryResult<Project> {
        let quote_id = project.source_quote_id.ok_or_else(|| {
            RepositoryError::validation("Project created from a quote must carry its quote id")
        })?;
        let mut store = self.db.0.lock().unwrap();
        // All-or-nothing like the Mongo transaction: probe the quote first.
        if !store.quotes.contains_key(&quote_id) {
            return Err(RepositoryError::not_found(format!(
                "Quote not found for ID: {}",
                quote_id
            )));
        }

        let project_id = ObjectId::new();
        let mut stored = project;
        stored.id = Some(project_id);
        stored.created_at = Some(now());
        stored.updated_at = Some(now());
        store.projects.insert(project_id, stored.clone());

        for mut task in tasks {
            let task_id = ObjectId::new();
            task.id = Some(task_id);
            task.project_id = Some(project_id);
            task.created_at = Some(now());
            task.updated_at = Some(now());
            store.tasks.insert(task_id, task);
        }

        if let Some(quote) = store.quotes.get_mut(&quote_id) {
            quote.status = QuoteStatus::Approved;
            quote.updated_at = Some(now());
        }
        Ok(stored)
    }
}

pub struct InMemoryAgencyRepository {
    pub db: Arc<InMemoryDb>,
}

#[async_trait]
impl AgencyRepository for InMemoryAgencyRepository {
    async fn create(&self, agency: Agency) -> RepositoryResult<Agency> {
        let mut stored = agency;
        stored.id = Some(ObjectId::new());
        stored.created_at = Some(now());
        stored.updated_at = Some(now());
        self.db
            .0
            .lock()
            .unwrap()
            .agencies
            .insert(stored.id.unwrap(), stored.clone());
        Ok(stored)
    }

    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<Agency> {
        self.db
            .0
            .lock()
            .unwrap()
            .agencies
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found(format!("Agency not found for ID: {}", id)))
    }

    async fn update(&self, id: ObjectId, agency: Agency) -> RepositoryResult<Agency> {
        let mut store = self.db.0.lock().unwrap();
        if !store.agencies.contains_key(&id) {
            return Err(RepositoryError::not_found(format!(
                "No agency to update for ID: {}",
                id
            )));
        }
        let mut updated = agency;
        updated.id = Some(id);
        updated.updated_at = Some(now());
        store.agencies.insert(id, updated.clone());
        Ok(updated)
    }

    async fn delete(&self, id: ObjectId) -> RepositoryResult<()> {
        self.db
            .0
            .lock()
            .unwrap()
            .agencies
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| {
                RepositoryError::not_found(format!("No agency to delete for ID: {}", id))
            })
    }

    async fn list(&self, page: u32, limit: u32) -> RepositoryResult<Vec<Agency>> {
        let agencies: Vec<Agency> =
            self.db.0.lock().unwrap().agencies.values().cloned().collect();
        Ok(page_slice(agencies, page, limit))
    }
}

// ---------------------------------------------------------------------------
// Delivery fake
// ---------------------------------------------------------------------------

/// Records every message; can be switched into failure mode to exercise the
/// save-then-send separation.
#[derive(Default)]
pub struct RecordingMailer {
    pub fail: Mutex<bool>,
    pub sent: Mutex<Vec<EmailMessage>>,
}

impl RecordingMailer {
    pub fn new() -> Arc<Self> {
        Arc::new(RecordingMailer::default())
    }

    pub fn set_fail(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl EmailService for RecordingMailer {
    async fn send_email(&self, message: EmailMessage) -> Result<(), EmailError> {
        if *self.fail.lock().unwrap() {
            return Err(EmailError::SmtpError("simulated SMTP outage".to_string()));
        }
        self.sent.lock().unwrap().push(message);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Service wiring over the fakes
// ---------------------------------------------------------------------------

pub fn lead_service(db: &Arc<InMemoryDb>) -> Arc<LeadServiceImpl> {
    Arc::new(LeadServiceImpl::new(Arc::new(InMemoryLeadRepository {
        db: db.clone(),
    })))
}

pub fn product_service(db: &Arc<InMemoryDb>) -> Arc<ProductServiceImpl> {
    Arc::new(ProductServiceImpl::new(Arc::new(InMemoryProductRepository {
        db: db.clone(),
    })))
}

pub fn quote_service(db: &Arc<InMemoryDb>, mailer: Arc<RecordingMailer>) -> Arc<QuoteServiceImpl> {
    Arc::new(QuoteServiceImpl::new(
        Arc::new(InMemoryQuoteRepository { db: db.clone() }),
        Arc::new(InMemoryClientRepository { db: db.clone() }),
        Arc::new(InMemoryProductRepository { db: db.clone() }),
        Arc::new(InMemoryProjectRepository { db: db.clone() }),
        Arc::new(InMemoryAgencyRepository { db: db.clone() }),
        mailer,
        Arc::new(HtmlQuoteRenderer::new()),
    ))
}
