use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use tracing::{error, info, instrument, warn};

use crate::dto::quote_dto::{CreateQuoteRequest, QuoteItemRequest, UpdateQuoteRequest};
use crate::model::common::Priority;
use crate::model::project::{Project, ProjectStatus};
use crate::model::quote::{compute_totals, Quote, QuoteItem, QuoteStatus};
use crate::model::task::{Task, TaskStatus};
use crate::repository::agency_repo::AgencyRepository;
use crate::repository::client_repo::ClientRepository;
use crate::repository::product_repo::ProductRepository;
use crate::repository::project_repo::ProjectRepository;
use crate::repository::quote_repo::QuoteRepository;
use crate::repository::repository_error::RepositoryError;
use crate::service::lead_service::parse_object_id;
use crate::util::email::{quote_email_bodies, EmailAttachment, EmailMessage, EmailService};
use crate::util::error::ServiceError;
use crate::util::money::Money;
use crate::util::render::QuoteRenderer;

#[async_trait]
pub trait QuoteService: Send + Sync {
    async fn create_quote(&self, request: CreateQuoteRequest) -> Result<Quote, ServiceError>;
    async fn get_quote(&self, id: ObjectId) -> Result<Quote, ServiceError>;
    async fn update_quote(
        &self,
        id: ObjectId,
        request: UpdateQuoteRequest,
    ) -> Result<Quote, ServiceError>;
    async fn delete_quote(&self, id: ObjectId) -> Result<(), ServiceError>;
    async fn list_quotes(
        &self,
        agency_id: Option<ObjectId>,
        client_id: Option<ObjectId>,
        status: Option<QuoteStatus>,
        page: u32,
        limit: u32,
    ) -> Result<Vec<Quote>, ServiceError>;
    /// Validates the transition; setting `Approved` runs the atomic
    /// approval handoff instead of a bare status write.
    async fn update_quote_status(
        &self,
        id: ObjectId,
        status: QuoteStatus,
    ) -> Result<Quote, ServiceError>;
    /// Renders the quote document and emails it to the client. Independent
    /// of the save: a delivery failure leaves the stored quote untouched
    /// and the send can be retried alone.
    async fn send_quote(&self, id: ObjectId) -> Result<Quote, ServiceError>;
}

pub struct QuoteServiceImpl {
    quote_repo: Arc<dyn QuoteRepository>,
    client_repo: Arc<dyn ClientRepository>,
    product_repo: Arc<dyn ProductRepository>,
    project_repo: Arc<dyn ProjectRepository>,
    agency_repo: Arc<dyn AgencyRepository>,
    mailer: Arc<dyn EmailService>,
    renderer: Arc<dyn QuoteRenderer>,
}

impl QuoteServiceImpl {
    pub fn new(
        quote_repo: Arc<dyn QuoteRepository>,
        client_repo: Arc<dyn ClientRepository>,
        product_repo: Arc<dyn ProductRepository>,
        project_repo: Arc<dyn ProjectRepository>,
        agency_repo: Arc<dyn AgencyRepository>,
        mailer: Arc<dyn EmailService>,
        renderer: Arc<dyn QuoteRenderer>,
    ) -> Self {
        QuoteServiceImpl {
            quote_repo,
            client_repo,
            product_repo,
            project_repo,
            agency_repo,
            mailer,
            renderer,
        }
    }

    /// Builds the stored line items. Totals are always recomputed here;
    /// whatever the client computed is ignored.
    fn build_items(items: Vec<QuoteItemRequest>) -> Result<Vec<QuoteItem>, ServiceError> {
        if items.is_empty() {
            return Err(ServiceError::InvalidInput(
                "A quote needs at least one item".to_string(),
            ));
        }
        items
            .into_iter()
            .map(|request| {
                if request.quantity == 0 {
                    return Err(ServiceError::InvalidInput(format!(
                        "Item '{}' must have a quantity of at least 1",
                        request.name
                    )));
                }
                let unit_price = Money::from_minor(request.unit_price);
                if unit_price.is_negative() {
                    return Err(ServiceError::InvalidInput(format!(
                        "Item '{}' cannot have a negative unit price",
                        request.name
                    )));
                }
                let product_id = request
                    .product_id
                    .as_deref()
                    .map(|raw| parse_object_id(raw, "product id"))
                    .transpose()?;
                let mut item = QuoteItem {
                    product_id,
                    name: request.name,
                    description: request.description,
                    quantity: request.quantity,
                    unit_price,
                    price_type: request.price_type.unwrap_or_default(),
                    total: Money::ZERO,
                };
                item.total = item.line_total();
                Ok(item)
            })
            .collect()
    }

    fn apply_totals(quote: &mut Quote) {
        let totals = compute_totals(&quote.items);
        quote.subtotal_amount = totals.subtotal;
        quote.vat_amount = totals.vat;
        quote.total_amount = totals.total;
    }

    /// The approval handoff: one project per quote, tasks cloned from every
    /// resolvable product template, quote marked approved, all in one
    /// repository transaction.
    async fn approve(&self, quote: Quote) -> Result<Quote, ServiceError> {
        let quote_id = quote.id.ok_or_else(|| {
            ServiceError::InternalError("Stored quote is missing its id".to_string())
        })?;

        // Idempotency: a re-run finds the project from the first run and
        // seeds nothing new; only the status is repaired if it was lost.
        if let Some(existing) = self.project_repo.find_by_quote(quote_id).await? {
            info!(project_id = ?existing.id, "Quote already approved; keeping existing project");
            let stored = self.quote_repo.get_by_id(quote_id).await?;
            if stored.status != QuoteStatus::Approved {
                return self
                    .quote_repo
                    .update_status(quote_id, QuoteStatus::Approved)
                    .await
                    .map_err(ServiceError::from);
            }
            return Ok(stored);
        }

        // A missing client aborts the whole handoff before anything is
        // written.
        self.client_repo.get_by_id(quote.client_id).await?;

        let mut tasks = Vec::new();
        for item in &quote.items {
            let Some(product_id) = item.product_id else {
                continue;
            };
            match self.product_repo.get_by_id(product_id).await {
                Ok(product) => {
                    for (index, template) in product.predefined_tasks.iter().enumerate() {
                        tasks.push(Task {
                            id: None,
                            project_id: None, // set by the repository inside the transaction
                            client_id: Some(quote.client_id),
                            title: template.title.clone(),
                            description: template.description.clone(),
                            status: TaskStatus::New,
                            priority: Priority::Medium,
                            assigned_to: template.assigned_to.clone(),
                            due_date: None,
                            estimated_hours: template.estimated_hours,
                            actual_hours: None,
                            tags: Vec::new(),
                            source_product_id: Some(product_id),
                            template_index: Some(index as u32),
                            created_at: None,
                            updated_at: None,
                        });
                    }
                }
                // The product was hard-deleted after the quote snapshotted
                // it; the line stays priced but seeds no tasks.
                Err(RepositoryError::NotFound(_)) => {
                    warn!(product_id = %product_id, "Quote item references a deleted product; no tasks seeded for it");
                }
                Err(e) => return Err(ServiceError::from(e)),
            }
        }

        let project = Project {
            id: None,
            agency_id: quote.agency_id,
            client_id: quote.client_id,
            source_quote_id: Some(quote_id),
            name: quote.title.clone(),
            description: quote.description.clone(),
            status: ProjectStatus::Planning,
            priority: Priority::Medium,
            start_date: None,
            end_date: None,
            budget: Some(quote.total_amount),
            assigned_to: None,
            created_at: None,
            updated_at: None,
        };

        let created = self.project_repo.create_from_quote(project, tasks).await?;
        info!(project_id = ?created.id, quote_id = %quote_id, "Quote approved");
        self.quote_repo.get_by_id(quote_id).await.map_err(ServiceError::from)
    }
}

#[async_trait]
impl QuoteService for QuoteServiceImpl {
    #[instrument(skip(self, request))]
    async fn create_quote(&self, request: CreateQuoteRequest) -> Result<Quote, ServiceError> {
        info!("Creating quote");
        let agency_id = parse_object_id(&request.agency_id, "agency id")?;
        let client_id = parse_object_id(&request.client_id, "client id")?;

        if request.title.trim().is_empty() {
            return Err(ServiceError::InvalidInput(
                "A quote needs a title".to_string(),
            ));
        }
        if request.valid_until.trim().is_empty() {
            return Err(ServiceError::InvalidInput(
                "A quote needs a validity date".to_string(),
            ));
        }

        let items = Self::build_items(request.items)?;

        // Nothing is persisted unless the referenced client exists.
        self.client_repo.get_by_id(client_id).await?;

        let mut quote = Quote {
            id: None,
            agency_id,
            client_id,
            title: request.title,
            description: request.description,
            valid_until: request.valid_until,
            status: QuoteStatus::Draft,
            items,
            subtotal_amount: Money::ZERO,
            vat_amount: Money::ZERO,
            total_amount: Money::ZERO,
            notes: request.notes,
            sender_email: request.sender_email,
            email_message: request.email_message,
            created_at: None,
            updated_at: None,
        };
        Self::apply_totals(&mut quote);

        self.quote_repo.create(quote).await.map_err(ServiceError::from)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn get_quote(&self, id: ObjectId) -> Result<Quote, ServiceError> {
        self.quote_repo.get_by_id(id).await.map_err(ServiceError::from)
    }

    #[instrument(skip(self, request), fields(id = %id))]
    async fn update_quote(
        &self,
        id: ObjectId,
        request: UpdateQuoteRequest,
    ) -> Result<Quote, ServiceError> {
        let mut quote = self.quote_repo.get_by_id(id).await?;

        if let Some(title) = request.title {
            if title.trim().is_empty() {
                return Err(ServiceError::InvalidInput(
                    "A quote needs a title".to_string(),
                ));
            }
            quote.title = title;
        }
        if let Some(description) = request.description {
            quote.description = Some(description);
        }
        if let Some(valid_until) = request.valid_until {
            quote.valid_until = valid_until;
        }
        if let Some(items) = request.items {
            quote.items = Self::build_items(items)?;
        }
        if let Some(notes) = request.notes {
            quote.notes = Some(notes);
        }
        if let Some(sender_email) = request.sender_email {
            quote.sender_email = Some(sender_email);
        }
        if let Some(email_message) = request.email_message {
            quote.email_message = Some(email_message);
        }
        Self::apply_totals(&mut quote);

        self.quote_repo.update(id, quote).await.map_err(ServiceError::from)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn delete_quote(&self, id: ObjectId) -> Result<(), ServiceError> {
        self.quote_repo.delete(id).await.map_err(ServiceError::from)
    }

    #[instrument(skip(self))]
    async fn list_quotes(
        &self,
        agency_id: Option<ObjectId>,
        client_id: Option<ObjectId>,
        status: Option<QuoteStatus>,
        page: u32,
        limit: u32,
    ) -> Result<Vec<Quote>, ServiceError> {
        self.quote_repo
            .list(agency_id, client_id, status, page, limit)
            .await
            .map_err(ServiceError::from)
    }

    #[instrument(skip(self), fields(id = %id, status = %status))]
    async fn update_quote_status(
        &self,
        id: ObjectId,
        status: QuoteStatus,
    ) -> Result<Quote, ServiceError> {
        let quote = self.quote_repo.get_by_id(id).await?;

        // Re-setting the current status is a no-op success.
        if quote.status == status {
            return Ok(quote);
        }
        if !quote.status.can_transition_to(status) {
            error!(from = %quote.status, to = %status, "Rejected quote status transition");
            return Err(ServiceError::Conflict(format!(
                "Quote status cannot change from {} to {}",
                quote.status, status
            )));
        }

        if status == QuoteStatus::Approved {
            self.approve(quote).await
        } else {
            self.quote_repo
                .update_status(id, status)
                .await
                .map_err(ServiceError::from)
        }
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn send_quote(&self, id: ObjectId) -> Result<Quote, ServiceError> {
        let quote = self.quote_repo.get_by_id(id).await?;
        let client = self.client_repo.get_by_id(quote.client_id).await?;
        let agency = self.agency_repo.get_by_id(quote.agency_id).await?;

        let to = client.email.clone().ok_or_else(|| {
            ServiceError::InvalidInput(format!(
                "Client '{}' has no email address to send the quote to",
                client.name
            ))
        })?;

        let document = self
            .renderer
            .render(&quote, &client, &agency)
            .map_err(|e| ServiceError::ExternalDelivery(e.to_string()))?;

        let (text_body, html_body) = quote_email_bodies(
            &client.name,
            &quote.title,
            quote.total_amount,
            &quote.valid_until,
            quote.email_message.as_deref(),
        );

        let mut message = EmailMessage::new(to, format!("Quote: {}", quote.title))
            .with_text_body(text_body)
            .with_html_body(html_body)
            .with_attachment(EmailAttachment {
                filename: format!("quote-{}.html", id.to_hex()),
                content_type: "text/html; charset=utf-8".to_string(),
                content: document,
            });
        if let Some(sender_email) = &quote.sender_email {
            message = message.with_reply_to(sender_email.clone());
        }

        // A failed send reports ExternalDelivery and leaves the stored quote
        // exactly as it was; the caller retries the send alone.
        self.mailer.send_email(message).await.map_err(|e| {
            error!("Quote email failed: {}", e);
            ServiceError::ExternalDelivery(e.to_string())
        })?;

        if quote.status == QuoteStatus::Draft {
            self.quote_repo
                .update_status(id, QuoteStatus::Sent)
                .await
                .map_err(ServiceError::from)
        } else {
            // Re-sending an already sent or viewed quote keeps its status.
            Ok(quote)
        }
    }
}
