use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use tracing::{info, instrument};

use crate::dto::product_dto::{CreateProductRequest, TaskTemplateRequest, UpdateProductRequest};
use crate::model::product::{Product, TaskTemplate};
use crate::repository::product_repo::ProductRepository;
use crate::service::lead_service::parse_object_id;
use crate::util::error::ServiceError;
use crate::util::money::Money;

#[async_trait]
pub trait ProductService: Send + Sync {
    async fn create_product(&self, request: CreateProductRequest) -> Result<Product, ServiceError>;
    async fn get_product(&self, id: ObjectId) -> Result<Product, ServiceError>;
    async fn update_product(
        &self,
        id: ObjectId,
        request: UpdateProductRequest,
    ) -> Result<Product, ServiceError>;
    async fn delete_product(&self, id: ObjectId) -> Result<(), ServiceError>;
    async fn list_products(
        &self,
        agency_id: Option<ObjectId>,
        active_only: bool,
        page: u32,
        limit: u32,
    ) -> Result<Vec<Product>, ServiceError>;
}

pub struct ProductServiceImpl {
    product_repo: Arc<dyn ProductRepository>,
}

impl ProductServiceImpl {
    pub fn new(product_repo: Arc<dyn ProductRepository>) -> Self {
        ProductServiceImpl { product_repo }
    }

    /// Template order is kept as given; the array position becomes the
    /// template index when tasks are seeded from this product.
    fn build_templates(templates: Vec<TaskTemplateRequest>) -> Vec<TaskTemplate> {
        templates
            .into_iter()
            .map(|template| TaskTemplate {
                title: template.title,
                description: template.description,
                estimated_hours: template.estimated_hours,
                assigned_to: template.assigned_to,
            })
            .collect()
    }
}

#[async_trait]
impl ProductService for ProductServiceImpl {
    #[instrument(skip(self, request))]
    async fn create_product(&self, request: CreateProductRequest) -> Result<Product, ServiceError> {
        info!("Creating product");
        let agency_id = parse_object_id(&request.agency_id, "agency id")?;
        if request.price_major < 0.0 {
            return Err(ServiceError::InvalidInput(
                "Product price cannot be negative".to_string(),
            ));
        }

        let product = Product {
            id: None,
            agency_id,
            name: request.name,
            description: request.description,
            category: request.category,
            // The one major-to-minor conversion on the write path; update
            // goes through the same rounding so edits never drift.
            price: Money::from_major(request.price_major),
            unit: request.unit,
            is_active: request.is_active.unwrap_or(true),
            predefined_tasks: Self::build_templates(request.predefined_tasks),
            created_at: None,
            updated_at: None,
        };

        self.product_repo.create(product).await.map_err(ServiceError::from)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn get_product(&self, id: ObjectId) -> Result<Product, ServiceError> {
        self.product_repo.get_by_id(id).await.map_err(ServiceError::from)
    }

    #[instrument(skip(self, request), fields(id = %id))]
    async fn update_product(
        &self,
        id: ObjectId,
        request: UpdateProductRequest,
    ) -> Result<Product, ServiceError> {
        let mut product = self.product_repo.get_by_id(id).await?;

        if let Some(name) = request.name {
            product.name = name;
        }
        if let Some(description) = request.description {
            product.description = Some(description);
        }
        if let Some(category) = request.category {
            product.category = Some(category);
        }
        if let Some(price_major) = request.price_major {
            if price_major < 0.0 {
                return Err(ServiceError::InvalidInput(
                    "Product price cannot be negative".to_string(),
                ));
            }
            product.price = Money::from_major(price_major);
        }
        if let Some(unit) = request.unit {
            product.unit = unit;
        }
        if let Some(is_active) = request.is_active {
            product.is_active = is_active;
        }
        if let Some(templates) = request.predefined_tasks {
            product.predefined_tasks = Self::build_templates(templates);
        }

        self.product_repo.update(id, product).await.map_err(ServiceError::from)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn delete_product(&self, id: ObjectId) -> Result<(), ServiceError> {
        // Hard delete; quote items that reference this product keep their
        // snapshotted name and price.
        self.product_repo.delete(id).await.map_err(ServiceError::from)
    }

    #[instrument(skip(self))]
    async fn list_products(
        &self,
        agency_id: Option<ObjectId>,
        active_only: bool,
        page: u32,
        limit: u32,
    ) -> Result<Vec<Product>, ServiceError> {
        self.product_repo
            .list(agency_id, active_only, page, limit)
            .await
            .map_err(ServiceError::from)
    }
}
