use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TaskTemplateRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    pub description: Option<String>,

    #[validate(range(min = 0.0))]
    pub estimated_hours: Option<f64>,

    pub assigned_to: Option<String>,
}

/// `price_major` is the only major-unit field on the whole API surface; the
/// product form edits shekels and the conversion happens exactly once here.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(length(equal = 24))]
    pub agency_id: String,

    #[validate(length(min = 1, max = 200))]
    pub name: String,

    pub description: Option<String>,

    pub category: Option<String>,

    #[validate(range(min = 0.0))]
    pub price_major: f64,

    #[validate(length(min = 1, max = 40))]
    pub unit: String,

    pub is_active: Option<bool>,

    #[validate(nested)]
    #[serde(default)]
    pub predefined_tasks: Vec<TaskTemplateRequest>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,

    pub description: Option<String>,

    pub category: Option<String>,

    #[validate(range(min = 0.0))]
    pub price_major: Option<f64>,

    #[validate(length(min = 1, max = 40))]
    pub unit: Option<String>,

    pub is_active: Option<bool>,

    #[validate(nested)]
    pub predefined_tasks: Option<Vec<TaskTemplateRequest>>,
}
