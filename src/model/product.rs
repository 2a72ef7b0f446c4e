use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::util::money::Money;

/// Task blueprint attached to a product. Array position is the template
/// sequence; it becomes `template_index` on tasks seeded from this product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskTemplate {
    pub title: String,
    pub description: Option<String>,
    pub estimated_hours: Option<f64>,
    pub assigned_to: Option<String>,
}

/// A sellable offering. `price` is stored in minor units; the UI edge works
/// in major units and converts exactly once at the DTO boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: Option<ObjectId>,
    pub agency_id: ObjectId,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Money,
    /// Billing unit: project, hour, month, year, page, design, video, ...
    pub unit: String,
    pub is_active: bool,
    #[serde(default)]
    pub predefined_tasks: Vec<TaskTemplate>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}
