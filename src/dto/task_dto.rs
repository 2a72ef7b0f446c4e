use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::model::common::Priority;
use crate::model::task::TaskStatus;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTaskRequest {
    #[validate(length(equal = 24))]
    pub project_id: Option<String>,

    #[validate(length(equal = 24))]
    pub client_id: Option<String>,

    #[validate(length(min = 1, max = 200))]
    pub title: String,

    pub description: Option<String>,

    pub priority: Option<Priority>,

    pub assigned_to: Option<String>,

    pub due_date: Option<String>,

    #[validate(range(min = 0.0))]
    pub estimated_hours: Option<f64>,

    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    pub description: Option<String>,

    /// Validated against the task lifecycle before it is written.
    pub status: Option<TaskStatus>,

    pub priority: Option<Priority>,

    pub assigned_to: Option<String>,

    pub due_date: Option<String>,

    #[validate(range(min = 0.0))]
    pub estimated_hours: Option<f64>,

    #[validate(range(min = 0.0))]
    pub actual_hours: Option<f64>,

    pub tags: Option<Vec<String>>,
}
