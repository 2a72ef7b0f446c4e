use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::model::common::Priority;
use crate::model::project::ProjectStatus;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateProjectRequest {
    #[validate(length(equal = 24))]
    pub agency_id: String,

    #[validate(length(equal = 24))]
    pub client_id: String,

    #[validate(length(min = 1, max = 200))]
    pub name: String,

    pub description: Option<String>,

    pub priority: Option<Priority>,

    pub start_date: Option<String>,

    pub end_date: Option<String>,

    /// Minor units.
    #[validate(range(min = 0))]
    pub budget: Option<i64>,

    pub assigned_to: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateProjectRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,

    pub description: Option<String>,

    /// Validated against the project lifecycle before it is written.
    pub status: Option<ProjectStatus>,

    pub priority: Option<Priority>,

    pub start_date: Option<String>,

    pub end_date: Option<String>,

    #[validate(range(min = 0))]
    pub budget: Option<i64>,

    pub assigned_to: Option<String>,
}
