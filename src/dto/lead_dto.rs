use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::model::common::Priority;
use crate::model::lead::LeadStatus;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct LeadDataRequest {
    #[validate(length(max = 200))]
    pub name: Option<String>,

    #[validate(email)]
    pub email: Option<String>,

    #[validate(length(max = 40))]
    pub phone: Option<String>,

    /// Free-form payload forwarded by ad-platform webhooks.
    pub extra: Option<bson::Document>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateLeadRequest {
    #[validate(length(equal = 24))]
    pub agency_id: String,

    pub platform: Option<String>,

    pub external_id: Option<String>,

    #[validate(nested)]
    pub lead_data: LeadDataRequest,

    pub priority: Option<Priority>,

    /// Estimated deal value in minor units.
    #[validate(range(min = 0))]
    pub value: Option<i64>,

    pub assigned_to: Option<String>,

    pub notes: Option<String>,
}

/// Partial update; absent fields keep their stored value. A status change
/// is validated against the lead pipeline before it is written.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateLeadRequest {
    pub platform: Option<String>,

    pub external_id: Option<String>,

    #[validate(nested)]
    pub lead_data: Option<LeadDataRequest>,

    pub status: Option<LeadStatus>,

    pub priority: Option<Priority>,

    #[validate(range(min = 0))]
    pub value: Option<i64>,

    pub assigned_to: Option<String>,

    pub notes: Option<String>,
}

/// Explicit fields win over the lead's captured contact data when the
/// client record is built.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ConvertLeadRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,

    pub contact_name: Option<String>,

    #[validate(email)]
    pub email: Option<String>,

    pub phone: Option<String>,

    pub industry: Option<String>,

    pub notes: Option<String>,
}
