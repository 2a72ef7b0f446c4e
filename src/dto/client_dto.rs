use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::model::client::ClientStatus;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateClientRequest {
    #[validate(length(equal = 24))]
    pub agency_id: String,

    #[validate(length(min = 1, max = 200))]
    pub name: String,

    pub contact_name: Option<String>,

    #[validate(email)]
    pub email: Option<String>,

    pub phone: Option<String>,

    pub industry: Option<String>,

    pub status: Option<ClientStatus>,

    pub notes: Option<String>,

    pub custom_fields: Option<bson::Document>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateClientRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,

    pub contact_name: Option<String>,

    #[validate(email)]
    pub email: Option<String>,

    pub phone: Option<String>,

    pub industry: Option<String>,

    pub status: Option<ClientStatus>,

    pub notes: Option<String>,

    pub custom_fields: Option<bson::Document>,
}
