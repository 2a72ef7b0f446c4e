use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Tenant organization; every other entity hangs off an agency id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agency {
    #[serde(rename = "_id")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub logo_url: Option<String>,
    pub is_active: bool,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}
