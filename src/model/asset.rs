use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::util::money::Money;

/// A digital property managed for a client: domain, hosting plan, license,
/// ad account and the like.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DigitalAsset {
    #[serde(rename = "_id")]
    pub id: Option<ObjectId>,
    pub agency_id: ObjectId,
    pub client_id: Option<ObjectId>,
    pub name: String,
    pub asset_type: String,
    pub url: Option<String>,
    pub cost: Option<Money>,
    pub purchase_date: Option<String>,
    pub renewal_date: Option<String>,
    pub notes: Option<String>,
    pub is_active: bool,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}
