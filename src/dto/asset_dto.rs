use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateAssetRequest {
    #[validate(length(equal = 24))]
    pub agency_id: String,

    #[validate(length(equal = 24))]
    pub client_id: Option<String>,

    #[validate(length(min = 1, max = 200))]
    pub name: String,

    #[validate(length(min = 1, max = 60))]
    pub asset_type: String,

    #[validate(url)]
    pub url: Option<String>,

    /// Minor units.
    #[validate(range(min = 0))]
    pub cost: Option<i64>,

    pub purchase_date: Option<String>,

    pub renewal_date: Option<String>,

    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateAssetRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 60))]
    pub asset_type: Option<String>,

    #[validate(url)]
    pub url: Option<String>,

    #[validate(range(min = 0))]
    pub cost: Option<i64>,

    pub purchase_date: Option<String>,

    pub renewal_date: Option<String>,

    pub notes: Option<String>,

    pub is_active: Option<bool>,
}
