use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::model::quote::{PriceType, QuoteStatus};

/// One line of an incoming quote. `unit_price` is in minor units; the line
/// total is recomputed server-side and any client-supplied value is ignored.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct QuoteItemRequest {
    /// Hex ObjectId of the catalog product this line was drawn from, if any.
    pub product_id: Option<String>,

    #[validate(length(min = 1, max = 200))]
    pub name: String,

    pub description: Option<String>,

    #[validate(range(min = 1))]
    pub quantity: u32,

    #[validate(range(min = 0))]
    pub unit_price: i64,

    pub price_type: Option<PriceType>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateQuoteRequest {
    #[validate(length(equal = 24))]
    pub agency_id: String,

    #[validate(length(equal = 24))]
    pub client_id: String,

    #[validate(length(min = 1, max = 200))]
    pub title: String,

    pub description: Option<String>,

    #[validate(length(min = 1))]
    pub valid_until: String,

    #[validate(length(min = 1), nested)]
    pub items: Vec<QuoteItemRequest>,

    pub notes: Option<String>,

    #[validate(email)]
    pub sender_email: Option<String>,

    pub email_message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateQuoteRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    pub description: Option<String>,

    #[validate(length(min = 1))]
    pub valid_until: Option<String>,

    /// Replaces the whole item list when present; totals are recomputed.
    #[validate(length(min = 1), nested)]
    pub items: Option<Vec<QuoteItemRequest>>,

    pub notes: Option<String>,

    #[validate(email)]
    pub sender_email: Option<String>,

    pub email_message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateQuoteStatusRequest {
    pub status: QuoteStatus,
}
