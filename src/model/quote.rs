use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::util::money::{Money, VAT_RATE_PERCENT};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStatus {
    Draft,
    Sent,
    Viewed,
    Approved,
    Lost,
}

impl QuoteStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, QuoteStatus::Approved | QuoteStatus::Lost)
    }

    pub fn can_transition_to(self, next: QuoteStatus) -> bool {
        use QuoteStatus::*;
        matches!(
            (self, next),
            (Draft, Sent)
                | (Draft, Lost)
                | (Sent, Viewed)
                | (Sent, Approved)
                | (Sent, Lost)
                | (Viewed, Approved)
                | (Viewed, Lost)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            QuoteStatus::Draft => "draft",
            QuoteStatus::Sent => "sent",
            QuoteStatus::Viewed => "viewed",
            QuoteStatus::Approved => "approved",
            QuoteStatus::Lost => "lost",
        }
    }

    pub fn parse(value: &str) -> Option<QuoteStatus> {
        match value {
            "draft" => Some(QuoteStatus::Draft),
            "sent" => Some(QuoteStatus::Sent),
            "viewed" => Some(QuoteStatus::Viewed),
            "approved" => Some(QuoteStatus::Approved),
            "lost" => Some(QuoteStatus::Lost),
            _ => None,
        }
    }
}

impl std::fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceType {
    #[default]
    Fixed,
    Hourly,
    Monthly,
}

/// A priced line on a quote. Name, description and unit price are value
/// snapshots taken at quote-creation time; `product_id` is a soft pointer
/// that may dangle once the product is deleted, and display never resolves
/// through it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteItem {
    pub product_id: Option<ObjectId>,
    pub name: String,
    pub description: Option<String>,
    pub quantity: u32,
    pub unit_price: Money,
    pub price_type: PriceType,
    pub total: Money,
}

impl QuoteItem {
    pub fn line_total(&self) -> Money {
        self.unit_price.times(self.quantity)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteTotals {
    pub subtotal: Money,
    pub vat: Money,
    pub total: Money,
}

/// Sum the lines first, then apply VAT once to the aggregate. Rounding VAT
/// per line would change the totals and is not how quotes are priced here.
pub fn compute_totals(items: &[QuoteItem]) -> QuoteTotals {
    let subtotal: Money = items.iter().map(|item| item.total).sum();
    let vat = subtotal.percent(VAT_RATE_PERCENT);
    QuoteTotals {
        subtotal,
        vat,
        total: subtotal + vat,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    #[serde(rename = "_id")]
    pub id: Option<ObjectId>,
    pub agency_id: ObjectId,
    pub client_id: ObjectId,
    pub title: String,
    pub description: Option<String>,
    pub valid_until: String,
    pub status: QuoteStatus,
    pub items: Vec<QuoteItem>,
    pub subtotal_amount: Money,
    pub vat_amount: Money,
    pub total_amount: Money,
    pub notes: Option<String>,
    pub sender_email: Option<String>,
    pub email_message: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(quantity: u32, unit_price: i64) -> QuoteItem {
        let mut item = QuoteItem {
            product_id: None,
            name: "line".to_string(),
            description: None,
            quantity,
            unit_price: Money::from_minor(unit_price),
            price_type: PriceType::Fixed,
            total: Money::ZERO,
        };
        item.total = item.line_total();
        item
    }

    #[test]
    fn totals_sum_lines_then_apply_vat_once() {
        let items = vec![item(2, 10000), item(1, 5000)];
        let totals = compute_totals(&items);
        assert_eq!(totals.subtotal.minor(), 25000);
        assert_eq!(totals.vat.minor(), 4500);
        assert_eq!(totals.total.minor(), 29500);
    }

    #[test]
    fn aggregate_vat_differs_from_per_line_rounding() {
        // 18% of 3 agorot rounds to 1 per line; three lines summed first
        // give 18% of 9 = 1.62 -> 2, not 3.
        let items = vec![item(1, 3), item(1, 3), item(1, 3)];
        let totals = compute_totals(&items);
        assert_eq!(totals.vat.minor(), 2);
        let per_line: i64 = items
            .iter()
            .map(|i| i.total.percent(VAT_RATE_PERCENT).minor())
            .sum();
        assert_eq!(per_line, 3);
    }

    #[test]
    fn empty_items_total_zero() {
        let totals = compute_totals(&[]);
        assert_eq!(totals.subtotal, Money::ZERO);
        assert_eq!(totals.vat, Money::ZERO);
        assert_eq!(totals.total, Money::ZERO);
    }

    #[test]
    fn lifecycle_moves_forward_only() {
        assert!(QuoteStatus::Draft.can_transition_to(QuoteStatus::Sent));
        assert!(QuoteStatus::Sent.can_transition_to(QuoteStatus::Viewed));
        assert!(QuoteStatus::Viewed.can_transition_to(QuoteStatus::Approved));
        assert!(!QuoteStatus::Draft.can_transition_to(QuoteStatus::Approved));
        assert!(!QuoteStatus::Approved.can_transition_to(QuoteStatus::Draft));
        assert!(!QuoteStatus::Lost.can_transition_to(QuoteStatus::Sent));
    }
}
