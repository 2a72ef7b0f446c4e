use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::model::common::Priority;
use crate::util::money::Money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    New,
    Contacted,
    Qualified,
    Proposal,
    Won,
    Lost,
}

impl LeadStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, LeadStatus::Won | LeadStatus::Lost)
    }

    /// Forward-only pipeline. Terminal states emit nothing; `Won` is reached
    /// either here or through lead conversion, which runs the same check.
    pub fn can_transition_to(self, next: LeadStatus) -> bool {
        use LeadStatus::*;
        matches!(
            (self, next),
            (New, Contacted)
                | (New, Qualified)
                | (New, Lost)
                | (Contacted, Qualified)
                | (Contacted, Proposal)
                | (Contacted, Lost)
                | (Qualified, Proposal)
                | (Qualified, Won)
                | (Qualified, Lost)
                | (Proposal, Won)
                | (Proposal, Lost)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LeadStatus::New => "new",
            LeadStatus::Contacted => "contacted",
            LeadStatus::Qualified => "qualified",
            LeadStatus::Proposal => "proposal",
            LeadStatus::Won => "won",
            LeadStatus::Lost => "lost",
        }
    }

    pub fn parse(value: &str) -> Option<LeadStatus> {
        match value {
            "new" => Some(LeadStatus::New),
            "contacted" => Some(LeadStatus::Contacted),
            "qualified" => Some(LeadStatus::Qualified),
            "proposal" => Some(LeadStatus::Proposal),
            "won" => Some(LeadStatus::Won),
            "lost" => Some(LeadStatus::Lost),
            _ => None,
        }
    }
}

impl std::fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured contact data captured at ingestion, either from a form or an
/// ad-platform webhook payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeadData {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<bson::Document>,
}

impl LeadData {
    /// A lead is only storable when at least one contact field is present.
    pub fn has_contact(&self) -> bool {
        [&self.name, &self.email, &self.phone]
            .into_iter()
            .any(|field| field.as_deref().is_some_and(|s| !s.trim().is_empty()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    #[serde(rename = "_id")]
    pub id: Option<ObjectId>,
    pub agency_id: ObjectId,
    /// Set by conversion; the lead row stays queryable afterwards.
    pub converted_client_id: Option<ObjectId>,
    pub platform: Option<String>,
    pub external_id: Option<String>,
    pub lead_data: LeadData,
    pub status: LeadStatus,
    pub priority: Priority,
    /// Estimated deal value.
    pub value: Option<Money>,
    pub assigned_to: Option<String>,
    pub notes: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Read-side aggregate over a lead listing, recomputed on every query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeadStats {
    pub total: u64,
    pub new: u64,
    pub contacted: u64,
    pub qualified: u64,
    pub proposal: u64,
    pub won: u64,
    pub lost: u64,
    pub total_value: Money,
}

impl LeadStats {
    pub fn record(&mut self, lead: &Lead) {
        self.total += 1;
        match lead.status {
            LeadStatus::New => self.new += 1,
            LeadStatus::Contacted => self.contacted += 1,
            LeadStatus::Qualified => self.qualified += 1,
            LeadStatus::Proposal => self.proposal += 1,
            LeadStatus::Won => self.won += 1,
            LeadStatus::Lost => self.lost += 1,
        }
        if let Some(value) = lead.value {
            self.total_value += value;
        }
    }
}
