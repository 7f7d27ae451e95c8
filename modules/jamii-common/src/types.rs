use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{JamiiError, Result};

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportCategory {
    Security,
    Environment,
    Health,
    Other,
}

impl std::fmt::Display for ReportCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportCategory::Security => write!(f, "security"),
            ReportCategory::Environment => write!(f, "environment"),
            ReportCategory::Health => write!(f, "health"),
            ReportCategory::Other => write!(f, "other"),
        }
    }
}

impl ReportCategory {
    /// Parse the wire value. Unknown categories are rejected, not coerced.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "security" => Some(Self::Security),
            "environment" => Some(Self::Environment),
            "health" => Some(Self::Health),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

/// Report lifecycle states. The wire vocabulary is snake_case
/// (`in_progress`, `awaiting_verification`) and must be preserved exactly —
/// the dashboard maps these to its own display variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Pending,
    Assigned,
    InProgress,
    AwaitingVerification,
    Resolved,
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportStatus::Pending => write!(f, "pending"),
            ReportStatus::Assigned => write!(f, "assigned"),
            ReportStatus::InProgress => write!(f, "in_progress"),
            ReportStatus::AwaitingVerification => write!(f, "awaiting_verification"),
            ReportStatus::Resolved => write!(f, "resolved"),
        }
    }
}

impl ReportStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "assigned" => Some(Self::Assigned),
            "in_progress" => Some(Self::InProgress),
            "awaiting_verification" => Some(Self::AwaitingVerification),
            "resolved" => Some(Self::Resolved),
            _ => None,
        }
    }
}

/// Account standing of a resident. Gates report creation and voting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    Pending,
    Verified,
    Suspended,
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserStatus::Pending => write!(f, "pending"),
            UserStatus::Verified => write!(f, "verified"),
            UserStatus::Suspended => write!(f, "suspended"),
        }
    }
}

impl UserStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "verified" => Some(Self::Verified),
            "suspended" => Some(Self::Suspended),
            _ => None,
        }
    }
}

// --- Report ---

/// A resident-submitted issue report, joined with the reporter's display name.
///
/// `vote_count` is denormalized; the authoritative source is the vote ledger
/// cardinality for this report, and the two are kept in lockstep by the ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub id: i64,
    pub user_id: i64,
    pub reporter_name: String,
    pub title: String,
    pub description: String,
    pub category: ReportCategory,
    pub ward: String,
    pub location_details: Option<String>,
    pub image_path: Option<String>,
    pub status: ReportStatus,
    pub is_urgent: bool,
    pub assigned_department: Option<String>,
    pub proof_image: Option<String>,
    pub admin_notes: Option<String>,
    pub vote_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create payload for a report, as parsed from the request. Fields arrive as
/// raw strings; `validate` enforces presence and the category vocabulary
/// before anything touches the store.
#[derive(Debug, Clone, Default)]
pub struct NewReport {
    pub user_id: i64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub ward: String,
    pub location_details: Option<String>,
    pub image_path: Option<String>,
}

impl NewReport {
    /// Check required fields and resolve the category. Returns the parsed
    /// category so callers never re-parse the raw string.
    pub fn validate(&self) -> Result<ReportCategory> {
        if self.user_id <= 0
            || self.title.trim().is_empty()
            || self.description.trim().is_empty()
            || self.category.trim().is_empty()
            || self.ward.trim().is_empty()
        {
            return Err(JamiiError::validation("incomplete report data"));
        }
        ReportCategory::parse(self.category.trim())
            .ok_or_else(|| JamiiError::validation(format!("unrecognized category: {}", self.category)))
    }
}

// --- Vote ---

/// One ledger entry. Identity is the (`user_id`, `report_id`) pair; entries
/// are written once and never mutated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vote {
    pub user_id: i64,
    pub report_id: i64,
    pub created_at: DateTime<Utc>,
}
