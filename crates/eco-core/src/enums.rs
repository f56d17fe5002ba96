//! Fixed enumerations for statuses, kinds, roles, and audit records.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`,
//! matching the TEXT values stored in the database. `FromStr` accepts exactly
//! those values and rejects anything else with `CoreError::Validation`; status
//! update actions rely on this to refuse values outside the fixed set.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

fn parse_variant<T: Copy>(
    all: &[T],
    value: &str,
    as_str: impl Fn(T) -> &'static str,
    label: &str,
) -> Result<T, CoreError> {
    all.iter()
        .copied()
        .find(|variant| as_str(*variant) == value)
        .ok_or_else(|| {
            let allowed: Vec<&str> = all.iter().map(|v| as_str(*v)).collect();
            CoreError::Validation(format!(
                "invalid {label} '{value}' (expected one of: {})",
                allowed.join(", ")
            ))
        })
}

// ---------------------------------------------------------------------------
// OpportunityStatus
// ---------------------------------------------------------------------------

/// Lifecycle status of a funding opportunity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum OpportunityStatus {
    Draft,
    Open,
    Closed,
    Awarded,
    Cancelled,
}

impl OpportunityStatus {
    pub const ALL: &'static [Self] = &[
        Self::Draft,
        Self::Open,
        Self::Closed,
        Self::Awarded,
        Self::Cancelled,
    ];

    /// Return the string representation used in SQL storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Awarded => "awarded",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether applicants can still act on the opportunity.
    #[must_use]
    pub const fn is_accepting(self) -> bool {
        matches!(self, Self::Open)
    }
}

impl fmt::Display for OpportunityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OpportunityStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant(Self::ALL, s, Self::as_str, "opportunity status")
    }
}

// ---------------------------------------------------------------------------
// DecisionStatus
// ---------------------------------------------------------------------------

/// Status of a recorded decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DecisionStatus {
    Proposed,
    UnderReview,
    Approved,
    Rejected,
    Deferred,
}

impl DecisionStatus {
    pub const ALL: &'static [Self] = &[
        Self::Proposed,
        Self::UnderReview,
        Self::Approved,
        Self::Rejected,
        Self::Deferred,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Proposed => "proposed",
            Self::UnderReview => "under_review",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Deferred => "deferred",
        }
    }

    /// A decision is settled once approved or rejected.
    #[must_use]
    pub const fn is_settled(self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

impl fmt::Display for DecisionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DecisionStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant(Self::ALL, s, Self::as_str, "decision status")
    }
}

// ---------------------------------------------------------------------------
// SubmissionStatus
// ---------------------------------------------------------------------------

/// Review status of a public submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Pending,
    Approved,
    Rejected,
}

impl SubmissionStatus {
    pub const ALL: &'static [Self] = &[Self::Pending, Self::Approved, Self::Rejected];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubmissionStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant(Self::ALL, s, Self::as_str, "submission status")
    }
}

// ---------------------------------------------------------------------------
// SubmissionKind
// ---------------------------------------------------------------------------

/// What a submission proposes to add to the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionKind {
    Organization,
    Practitioner,
    Opportunity,
    Story,
}

impl SubmissionKind {
    pub const ALL: &'static [Self] = &[
        Self::Organization,
        Self::Practitioner,
        Self::Opportunity,
        Self::Story,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Organization => "organization",
            Self::Practitioner => "practitioner",
            Self::Opportunity => "opportunity",
            Self::Story => "story",
        }
    }
}

impl fmt::Display for SubmissionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubmissionKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant(Self::ALL, s, Self::as_str, "submission kind")
    }
}

// ---------------------------------------------------------------------------
// NarrativeStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum NarrativeStatus {
    Draft,
    Published,
}

impl NarrativeStatus {
    pub const ALL: &'static [Self] = &[Self::Draft, Self::Published];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
        }
    }
}

impl fmt::Display for NarrativeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NarrativeStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant(Self::ALL, s, Self::as_str, "narrative status")
    }
}

// ---------------------------------------------------------------------------
// OutputKind
// ---------------------------------------------------------------------------

/// Form of a produced output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum OutputKind {
    Report,
    Article,
    Video,
    Podcast,
    Event,
    Other,
}

impl OutputKind {
    pub const ALL: &'static [Self] = &[
        Self::Report,
        Self::Article,
        Self::Video,
        Self::Podcast,
        Self::Event,
        Self::Other,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Report => "report",
            Self::Article => "article",
            Self::Video => "video",
            Self::Podcast => "podcast",
            Self::Event => "event",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant(Self::ALL, s, Self::as_str, "output kind")
    }
}

// ---------------------------------------------------------------------------
// ProfileRole
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProfileRole {
    Member,
    Staff,
    Admin,
}

impl ProfileRole {
    pub const ALL: &'static [Self] = &[Self::Member, Self::Staff, Self::Admin];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Staff => "staff",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for ProfileRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProfileRole {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant(Self::ALL, s, Self::as_str, "profile role")
    }
}

// ---------------------------------------------------------------------------
// EngagementKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EngagementKind {
    Interest,
}

impl EngagementKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Interest => "interest",
        }
    }
}

impl fmt::Display for EngagementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EntityType
// ---------------------------------------------------------------------------

/// Entity types recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Organization,
    Practitioner,
    Opportunity,
    Investment,
    Decision,
    Narrative,
    Output,
    Engagement,
    Profile,
    Submission,
}

impl EntityType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Organization => "organization",
            Self::Practitioner => "practitioner",
            Self::Opportunity => "opportunity",
            Self::Investment => "investment",
            Self::Decision => "decision",
            Self::Narrative => "narrative",
            Self::Output => "output",
            Self::Engagement => "engagement",
            Self::Profile => "profile",
            Self::Submission => "submission",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AuditAction
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Created,
    Updated,
    StatusChanged,
    Published,
    Withdrawn,
}

impl AuditAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::StatusChanged => "status_changed",
            Self::Published => "published",
            Self::Withdrawn => "withdrawn",
        }
    }

    /// Past-tense verb for activity feeds.
    #[must_use]
    pub const fn verb(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::StatusChanged => "changed the status of",
            Self::Published => "published",
            Self::Withdrawn => "withdrew",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
