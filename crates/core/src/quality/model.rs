//! Quality engine domain models.
//!
//! This module contains the core data structures for the validation engine:
//! - Severity levels and issue types for quality defects
//! - Issue and alert representation
//! - Quality metric records
//! - Manager tier classification

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Severity
// =============================================================================

/// Severity levels for quality issues.
///
/// Ordered from lowest to highest: Low < Medium < High < Critical.
/// Critical issues escalate into alerts at log time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Default)]
pub enum Severity {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Returns the string representation of this severity.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
            Severity::Critical => "Critical",
        }
    }

    /// Parses a severity from its string representation.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Low" => Some(Severity::Low),
            "Medium" => Some(Severity::Medium),
            "High" => Some(Severity::High),
            "Critical" => Some(Severity::Critical),
            _ => None,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Issue Type
// =============================================================================

/// The quality dimension an issue belongs to.
///
/// Each rule in the catalogue reports under exactly one type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssueType {
    Completeness,
    Accuracy,
    Consistency,
    Timeliness,
    Duplicates,
    #[serde(rename = "Referential Integrity")]
    ReferentialIntegrity,
    #[serde(rename = "Cross-Source Variance")]
    CrossSourceVariance,
}

impl IssueType {
    /// Returns the reporting label for this issue type.
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueType::Completeness => "Completeness",
            IssueType::Accuracy => "Accuracy",
            IssueType::Consistency => "Consistency",
            IssueType::Timeliness => "Timeliness",
            IssueType::Duplicates => "Duplicates",
            IssueType::ReferentialIntegrity => "Referential Integrity",
            IssueType::CrossSourceVariance => "Cross-Source Variance",
        }
    }

    /// Parses an issue type from its reporting label.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Completeness" => Some(IssueType::Completeness),
            "Accuracy" => Some(IssueType::Accuracy),
            "Consistency" => Some(IssueType::Consistency),
            "Timeliness" => Some(IssueType::Timeliness),
            "Duplicates" => Some(IssueType::Duplicates),
            "Referential Integrity" => Some(IssueType::ReferentialIntegrity),
            "Cross-Source Variance" => Some(IssueType::CrossSourceVariance),
            _ => None,
        }
    }

    /// All issue types, in catalogue order.
    pub fn all() -> [IssueType; 7] {
        [
            IssueType::Completeness,
            IssueType::Accuracy,
            IssueType::Consistency,
            IssueType::Timeliness,
            IssueType::Duplicates,
            IssueType::ReferentialIntegrity,
            IssueType::CrossSourceVariance,
        ]
    }

    /// True for the dimensions that disqualify a fund from the accuracy score.
    pub fn affects_accuracy(&self) -> bool {
        matches!(self, IssueType::Accuracy | IssueType::Consistency)
    }
}

impl std::fmt::Display for IssueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Issue lifecycle
// =============================================================================

/// Lifecycle state of a quality issue.
///
/// The engine only ever creates `Open` issues; `Resolved` is a documented
/// terminal state reached outside the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum IssueStatus {
    #[default]
    Open,
    Resolved,
}

impl IssueStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueStatus::Open => "Open",
            IssueStatus::Resolved => "Resolved",
        }
    }
}

// =============================================================================
// Issue Draft
// =============================================================================

/// A defect reported by a rule evaluator, before it is logged.
///
/// Drafts carry everything a rule knows about a defect; the ledger adds the
/// sequence id, the shared detection timestamp, and the lifecycle state.
#[derive(Debug, Clone, PartialEq)]
pub struct IssueDraft {
    pub fund_id: String,
    pub issue_type: IssueType,
    pub severity: Severity,
    pub field_name: String,
    pub expected_value: Option<String>,
    pub actual_value: Option<String>,
    pub description: String,
}

impl IssueDraft {
    pub fn new(
        fund_id: impl Into<String>,
        issue_type: IssueType,
        severity: Severity,
        field_name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            fund_id: fund_id.into(),
            issue_type,
            severity,
            field_name: field_name.into(),
            expected_value: None,
            actual_value: None,
            description: description.into(),
        }
    }

    /// Sets the expected-value description.
    pub fn expected(mut self, value: impl Into<String>) -> Self {
        self.expected_value = Some(value.into());
        self
    }

    /// Sets the offending actual value.
    pub fn actual(mut self, value: impl Into<String>) -> Self {
        self.actual_value = Some(value.into());
        self
    }
}

// =============================================================================
// Quality Issue
// =============================================================================

/// The atomic unit of defect reporting, immutable once logged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QualityIssue {
    /// 1-based sequence number within the run.
    pub id: i64,
    pub fund_id: String,
    pub issue_type: IssueType,
    pub severity: Severity,
    pub field_name: String,
    pub expected_value: Option<String>,
    pub actual_value: Option<String>,
    pub description: String,
    pub detected_at: DateTime<Utc>,
    pub status: IssueStatus,
    pub resolution_notes: Option<String>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl QualityIssue {
    /// Materializes a draft into a logged issue.
    pub(crate) fn from_draft(draft: IssueDraft, id: i64, detected_at: DateTime<Utc>) -> Self {
        Self {
            id,
            fund_id: draft.fund_id,
            issue_type: draft.issue_type,
            severity: draft.severity,
            field_name: draft.field_name,
            expected_value: draft.expected_value,
            actual_value: draft.actual_value,
            description: draft.description,
            detected_at,
            status: IssueStatus::Open,
            resolution_notes: None,
            resolved_at: None,
        }
    }
}

// =============================================================================
// Alert
// =============================================================================

/// Acknowledgment state of an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AlertStatus {
    #[default]
    Active,
    Acknowledged,
}

impl AlertStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertStatus::Active => "Active",
            AlertStatus::Acknowledged => "Acknowledged",
        }
    }
}

/// An escalation created for every Critical issue, at log time.
///
/// Alerts are an append-only derived view; the engine never edits one
/// after creation and never creates one without its triggering issue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    /// `ALERT-%04d`, 1-based, sequential in creation order.
    pub alert_id: String,
    pub fund_id: String,
    pub rule_violated: IssueType,
    pub severity: Severity,
    pub description: String,
    pub detected_at: DateTime<Utc>,
    pub status: AlertStatus,
    pub acknowledged_by: Option<String>,
    pub acknowledged_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Metric
// =============================================================================

/// The entity granularity a metric is computed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityType {
    System,
    #[serde(rename = "Fund Type")]
    FundType,
    Manager,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::System => "System",
            EntityType::FundType => "Fund Type",
            EntityType::Manager => "Manager",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "System" => Some(EntityType::System),
            "Fund Type" => Some(EntityType::FundType),
            "Manager" => Some(EntityType::Manager),
            _ => None,
        }
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One point in the quality-metric time series.
///
/// Metrics append across runs; the `(metric_date, metric_name, entity_type,
/// entity_name)` tuple keys the series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Metric {
    pub metric_date: NaiveDate,
    pub metric_name: String,
    pub metric_value: f64,
    pub target_value: f64,
    pub entity_type: EntityType,
    pub entity_name: String,
    pub calculated_at: DateTime<Utc>,
}

// =============================================================================
// Manager Tier
// =============================================================================

/// Manager quality classification, a pure function of the quality score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ManagerTier {
    Tier1,
    Tier2,
    Tier3,
    Tier4,
}

impl ManagerTier {
    /// Maps a quality score to its tier band.
    pub fn from_score(score: f64) -> Self {
        if score >= 95.0 {
            ManagerTier::Tier1
        } else if score >= 85.0 {
            ManagerTier::Tier2
        } else if score >= 70.0 {
            ManagerTier::Tier3
        } else {
            ManagerTier::Tier4
        }
    }

    /// Returns the reporting label for this tier.
    pub fn label(&self) -> &'static str {
        match self {
            ManagerTier::Tier1 => "Tier 1 (Excellent)",
            ManagerTier::Tier2 => "Tier 2 (Good)",
            ManagerTier::Tier3 => "Tier 3 (Needs Improvement)",
            ManagerTier::Tier4 => "Tier 4 (Critical)",
        }
    }
}

impl std::fmt::Display for ManagerTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

// =============================================================================
// Tests
// =============================================================================
