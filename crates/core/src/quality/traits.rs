//! Quality engine traits.
//!
//! This module defines the abstract interfaces of the engine:
//! - `QualityCheck` - a rule evaluator in the catalogue
//! - `QualitySink` - persistence for issues, alerts, and metrics
//! - `CheckContext` - configuration and clock provided to every rule

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::config::QualityConfig;
use super::model::{Alert, IssueDraft, IssueType, Metric, QualityIssue};
use crate::errors::Result;
use crate::snapshot::Snapshot;

// =============================================================================
// Check Context
// =============================================================================

/// Context provided to rule evaluators during a run.
///
/// All rules of a run share one context, so staleness arithmetic and
/// detection timestamps agree across the catalogue.
#[derive(Debug, Clone)]
pub struct CheckContext {
    /// Rule thresholds, ranges, and allow-lists.
    pub config: QualityConfig,

    /// The run's single evaluation timestamp.
    pub now: DateTime<Utc>,
}

impl CheckContext {
    /// Creates a context stamped with the current time.
    pub fn new(config: QualityConfig) -> Self {
        Self {
            config,
            now: Utc::now(),
        }
    }

    /// Creates a context with a pinned timestamp (for testing and replay).
    pub fn with_timestamp(config: QualityConfig, now: DateTime<Utc>) -> Self {
        Self { config, now }
    }
}

// =============================================================================
// Quality Check Trait
// =============================================================================

/// A rule evaluator in the catalogue.
///
/// Each rule inspects the immutable snapshot and reports zero or more
/// defects. Rules never mutate records, never see each other's output, and
/// carry no state between runs, so the service is free to evaluate them in
/// parallel.
///
/// # Implementation Notes
///
/// - Null values never trigger range or consistency checks; absence is
///   solely a completeness concern.
/// - Division-based comparisons skip on a zero or missing denominator.
/// - A rule configured against a field the snapshot schema does not carry
///   must return an error, not an empty result.
pub trait QualityCheck: Send + Sync {
    /// Returns the unique identifier for this rule.
    fn id(&self) -> &'static str;

    /// Returns the issue type this rule reports under.
    fn issue_type(&self) -> IssueType;

    /// Evaluates the rule over the snapshot.
    fn run(&self, snapshot: &Snapshot, ctx: &CheckContext) -> Result<Vec<IssueDraft>>;
}

// =============================================================================
// Quality Sink Trait
// =============================================================================

/// Persistence interface for run output.
///
/// Issues and alerts replace the previous run's set; metrics append to a
/// cumulative time series. The engine writes exactly once, after the whole
/// run has been computed.
#[async_trait]
pub trait QualitySink: Send + Sync {
    /// Replaces the stored issue set with this run's issues.
    async fn replace_issues(&self, issues: &[QualityIssue]) -> Result<()>;

    /// Replaces the stored alert set with this run's alerts.
    async fn replace_alerts(&self, alerts: &[Alert]) -> Result<()>;

    /// Appends this run's metrics to the metric history.
    async fn append_metrics(&self, metrics: &[Metric]) -> Result<()>;
}
