//! Quality service implementation.
//!
//! The QualityService owns the rule catalogue and drives one run:
//! snapshot load, rule evaluation, issue/alert aggregation, scoring, and
//! the single write to the sink.

use chrono::{DateTime, Utc};
use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

use super::checks;
use super::config::QualityConfig;
use super::errors::QualityError;
use super::ledger::{IssueLedger, SeverityTally};
use super::model::{Alert, Metric, QualityIssue};
use super::scoring::ScoreCalculator;
use super::traits::{CheckContext, QualityCheck, QualitySink};
use crate::errors::Result;
use crate::snapshot::{RecordStore, Snapshot};

/// Everything one run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunOutcome {
    pub run_id: Uuid,
    pub checked_at: DateTime<Utc>,
    pub issues: Vec<QualityIssue>,
    pub alerts: Vec<Alert>,
    pub metrics: Vec<Metric>,
    pub tally: SeverityTally,
    pub funds_analyzed: usize,
    pub funds_with_issues: usize,
    pub pass_rate_pct: f64,
}

impl RunOutcome {
    /// The system-level overall score computed for this run.
    pub fn overall_score(&self) -> Option<f64> {
        self.metrics
            .iter()
            .find(|m| m.metric_name == "Overall Data Quality Score")
            .map(|m| m.metric_value)
    }
}

/// Service for running the validation and scoring engine.
pub struct QualityService {
    config: QualityConfig,
    checks: Vec<Box<dyn QualityCheck>>,
}

impl QualityService {
    /// Creates a service with the default configuration.
    pub fn new() -> Self {
        Self::with_config(QualityConfig::default())
    }

    /// Creates a service with custom configuration.
    pub fn with_config(config: QualityConfig) -> Self {
        Self {
            config,
            checks: checks::catalogue(),
        }
    }

    pub fn config(&self) -> &QualityConfig {
        &self.config
    }

    /// Executes a full run: load, evaluate, score, persist.
    ///
    /// The snapshot is loaded once up front and the sink is written once at
    /// the end; any load or evaluation failure aborts before the first
    /// write, so the sink never sees a partially scored run.
    pub async fn run(
        &self,
        store: &dyn RecordStore,
        sink: &dyn QualitySink,
    ) -> Result<RunOutcome> {
        let funds = store.get_funds().await?;
        let performance = store.get_performance().await?;
        let filings = store.get_filings().await?;
        let snapshot = Snapshot::new(funds, performance, filings);
        info!(
            "Loaded snapshot: {} funds, {} performance observations, {} filings",
            snapshot.funds.len(),
            snapshot.performance.len(),
            snapshot.filings.len()
        );

        let outcome = self.evaluate(&snapshot, Utc::now())?;

        sink.replace_issues(&outcome.issues).await?;
        sink.replace_alerts(&outcome.alerts).await?;
        sink.append_metrics(&outcome.metrics).await?;
        info!(
            "Run {} complete: {} issues ({} critical), {} alerts, {} metrics",
            outcome.run_id,
            outcome.tally.total,
            outcome.tally.critical,
            outcome.alerts.len(),
            outcome.metrics.len()
        );

        Ok(outcome)
    }

    /// Evaluates the catalogue and scores over an in-memory snapshot.
    ///
    /// Pure apart from the generated run id: identical snapshots and
    /// timestamps produce identical issues, alerts, and metrics, including
    /// their numbering.
    pub fn evaluate(&self, snapshot: &Snapshot, now: DateTime<Utc>) -> Result<RunOutcome> {
        self.config.validate()?;
        let ctx = CheckContext::with_timestamp(self.config.clone(), now);

        // Rules are independent, so they fan out across workers; collecting
        // preserves catalogue order, which serializes id assignment below.
        let per_check: Result<Vec<_>> = self
            .checks
            .par_iter()
            .map(|check| {
                check
                    .run(snapshot, &ctx)
                    .map_err(|e| QualityError::check_failed(check.id(), e.to_string()).into())
            })
            .collect();
        let per_check = per_check?;

        let mut ledger = IssueLedger::new(ctx.now);
        for (check, drafts) in self.checks.iter().zip(per_check) {
            debug!("Rule '{}' reported {} issue(s)", check.id(), drafts.len());
            ledger.log_all(drafts);
        }

        let (issues, alerts, tally) = ledger.into_parts();

        // Scores read the completed issue set; nothing below may log more.
        let metrics = ScoreCalculator::new(snapshot, &issues, &ctx).compute()?;

        let fund_ids = snapshot.fund_ids();
        let flagged: HashSet<&str> = issues
            .iter()
            .map(|i| i.fund_id.as_str())
            .filter(|id| fund_ids.contains(id))
            .collect();
        let funds_analyzed = snapshot.funds.len();
        let funds_with_issues = flagged.len();
        let pass_rate_pct = if funds_analyzed == 0 {
            0.0
        } else {
            (funds_analyzed - funds_with_issues) as f64 / funds_analyzed as f64 * 100.0
        };

        Ok(RunOutcome {
            run_id: Uuid::new_v4(),
            checked_at: ctx.now,
            issues,
            alerts,
            metrics,
            tally,
            funds_analyzed,
            funds_with_issues,
            pass_rate_pct,
        })
    }
}

impl Default for QualityService {
    fn default() -> Self {
        Self::new()
    }
}
