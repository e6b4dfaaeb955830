//! Issue and alert aggregation.
//!
//! The ledger is the single path by which a defect becomes a recorded
//! issue: it assigns sequence ids, stamps the shared detection timestamp,
//! tallies counts by severity, and escalates Critical issues into alerts
//! at the moment they are logged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::model::{Alert, AlertStatus, IssueDraft, QualityIssue, Severity};

/// Issue counts by severity for one run.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SeverityTally {
    pub total: u32,
    pub critical: u32,
    pub high: u32,
    pub medium: u32,
    pub low: u32,
}

impl SeverityTally {
    fn record(&mut self, severity: Severity) {
        self.total += 1;
        match severity {
            Severity::Critical => self.critical += 1,
            Severity::High => self.high += 1,
            Severity::Medium => self.medium += 1,
            Severity::Low => self.low += 1,
        }
    }
}

/// Accumulates the issues and alerts of one run.
///
/// Identifier assignment is serialized here: rules may evaluate in any
/// order or in parallel, but drafts are fed to the ledger in catalogue
/// order, which keeps issue ids and alert numbering reproducible across
/// runs on identical input.
#[derive(Debug)]
pub struct IssueLedger {
    detected_at: DateTime<Utc>,
    issues: Vec<QualityIssue>,
    alerts: Vec<Alert>,
    tally: SeverityTally,
}

impl IssueLedger {
    /// Creates an empty ledger stamped with the run's detection timestamp.
    pub fn new(detected_at: DateTime<Utc>) -> Self {
        Self {
            detected_at,
            issues: Vec::new(),
            alerts: Vec::new(),
            tally: SeverityTally::default(),
        }
    }

    /// Logs a defect, escalating Critical severities into an alert.
    ///
    /// Every Critical issue produces exactly one alert, synchronously; no
    /// alert ever exists without its triggering issue.
    pub fn log(&mut self, draft: IssueDraft) {
        let severity = draft.severity;
        let issue_id = self.issues.len() as i64 + 1;
        let issue = QualityIssue::from_draft(draft, issue_id, self.detected_at);

        if severity == Severity::Critical {
            self.alerts.push(Alert {
                alert_id: format!("ALERT-{:04}", self.alerts.len() + 1),
                fund_id: issue.fund_id.clone(),
                rule_violated: issue.issue_type,
                severity,
                description: issue.description.clone(),
                detected_at: self.detected_at,
                status: AlertStatus::Active,
                acknowledged_by: None,
                acknowledged_at: None,
            });
        }

        self.tally.record(severity);
        self.issues.push(issue);
    }

    /// Logs every draft of a rule's result, in order.
    pub fn log_all(&mut self, drafts: Vec<IssueDraft>) {
        for draft in drafts {
            self.log(draft);
        }
    }

    pub fn issues(&self) -> &[QualityIssue] {
        &self.issues
    }

    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    pub fn tally(&self) -> SeverityTally {
        self.tally
    }

    /// Consumes the ledger into its finalized issue and alert sets.
    pub fn into_parts(self) -> (Vec<QualityIssue>, Vec<Alert>, SeverityTally) {
        (self.issues, self.alerts, self.tally)
    }
}
