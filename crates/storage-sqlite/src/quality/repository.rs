//! QualitySink implementation over SQLite.
//!
//! Issues and alerts are replaced wholesale inside a transaction; metrics
//! append to the cumulative series. Each write is recorded in the audit
//! log with its duration and outcome.

use std::time::Instant;

use async_trait::async_trait;
use rusqlite::params;

use fundguard_core::quality::{Alert, Metric, QualityIssue, QualitySink};
use fundguard_core::Result;

use crate::audit;
use crate::db::{lock, SharedConnection};
use crate::errors::StorageError;
use crate::utils::format_utc;

type StorageResult = std::result::Result<(), StorageError>;

pub struct SqliteQualitySink {
    conn: SharedConnection,
}

impl SqliteQualitySink {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    fn replace_issues_impl(&self, issues: &[QualityIssue]) -> StorageResult {
        let mut conn = lock(&self.conn);
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM quality_issues", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO quality_issues (id, fund_id, issue_type, severity, field_name, \
                 expected_value, actual_value, description, detected_at, status, \
                 resolution_notes, resolved_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            )?;
            for issue in issues {
                stmt.execute(params![
                    issue.id,
                    issue.fund_id,
                    issue.issue_type.as_str(),
                    issue.severity.as_str(),
                    issue.field_name,
                    issue.expected_value,
                    issue.actual_value,
                    issue.description,
                    format_utc(&issue.detected_at),
                    issue.status.as_str(),
                    issue.resolution_notes,
                    issue.resolved_at.map(|t| format_utc(&t)),
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn replace_alerts_impl(&self, alerts: &[Alert]) -> StorageResult {
        let mut conn = lock(&self.conn);
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM quality_alerts", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO quality_alerts (alert_id, fund_id, rule_violated, severity, \
                 description, detected_at, status, acknowledged_by, acknowledged_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;
            for alert in alerts {
                stmt.execute(params![
                    alert.alert_id,
                    alert.fund_id,
                    alert.rule_violated.as_str(),
                    alert.severity.as_str(),
                    alert.description,
                    format_utc(&alert.detected_at),
                    alert.status.as_str(),
                    alert.acknowledged_by,
                    alert.acknowledged_at.map(|t| format_utc(&t)),
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn append_metrics_impl(&self, metrics: &[Metric]) -> StorageResult {
        let mut conn = lock(&self.conn);
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO quality_metrics (metric_date, metric_name, metric_value, \
                 target_value, entity_type, entity_name, calculated_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for metric in metrics {
                stmt.execute(params![
                    metric.metric_date.to_string(),
                    metric.metric_name,
                    metric.metric_value,
                    metric.target_value,
                    metric.entity_type.as_str(),
                    metric.entity_name,
                    format_utc(&metric.calculated_at),
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

}

#[async_trait]
impl QualitySink for SqliteQualitySink {
    async fn replace_issues(&self, issues: &[QualityIssue]) -> Result<()> {
        let started = Instant::now();
        let result = self.replace_issues_impl(issues);
        let duration = started.elapsed();
        match &result {
            Ok(()) => audit::record(
                &self.conn,
                "VALIDATE",
                "quality_issues",
                issues.len(),
                duration,
                "SUCCESS",
                None,
            ),
            Err(e) => audit::record(
                &self.conn,
                "VALIDATE",
                "quality_issues",
                issues.len(),
                duration,
                "FAILURE",
                Some(&e.to_string()),
            ),
        }
        Ok(result?)
    }

    async fn replace_alerts(&self, alerts: &[Alert]) -> Result<()> {
        let started = Instant::now();
        let result = self.replace_alerts_impl(alerts);
        let duration = started.elapsed();
        match &result {
            Ok(()) => audit::record(
                &self.conn,
                "ALERT",
                "quality_alerts",
                alerts.len(),
                duration,
                "SUCCESS",
                None,
            ),
            Err(e) => audit::record(
                &self.conn,
                "ALERT",
                "quality_alerts",
                alerts.len(),
                duration,
                "FAILURE",
                Some(&e.to_string()),
            ),
        }
        Ok(result?)
    }

    async fn append_metrics(&self, metrics: &[Metric]) -> Result<()> {
        let started = Instant::now();
        let result = self.append_metrics_impl(metrics);
        let duration = started.elapsed();
        match &result {
            Ok(()) => audit::record(
                &self.conn,
                "METRICS",
                "quality_metrics",
                metrics.len(),
                duration,
                "SUCCESS",
                None,
            ),
            Err(e) => audit::record(
                &self.conn,
                "METRICS",
                "quality_metrics",
                metrics.len(),
                duration,
                "FAILURE",
                Some(&e.to_string()),
            ),
        }
        Ok(result?)
    }
}
