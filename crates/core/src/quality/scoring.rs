//! Quality score calculation.
//!
//! Rolls the finalized issue set and the snapshot up into the metric time
//! series: completeness, accuracy, and timeliness per system and fund
//! type, quality scores per manager, the weighted overall score, and the
//! issue-count metrics. Scoring runs strictly after the ledger is final,
//! because accuracy and manager scores read the completed issue set.

use std::collections::HashSet;

use chrono::NaiveDate;
use chrono::{DateTime, Utc};

use super::config::QualityConfig;
use super::model::{EntityType, Metric, QualityIssue};
use super::traits::CheckContext;
use crate::constants::{METRIC_DECIMALS, SYSTEM_ENTITY_NAME};
use crate::errors::Result;
use crate::snapshot::{Fund, Snapshot};

/// Computes the metric set for one run.
pub struct ScoreCalculator<'a> {
    snapshot: &'a Snapshot,
    issues: &'a [QualityIssue],
    config: &'a QualityConfig,
    metric_date: NaiveDate,
    calculated_at: DateTime<Utc>,
    metrics: Vec<Metric>,
}

impl<'a> ScoreCalculator<'a> {
    pub fn new(snapshot: &'a Snapshot, issues: &'a [QualityIssue], ctx: &'a CheckContext) -> Self {
        Self {
            snapshot,
            issues,
            config: &ctx.config,
            metric_date: ctx.now.date_naive(),
            calculated_at: ctx.now,
            metrics: Vec::new(),
        }
    }

    /// Runs every score family and returns the finished metric set.
    pub fn compute(mut self) -> Result<Vec<Metric>> {
        self.completeness_scores()?;
        self.accuracy_scores();
        self.timeliness_scores();
        self.manager_scores();
        self.overall_score();
        self.issue_metrics();
        Ok(self.metrics)
    }

    fn log_metric(&mut self, name: &str, value: f64, target: f64, entity: EntityType, entity_name: &str) {
        self.metrics.push(Metric {
            metric_date: self.metric_date,
            metric_name: name.to_string(),
            metric_value: round2(value),
            target_value: round2(target),
            entity_type: entity,
            entity_name: entity_name.to_string(),
            calculated_at: self.calculated_at,
        });
    }

    /// Fund types in first-appearance order, for reproducible output.
    fn fund_types(&self) -> Vec<&'a str> {
        let mut seen = HashSet::new();
        let mut types = Vec::new();
        for fund in &self.snapshot.funds {
            if let Some(fund_type) = fund.fund_type.as_deref() {
                if seen.insert(fund_type) {
                    types.push(fund_type);
                }
            }
        }
        types
    }

    fn funds_of_type(&self, fund_type: &str) -> Vec<&'a Fund> {
        self.snapshot
            .funds
            .iter()
            .filter(|f| f.fund_type.as_deref() == Some(fund_type))
            .collect()
    }

    fn completeness_scores(&mut self) -> Result<()> {
        let all: Vec<&Fund> = self.snapshot.funds.iter().collect();
        let system = self.completeness_of(&all)?;
        self.log_metric(
            "Completeness Score",
            system,
            self.config.targets.completeness,
            EntityType::System,
            SYSTEM_ENTITY_NAME,
        );

        for fund_type in self.fund_types() {
            let funds = self.funds_of_type(fund_type);
            let score = self.completeness_of(&funds)?;
            self.log_metric(
                "Completeness Score",
                score,
                self.config.targets.completeness,
                EntityType::FundType,
                fund_type,
            );
        }
        Ok(())
    }

    /// Populated cells over total monitored cells, as a percentage.
    fn completeness_of(&self, funds: &[&Fund]) -> Result<f64> {
        let fields = &self.config.completeness_score_fields;
        let total_cells = funds.len() * fields.len();
        if total_cells == 0 {
            return Ok(0.0);
        }
        let mut populated = 0usize;
        for fund in funds {
            for field in fields {
                if fund.text_field(field)?.is_some() {
                    populated += 1;
                }
            }
        }
        Ok(populated as f64 / total_cells as f64 * 100.0)
    }

    fn accuracy_scores(&mut self) {
        // Set semantics on fund_id: a fund with five accuracy defects is
        // still one inaccurate fund. Ids that only appear on performance
        // records still count at the system level.
        let flagged: HashSet<&str> = self
            .issues
            .iter()
            .filter(|i| i.issue_type.affects_accuracy())
            .map(|i| i.fund_id.as_str())
            .collect();

        let total = self.snapshot.funds.len();
        let system = if total == 0 {
            100.0
        } else {
            (total.saturating_sub(flagged.len())) as f64 / total as f64 * 100.0
        };
        self.log_metric(
            "Accuracy Score",
            system,
            self.config.targets.accuracy,
            EntityType::System,
            SYSTEM_ENTITY_NAME,
        );

        for fund_type in self.fund_types() {
            let funds = self.funds_of_type(fund_type);
            let type_total = funds.len();
            let type_flagged = funds
                .iter()
                .filter(|f| flagged.contains(f.fund_id.as_str()))
                .count();
            let score = if type_total == 0 {
                100.0
            } else {
                (type_total - type_flagged) as f64 / type_total as f64 * 100.0
            };
            self.log_metric(
                "Accuracy Score",
                score,
                self.config.targets.accuracy,
                EntityType::FundType,
                fund_type,
            );
        }
    }

    fn timeliness_scores(&mut self) {
        let threshold = self.config.timeliness_days;
        let now = self.calculated_at.naive_utc();
        // A fund with no last-updated timestamp cannot be shown timely.
        let is_timely = |fund: &Fund| {
            fund.last_updated
                .map(|updated| (now - updated).num_days() <= threshold)
                .unwrap_or(false)
        };

        let total = self.snapshot.funds.len();
        let system = if total == 0 {
            100.0
        } else {
            self.snapshot.funds.iter().filter(|f| is_timely(f)).count() as f64 / total as f64
                * 100.0
        };
        self.log_metric(
            "Timeliness Score",
            system,
            self.config.targets.timeliness,
            EntityType::System,
            SYSTEM_ENTITY_NAME,
        );

        for fund_type in self.fund_types() {
            let funds = self.funds_of_type(fund_type);
            let score = if funds.is_empty() {
                100.0
            } else {
                funds.iter().filter(|f| is_timely(f)).count() as f64 / funds.len() as f64 * 100.0
            };
            self.log_metric(
                "Timeliness Score",
                score,
                self.config.targets.timeliness,
                EntityType::FundType,
                fund_type,
            );
        }
    }

    fn manager_scores(&mut self) {
        let flagged: HashSet<&str> = self.issues.iter().map(|i| i.fund_id.as_str()).collect();

        let mut seen = HashSet::new();
        let mut managers = Vec::new();
        for fund in &self.snapshot.funds {
            if let Some(manager) = fund.manager_name.as_deref() {
                if seen.insert(manager) {
                    managers.push(manager);
                }
            }
        }

        for manager in managers {
            let funds: Vec<&Fund> = self
                .snapshot
                .funds
                .iter()
                .filter(|f| f.manager_name.as_deref() == Some(manager))
                .collect();
            let total = funds.len();
            let with_issues = funds
                .iter()
                .filter(|f| flagged.contains(f.fund_id.as_str()))
                .count();
            let score = if total == 0 {
                100.0
            } else {
                (total - with_issues) as f64 / total as f64 * 100.0
            };
            self.log_metric(
                "Manager Quality Score",
                score,
                self.config.targets.manager,
                EntityType::Manager,
                manager,
            );
        }
    }

    fn overall_score(&mut self) {
        let completeness = self.system_metric("Completeness Score");
        let accuracy = self.system_metric("Accuracy Score");
        let timeliness = self.system_metric("Timeliness Score");

        let weights = self.config.weights;
        let overall = completeness * weights.completeness
            + accuracy * weights.accuracy
            + timeliness * weights.timeliness;

        self.log_metric(
            "Overall Data Quality Score",
            overall,
            self.config.targets.overall,
            EntityType::System,
            SYSTEM_ENTITY_NAME,
        );
    }

    fn system_metric(&self, name: &str) -> f64 {
        self.metrics
            .iter()
            .find(|m| m.metric_name == name && m.entity_type == EntityType::System)
            .map(|m| m.metric_value)
            .unwrap_or(100.0)
    }

    fn issue_metrics(&mut self) {
        if self.issues.is_empty() {
            return;
        }

        self.log_metric(
            "Total Issues",
            self.issues.len() as f64,
            0.0,
            EntityType::System,
            SYSTEM_ENTITY_NAME,
        );

        for severity in [
            super::model::Severity::Critical,
            super::model::Severity::High,
            super::model::Severity::Medium,
            super::model::Severity::Low,
        ] {
            let count = self.issues.iter().filter(|i| i.severity == severity).count();
            self.log_metric(
                &format!("{} Issues", severity.as_str()),
                count as f64,
                0.0,
                EntityType::System,
                SYSTEM_ENTITY_NAME,
            );
        }

        for issue_type in super::model::IssueType::all() {
            let count = self
                .issues
                .iter()
                .filter(|i| i.issue_type == issue_type)
                .count();
            if count > 0 {
                self.log_metric(
                    &format!("Issues - {}", issue_type.as_str()),
                    count as f64,
                    0.0,
                    EntityType::System,
                    SYSTEM_ENTITY_NAME,
                );
            }
        }
    }
}

fn round2(value: f64) -> f64 {
    let scale = 10f64.powi(METRIC_DECIMALS);
    (value * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quality::model::{IssueDraft, IssueType, ManagerTier, QualityIssue, Severity};

    fn issue(fund_id: &str, issue_type: IssueType) -> QualityIssue {
        QualityIssue::from_draft(
            IssueDraft::new(fund_id, issue_type, Severity::High, "field", "desc"),
            1,
            Utc::now(),
        )
    }

    fn fully_populated_fund(fund_id: &str, manager: &str, fund_type: &str) -> Fund {
        Fund {
            fund_id: fund_id.to_string(),
            fund_name: Some(format!("{fund_id} Fund")),
            manager_name: Some(manager.to_string()),
            fund_type: Some(fund_type.to_string()),
            strategy: Some("Buyout".to_string()),
            vintage_year: Some(2020),
            fund_size_usd_millions: Some(100.0),
            administrator: Some("Citco".to_string()),
            geography: Some("North America".to_string()),
            sector_focus: Some("Technology".to_string()),
            last_updated: Some(Utc::now().naive_utc()),
            ..Default::default()
        }
    }

    fn metric_value<'m>(metrics: &'m [Metric], name: &str, entity: EntityType) -> &'m Metric {
        metrics
            .iter()
            .find(|m| m.metric_name == name && m.entity_type == entity)
            .unwrap()
    }

    fn compute(snapshot: &Snapshot, issues: &[QualityIssue]) -> Vec<Metric> {
        let ctx = CheckContext::new(QualityConfig::default());
        ScoreCalculator::new(snapshot, issues, &ctx).compute().unwrap()
    }

    #[test]
    fn test_perfect_snapshot_scores_100_overall() {
        let funds = vec![
            fully_populated_fund("F001", "Alpha Capital", "Private Equity"),
            fully_populated_fund("F002", "Alpha Capital", "Hedge Fund"),
        ];
        let snapshot = Snapshot::new(funds, Vec::new(), Vec::new());
        let metrics = compute(&snapshot, &[]);

        for name in ["Completeness Score", "Accuracy Score", "Timeliness Score"] {
            assert_eq!(
                metric_value(&metrics, name, EntityType::System).metric_value,
                100.0
            );
        }
        assert_eq!(
            metric_value(&metrics, "Overall Data Quality Score", EntityType::System).metric_value,
            100.0
        );
    }

    #[test]
    fn test_completeness_counts_populated_cells() {
        let mut fund = fully_populated_fund("F001", "Alpha Capital", "Private Equity");
        fund.administrator = None;
        let snapshot = Snapshot::new(vec![fund], Vec::new(), Vec::new());
        let metrics = compute(&snapshot, &[]);

        // 9 of 10 monitored cells populated.
        assert_eq!(
            metric_value(&metrics, "Completeness Score", EntityType::System).metric_value,
            90.0
        );
    }

    #[test]
    fn test_accuracy_uses_set_semantics_on_fund_id() {
        let funds = vec![
            fully_populated_fund("F001", "Alpha Capital", "Private Equity"),
            fully_populated_fund("F002", "Alpha Capital", "Private Equity"),
            fully_populated_fund("F003", "Alpha Capital", "Private Equity"),
            fully_populated_fund("F004", "Alpha Capital", "Private Equity"),
        ];
        let snapshot = Snapshot::new(funds, Vec::new(), Vec::new());
        let issues = vec![
            issue("F001", IssueType::Accuracy),
            issue("F001", IssueType::Consistency),
            issue("F001", IssueType::Accuracy),
        ];
        let metrics = compute(&snapshot, &issues);

        // One fund flagged out of four.
        assert_eq!(
            metric_value(&metrics, "Accuracy Score", EntityType::System).metric_value,
            75.0
        );
    }

    #[test]
    fn test_non_accuracy_issues_do_not_hit_accuracy_score() {
        let funds = vec![fully_populated_fund("F001", "Alpha Capital", "Private Equity")];
        let snapshot = Snapshot::new(funds, Vec::new(), Vec::new());
        let issues = vec![
            issue("F001", IssueType::Completeness),
            issue("F001", IssueType::Timeliness),
        ];
        let metrics = compute(&snapshot, &issues);
        assert_eq!(
            metric_value(&metrics, "Accuracy Score", EntityType::System).metric_value,
            100.0
        );
    }

    #[test]
    fn test_manager_score_and_tier() {
        let mut funds = Vec::new();
        for i in 0..10 {
            funds.push(fully_populated_fund(
                &format!("F{i:03}"),
                "Alpha Capital",
                "Private Equity",
            ));
        }
        let snapshot = Snapshot::new(funds, Vec::new(), Vec::new());
        // Two funds flagged, multiple issues on one of them.
        let issues = vec![
            issue("F000", IssueType::Completeness),
            issue("F000", IssueType::Accuracy),
            issue("F001", IssueType::Timeliness),
        ];
        let metrics = compute(&snapshot, &issues);

        let score = metric_value(&metrics, "Manager Quality Score", EntityType::Manager);
        assert_eq!(score.entity_name, "Alpha Capital");
        assert_eq!(score.metric_value, 80.0);
        assert_eq!(ManagerTier::from_score(score.metric_value), ManagerTier::Tier3);
    }

    #[test]
    fn test_overall_weighting() {
        // Construct a snapshot with known component scores and verify the
        // 0.30/0.50/0.20 blend.
        let mut stale = fully_populated_fund("F001", "Alpha Capital", "Private Equity");
        stale.last_updated = Some(Utc::now().naive_utc() - chrono::Duration::days(200));
        let fresh = fully_populated_fund("F002", "Alpha Capital", "Private Equity");
        let snapshot = Snapshot::new(vec![stale, fresh], Vec::new(), Vec::new());
        let issues = vec![issue("F001", IssueType::Accuracy)];
        let metrics = compute(&snapshot, &issues);

        // Completeness 100, accuracy 50, timeliness 50:
        // 0.30 * 100 + 0.50 * 50 + 0.20 * 50, rounded to two decimals.
        let overall =
            metric_value(&metrics, "Overall Data Quality Score", EntityType::System).metric_value;
        assert_eq!(overall, 65.0);
    }

    #[test]
    fn test_fund_type_breakdowns_are_emitted() {
        let funds = vec![
            fully_populated_fund("F001", "Alpha Capital", "Private Equity"),
            fully_populated_fund("F002", "Beta Partners", "Hedge Fund"),
        ];
        let snapshot = Snapshot::new(funds, Vec::new(), Vec::new());
        let metrics = compute(&snapshot, &[issue("F002", IssueType::Accuracy)]);

        let pe = metrics
            .iter()
            .find(|m| {
                m.metric_name == "Accuracy Score"
                    && m.entity_type == EntityType::FundType
                    && m.entity_name == "Private Equity"
            })
            .unwrap();
        assert_eq!(pe.metric_value, 100.0);

        let hf = metrics
            .iter()
            .find(|m| {
                m.metric_name == "Accuracy Score"
                    && m.entity_type == EntityType::FundType
                    && m.entity_name == "Hedge Fund"
            })
            .unwrap();
        assert_eq!(hf.metric_value, 0.0);
    }

    #[test]
    fn test_empty_snapshot_edge_scores() {
        let snapshot = Snapshot::default();
        let metrics = compute(&snapshot, &[]);

        assert_eq!(
            metric_value(&metrics, "Completeness Score", EntityType::System).metric_value,
            0.0
        );
        assert_eq!(
            metric_value(&metrics, "Accuracy Score", EntityType::System).metric_value,
            100.0
        );
        assert_eq!(
            metric_value(&metrics, "Timeliness Score", EntityType::System).metric_value,
            100.0
        );
    }

    #[test]
    fn test_issue_metrics_only_when_issues_exist() {
        let snapshot = Snapshot::new(
            vec![fully_populated_fund("F001", "Alpha Capital", "Private Equity")],
            Vec::new(),
            Vec::new(),
        );

        let clean = compute(&snapshot, &[]);
        assert!(!clean.iter().any(|m| m.metric_name == "Total Issues"));

        let issues = vec![
            issue("F001", IssueType::Accuracy),
            issue("F001", IssueType::Duplicates),
        ];
        let metrics = compute(&snapshot, &issues);
        assert_eq!(
            metric_value(&metrics, "Total Issues", EntityType::System).metric_value,
            2.0
        );
        assert_eq!(
            metric_value(&metrics, "High Issues", EntityType::System).metric_value,
            2.0
        );
        assert_eq!(
            metric_value(&metrics, "Issues - Duplicates", EntityType::System).metric_value,
            1.0
        );
        assert!(!metrics
            .iter()
            .any(|m| m.metric_name == "Issues - Timeliness"));
    }

    #[test]
    fn test_metric_values_round_to_two_decimals() {
        let funds = vec![
            fully_populated_fund("F001", "Alpha Capital", "Private Equity"),
            fully_populated_fund("F002", "Alpha Capital", "Private Equity"),
            fully_populated_fund("F003", "Alpha Capital", "Private Equity"),
        ];
        let snapshot = Snapshot::new(funds, Vec::new(), Vec::new());
        let metrics = compute(&snapshot, &[issue("F001", IssueType::Accuracy)]);

        // 2/3 = 66.666... rounds to 66.67.
        assert_eq!(
            metric_value(&metrics, "Accuracy Score", EntityType::System).metric_value,
            66.67
        );
    }
}
