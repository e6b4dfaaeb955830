//! Accuracy rule.
//!
//! Two families of checks: numeric range validation on fund master and
//! performance fields, and categorical validation against allow-lists.
//! Null values never trigger either family.

use crate::errors::Result;
use crate::quality::model::{IssueDraft, IssueType, Severity};
use crate::quality::traits::{CheckContext, QualityCheck};
use crate::snapshot::Snapshot;

pub struct AccuracyCheck;

impl AccuracyCheck {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AccuracyCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl QualityCheck for AccuracyCheck {
    fn id(&self) -> &'static str {
        "accuracy"
    }

    fn issue_type(&self) -> IssueType {
        IssueType::Accuracy
    }

    fn run(&self, snapshot: &Snapshot, ctx: &CheckContext) -> Result<Vec<IssueDraft>> {
        let mut drafts = Vec::new();

        // Fund master numeric ranges. Negative money or years are data
        // corruption rather than optimism, hence Critical.
        for field_range in &ctx.config.fund_numeric_ranges {
            let range = field_range.range;
            for fund in &snapshot.funds {
                if let Some(value) = fund.numeric_field(&field_range.field)? {
                    if !range.contains(value) {
                        let severity = if value < 0.0 {
                            Severity::Critical
                        } else {
                            Severity::High
                        };
                        drafts.push(
                            IssueDraft::new(
                                &fund.fund_id,
                                IssueType::Accuracy,
                                severity,
                                &field_range.field,
                                format!(
                                    "{} out of valid range: {}",
                                    field_range.field, value
                                ),
                            )
                            .expected(format!("Between {} and {}", range.min, range.max))
                            .actual(value.to_string()),
                        );
                    }
                }
            }
        }

        // Categorical allow-lists.
        for allowed in &ctx.config.fund_categorical_values {
            for fund in &snapshot.funds {
                if let Some(value) = fund.text_field(&allowed.field)? {
                    if !allowed.permits(&value) {
                        drafts.push(
                            IssueDraft::new(
                                &fund.fund_id,
                                IssueType::Accuracy,
                                Severity::Medium,
                                &allowed.field,
                                format!(
                                    "Invalid {}: '{}' not in allowed values",
                                    allowed.field, value
                                ),
                            )
                            .expected(format!("One of: {:?}", allowed.values))
                            .actual(value),
                        );
                    }
                }
            }
        }

        // Performance metric ranges. An implausible IRR poisons every
        // downstream return figure, hence Critical.
        for field_range in &ctx.config.performance_numeric_ranges {
            let range = field_range.range;
            for obs in &snapshot.performance {
                if let Some(value) = obs.numeric_field(&field_range.field)? {
                    if !range.contains(value) {
                        let severity = if field_range.field.to_lowercase().contains("irr") {
                            Severity::Critical
                        } else {
                            Severity::High
                        };
                        drafts.push(
                            IssueDraft::new(
                                &obs.fund_id,
                                IssueType::Accuracy,
                                severity,
                                &field_range.field,
                                format!("Implausible {}: {}", field_range.field, value),
                            )
                            .expected(format!("Between {} and {}", range.min, range.max))
                            .actual(value.to_string()),
                        );
                    }
                }
            }
        }

        Ok(drafts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quality::config::QualityConfig;
    use crate::snapshot::{Fund, PerformanceObservation};

    fn run_check(snapshot: &Snapshot) -> Vec<IssueDraft> {
        let ctx = CheckContext::new(QualityConfig::default());
        AccuracyCheck::new().run(snapshot, &ctx).unwrap()
    }

    #[test]
    fn test_negative_fund_size_is_exactly_one_critical_issue() {
        let snapshot = Snapshot::new(
            vec![Fund {
                fund_id: "F001".to_string(),
                fund_size_usd_millions: Some(-50.0),
                ..Default::default()
            }],
            Vec::new(),
            Vec::new(),
        );

        let drafts = run_check(&snapshot);
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].issue_type, IssueType::Accuracy);
        assert_eq!(drafts[0].severity, Severity::Critical);
        assert_eq!(drafts[0].field_name, "fund_size_usd_millions");
        assert_eq!(drafts[0].actual_value.as_deref(), Some("-50"));
    }

    #[test]
    fn test_oversized_fund_is_high_not_critical() {
        let snapshot = Snapshot::new(
            vec![Fund {
                fund_id: "F001".to_string(),
                fund_size_usd_millions: Some(250_000.0),
                ..Default::default()
            }],
            Vec::new(),
            Vec::new(),
        );

        let drafts = run_check(&snapshot);
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].severity, Severity::High);
    }

    #[test]
    fn test_null_values_never_trigger_range_checks() {
        let snapshot = Snapshot::new(
            vec![Fund {
                fund_id: "F001".to_string(),
                ..Default::default()
            }],
            vec![PerformanceObservation {
                fund_id: "F001".to_string(),
                ..Default::default()
            }],
            Vec::new(),
        );

        assert!(run_check(&snapshot).is_empty());
    }

    #[test]
    fn test_vintage_year_outside_range() {
        let snapshot = Snapshot::new(
            vec![Fund {
                fund_id: "F001".to_string(),
                vintage_year: Some(1927),
                ..Default::default()
            }],
            Vec::new(),
            Vec::new(),
        );

        let drafts = run_check(&snapshot);
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].field_name, "vintage_year");
        assert_eq!(drafts[0].severity, Severity::High);
    }

    #[test]
    fn test_unknown_fund_type_is_medium() {
        let snapshot = Snapshot::new(
            vec![Fund {
                fund_id: "F001".to_string(),
                fund_type: Some("Timeshare".to_string()),
                ..Default::default()
            }],
            Vec::new(),
            Vec::new(),
        );

        let drafts = run_check(&snapshot);
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].severity, Severity::Medium);
        assert_eq!(drafts[0].field_name, "fund_type");
        assert_eq!(drafts[0].actual_value.as_deref(), Some("Timeshare"));
    }

    #[test]
    fn test_unknown_currency_is_medium() {
        let snapshot = Snapshot::new(
            vec![Fund {
                fund_id: "F001".to_string(),
                original_currency: Some("BTC".to_string()),
                ..Default::default()
            }],
            Vec::new(),
            Vec::new(),
        );

        let drafts = run_check(&snapshot);
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].field_name, "currency");
    }

    #[test]
    fn test_implausible_irr_is_critical() {
        let snapshot = Snapshot::new(
            Vec::new(),
            vec![PerformanceObservation {
                fund_id: "F001".to_string(),
                irr_net_pct: Some(450.0),
                ..Default::default()
            }],
            Vec::new(),
        );

        let drafts = run_check(&snapshot);
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].severity, Severity::Critical);
        assert_eq!(drafts[0].field_name, "irr_net_pct");
    }

    #[test]
    fn test_implausible_dpi_is_high() {
        let snapshot = Snapshot::new(
            Vec::new(),
            vec![PerformanceObservation {
                fund_id: "F001".to_string(),
                dpi: Some(35.0),
                ..Default::default()
            }],
            Vec::new(),
        );

        let drafts = run_check(&snapshot);
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].severity, Severity::High);
    }

    #[test]
    fn test_boundary_values_pass() {
        let snapshot = Snapshot::new(
            vec![Fund {
                fund_id: "F001".to_string(),
                fund_size_usd_millions: Some(0.0),
                target_size_usd_millions: Some(100_000.0),
                ..Default::default()
            }],
            vec![PerformanceObservation {
                fund_id: "F001".to_string(),
                irr_net_pct: Some(-100.0),
                tvpi: Some(30.0),
                ..Default::default()
            }],
            Vec::new(),
        );

        assert!(run_check(&snapshot).is_empty());
    }
}
