//! Validation rule configuration.
//!
//! These settings are versioned configuration data, not a rule DSL: the
//! catalogue of rules is fixed, this module only carries their thresholds,
//! ranges, and allow-lists.

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};

/// An inclusive numeric range for a monitored field.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct NumericRange {
    pub min: f64,
    pub max: f64,
}

impl NumericRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// A numeric range bound to a field name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldRange {
    pub field: String,
    pub range: NumericRange,
}

impl FieldRange {
    fn new(field: &str, min: f64, max: f64) -> Self {
        Self {
            field: field.to_string(),
            range: NumericRange::new(min, max),
        }
    }
}

/// A categorical allow-list bound to a field name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AllowedValues {
    pub field: String,
    pub values: Vec<String>,
}

impl AllowedValues {
    fn new(field: &str, values: &[&str]) -> Self {
        Self {
            field: field.to_string(),
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }

    pub fn permits(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }
}

/// Score targets recorded alongside each metric.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScoreTargets {
    pub completeness: f64,
    pub accuracy: f64,
    pub timeliness: f64,
    pub manager: f64,
    pub overall: f64,
}

/// Weighting of the composite Overall Data Quality Score.
///
/// Incorrect values are twice as damaging as missing values and 1.5x as
/// damaging as stale values. Business policy, not an emergent property.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScoreWeights {
    pub completeness: f64,
    pub accuracy: f64,
    pub timeliness: f64,
}

/// Configuration for the validation and scoring engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QualityConfig {
    /// Fund fields whose absence is a completeness defect.
    pub required_fund_fields: Vec<String>,

    /// Required fields that identify a fund; missing ones report High
    /// instead of Medium.
    pub identity_fields: Vec<String>,

    /// Numeric ranges monitored on fund master records, in report order.
    pub fund_numeric_ranges: Vec<FieldRange>,

    /// Categorical allow-lists monitored on fund master records.
    pub fund_categorical_values: Vec<AllowedValues>,

    /// Numeric ranges monitored on performance observations.
    pub performance_numeric_ranges: Vec<FieldRange>,

    /// Absolute tolerance for the TVPI = DPI + RVPI identity.
    pub tvpi_tolerance: f64,

    /// Days since last update before a fund counts as stale.
    pub timeliness_days: i64,

    /// Staleness beyond this many days escalates to High.
    pub stale_high_days: i64,

    /// Staleness beyond this many days escalates to Critical.
    pub stale_critical_days: i64,

    /// Cross-source variance (percent) above which an issue is reported.
    pub variance_threshold_pct: f64,

    /// Variance above this percent escalates to High.
    pub variance_high_pct: f64,

    /// Variance above this percent escalates to Critical.
    pub variance_critical_pct: f64,

    /// The ten fund attributes the completeness score is computed over.
    pub completeness_score_fields: Vec<String>,

    pub targets: ScoreTargets,

    pub weights: ScoreWeights,
}

impl Default for QualityConfig {
    fn default() -> Self {
        // The vintage-year sanity bound closes at the current calendar year.
        let current_year = f64::from(Utc::now().year());

        Self {
            required_fund_fields: to_strings(&[
                "fund_id",
                "fund_name",
                "manager_name",
                "fund_type",
                "vintage_year",
                "fund_size_usd_millions",
                "target_size_usd_millions",
            ]),
            identity_fields: to_strings(&["fund_id", "fund_name", "fund_type"]),
            fund_numeric_ranges: vec![
                FieldRange::new("fund_size_usd_millions", 0.0, 100_000.0),
                FieldRange::new("vintage_year", 1950.0, current_year),
                FieldRange::new("target_size_usd_millions", 0.0, 100_000.0),
            ],
            fund_categorical_values: vec![
                AllowedValues::new(
                    "fund_type",
                    &["Private Equity", "Hedge Fund", "Venture Capital"],
                ),
                AllowedValues::new(
                    "currency",
                    &["USD", "EUR", "GBP", "JPY", "CHF", "CNY", "CAD"],
                ),
            ],
            performance_numeric_ranges: vec![
                FieldRange::new("irr_net_pct", -100.0, 200.0),
                FieldRange::new("dpi", 0.0, 20.0),
                FieldRange::new("rvpi", 0.0, 20.0),
                FieldRange::new("tvpi", 0.0, 30.0),
                FieldRange::new("monthly_return_pct", -50.0, 100.0),
            ],
            tvpi_tolerance: 0.01,
            timeliness_days: 90,
            stale_high_days: 180,
            stale_critical_days: 365,
            variance_threshold_pct: 5.0,
            variance_high_pct: 15.0,
            variance_critical_pct: 30.0,
            completeness_score_fields: to_strings(&[
                "fund_id",
                "fund_name",
                "manager_name",
                "fund_type",
                "vintage_year",
                "fund_size_usd_millions",
                "administrator",
                "strategy",
                "geography",
                "sector_focus",
            ]),
            targets: ScoreTargets {
                completeness: 95.0,
                accuracy: 98.0,
                timeliness: 95.0,
                manager: 85.0,
                overall: 90.0,
            },
            weights: ScoreWeights {
                completeness: 0.30,
                accuracy: 0.50,
                timeliness: 0.20,
            },
        }
    }
}

impl QualityConfig {
    /// Rejects configurations the engine cannot score correctly with.
    pub fn validate(&self) -> crate::errors::Result<()> {
        let weight_sum = self.weights.completeness + self.weights.accuracy + self.weights.timeliness;
        if (weight_sum - 1.0).abs() > f64::EPSILON {
            return Err(crate::errors::Error::InvalidConfigValue(format!(
                "score weights must sum to 1.0, got {weight_sum}"
            )));
        }
        if self.timeliness_days <= 0 {
            return Err(crate::errors::Error::InvalidConfigValue(
                "timeliness threshold must be positive".to_string(),
            ));
        }
        if self.variance_threshold_pct <= 0.0 {
            return Err(crate::errors::Error::InvalidConfigValue(
                "variance threshold must be positive".to_string(),
            ));
        }
        for field_range in self
            .fund_numeric_ranges
            .iter()
            .chain(self.performance_numeric_ranges.iter())
        {
            if field_range.range.min > field_range.range.max {
                return Err(crate::errors::Error::InvalidConfigValue(format!(
                    "empty numeric range for field '{}'",
                    field_range.field
                )));
            }
        }
        Ok(())
    }

    /// Severity for a missing required fund field.
    pub fn completeness_severity(&self, field: &str) -> super::model::Severity {
        if self.identity_fields.iter().any(|f| f == field) {
            super::model::Severity::High
        } else {
            super::model::Severity::Medium
        }
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
