//! Normalized record types for one validation run.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::errors::{Error, Result};

/// A fund master record, one per `fund_id`.
///
/// Nullable source columns are `Option`s. Monetary sizes are USD millions
/// after upstream standardization; `original_currency`/`original_fund_size`
/// keep the as-reported values.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Fund {
    pub fund_id: String,
    pub fund_name: Option<String>,
    pub manager_name: Option<String>,
    pub fund_type: Option<String>,
    pub strategy: Option<String>,
    pub vintage_year: Option<i32>,
    pub inception_date: Option<NaiveDate>,
    pub fund_size_usd_millions: Option<f64>,
    pub original_currency: Option<String>,
    pub original_fund_size: Option<f64>,
    pub target_size_usd_millions: Option<f64>,
    pub status: Option<String>,
    pub geography: Option<String>,
    pub sector_focus: Option<String>,
    pub administrator: Option<String>,
    pub last_updated: Option<NaiveDateTime>,
}

impl Fund {
    /// Looks up a field by its schema name, rendered as display text.
    ///
    /// Returns `Ok(None)` when the field is present in the schema but null
    /// on this record, and an error when the name does not exist at all.
    /// A rule configured against an unknown field must fail the run rather
    /// than silently skip.
    pub fn text_field(&self, field: &str) -> Result<Option<String>> {
        let value = match field {
            "fund_id" => Some(self.fund_id.clone()),
            "fund_name" => self.fund_name.clone(),
            "manager_name" => self.manager_name.clone(),
            "fund_type" => self.fund_type.clone(),
            "strategy" => self.strategy.clone(),
            "vintage_year" => self.vintage_year.map(|y| y.to_string()),
            "inception_date" => self.inception_date.map(|d| d.to_string()),
            "fund_size_usd_millions" => self.fund_size_usd_millions.map(|v| v.to_string()),
            // The allow-list is configured against the reporting currency.
            "currency" | "original_currency" => self.original_currency.clone(),
            "original_fund_size" => self.original_fund_size.map(|v| v.to_string()),
            "target_size_usd_millions" => self.target_size_usd_millions.map(|v| v.to_string()),
            "status" => self.status.clone(),
            "geography" => self.geography.clone(),
            "sector_focus" => self.sector_focus.clone(),
            "administrator" => self.administrator.clone(),
            "last_updated" => self.last_updated.map(|t| t.to_string()),
            _ => {
                return Err(Error::UnknownField {
                    entity: "Fund",
                    field: field.to_string(),
                })
            }
        };
        Ok(value)
    }

    /// Looks up a numeric field by its schema name.
    pub fn numeric_field(&self, field: &str) -> Result<Option<f64>> {
        let value = match field {
            "fund_size_usd_millions" => self.fund_size_usd_millions,
            "vintage_year" => self.vintage_year.map(f64::from),
            "original_fund_size" => self.original_fund_size,
            "target_size_usd_millions" => self.target_size_usd_millions,
            _ => {
                return Err(Error::UnknownField {
                    entity: "Fund",
                    field: field.to_string(),
                })
            }
        };
        Ok(value)
    }
}

/// A periodic performance observation for a fund.
///
/// `fund_id` is not guaranteed to resolve to a fund master record; orphans
/// are a referential-integrity defect, not a load error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceObservation {
    pub fund_id: String,
    pub report_date: Option<NaiveDate>,
    pub report_quarter: Option<String>,
    pub irr_net_pct: Option<f64>,
    pub moic: Option<f64>,
    pub dpi: Option<f64>,
    pub rvpi: Option<f64>,
    pub tvpi: Option<f64>,
    pub capital_called_millions: Option<f64>,
    pub distributions_millions: Option<f64>,
    pub remaining_value_millions: Option<f64>,
    pub nav_per_share: Option<f64>,
    pub monthly_return_pct: Option<f64>,
}

impl PerformanceObservation {
    /// The recomputed TVPI reference value, `dpi + rvpi`.
    ///
    /// Reference only, never authoritative input. `None` unless both
    /// components are present.
    pub fn tvpi_calculated(&self) -> Option<f64> {
        match (self.dpi, self.rvpi) {
            (Some(dpi), Some(rvpi)) => Some(dpi + rvpi),
            _ => None,
        }
    }

    /// Looks up a numeric metric by its schema name.
    pub fn numeric_field(&self, field: &str) -> Result<Option<f64>> {
        let value = match field {
            "irr_net_pct" => self.irr_net_pct,
            "moic" => self.moic,
            "dpi" => self.dpi,
            "rvpi" => self.rvpi,
            "tvpi" => self.tvpi,
            "capital_called_millions" => self.capital_called_millions,
            "distributions_millions" => self.distributions_millions,
            "remaining_value_millions" => self.remaining_value_millions,
            "nav_per_share" => self.nav_per_share,
            "monthly_return_pct" => self.monthly_return_pct,
            _ => {
                return Err(Error::UnknownField {
                    entity: "PerformanceObservation",
                    field: field.to_string(),
                })
            }
        };
        Ok(value)
    }
}

/// A third-party regulatory filing, used as a second opinion on fund data.
///
/// Filings join to funds by `fund_id` but are not required to match one.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RegulatoryFiling {
    pub fund_id: String,
    pub filing_type: Option<String>,
    pub filing_date: Option<NaiveDate>,
    pub reported_aum_millions: f64,
    pub reported_strategy: Option<String>,
    pub num_investors: Option<i64>,
    pub source: Option<String>,
}

/// The immutable record set a single validation run evaluates.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub funds: Vec<Fund>,
    pub performance: Vec<PerformanceObservation>,
    pub filings: Vec<RegulatoryFiling>,
}

impl Snapshot {
    pub fn new(
        funds: Vec<Fund>,
        performance: Vec<PerformanceObservation>,
        filings: Vec<RegulatoryFiling>,
    ) -> Self {
        Self {
            funds,
            performance,
            filings,
        }
    }

    /// All fund ids present in the fund master collection.
    pub fn fund_ids(&self) -> HashSet<&str> {
        self.funds.iter().map(|f| f.fund_id.as_str()).collect()
    }
}
