//! Row types read from the record tables.
//!
//! Raw rows keep dates as the stored text; conversion into domain records
//! happens in `TryFrom`, where a malformed value is a hard error rather
//! than a silently dropped record.

use fundguard_core::snapshot::{Fund, PerformanceObservation, RegulatoryFiling};

use crate::errors::StorageError;
use crate::utils::{parse_date, parse_datetime};

pub(crate) struct FundRow {
    pub fund_id: String,
    pub fund_name: Option<String>,
    pub manager_name: Option<String>,
    pub fund_type: Option<String>,
    pub strategy: Option<String>,
    pub vintage_year: Option<i32>,
    pub inception_date: Option<String>,
    pub fund_size_usd_millions: Option<f64>,
    pub original_currency: Option<String>,
    pub original_fund_size: Option<f64>,
    pub target_size_usd_millions: Option<f64>,
    pub status: Option<String>,
    pub geography: Option<String>,
    pub sector_focus: Option<String>,
    pub administrator: Option<String>,
    pub last_updated: Option<String>,
}

impl TryFrom<FundRow> for Fund {
    type Error = StorageError;

    fn try_from(row: FundRow) -> Result<Self, Self::Error> {
        let inception_date = row
            .inception_date
            .map(|v| parse_date(&v, "funds.inception_date"))
            .transpose()?;
        let last_updated = row
            .last_updated
            .map(|v| parse_datetime(&v, "funds.last_updated"))
            .transpose()?;

        Ok(Fund {
            fund_id: row.fund_id,
            fund_name: row.fund_name,
            manager_name: row.manager_name,
            fund_type: row.fund_type,
            strategy: row.strategy,
            vintage_year: row.vintage_year,
            inception_date,
            fund_size_usd_millions: row.fund_size_usd_millions,
            original_currency: row.original_currency,
            original_fund_size: row.original_fund_size,
            target_size_usd_millions: row.target_size_usd_millions,
            status: row.status,
            geography: row.geography,
            sector_focus: row.sector_focus,
            administrator: row.administrator,
            last_updated,
        })
    }
}

pub(crate) struct PerformanceRow {
    pub fund_id: String,
    pub report_date: Option<String>,
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

impl TryFrom<PerformanceRow> for PerformanceObservation {
    type Error = StorageError;

    fn try_from(row: PerformanceRow) -> Result<Self, Self::Error> {
        let report_date = row
            .report_date
            .map(|v| parse_date(&v, "fund_performance.report_date"))
            .transpose()?;

        Ok(PerformanceObservation {
            fund_id: row.fund_id,
            report_date,
            report_quarter: row.report_quarter,
            irr_net_pct: row.irr_net_pct,
            moic: row.moic,
            dpi: row.dpi,
            rvpi: row.rvpi,
            tvpi: row.tvpi,
            capital_called_millions: row.capital_called_millions,
            distributions_millions: row.distributions_millions,
            remaining_value_millions: row.remaining_value_millions,
            nav_per_share: row.nav_per_share,
            monthly_return_pct: row.monthly_return_pct,
        })
    }
}

pub(crate) struct FilingRow {
    pub fund_id: String,
    pub filing_type: Option<String>,
    pub filing_date: Option<String>,
    pub reported_aum_millions: f64,
    pub reported_strategy: Option<String>,
    pub num_investors: Option<i64>,
    pub source: Option<String>,
}

impl TryFrom<FilingRow> for RegulatoryFiling {
    type Error = StorageError;

    fn try_from(row: FilingRow) -> Result<Self, Self::Error> {
        let filing_date = row
            .filing_date
            .map(|v| parse_date(&v, "regulatory_filings.filing_date"))
            .transpose()?;

        Ok(RegulatoryFiling {
            fund_id: row.fund_id,
            filing_type: row.filing_type,
            filing_date,
            reported_aum_millions: row.reported_aum_millions,
            reported_strategy: row.reported_strategy,
            num_investors: row.num_investors,
            source: row.source,
        })
    }
}
