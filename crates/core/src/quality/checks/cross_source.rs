//! Cross-source variance rule.
//!
//! Compares manager-reported fund sizes against the AUM in regulatory
//! filings. Joins on the first filing per fund id; funds without a filing,
//! filings without a fund, and zero filed AUM are all skipped.

use std::collections::HashMap;

use crate::errors::Result;
use crate::quality::model::{IssueDraft, IssueType, Severity};
use crate::quality::traits::{CheckContext, QualityCheck};
use crate::snapshot::{RegulatoryFiling, Snapshot};

pub struct CrossSourceCheck;

impl CrossSourceCheck {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CrossSourceCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl QualityCheck for CrossSourceCheck {
    fn id(&self) -> &'static str {
        "cross_source"
    }

    fn issue_type(&self) -> IssueType {
        IssueType::CrossSourceVariance
    }

    fn run(&self, snapshot: &Snapshot, ctx: &CheckContext) -> Result<Vec<IssueDraft>> {
        // First filing per fund wins; later filings are a second opinion we
        // do not consult.
        let mut first_filing: HashMap<&str, &RegulatoryFiling> = HashMap::new();
        for filing in &snapshot.filings {
            first_filing.entry(filing.fund_id.as_str()).or_insert(filing);
        }

        let mut drafts = Vec::new();
        for fund in &snapshot.funds {
            let Some(size) = fund.fund_size_usd_millions else {
                continue;
            };
            let Some(filing) = first_filing.get(fund.fund_id.as_str()) else {
                continue;
            };
            let aum = filing.reported_aum_millions;
            if aum == 0.0 {
                continue;
            }

            let variance_pct = ((size - aum) / aum).abs() * 100.0;
            if variance_pct <= ctx.config.variance_threshold_pct {
                continue;
            }

            let severity = if variance_pct > ctx.config.variance_critical_pct {
                Severity::Critical
            } else if variance_pct > ctx.config.variance_high_pct {
                Severity::High
            } else {
                Severity::Medium
            };

            drafts.push(
                IssueDraft::new(
                    &fund.fund_id,
                    IssueType::CrossSourceVariance,
                    severity,
                    "fund_size_usd_millions",
                    format!(
                        "Significant variance between manager-reported (${size:.2}M) and \
                         regulatory filing (${aum:.2}M): {variance_pct:.1}%"
                    ),
                )
                .expected(format!("${aum:.2}M (regulatory)"))
                .actual(format!("${size:.2}M (manager)")),
            );
        }

        Ok(drafts)
    }
}
