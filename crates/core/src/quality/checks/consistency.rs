//! Consistency rule.
//!
//! Mathematical and relational checks: the TVPI = DPI + RVPI identity on
//! performance observations, and fund size against target size.

use crate::errors::Result;
use crate::quality::model::{IssueDraft, IssueType, Severity};
use crate::quality::traits::{CheckContext, QualityCheck};
use crate::snapshot::Snapshot;

pub struct ConsistencyCheck;

impl ConsistencyCheck {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsistencyCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl QualityCheck for ConsistencyCheck {
    fn id(&self) -> &'static str {
        "consistency"
    }

    fn issue_type(&self) -> IssueType {
        IssueType::Consistency
    }

    fn run(&self, snapshot: &Snapshot, ctx: &CheckContext) -> Result<Vec<IssueDraft>> {
        let mut drafts = Vec::new();
        let tolerance = ctx.config.tvpi_tolerance;

        // TVPI must reconcile with its components. Only observations that
        // report all three values are eligible.
        for obs in &snapshot.performance {
            let (Some(tvpi), Some(dpi), Some(rvpi)) = (obs.tvpi, obs.dpi, obs.rvpi) else {
                continue;
            };
            let expected = dpi + rvpi;
            let variance = (tvpi - expected).abs();
            if variance > tolerance {
                drafts.push(
                    IssueDraft::new(
                        &obs.fund_id,
                        IssueType::Consistency,
                        Severity::High,
                        "tvpi",
                        format!(
                            "TVPI calculation error: Reported {tvpi:.2}, Expected {expected:.2} \
                             (DPI {dpi:.2} + RVPI {rvpi:.2})"
                        ),
                    )
                    .expected(format!("{expected:.2} (DPI + RVPI)"))
                    .actual(format!("{tvpi:.2}")),
                );
            }
        }

        // A fund cannot have raised more than it set out to raise.
        for fund in &snapshot.funds {
            let (Some(size), Some(target)) =
                (fund.fund_size_usd_millions, fund.target_size_usd_millions)
            else {
                continue;
            };
            if size > target {
                drafts.push(
                    IssueDraft::new(
                        &fund.fund_id,
                        IssueType::Consistency,
                        Severity::Medium,
                        "fund_size_usd_millions",
                        format!(
                            "Fund size (${size:.2}M) exceeds target (${target:.2}M)"
                        ),
                    )
                    .expected(format!("<= {target:.2}"))
                    .actual(format!("{size:.2}")),
                );
            }
        }

        Ok(drafts)
    }
}
