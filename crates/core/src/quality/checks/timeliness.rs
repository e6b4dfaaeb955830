//! Timeliness rule.
//!
//! Flags funds whose master record has not been updated within the
//! configured window, escalating severity with age. Funds without a
//! last-updated timestamp are skipped here; the gap itself is a
//! completeness concern.

use crate::errors::Result;
use crate::quality::model::{IssueDraft, IssueType, Severity};
use crate::quality::traits::{CheckContext, QualityCheck};
use crate::snapshot::Snapshot;

pub struct TimelinessCheck;

impl TimelinessCheck {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TimelinessCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl QualityCheck for TimelinessCheck {
    fn id(&self) -> &'static str {
        "timeliness"
    }

    fn issue_type(&self) -> IssueType {
        IssueType::Timeliness
    }

    fn run(&self, snapshot: &Snapshot, ctx: &CheckContext) -> Result<Vec<IssueDraft>> {
        let mut drafts = Vec::new();
        let now = ctx.now.naive_utc();
        let threshold = ctx.config.timeliness_days;

        for fund in &snapshot.funds {
            let Some(last_updated) = fund.last_updated else {
                continue;
            };
            let days_old = (now - last_updated).num_days();
            if days_old <= threshold {
                continue;
            }

            let severity = if days_old > ctx.config.stale_critical_days {
                Severity::Critical
            } else if days_old > ctx.config.stale_high_days {
                Severity::High
            } else {
                Severity::Medium
            };

            drafts.push(
                IssueDraft::new(
                    &fund.fund_id,
                    IssueType::Timeliness,
                    severity,
                    "last_updated",
                    format!("Stale data: Last updated {days_old} days ago"),
                )
                .expected(format!("Within {threshold} days"))
                .actual(last_updated.format("%Y-%m-%d").to_string()),
            );
        }

        Ok(drafts)
    }
}
