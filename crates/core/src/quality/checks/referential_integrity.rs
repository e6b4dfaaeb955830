//! Referential integrity rule.
//!
//! Every fund id referenced by a performance observation must exist in the
//! fund master collection. Orphaned ids are reported once each, however
//! many observations carry them.

use std::collections::BTreeSet;

use crate::errors::Result;
use crate::quality::model::{IssueDraft, IssueType, Severity};
use crate::quality::traits::{CheckContext, QualityCheck};
use crate::snapshot::Snapshot;

pub struct ReferentialIntegrityCheck;

impl ReferentialIntegrityCheck {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ReferentialIntegrityCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl QualityCheck for ReferentialIntegrityCheck {
    fn id(&self) -> &'static str {
        "referential_integrity"
    }

    fn issue_type(&self) -> IssueType {
        IssueType::ReferentialIntegrity
    }

    fn run(&self, snapshot: &Snapshot, _ctx: &CheckContext) -> Result<Vec<IssueDraft>> {
        let known = snapshot.fund_ids();
        // Sorted set of distinct ids keeps report order stable.
        let referenced: BTreeSet<&str> = snapshot
            .performance
            .iter()
            .map(|obs| obs.fund_id.as_str())
            .collect();

        let drafts = referenced
            .into_iter()
            .filter(|fund_id| !known.contains(fund_id))
            .map(|fund_id| {
                IssueDraft::new(
                    fund_id,
                    IssueType::ReferentialIntegrity,
                    Severity::High,
                    "fund_id",
                    format!(
                        "Performance records exist for fund_id '{fund_id}' but fund not in \
                         master data"
                    ),
                )
                .expected("Exists in fund master")
                .actual(fund_id)
            })
            .collect();

        Ok(drafts)
    }
}
