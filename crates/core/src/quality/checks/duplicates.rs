//! Duplicate detection rule.
//!
//! Groups funds by (manager, fund name); every member of a group larger
//! than one is reported individually, so each duplicate record carries its
//! own issue. Funds missing either key are not groupable and are skipped.

use std::collections::BTreeMap;

use crate::errors::Result;
use crate::quality::model::{IssueDraft, IssueType, Severity};
use crate::quality::traits::{CheckContext, QualityCheck};
use crate::snapshot::{Fund, Snapshot};

pub struct DuplicatesCheck;

impl DuplicatesCheck {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DuplicatesCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl QualityCheck for DuplicatesCheck {
    fn id(&self) -> &'static str {
        "duplicates"
    }

    fn issue_type(&self) -> IssueType {
        IssueType::Duplicates
    }

    fn run(&self, snapshot: &Snapshot, _ctx: &CheckContext) -> Result<Vec<IssueDraft>> {
        // BTreeMap keeps group order stable across runs.
        let mut groups: BTreeMap<(&str, &str), Vec<&Fund>> = BTreeMap::new();
        for fund in &snapshot.funds {
            let (Some(manager), Some(name)) =
                (fund.manager_name.as_deref(), fund.fund_name.as_deref())
            else {
                continue;
            };
            groups.entry((manager, name)).or_default().push(fund);
        }

        let mut drafts = Vec::new();
        for ((manager, name), members) in groups {
            if members.len() < 2 {
                continue;
            }
            for fund in members.iter() {
                drafts.push(
                    IssueDraft::new(
                        &fund.fund_id,
                        IssueType::Duplicates,
                        Severity::High,
                        "fund_name",
                        format!(
                            "Duplicate fund name: {} funds named '{}' from {}",
                            members.len(),
                            name,
                            manager
                        ),
                    )
                    .expected("Unique within manager")
                    .actual(name),
                );
            }
        }

        Ok(drafts)
    }
}
