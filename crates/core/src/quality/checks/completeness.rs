//! Completeness rule.
//!
//! Flags required fund fields that are null. A missing administrator is
//! reported twice on purpose: once as a generic completeness defect and
//! once as an operational concern (funds without a named administrator may
//! be self-administered), two distinct business findings on one null.

use crate::errors::Result;
use crate::quality::model::{IssueDraft, IssueType, Severity};
use crate::quality::traits::{CheckContext, QualityCheck};
use crate::snapshot::Snapshot;

pub struct CompletenessCheck;

impl CompletenessCheck {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CompletenessCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl QualityCheck for CompletenessCheck {
    fn id(&self) -> &'static str {
        "completeness"
    }

    fn issue_type(&self) -> IssueType {
        IssueType::Completeness
    }

    fn run(&self, snapshot: &Snapshot, ctx: &CheckContext) -> Result<Vec<IssueDraft>> {
        let mut drafts = Vec::new();

        for field in &ctx.config.required_fund_fields {
            for fund in &snapshot.funds {
                if fund.text_field(field)?.is_none() {
                    drafts.push(
                        IssueDraft::new(
                            &fund.fund_id,
                            IssueType::Completeness,
                            ctx.config.completeness_severity(field),
                            field,
                            format!("Missing required field: {field}"),
                        )
                        .expected("Not Null"),
                    );
                }
            }
        }

        for fund in &snapshot.funds {
            if fund.administrator.is_none() {
                drafts.push(
                    IssueDraft::new(
                        &fund.fund_id,
                        IssueType::Completeness,
                        Severity::Medium,
                        "administrator",
                        "Missing administrator - potential self-administration risk",
                    )
                    .expected("Valid Administrator"),
                );
            }
        }

        Ok(drafts)
    }
}
