//! Rule catalogue implementations.
//!
//! This module contains the individual rule evaluators:
//! - Completeness of required fund fields
//! - Accuracy of numeric ranges and categorical values
//! - Mathematical and relational consistency
//! - Timeliness of fund updates
//! - Duplicate fund detection
//! - Referential integrity of performance records
//! - Cross-source variance against regulatory filings

pub mod accuracy;
pub mod completeness;
pub mod consistency;
pub mod cross_source;
pub mod duplicates;
pub mod referential_integrity;
pub mod timeliness;

// Re-export rule implementations
pub use accuracy::AccuracyCheck;
pub use completeness::CompletenessCheck;
pub use consistency::ConsistencyCheck;
pub use cross_source::CrossSourceCheck;
pub use duplicates::DuplicatesCheck;
pub use referential_integrity::ReferentialIntegrityCheck;
pub use timeliness::TimelinessCheck;

use super::traits::QualityCheck;

/// Builds the full catalogue, in its fixed evaluation order.
///
/// The order never affects which issues are found, only the sequence they
/// are logged in, which in turn fixes issue and alert numbering.
pub fn catalogue() -> Vec<Box<dyn QualityCheck>> {
    vec![
        Box::new(CompletenessCheck::new()),
        Box::new(AccuracyCheck::new()),
        Box::new(ConsistencyCheck::new()),
        Box::new(TimelinessCheck::new()),
        Box::new(DuplicatesCheck::new()),
        Box::new(ReferentialIntegrityCheck::new()),
        Box::new(CrossSourceCheck::new()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue_order_is_fixed() {
        let checks = catalogue();
        let ids: Vec<&str> = checks.iter().map(|c| c.id()).collect();
        assert_eq!(
            ids,
            vec![
                "completeness",
                "accuracy",
                "consistency",
                "timeliness",
                "duplicates",
                "referential_integrity",
                "cross_source",
            ]
        );
    }
}
