//! Property-based integration tests for the quality engine.
//!
//! These tests verify that universal properties hold across all valid inputs,
//! using the `proptest` crate for random test case generation.

use chrono::Utc;
use proptest::prelude::*;

use fundguard_core::quality::{
    CheckContext, IssueDraft, IssueLedger, IssueType, ManagerTier, QualityCheck, QualityConfig,
    Severity,
};
use fundguard_core::quality::checks::ConsistencyCheck;
use fundguard_core::snapshot::{PerformanceObservation, Snapshot};

// =============================================================================
// Generators
// =============================================================================

/// Generates a random severity level.
fn arb_severity() -> impl Strategy<Value = Severity> {
    prop_oneof![
        Just(Severity::Low),
        Just(Severity::Medium),
        Just(Severity::High),
        Just(Severity::Critical),
    ]
}

/// Generates a random issue type.
fn arb_issue_type() -> impl Strategy<Value = IssueType> {
    prop_oneof![
        Just(IssueType::Completeness),
        Just(IssueType::Accuracy),
        Just(IssueType::Consistency),
        Just(IssueType::Timeliness),
        Just(IssueType::Duplicates),
        Just(IssueType::ReferentialIntegrity),
        Just(IssueType::CrossSourceVariance),
    ]
}

/// Generates a random issue draft with valid structure.
fn arb_draft() -> impl Strategy<Value = IssueDraft> {
    (
        arb_issue_type(),
        arb_severity(),
        "F[0-9]{3}",     // fund id
        "[a-z_]{4,24}",  // field name
        "[a-z ]{10,50}", // description
    )
        .prop_map(|(issue_type, severity, fund_id, field, description)| {
            IssueDraft::new(fund_id, issue_type, severity, field, description)
        })
}

/// Generates a vector of random drafts.
fn arb_drafts(max_count: usize) -> impl Strategy<Value = Vec<IssueDraft>> {
    proptest::collection::vec(arb_draft(), 0..=max_count)
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// The severity tally must account for every logged issue, at the
    /// severity it was logged with.
    #[test]
    fn prop_tally_is_accurate(drafts in arb_drafts(100)) {
        let mut ledger = IssueLedger::new(Utc::now());
        let mut expected = std::collections::HashMap::new();
        for draft in &drafts {
            *expected.entry(draft.severity).or_insert(0u32) += 1;
        }
        ledger.log_all(drafts.clone());

        let tally = ledger.tally();
        prop_assert_eq!(tally.total as usize, drafts.len());
        prop_assert_eq!(tally.critical, expected.get(&Severity::Critical).copied().unwrap_or(0));
        prop_assert_eq!(tally.high, expected.get(&Severity::High).copied().unwrap_or(0));
        prop_assert_eq!(tally.medium, expected.get(&Severity::Medium).copied().unwrap_or(0));
        prop_assert_eq!(tally.low, expected.get(&Severity::Low).copied().unwrap_or(0));
        prop_assert_eq!(
            tally.total,
            tally.critical + tally.high + tally.medium + tally.low
        );
    }

    /// Alerts exist exactly for Critical issues, in order, with
    /// sequential 1-based numbering.
    #[test]
    fn prop_alerts_mirror_critical_issues(drafts in arb_drafts(60)) {
        let mut ledger = IssueLedger::new(Utc::now());
        ledger.log_all(drafts);

        let criticals: Vec<_> = ledger
            .issues()
            .iter()
            .filter(|i| i.severity == Severity::Critical)
            .collect();
        prop_assert_eq!(criticals.len(), ledger.alerts().len());

        for (index, (issue, alert)) in criticals.iter().zip(ledger.alerts()).enumerate() {
            prop_assert_eq!(alert.alert_id.clone(), format!("ALERT-{:04}", index + 1));
            prop_assert_eq!(&alert.fund_id, &issue.fund_id);
            prop_assert_eq!(alert.rule_violated, issue.issue_type);
            prop_assert_eq!(&alert.description, &issue.description);
        }
    }

    /// Issue ids are a dense 1-based sequence in log order.
    #[test]
    fn prop_issue_ids_are_sequential(drafts in arb_drafts(60)) {
        let mut ledger = IssueLedger::new(Utc::now());
        ledger.log_all(drafts);

        for (index, issue) in ledger.issues().iter().enumerate() {
            prop_assert_eq!(issue.id, index as i64 + 1);
        }
    }

    /// All issues of a run share the run's detection timestamp.
    #[test]
    fn prop_detection_timestamp_is_shared(drafts in arb_drafts(40)) {
        let detected_at = Utc::now();
        let mut ledger = IssueLedger::new(detected_at);
        ledger.log_all(drafts);

        for issue in ledger.issues() {
            prop_assert_eq!(issue.detected_at, detected_at);
        }
        for alert in ledger.alerts() {
            prop_assert_eq!(alert.detected_at, detected_at);
        }
    }

    /// Severity ordering is total and Critical is the maximum.
    #[test]
    fn prop_severity_ordering_consistent(sev1 in arb_severity(), sev2 in arb_severity()) {
        if sev1 < sev2 {
            prop_assert!(sev2 > sev1);
        }
        if sev1 == sev2 {
            prop_assert!(!(sev1 < sev2));
            prop_assert!(!(sev1 > sev2));
        }
        prop_assert!(Severity::Low <= sev1);
        prop_assert!(sev1 <= Severity::Critical);
    }

    /// Every score maps to exactly one tier, and tiers never improve as
    /// the score drops.
    #[test]
    fn prop_tier_bands_are_total_and_monotonic(score in 0.0f64..=100.0, delta in 0.0f64..=50.0) {
        let tier = ManagerTier::from_score(score);
        let lower_tier = ManagerTier::from_score(score - delta);

        let rank = |t: ManagerTier| match t {
            ManagerTier::Tier1 => 1,
            ManagerTier::Tier2 => 2,
            ManagerTier::Tier3 => 3,
            ManagerTier::Tier4 => 4,
        };
        prop_assert!(rank(lower_tier) >= rank(tier));
    }

    /// A TVPI that is exactly DPI + RVPI never raises a consistency issue,
    /// while one perturbed by more than the tolerance always does.
    #[test]
    fn prop_tvpi_identity_respects_tolerance(
        dpi in 0.0f64..10.0,
        rvpi in 0.0f64..10.0,
        offset in 0.02f64..5.0,
    ) {
        let config = QualityConfig::default();
        let ctx = CheckContext::with_timestamp(config, Utc::now());
        let check = ConsistencyCheck::new();

        let consistent = PerformanceObservation {
            fund_id: "F001".to_string(),
            dpi: Some(dpi),
            rvpi: Some(rvpi),
            tvpi: Some(dpi + rvpi),
            ..Default::default()
        };
        let snapshot = Snapshot::new(Vec::new(), vec![consistent], Vec::new());
        prop_assert!(check.run(&snapshot, &ctx).unwrap().is_empty());

        let inconsistent = PerformanceObservation {
            fund_id: "F001".to_string(),
            dpi: Some(dpi),
            rvpi: Some(rvpi),
            tvpi: Some(dpi + rvpi + offset),
            ..Default::default()
        };
        let snapshot = Snapshot::new(Vec::new(), vec![inconsistent], Vec::new());
        let drafts = check.run(&snapshot, &ctx).unwrap();
        prop_assert_eq!(drafts.len(), 1);
        prop_assert_eq!(drafts[0].severity, Severity::High);
    }
}
