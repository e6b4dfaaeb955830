//! Critical-alerts extract.
//!
//! Alerts are additionally exported as a flat tabular file so operations
//! staff can act on them without querying the database.

use std::io::Write;

use csv::Writer;

use super::model::Alert;
use crate::errors::{Error, Result};

/// Writes one row per alert, full field set, header included.
pub fn write_alerts_csv<W: Write>(alerts: &[Alert], writer: W) -> Result<()> {
    let mut csv_writer = Writer::from_writer(writer);
    csv_writer.write_record([
        "alert_id",
        "fund_id",
        "rule_violated",
        "severity",
        "description",
        "detected_at",
        "status",
        "acknowledged_by",
        "acknowledged_at",
    ])?;

    for alert in alerts {
        let detected_at = alert.detected_at.to_rfc3339();
        let acknowledged_at = alert
            .acknowledged_at
            .map(|t| t.to_rfc3339())
            .unwrap_or_default();
        csv_writer.write_record([
            alert.alert_id.as_str(),
            alert.fund_id.as_str(),
            alert.rule_violated.as_str(),
            alert.severity.as_str(),
            alert.description.as_str(),
            detected_at.as_str(),
            alert.status.as_str(),
            alert.acknowledged_by.as_deref().unwrap_or(""),
            acknowledged_at.as_str(),
        ])?;
    }

    csv_writer
        .flush()
        .map_err(|e| Error::Export(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quality::model::{AlertStatus, IssueType, Severity};
    use chrono::Utc;

    fn alert(alert_id: &str, fund_id: &str) -> Alert {
        Alert {
            alert_id: alert_id.to_string(),
            fund_id: fund_id.to_string(),
            rule_violated: IssueType::CrossSourceVariance,
            severity: Severity::Critical,
            description: "variance 42.0%".to_string(),
            detected_at: Utc::now(),
            status: AlertStatus::Active,
            acknowledged_by: None,
            acknowledged_at: None,
        }
    }

    #[test]
    fn test_extract_has_header_and_one_row_per_alert() {
        let alerts = vec![alert("ALERT-0001", "F001"), alert("ALERT-0002", "F002")];
        let mut buffer = Vec::new();
        write_alerts_csv(&alerts, &mut buffer).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("alert_id,fund_id,rule_violated,severity"));
        assert!(lines[1].starts_with("ALERT-0001,F001,Cross-Source Variance,Critical"));
        assert!(lines[2].starts_with("ALERT-0002,F002"));
    }

    #[test]
    fn test_empty_extract_is_header_only() {
        let mut buffer = Vec::new();
        write_alerts_csv(&[], &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text.lines().count(), 1);
    }
}
