//! Operation audit log.
//!
//! Every sink write leaves a row in `audit_log` recording what was written,
//! how many records, how long it took, and whether it succeeded.

use std::time::Duration;

use chrono::Utc;
use log::warn;
use rusqlite::params;

use crate::db::{lock, SharedConnection};
use crate::utils::format_utc;

/// Records one operation. Audit rows are best-effort: a failure here is
/// logged and does not mask the primary write's result.
pub fn record(
    conn: &SharedConnection,
    operation: &str,
    table_name: &str,
    records_affected: usize,
    duration: Duration,
    status: &str,
    error_message: Option<&str>,
) {
    let guard = lock(conn);
    let result = guard.execute(
        "INSERT INTO audit_log (operation, table_name, records_affected, executed_at, \
         duration_ms, status, error_message) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            operation,
            table_name,
            records_affected as i64,
            format_utc(&Utc::now()),
            duration.as_millis() as i64,
            status,
            error_message,
        ],
    );
    if let Err(e) = result {
        warn!("Failed to write audit row for {operation} on {table_name}: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{init_schema, open_in_memory};

    #[test]
    fn test_record_writes_a_row() {
        let conn = open_in_memory().unwrap();
        init_schema(&conn).unwrap();

        record(
            &conn,
            "VALIDATE",
            "quality_issues",
            42,
            Duration::from_millis(17),
            "SUCCESS",
            None,
        );

        let (operation, records, status): (String, i64, String) = lock(&conn)
            .query_row(
                "SELECT operation, records_affected, status FROM audit_log",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .unwrap();
        assert_eq!(operation, "VALIDATE");
        assert_eq!(records, 42);
        assert_eq!(status, "SUCCESS");
    }
}
