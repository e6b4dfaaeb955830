//! Connection management and schema initialization.

use std::path::Path;
use std::sync::{Arc, Mutex};

use log::info;
use rusqlite::Connection;

use crate::errors::StorageError;
use fundguard_core::Result;

/// A connection shared between the record store and the sink.
///
/// The engine is a single-pass batch workload; one serialized connection
/// is all it needs.
pub type SharedConnection = Arc<Mutex<Connection>>;

/// Opens (or creates) the database at `path` and returns a shared handle.
pub fn open(path: impl AsRef<Path>) -> Result<SharedConnection> {
    let path = path.as_ref();
    let conn = Connection::open(path)
        .map_err(|e| StorageError::OpenFailed(format!("{}: {e}", path.display())))?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")
        .map_err(StorageError::QueryFailed)?;
    info!("Opened database at {}", path.display());
    Ok(Arc::new(Mutex::new(conn)))
}

/// Opens an in-memory database, for tests and dry runs.
pub fn open_in_memory() -> Result<SharedConnection> {
    let conn = Connection::open_in_memory()
        .map_err(|e| StorageError::OpenFailed(e.to_string()))?;
    Ok(Arc::new(Mutex::new(conn)))
}

/// Creates every table the engine reads or writes.
///
/// Record tables are written by the upstream ingestion pipeline; quality
/// tables belong to this system. All statements are idempotent.
pub fn init_schema(conn: &SharedConnection) -> Result<()> {
    let conn = lock(conn);
    conn.execute_batch(SCHEMA)
        .map_err(|e| StorageError::SchemaFailed(e.to_string()))?;
    info!("Database schema initialized");
    Ok(())
}

pub(crate) fn lock(conn: &SharedConnection) -> std::sync::MutexGuard<'_, Connection> {
    // A poisoned mutex means a writer panicked mid-operation; the
    // connection itself is still usable for a fresh run.
    match conn.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS funds (
    fund_id                  TEXT PRIMARY KEY,
    fund_name                TEXT,
    manager_name             TEXT,
    fund_type                TEXT,
    strategy                 TEXT,
    vintage_year             INTEGER,
    inception_date           TEXT,
    fund_size_usd_millions   REAL,
    original_currency        TEXT,
    original_fund_size       REAL,
    target_size_usd_millions REAL,
    status                   TEXT,
    geography                TEXT,
    sector_focus             TEXT,
    administrator            TEXT,
    last_updated             TEXT
);

CREATE TABLE IF NOT EXISTS fund_performance (
    id                       INTEGER PRIMARY KEY AUTOINCREMENT,
    fund_id                  TEXT NOT NULL,
    report_date              TEXT,
    report_quarter           TEXT,
    irr_net_pct              REAL,
    moic                     REAL,
    dpi                      REAL,
    rvpi                     REAL,
    tvpi                     REAL,
    capital_called_millions  REAL,
    distributions_millions   REAL,
    remaining_value_millions REAL,
    nav_per_share            REAL,
    monthly_return_pct       REAL
);

CREATE TABLE IF NOT EXISTS regulatory_filings (
    id                    INTEGER PRIMARY KEY AUTOINCREMENT,
    fund_id               TEXT NOT NULL,
    filing_type           TEXT,
    filing_date           TEXT,
    reported_aum_millions REAL NOT NULL,
    reported_strategy     TEXT,
    num_investors         INTEGER,
    source                TEXT
);

CREATE TABLE IF NOT EXISTS quality_issues (
    id               INTEGER PRIMARY KEY,
    fund_id          TEXT NOT NULL,
    issue_type       TEXT NOT NULL,
    severity         TEXT NOT NULL,
    field_name       TEXT NOT NULL,
    expected_value   TEXT,
    actual_value     TEXT,
    description      TEXT NOT NULL,
    detected_at      TEXT NOT NULL,
    status           TEXT NOT NULL DEFAULT 'Open',
    resolution_notes TEXT,
    resolved_at      TEXT
);

CREATE TABLE IF NOT EXISTS quality_alerts (
    alert_id        TEXT PRIMARY KEY,
    fund_id         TEXT NOT NULL,
    rule_violated   TEXT NOT NULL,
    severity        TEXT NOT NULL,
    description     TEXT NOT NULL,
    detected_at     TEXT NOT NULL,
    status          TEXT NOT NULL DEFAULT 'Active',
    acknowledged_by TEXT,
    acknowledged_at TEXT
);

CREATE TABLE IF NOT EXISTS quality_metrics (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    metric_date   TEXT NOT NULL,
    metric_name   TEXT NOT NULL,
    metric_value  REAL NOT NULL,
    target_value  REAL NOT NULL,
    entity_type   TEXT NOT NULL,
    entity_name   TEXT NOT NULL,
    calculated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS audit_log (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    operation        TEXT NOT NULL,
    table_name       TEXT NOT NULL,
    records_affected INTEGER NOT NULL,
    executed_at      TEXT NOT NULL,
    duration_ms      INTEGER NOT NULL,
    status           TEXT NOT NULL,
    error_message    TEXT
);
"#;
