//! RecordStore implementation over SQLite.

use async_trait::async_trait;
use rusqlite::Row;

use fundguard_core::snapshot::{Fund, PerformanceObservation, RecordStore, RegulatoryFiling};
use fundguard_core::Result;

use super::model::{FilingRow, FundRow, PerformanceRow};
use crate::db::{lock, SharedConnection};
use crate::errors::StorageError;

/// Loads the normalized record collections from SQLite.
///
/// Rows come back in insertion order, which fixes snapshot order and with
/// it the engine's issue numbering.
pub struct SqliteRecordStore {
    conn: SharedConnection,
}

impl SqliteRecordStore {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    fn load_funds(&self) -> Result<Vec<Fund>> {
        let conn = lock(&self.conn);
        let mut stmt = conn
            .prepare(
                "SELECT fund_id, fund_name, manager_name, fund_type, strategy, vintage_year, \
                 inception_date, fund_size_usd_millions, original_currency, original_fund_size, \
                 target_size_usd_millions, status, geography, sector_focus, administrator, \
                 last_updated \
                 FROM funds ORDER BY rowid",
            )
            .map_err(StorageError::QueryFailed)?;

        let rows = stmt
            .query_map([], fund_row)
            .map_err(StorageError::QueryFailed)?;

        let mut funds = Vec::new();
        for row in rows {
            let row = row.map_err(StorageError::QueryFailed)?;
            funds.push(Fund::try_from(row)?);
        }
        Ok(funds)
    }

    fn load_performance(&self) -> Result<Vec<PerformanceObservation>> {
        let conn = lock(&self.conn);
        let mut stmt = conn
            .prepare(
                "SELECT fund_id, report_date, report_quarter, irr_net_pct, moic, dpi, rvpi, \
                 tvpi, capital_called_millions, distributions_millions, \
                 remaining_value_millions, nav_per_share, monthly_return_pct \
                 FROM fund_performance ORDER BY id",
            )
            .map_err(StorageError::QueryFailed)?;

        let rows = stmt
            .query_map([], performance_row)
            .map_err(StorageError::QueryFailed)?;

        let mut observations = Vec::new();
        for row in rows {
            let row = row.map_err(StorageError::QueryFailed)?;
            observations.push(PerformanceObservation::try_from(row)?);
        }
        Ok(observations)
    }

    fn load_filings(&self) -> Result<Vec<RegulatoryFiling>> {
        let conn = lock(&self.conn);
        let mut stmt = conn
            .prepare(
                "SELECT fund_id, filing_type, filing_date, reported_aum_millions, \
                 reported_strategy, num_investors, source \
                 FROM regulatory_filings ORDER BY id",
            )
            .map_err(StorageError::QueryFailed)?;

        let rows = stmt
            .query_map([], filing_row)
            .map_err(StorageError::QueryFailed)?;

        let mut filings = Vec::new();
        for row in rows {
            let row = row.map_err(StorageError::QueryFailed)?;
            filings.push(RegulatoryFiling::try_from(row)?);
        }
        Ok(filings)
    }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn get_funds(&self) -> Result<Vec<Fund>> {
        self.load_funds()
    }

    async fn get_performance(&self) -> Result<Vec<PerformanceObservation>> {
        self.load_performance()
    }

    async fn get_filings(&self) -> Result<Vec<RegulatoryFiling>> {
        self.load_filings()
    }
}

fn fund_row(row: &Row<'_>) -> rusqlite::Result<FundRow> {
    Ok(FundRow {
        fund_id: row.get("fund_id")?,
        fund_name: row.get("fund_name")?,
        manager_name: row.get("manager_name")?,
        fund_type: row.get("fund_type")?,
        strategy: row.get("strategy")?,
        vintage_year: row.get("vintage_year")?,
        inception_date: row.get("inception_date")?,
        fund_size_usd_millions: row.get("fund_size_usd_millions")?,
        original_currency: row.get("original_currency")?,
        original_fund_size: row.get("original_fund_size")?,
        target_size_usd_millions: row.get("target_size_usd_millions")?,
        status: row.get("status")?,
        geography: row.get("geography")?,
        sector_focus: row.get("sector_focus")?,
        administrator: row.get("administrator")?,
        last_updated: row.get("last_updated")?,
    })
}

fn performance_row(row: &Row<'_>) -> rusqlite::Result<PerformanceRow> {
    Ok(PerformanceRow {
        fund_id: row.get("fund_id")?,
        report_date: row.get("report_date")?,
        report_quarter: row.get("report_quarter")?,
        irr_net_pct: row.get("irr_net_pct")?,
        moic: row.get("moic")?,
        dpi: row.get("dpi")?,
        rvpi: row.get("rvpi")?,
        tvpi: row.get("tvpi")?,
        capital_called_millions: row.get("capital_called_millions")?,
        distributions_millions: row.get("distributions_millions")?,
        remaining_value_millions: row.get("remaining_value_millions")?,
        nav_per_share: row.get("nav_per_share")?,
        monthly_return_pct: row.get("monthly_return_pct")?,
    })
}

fn filing_row(row: &Row<'_>) -> rusqlite::Result<FilingRow> {
    Ok(FilingRow {
        fund_id: row.get("fund_id")?,
        filing_type: row.get("filing_type")?,
        filing_date: row.get("filing_date")?,
        reported_aum_millions: row.get("reported_aum_millions")?,
        reported_strategy: row.get("reported_strategy")?,
        num_investors: row.get("num_investors")?,
        source: row.get("source")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{init_schema, open_in_memory};
    use rusqlite::params;

    fn seeded_store() -> SqliteRecordStore {
        let conn = open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        {
            let guard = lock(&conn);
            guard
                .execute(
                    "INSERT INTO funds (fund_id, fund_name, manager_name, fund_type, \
                     vintage_year, fund_size_usd_millions, original_currency, last_updated) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                    params![
                        "F001",
                        "Alpha Growth I",
                        "Alpha Capital",
                        "Private Equity",
                        2019,
                        500.0,
                        "USD",
                        "2026-03-01T10:30:00"
                    ],
                )
                .unwrap();
            guard
                .execute(
                    "INSERT INTO fund_performance (fund_id, report_date, dpi, rvpi, tvpi) \
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params!["F001", "2026-03-31", 0.5, 1.0, 1.5],
                )
                .unwrap();
            guard
                .execute(
                    "INSERT INTO regulatory_filings (fund_id, filing_type, reported_aum_millions) \
                     VALUES (?1, ?2, ?3)",
                    params!["F001", "ADV", 510.0],
                )
                .unwrap();
        }
        SqliteRecordStore::new(conn)
    }

    #[tokio::test]
    async fn test_loads_typed_records() {
        let store = seeded_store();

        let funds = store.get_funds().await.unwrap();
        assert_eq!(funds.len(), 1);
        assert_eq!(funds[0].fund_id, "F001");
        assert_eq!(funds[0].vintage_year, Some(2019));
        assert_eq!(funds[0].administrator, None);
        assert!(funds[0].last_updated.is_some());

        let performance = store.get_performance().await.unwrap();
        assert_eq!(performance.len(), 1);
        assert_eq!(performance[0].tvpi_calculated(), Some(1.5));

        let filings = store.get_filings().await.unwrap();
        assert_eq!(filings.len(), 1);
        assert_eq!(filings[0].reported_aum_millions, 510.0);
    }

    #[tokio::test]
    async fn test_empty_tables_load_as_empty_collections() {
        let conn = open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        let store = SqliteRecordStore::new(conn);

        assert!(store.get_funds().await.unwrap().is_empty());
        assert!(store.get_performance().await.unwrap().is_empty());
        assert!(store.get_filings().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_table_is_a_fatal_load_error() {
        let conn = open_in_memory().unwrap();
        let store = SqliteRecordStore::new(conn);

        assert!(store.get_funds().await.is_err());
    }

    #[tokio::test]
    async fn test_corrupt_timestamp_is_a_fatal_load_error() {
        let conn = open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        lock(&conn)
            .execute(
                "INSERT INTO funds (fund_id, last_updated) VALUES ('F001', 'yesterday-ish')",
                [],
            )
            .unwrap();
        let store = SqliteRecordStore::new(conn);

        let err = store.get_funds().await.unwrap_err();
        assert!(err.to_string().contains("funds.last_updated"));
    }
}
