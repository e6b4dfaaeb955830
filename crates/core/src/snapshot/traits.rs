//! Record Store interface.

use async_trait::async_trait;

use super::model::{Fund, PerformanceObservation, RegulatoryFiling};
use crate::errors::Result;

/// Read-only access to the normalized collections for one run.
///
/// Implementations load from whatever the ingestion pipeline wrote
/// (SQLite in the shipped storage crate). A failure from any getter is
/// fatal to the run: the engine must not score a partial snapshot.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Loads all fund master records.
    async fn get_funds(&self) -> Result<Vec<Fund>>;

    /// Loads all performance observations.
    async fn get_performance(&self) -> Result<Vec<PerformanceObservation>>;

    /// Loads all regulatory filings, in filing order.
    async fn get_filings(&self) -> Result<Vec<RegulatoryFiling>>;
}
