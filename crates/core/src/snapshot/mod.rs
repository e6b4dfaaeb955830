//! Record Store snapshot module.
//!
//! One validation run operates on a single immutable [`Snapshot`] of three
//! normalized collections: fund master records, performance observations,
//! and regulatory filings. Ingestion and standardization happen upstream;
//! this module only models the normalized records and the [`RecordStore`]
//! interface the engine loads them through.

pub mod model;
pub mod traits;

pub use model::{Fund, PerformanceObservation, RegulatoryFiling, Snapshot};
pub use traits::RecordStore;
