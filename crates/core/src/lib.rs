//! Fundguard Core - Domain entities, rule catalogue, and scoring.
//!
//! This crate contains the validation and scoring engine for Fundguard.
//! It is database-agnostic and defines traits that are implemented
//! by the `storage-sqlite` crate.

pub mod constants;
pub mod errors;
pub mod quality;
pub mod snapshot;

// Re-export common types from the snapshot and quality modules
pub use quality::*;
pub use snapshot::{Fund, PerformanceObservation, RegulatoryFiling, Snapshot};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
