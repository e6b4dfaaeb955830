//! SQLite storage implementation for Fundguard.
//!
//! This crate provides all database-related functionality using rusqlite
//! with the bundled SQLite driver. It implements the collaborator traits
//! defined in `fundguard-core` and contains:
//! - Connection management and schema initialization
//! - The `RecordStore` implementation the engine loads snapshots from
//! - The `QualitySink` implementation run output is persisted through
//! - The audit log recording every sink operation
//!
//! # Architecture
//!
//! This crate is the only place where SQLite dependencies exist. The core
//! crate is database-agnostic and works with traits.
//!
//! ```text
//! core (engine)
//!       │
//!       ▼
//! storage-sqlite (this crate)
//!       │
//!       ▼
//!   SQLite DB
//! ```

pub mod audit;
pub mod db;
pub mod errors;
pub mod quality;
pub mod snapshot;

mod utils;

// Re-export database utilities
pub use db::{init_schema, open, SharedConnection};

// Re-export repository implementations
pub use quality::SqliteQualitySink;
pub use snapshot::SqliteRecordStore;

// Re-export storage errors
pub use errors::StorageError;

// Re-export from fundguard-core for convenience
pub use fundguard_core::errors::{Error, Result};
