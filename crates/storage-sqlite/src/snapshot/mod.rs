//! Record store backed by SQLite.

pub mod model;
pub mod repository;

pub use repository::SqliteRecordStore;
