//! Quality sink backed by SQLite.

pub mod repository;

pub use repository::SqliteQualitySink;
