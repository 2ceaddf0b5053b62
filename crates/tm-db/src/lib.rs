//! tm-db - Database abstraction layer for Tidemark
//!
//! This crate provides the [`Database`] execution capability the migration
//! engine calls through, and a DuckDB implementation of it.

pub mod duckdb;
pub mod error;
pub mod row;
pub mod traits;

pub use duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use row::{Row, RowKey, Value};
pub use traits::Database;
