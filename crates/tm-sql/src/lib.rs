//! tm-sql - SQL layer for Tidemark
//!
//! This crate turns raw migration file contents into individual statements
//! using the sqlparser-rs tokenizer, and classifies each file as schema
//! change, transactional DML, or partitioned DML.

pub mod classifier;
pub mod dialect;
pub mod error;
pub mod splitter;

pub use classifier::{KeywordClassifier, StatementClassifier, StatementKind};
pub use dialect::{BigQueryDialect, DuckDbDialect, GenericDialect, SqlDialect};
pub use error::{SqlError, SqlResult};
pub use splitter::split_statements;
