//! tm-core - Core library for Tidemark
//!
//! This crate provides the project configuration, the [`Migration`] model,
//! and discovery of migration files on disk.

pub mod config;
pub mod error;
pub mod loader;
pub mod migration;

pub use config::{Config, DatabaseConfig, DbType, Dialect};
pub use error::{CoreError, CoreResult};
pub use loader::{create_migration_file, load_migrations, MigrationLoader};
pub use migration::{migration_label, Migration, Migrations};
pub use tm_sql::StatementKind;
