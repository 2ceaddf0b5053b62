//! Migration engine for Tidemark.
//!
//! Tracks the applied version in a single-row version table paired with a
//! per-version history ledger, applies pending migrations in version order,
//! and upgrades deployments that predate the history ledger.

pub mod ddl;
pub mod error;
pub mod executor;
pub mod migrator;
pub mod upgrade;
pub mod version_store;

pub use ddl::VersionTables;
pub use error::{EngineError, EngineResult};
pub use executor::{AppliedMigration, ApplyReport};
pub use migrator::Migrator;
pub use upgrade::UpgradeStatus;
pub use version_store::{HistoryRecord, SchemaVersion, VersionStore};
