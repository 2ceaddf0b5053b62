//! Table layouts for the version store.
//!
//! The version table holds exactly one row and is rewritten with
//! delete-then-insert, so it carries no key. The history table is keyed by
//! version. The upgrade indicator only has to exist.

use tm_core::config::HISTORY_TABLE_SUFFIX;

/// Name of the transient table marking an in-progress history upgrade.
pub const UPGRADE_INDICATOR_TABLE: &str = "tidemark_upgrade_indicator";

/// Names of the three tables the engine manages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionTables {
    pub version: String,
    pub history: String,
    pub indicator: String,
}

impl VersionTables {
    /// Derive the history and indicator names from the version table name.
    pub fn new(version_table: &str) -> Self {
        Self {
            version: version_table.to_string(),
            history: format!("{version_table}{HISTORY_TABLE_SUFFIX}"),
            indicator: UPGRADE_INDICATOR_TABLE.to_string(),
        }
    }

    /// The same names passed through `quote`, for use inside SQL text.
    pub(crate) fn quoted(&self, quote: impl Fn(&str) -> String) -> Self {
        Self {
            version: quote(&self.version),
            history: quote(&self.history),
            indicator: quote(&self.indicator),
        }
    }

    pub(crate) fn create_version_sql(&self) -> String {
        format!(
            "CREATE TABLE {} (version BIGINT NOT NULL, dirty BOOLEAN NOT NULL)",
            self.version
        )
    }

    pub(crate) fn create_history_sql(&self) -> String {
        format!(
            "CREATE TABLE {} (
    version BIGINT NOT NULL PRIMARY KEY,
    dirty BOOLEAN NOT NULL,
    created TIMESTAMP NOT NULL,
    modified TIMESTAMP NOT NULL
)",
            self.history
        )
    }

    pub(crate) fn create_indicator_sql(&self) -> String {
        format!(
            "CREATE TABLE {} (dummy BIGINT NOT NULL PRIMARY KEY)",
            self.indicator
        )
    }

    pub(crate) fn drop_indicator_sql(&self) -> String {
        format!("DROP TABLE {}", self.indicator)
    }
}

impl Default for VersionTables {
    fn default() -> Self {
        Self::new("schema_migrations")
    }
}
