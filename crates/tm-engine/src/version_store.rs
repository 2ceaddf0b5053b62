//! Persistent record of the applied schema version.
//!
//! The version table holds the single current `(version, dirty)` pair. Every
//! write to it is paired with an upsert into the history table inside the
//! same transaction, so the two never disagree about the current version.

use crate::ddl::VersionTables;
use crate::error::{EngineError, EngineResult};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tm_db::{Database, Row};

/// The current `(version, dirty)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SchemaVersion {
    pub version: u64,
    pub dirty: bool,
}

/// One row of the history ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryRecord {
    pub version: u64,
    pub dirty: bool,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

/// Reads and writes the version and history tables.
///
/// `tables` holds the configured names used for existence checks and logs;
/// `quoted` holds the same names as they appear in generated SQL.
#[derive(Clone)]
pub struct VersionStore {
    db: Arc<dyn Database>,
    tables: VersionTables,
    quoted: VersionTables,
}

impl VersionStore {
    pub fn new(db: Arc<dyn Database>, tables: VersionTables) -> Self {
        let quoted = tables.quoted(|name| db.quote_ident(name));
        Self { db, tables, quoted }
    }

    pub fn tables(&self) -> &VersionTables {
        &self.tables
    }

    /// Read the current version, `None` when nothing has been recorded.
    pub async fn get_version(&self) -> EngineResult<Option<SchemaVersion>> {
        let row = self
            .db
            .read_single_row(&self.quoted.version, None, &["version", "dirty"])
            .await?;
        match row {
            Some(row) => Ok(Some(SchemaVersion {
                version: from_db_version(row.get_i64("version")?)?,
                dirty: row.get_bool("dirty")?,
            })),
            None => Ok(None),
        }
    }

    /// Replace the current version and upsert its history row atomically.
    pub async fn set_version(&self, version: u64, dirty: bool) -> EngineResult<()> {
        let v = to_db_version(version)?;
        let mut statements = vec![
            format!("DELETE FROM {}", self.quoted.version),
            format!(
                "INSERT INTO {} (version, dirty) VALUES ({v}, {dirty})",
                self.quoted.version
            ),
        ];
        statements.extend(self.upsert_history_sql(v, dirty));

        self.db
            .execute_transactional_update(&statements)
            .await
            .map_err(|source| EngineError::SetVersion {
                version,
                dirty,
                source,
            })?;
        log::debug!("Recorded version {version} (dirty={dirty})");
        Ok(())
    }

    /// Upsert history rows for every `(version, dirty)` entry in one transaction.
    pub async fn backfill_history(&self, entries: &[(u64, bool)]) -> EngineResult<()> {
        if entries.is_empty() {
            return Ok(());
        }
        let mut statements = Vec::with_capacity(entries.len() * 2);
        for &(version, dirty) in entries {
            statements.extend(self.upsert_history_sql(to_db_version(version)?, dirty));
        }
        self.db.execute_transactional_update(&statements).await?;
        Ok(())
    }

    /// All history rows in ascending version order.
    pub async fn history(&self) -> EngineResult<Vec<HistoryRecord>> {
        let rows = self
            .db
            .read_rows(
                &self.quoted.history,
                &["version", "dirty", "created", "modified"],
                Some("version"),
            )
            .await?;
        rows.iter().map(history_record).collect()
    }

    pub(crate) async fn create_version_table(&self) -> EngineResult<()> {
        self.create_table(&self.tables.version, self.quoted.create_version_sql())
            .await
    }

    pub(crate) async fn create_history_table(&self) -> EngineResult<()> {
        self.create_table(&self.tables.history, self.quoted.create_history_sql())
            .await
    }

    pub(crate) async fn create_indicator_table(&self) -> EngineResult<()> {
        self.create_table(&self.tables.indicator, self.quoted.create_indicator_sql())
            .await
    }

    pub(crate) async fn drop_indicator_table(&self) -> EngineResult<()> {
        if self.db.table_exists(&self.tables.indicator).await? {
            self.db
                .execute_schema_change(&[self.quoted.drop_indicator_sql()])
                .await?;
            log::info!("Dropped upgrade indicator table {}", self.tables.indicator);
        }
        Ok(())
    }

    async fn create_table(&self, name: &str, ddl: String) -> EngineResult<()> {
        if self.db.table_exists(name).await? {
            return Ok(());
        }
        self.db.execute_schema_change(&[ddl]).await?;
        log::info!("Created table {name}");
        Ok(())
    }

    fn upsert_history_sql(&self, version: i64, dirty: bool) -> [String; 2] {
        let history = &self.quoted.history;
        [
            format!(
                "UPDATE {history} SET dirty = {dirty}, modified = CURRENT_TIMESTAMP WHERE version = {version}"
            ),
            format!(
                "INSERT INTO {history} (version, dirty, created, modified) \
                 SELECT {version}, {dirty}, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP \
                 WHERE NOT EXISTS (SELECT 1 FROM {history} WHERE version = {version})"
            ),
        ]
    }
}

fn history_record(row: &Row) -> EngineResult<HistoryRecord> {
    Ok(HistoryRecord {
        version: from_db_version(row.get_i64("version")?)?,
        dirty: row.get_bool("dirty")?,
        created: row.get_timestamp("created")?,
        modified: row.get_timestamp("modified")?,
    })
}

pub(crate) fn to_db_version(version: u64) -> EngineResult<i64> {
    i64::try_from(version).map_err(|_| EngineError::VersionOutOfRange {
        value: version.to_string(),
    })
}

fn from_db_version(version: i64) -> EngineResult<u64> {
    u64::try_from(version).map_err(|_| EngineError::VersionOutOfRange {
        value: version.to_string(),
    })
}

#[cfg(test)]
#[path = "version_store_test.rs"]
mod tests;
