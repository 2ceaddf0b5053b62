//! Migration engine entry point.

use crate::ddl::VersionTables;
use crate::error::{EngineError, EngineResult};
use crate::executor::ApplyReport;
use crate::version_store::{HistoryRecord, SchemaVersion, VersionStore};
use std::sync::Arc;
use std::time::Duration;
use tm_core::Migrations;
use tm_db::Database;
use tokio::time::Instant;

/// Applies migrations against one database.
///
/// The deadline is fixed when the migrator is built and bounds the whole run.
pub struct Migrator {
    pub(crate) db: Arc<dyn Database>,
    pub(crate) store: VersionStore,
    pub(crate) deadline: Option<Instant>,
}

impl Migrator {
    pub fn new(db: Arc<dyn Database>, tables: VersionTables) -> Self {
        let store = VersionStore::new(Arc::clone(&db), tables);
        Self {
            db,
            store,
            deadline: None,
        }
    }

    /// Bound the run to `timeout` from now. A timeout too large to represent
    /// as an instant leaves the run unbounded.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => {
                log::warn!("Timeout of {timeout:?} is out of range; running without a deadline");
                self
            }
        }
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn store(&self) -> &VersionStore {
        &self.store
    }

    /// Bring the version tables up to date, then apply up to `limit` pending
    /// migrations. `None` applies all of them.
    pub async fn up(
        &self,
        migrations: &Migrations,
        limit: Option<usize>,
    ) -> EngineResult<ApplyReport> {
        let status = self.ensure_schema().await?;
        log::debug!("Version table state before run: {status}");
        if status.needs_history_backfill() {
            self.run_upgrade(migrations, limit).await
        } else {
            self.apply(migrations, limit).await
        }
    }

    /// The recorded version, or [`EngineError::NoMigration`] if none.
    pub async fn current_version(&self) -> EngineResult<SchemaVersion> {
        if !self.db.table_exists(&self.store.tables().version).await? {
            return Err(EngineError::NoMigration);
        }
        self.store
            .get_version()
            .await?
            .ok_or(EngineError::NoMigration)
    }

    /// Force the recorded version, e.g. to clear a dirty flag after manual repair.
    pub async fn set_version(&self, version: u64, dirty: bool) -> EngineResult<()> {
        self.ensure_schema().await?;
        self.store.set_version(version, dirty).await
    }

    /// History rows in version order; empty before the history table exists.
    pub async fn history(&self) -> EngineResult<Vec<HistoryRecord>> {
        if !self.db.table_exists(&self.store.tables().history).await? {
            return Ok(Vec::new());
        }
        self.store.history().await
    }
}
