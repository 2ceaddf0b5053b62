//! Upgrade of deployments created before the history table existed.
//!
//! State is inferred from which of the version, history and indicator tables
//! exist. The indicator table is created before the history table and dropped
//! only after the backfill and a full apply pass, so an interrupted upgrade is
//! resumed by the next run.

use crate::error::{EngineError, EngineResult};
use crate::executor::ApplyReport;
use crate::migrator::Migrator;
use std::fmt;
use tm_core::Migrations;

/// State of the version tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeStatus {
    /// No version tables at all
    FirstRun,
    /// Version table only, from a release without history tracking
    ExistingNoHistory,
    /// Indicator present, backfill not yet confirmed
    UpgradeInProgress,
    /// Version and history tables, no indicator
    UpgradeComplete,
}

impl UpgradeStatus {
    /// True when history rows must be backfilled before applying.
    pub fn needs_history_backfill(self) -> bool {
        matches!(
            self,
            UpgradeStatus::ExistingNoHistory | UpgradeStatus::UpgradeInProgress
        )
    }
}

impl fmt::Display for UpgradeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpgradeStatus::FirstRun => write!(f, "first run"),
            UpgradeStatus::ExistingNoHistory => write!(f, "existing, no history"),
            UpgradeStatus::UpgradeInProgress => write!(f, "upgrade in progress"),
            UpgradeStatus::UpgradeComplete => write!(f, "up to date"),
        }
    }
}

impl Migrator {
    /// Classify the current table layout.
    pub async fn determine_upgrade_status(&self) -> EngineResult<UpgradeStatus> {
        let tables = self.store.tables();
        let found = self
            .db
            .existing_tables(&[
                tables.version.as_str(),
                tables.history.as_str(),
                tables.indicator.as_str(),
            ])
            .await?;

        let version = found.contains(&tables.version);
        let history = found.contains(&tables.history);
        let indicator = found.contains(&tables.indicator);

        match (version, history, indicator) {
            (false, false, false) => Ok(UpgradeStatus::FirstRun),
            (true, false, false) => Ok(UpgradeStatus::ExistingNoHistory),
            (true, _, true) => Ok(UpgradeStatus::UpgradeInProgress),
            (true, true, false) => Ok(UpgradeStatus::UpgradeComplete),
            _ => Err(EngineError::UndeterminedUpgradeState {
                found: found.into_iter().collect::<Vec<_>>().join(", "),
            }),
        }
    }

    /// Create whatever tables the detected state is missing.
    ///
    /// Returns the state observed before any table was created.
    pub async fn ensure_schema(&self) -> EngineResult<UpgradeStatus> {
        let status = self.determine_upgrade_status().await?;
        match status {
            UpgradeStatus::FirstRun => {
                self.store.create_version_table().await?;
                self.store.create_history_table().await?;
            }
            UpgradeStatus::ExistingNoHistory => {
                log::info!("Upgrading version table to track history");
                self.store.create_indicator_table().await?;
                self.store.create_history_table().await?;
            }
            UpgradeStatus::UpgradeInProgress => {
                log::info!("Resuming interrupted history upgrade");
                self.store.create_history_table().await?;
            }
            UpgradeStatus::UpgradeComplete => {}
        }
        Ok(status)
    }

    /// Backfill history, apply pending migrations, then drop the indicator.
    pub async fn run_upgrade(
        &self,
        migrations: &Migrations,
        limit: Option<usize>,
    ) -> EngineResult<ApplyReport> {
        let backfilled = self.backfill_history(migrations).await?;
        log::info!("Backfilled {backfilled} history rows");

        let report = self.apply(migrations, limit).await?;
        self.store.drop_indicator_table().await?;
        Ok(report)
    }

    /// Write history rows for every known version up to the current one.
    ///
    /// Earlier versions are recorded clean; the current version keeps its
    /// live dirty flag. Versions with no migration file are skipped, except
    /// the current version, which is always recorded.
    async fn backfill_history(&self, migrations: &Migrations) -> EngineResult<usize> {
        let Some(current) = self.store.get_version().await? else {
            return Ok(0);
        };

        let mut entries: Vec<(u64, bool)> = migrations
            .iter()
            .map(|m| m.version)
            .filter(|&v| v < current.version)
            .map(|v| (v, false))
            .collect();
        entries.push((current.version, current.dirty));

        self.store.backfill_history(&entries).await?;
        Ok(entries.len())
    }
}

#[cfg(test)]
#[path = "upgrade_test.rs"]
mod tests;
