//! Apply loop for pending migrations.

use crate::error::{EngineError, EngineResult};
use crate::migrator::Migrator;
use serde::Serialize;
use tm_core::{migration_label, Migration, Migrations, StatementKind};
use tm_db::DbResult;
use tokio::time::Instant;

/// One successfully applied migration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedMigration {
    pub version: u64,
    pub name: Option<String>,
    pub kind: StatementKind,
    pub rows_affected: i64,
}

impl AppliedMigration {
    pub fn label(&self) -> String {
        migration_label(self.version, self.name.as_deref())
    }
}

/// Outcome of one apply run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApplyReport {
    pub applied: Vec<AppliedMigration>,
}

impl ApplyReport {
    /// True when the run changed nothing.
    pub fn is_empty(&self) -> bool {
        self.applied.is_empty()
    }

    pub fn last_version(&self) -> Option<u64> {
        self.applied.last().map(|m| m.version)
    }
}

impl Migrator {
    /// Apply pending migrations in ascending version order.
    ///
    /// Each migration is bracketed by a dirty mark before execution and a
    /// clean mark after. A failure leaves the version dirty and stops the run.
    pub async fn apply(
        &self,
        migrations: &Migrations,
        limit: Option<usize>,
    ) -> EngineResult<ApplyReport> {
        let current = match self.store.get_version().await? {
            Some(v) if v.dirty => return Err(EngineError::DirtyVersion { version: v.version }),
            Some(v) => v.version,
            None => 0,
        };

        let mut report = ApplyReport::default();
        for migration in migrations.pending_after(current) {
            if limit.is_some_and(|n| report.applied.len() >= n) {
                break;
            }
            self.check_deadline(migration.version)?;

            self.store.set_version(migration.version, true).await?;
            let rows_affected = self.execute(migration).await?;
            self.store.set_version(migration.version, false).await?;

            log::info!(
                "Applied {} ({}, {rows_affected} rows)",
                migration.label(),
                migration.kind
            );
            report.applied.push(AppliedMigration {
                version: migration.version,
                name: migration.name.clone(),
                kind: migration.kind,
                rows_affected,
            });
        }

        if report.is_empty() {
            log::debug!("No pending migrations after version {current}");
        }
        Ok(report)
    }

    fn check_deadline(&self, version: u64) -> EngineResult<()> {
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => {
                Err(EngineError::DeadlineExceeded { version })
            }
            _ => Ok(()),
        }
    }

    async fn execute(&self, migration: &Migration) -> EngineResult<i64> {
        let version = migration.version;
        let result = match self.deadline {
            Some(deadline) => tokio::time::timeout_at(deadline, self.execute_statements(migration))
                .await
                .map_err(|_| EngineError::DeadlineExceeded { version })?,
            None => self.execute_statements(migration).await,
        };
        result.map_err(|source| EngineError::Execution { version, source })
    }

    async fn execute_statements(&self, migration: &Migration) -> DbResult<i64> {
        let statements = &migration.statements;
        if statements.is_empty() {
            log::debug!("Migration {} has no statements", migration.version);
            return Ok(0);
        }
        match migration.kind {
            StatementKind::Ddl => {
                self.db.execute_schema_change(statements).await?;
                Ok(0)
            }
            StatementKind::Dml => self.db.execute_transactional_update(statements).await,
            StatementKind::PartitionedDml => {
                let mut total = 0;
                for statement in statements {
                    total += self.db.execute_bulk_update(statement).await?;
                }
                Ok(total)
            }
        }
    }
}

#[cfg(test)]
#[path = "executor_test.rs"]
mod tests;
