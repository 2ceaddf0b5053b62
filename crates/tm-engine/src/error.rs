//! Error types for the migration engine.

use thiserror::Error;
use tm_db::DbError;

/// Migration engine errors.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The last apply attempt did not complete; manual intervention required (M001).
    #[error("[M001] Database version {version} is dirty, please fix it (see `migrate set`)")]
    DirtyVersion { version: u64 },

    /// Version, history and indicator tables match no known layout (M002).
    #[error("[M002] Undetermined state of schema version tables: found [{found}]")]
    UndeterminedUpgradeState { found: String },

    /// A migration's statements failed; the version stays dirty (M003).
    #[error("[M003] Migration {version} failed: {source}")]
    Execution {
        version: u64,
        #[source]
        source: DbError,
    },

    /// Nothing has been applied yet (M004).
    #[error("[M004] No migration has been applied yet")]
    NoMigration,

    /// Version store or table-state query failed (M005).
    #[error("[M005] Version store operation failed: {0}")]
    Database(#[from] DbError),

    /// Recording a version failed (M006).
    #[error("[M006] Failed to set version {version} (dirty={dirty}): {source}")]
    SetVersion {
        version: u64,
        dirty: bool,
        #[source]
        source: DbError,
    },

    /// A version cannot be represented in the version column (M007).
    #[error("[M007] Version {value} is out of range for the version table")]
    VersionOutOfRange { value: String },

    /// The run deadline expired (M008).
    #[error("[M008] Deadline exceeded while applying migration {version}")]
    DeadlineExceeded { version: u64 },
}

/// Result type alias for [`EngineError`].
pub type EngineResult<T> = Result<T, EngineError>;
