//! Error types for tm-core

use thiserror::Error;

/// Core error type for Tidemark
#[derive(Error, Debug)]
pub enum CoreError {
    /// C001: Configuration file not found
    #[error("[C001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// C002: Invalid configuration value
    #[error("[C002] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// L001: Migration directory could not be listed
    #[error("[L001] Cannot read migration directory '{path}': {source}")]
    MigrationDirUnreadable {
        path: String,
        source: std::io::Error,
    },

    /// L002: Two migration files resolve to the same version
    #[error("[L002] Migration version {version} is defined by both '{first}' and '{second}'")]
    VersionCollision {
        version: u64,
        first: String,
        second: String,
    },

    /// L003: Migration file could not be split or classified
    #[error("[L003] Invalid migration file '{path}': {source}")]
    MigrationParse {
        path: String,
        source: tm_sql::SqlError,
    },

    /// L004: IO error with file path context
    #[error("[L004] Failed to access '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// L005: Migration name does not match the filename grammar
    #[error("[L005] Invalid migration name '{name}': only letters, digits, '_' and '-' are allowed")]
    InvalidMigrationName { name: String },

    /// C003: Failed to parse configuration file
    #[error("[C003] Failed to parse config: {0}")]
    YamlParse(#[from] serde_yaml::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
