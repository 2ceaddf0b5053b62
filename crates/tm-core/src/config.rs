//! Configuration types and parsing for tidemark.yml

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tm_sql::{BigQueryDialect, DuckDbDialect, GenericDialect, SqlDialect};

/// Suffix appended to the version table name to form the history table name
pub const HISTORY_TABLE_SUFFIX: &str = "_history";

/// Upper bound on `timeout_secs` (one week)
pub const MAX_TIMEOUT_SECS: u64 = 7 * 24 * 60 * 60;

/// Main project configuration from tidemark.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Project name
    pub name: String,

    /// Directory containing migration files, relative to the project root
    #[serde(default = "default_migrations_dir")]
    pub migrations_dir: String,

    /// SQL dialect used to split and classify migration files
    #[serde(default)]
    pub dialect: Dialect,

    /// Database connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Name of the single-row version table
    #[serde(default = "default_version_table")]
    pub version_table: String,

    /// Deadline for a whole `migrate up` run, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Database type selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DbType {
    /// DuckDB (default)
    #[default]
    DuckDb,
}

impl std::fmt::Display for DbType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DbType::DuckDb => write!(f, "duckdb"),
        }
    }
}

/// Database connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Database type
    #[serde(rename = "type", default)]
    pub db_type: DbType,

    /// Database path (file-based or :memory:)
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            db_type: DbType::default(),
            path: default_db_path(),
        }
    }
}

/// SQL dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// DuckDB SQL dialect
    #[default]
    DuckDb,
    /// GoogleSQL / BigQuery dialect
    #[serde(alias = "googlesql")]
    BigQuery,
    /// Generic ANSI dialect
    Generic,
}

impl Dialect {
    /// Build the tokenizer dialect for this setting
    pub fn sql_dialect(&self) -> Box<dyn SqlDialect> {
        match self {
            Dialect::DuckDb => Box::new(DuckDbDialect::new()),
            Dialect::BigQuery => Box::new(BigQueryDialect::new()),
            Dialect::Generic => Box::new(GenericDialect::new()),
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dialect::DuckDb => write!(f, "duckdb"),
            Dialect::BigQuery => write!(f, "bigquery"),
            Dialect::Generic => write!(f, "generic"),
        }
    }
}

fn default_migrations_dir() -> String {
    "migrations".to_string()
}

fn default_db_path() -> String {
    ":memory:".to_string()
}

fn default_version_table() -> String {
    "schema_migrations".to_string()
}

fn default_timeout_secs() -> u64 {
    3600
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory
    ///
    /// Looks for tidemark.yml or tidemark.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        let yml_path = dir.join("tidemark.yml");
        let yaml_path = dir.join("tidemark.yaml");

        if yml_path.exists() {
            Self::load(&yml_path)
        } else if yaml_path.exists() {
            Self::load(&yaml_path)
        } else {
            Err(CoreError::ConfigNotFound {
                path: yml_path.display().to_string(),
            })
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> CoreResult<()> {
        if self.name.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "Project name cannot be empty".to_string(),
            });
        }

        if !is_plain_identifier(&self.version_table) {
            return Err(CoreError::ConfigInvalid {
                message: format!(
                    "version_table '{}' must start with a letter or '_' and contain only letters, digits and '_'",
                    self.version_table
                ),
            });
        }

        check_timeout_secs(self.timeout_secs)
    }

    /// Absolute path of the migrations directory
    pub fn migrations_path_absolute(&self, root: &Path) -> PathBuf {
        root.join(&self.migrations_dir)
    }

    /// Name of the history ledger table paired with the version table
    pub fn history_table(&self) -> String {
        format!("{}{}", self.version_table, HISTORY_TABLE_SUFFIX)
    }

    /// Run deadline as a [`Duration`]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Reject a zero deadline or one beyond [`MAX_TIMEOUT_SECS`]
pub fn check_timeout_secs(secs: u64) -> CoreResult<()> {
    if secs == 0 || secs > MAX_TIMEOUT_SECS {
        return Err(CoreError::ConfigInvalid {
            message: format!(
                "timeout_secs must be between 1 and {MAX_TIMEOUT_SECS}, got {secs}"
            ),
        });
    }
    Ok(())
}

/// True for ASCII names of letters, digits and '_' not starting with a digit
pub fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
