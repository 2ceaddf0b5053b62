//! Migration discovery
//!
//! Scans a directory for files named `<digits>[_<name>][.up].sql`, splits
//! and classifies each one, and returns them ordered by version. A directory
//! either loads completely or not at all.

use crate::config::Dialect;
use crate::error::{CoreError, CoreResult};
use crate::migration::{Migration, Migrations};
use regex::Regex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tm_sql::{split_statements, KeywordClassifier, SqlDialect, StatementClassifier};

static MIGRATION_FILE_RE: OnceLock<Regex> = OnceLock::new();
static MIGRATION_NAME_RE: OnceLock<Regex> = OnceLock::new();

/// Timestamp layout used for new migration file versions
const NEW_MIGRATION_VERSION_FORMAT: &str = "%Y%m%d%H%M%S";

fn migration_file_re() -> &'static Regex {
    MIGRATION_FILE_RE.get_or_init(|| {
        Regex::new(r"^([0-9]+)(?:_([a-zA-Z0-9_\-]+))?(\.up)?\.sql$").expect("valid regex")
    })
}

fn migration_name_re() -> &'static Regex {
    MIGRATION_NAME_RE.get_or_init(|| Regex::new(r"^[a-zA-Z0-9_\-]+$").expect("valid regex"))
}

/// Parse a migration filename into `(version, name)`.
///
/// Returns `None` for files that are not migrations, including versions that
/// overflow `u64`.
pub fn parse_migration_filename(file_name: &str) -> Option<(u64, Option<String>)> {
    let caps = migration_file_re().captures(file_name)?;
    let version = caps.get(1)?.as_str().parse::<u64>().ok()?;
    let name = caps.get(2).map(|m| m.as_str().to_string());
    Some((version, name))
}

/// Loads migration directories with a fixed dialect and classifier
pub struct MigrationLoader {
    dialect: Box<dyn SqlDialect>,
    classifier: Box<dyn StatementClassifier>,
}

impl MigrationLoader {
    /// Create a loader using the keyword classifier for `dialect`
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect: dialect.sql_dialect(),
            classifier: Box::new(KeywordClassifier::new(dialect.sql_dialect())),
        }
    }

    /// Replace the statement classifier
    pub fn with_classifier(mut self, classifier: Box<dyn StatementClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    /// Load every migration in `dir`, ordered by version
    pub fn load(&self, dir: &Path) -> CoreResult<Migrations> {
        let unreadable = |e: std::io::Error| CoreError::MigrationDirUnreadable {
            path: dir.display().to_string(),
            source: e,
        };

        let mut files: Vec<(String, PathBuf)> = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(unreadable)? {
            let entry = entry.map_err(unreadable)?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if let Some(file_name) = path.file_name().and_then(|n| n.to_str()) {
                files.push((file_name.to_string(), path.clone()));
            }
        }
        // Directory order is platform dependent; sort so collision errors are stable.
        files.sort();

        let mut seen: HashMap<u64, String> = HashMap::new();
        let mut migrations = Vec::new();

        for (file_name, path) in files {
            let Some((version, name)) = parse_migration_filename(&file_name) else {
                log::debug!("Skipping non-migration file {}", file_name);
                continue;
            };
            if version == 0 {
                log::warn!("Skipping {}: migration versions start at 1", file_name);
                continue;
            }

            if let Some(first) = seen.get(&version) {
                return Err(CoreError::VersionCollision {
                    version,
                    first: first.clone(),
                    second: file_name,
                });
            }
            seen.insert(version, file_name.clone());

            migrations.push(self.parse_file(&path, &file_name, version, name)?);
        }

        log::debug!(
            "Loaded {} migration(s) from {}",
            migrations.len(),
            dir.display()
        );
        Ok(Migrations::new(migrations))
    }

    fn parse_file(
        &self,
        path: &Path,
        file_name: &str,
        version: u64,
        name: Option<String>,
    ) -> CoreResult<Migration> {
        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;

        let parse_err = |e: tm_sql::SqlError| CoreError::MigrationParse {
            path: path.display().to_string(),
            source: e,
        };
        let statements =
            split_statements(&content, file_name, self.dialect.as_ref()).map_err(parse_err)?;
        let kind = self
            .classifier
            .classify(&statements, file_name)
            .map_err(parse_err)?;

        Ok(Migration {
            version,
            name,
            statements,
            kind,
            path: path.to_path_buf(),
        })
    }
}

/// Load every migration in `dir` with the default classifier for `dialect`
pub fn load_migrations(dir: &Path, dialect: Dialect) -> CoreResult<Migrations> {
    MigrationLoader::new(dialect).load(dir)
}

/// Create an empty migration file versioned by the current UTC timestamp.
///
/// The directory is created if missing. Returns the path of the new file.
pub fn create_migration_file(dir: &Path, name: Option<&str>) -> CoreResult<PathBuf> {
    if let Some(name) = name {
        if !migration_name_re().is_match(name) {
            return Err(CoreError::InvalidMigrationName {
                name: name.to_string(),
            });
        }
    }

    std::fs::create_dir_all(dir).map_err(|e| CoreError::IoWithPath {
        path: dir.display().to_string(),
        source: e,
    })?;

    let version = chrono::Utc::now()
        .format(NEW_MIGRATION_VERSION_FORMAT)
        .to_string();
    let file_name = match name {
        Some(name) => format!("{version}_{name}.sql"),
        None => format!("{version}.sql"),
    };
    let path = dir.join(file_name);

    std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;

    Ok(path)
}

#[cfg(test)]
#[path = "loader_test.rs"]
mod tests;
