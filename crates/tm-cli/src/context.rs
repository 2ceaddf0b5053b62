//! Runtime context for CLI commands

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tm_core::config::check_timeout_secs;
use tm_core::{load_migrations, Config, Migrations};
use tm_db::{Database, DuckDbBackend};
use tm_engine::{Migrator, VersionTables};

use crate::cli::GlobalArgs;

/// Loaded configuration plus an open database connection
pub(crate) struct RuntimeContext {
    /// Project root directory
    pub root: PathBuf,

    /// Validated project configuration
    pub config: Config,

    /// Database connection
    pub db: Arc<dyn Database>,

    /// Run deadline after CLI overrides
    pub timeout: Duration,
}

impl RuntimeContext {
    /// Load configuration and connect to the database
    pub fn new(args: &GlobalArgs) -> Result<Self> {
        let (root, mut config) = load_config(args)?;
        if let Some(secs) = args.timeout_secs {
            check_timeout_secs(secs).context("Invalid --timeout-secs")?;
            config.timeout_secs = secs;
        }

        let db_path = args.database.as_deref().unwrap_or(&config.database.path);
        log::debug!("Connecting to {} database at {db_path}", config.database.db_type);
        let db: Arc<dyn Database> =
            Arc::new(DuckDbBackend::new(db_path).context("Failed to connect to database")?);

        let timeout = config.timeout();

        Ok(Self {
            root,
            config,
            db,
            timeout,
        })
    }

    /// Migrator bound to this context's database, version table and deadline
    pub fn migrator(&self) -> Migrator {
        Migrator::new(
            Arc::clone(&self.db),
            VersionTables::new(&self.config.version_table),
        )
        .with_timeout(self.timeout)
    }

    /// Load every migration file from the configured directory
    pub fn load_migrations(&self) -> Result<Migrations> {
        let dir = self.config.migrations_path_absolute(&self.root);
        load_migrations(&dir, self.config.dialect)
            .with_context(|| format!("Failed to load migrations from {}", dir.display()))
    }
}

/// Load config from the `--config` path or the project directory
pub(crate) fn load_config(args: &GlobalArgs) -> Result<(PathBuf, Config)> {
    let root = PathBuf::from(&args.project_dir);
    let config = match &args.config {
        Some(path) => {
            Config::load(Path::new(path)).context("Failed to load configuration file")?
        }
        None => Config::load_from_dir(&root).context("Failed to load project configuration")?,
    };
    Ok((root, config))
}
