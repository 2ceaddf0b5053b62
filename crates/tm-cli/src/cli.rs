//! CLI argument definitions using clap derive API

use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};

/// Tidemark - versioned schema and data migrations
#[derive(Parser, Debug)]
#[command(name = "tm")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Override database path from config
    #[arg(short, long, global = true, env = "TIDEMARK_DATABASE")]
    pub database: Option<String>,

    /// Override the run deadline from config, in seconds
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage versioned migrations
    Migrate(MigrateArgs),

    /// Apply a single SQL file without recording a version
    Apply(ApplyArgs),
}

/// Arguments for the migrate command
#[derive(Args, Debug)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub command: MigrateCommands,
}

/// Migrate subcommands
#[derive(Subcommand, Debug)]
pub enum MigrateCommands {
    /// Apply all or N pending migrations
    Up(UpArgs),

    /// Print the current version
    Version,

    /// Force the recorded version without running migrations
    Set(SetArgs),

    /// Create a new empty migration file
    Create(CreateArgs),

    /// Print the per-version history ledger
    History(HistoryArgs),

    /// Print the state of the version tables
    Status,
}

/// Arguments for migrate up
#[derive(Args, Debug)]
pub struct UpArgs {
    /// Number of migrations to apply; omit or pass a negative value for all
    #[arg(allow_negative_numbers = true)]
    pub n: Option<i64>,
}

impl UpArgs {
    /// Migration limit passed to the engine, `None` meaning unlimited
    pub fn limit(&self) -> Option<usize> {
        self.n.and_then(|n| usize::try_from(n).ok())
    }
}

/// Arguments for migrate set
#[derive(Args, Debug)]
pub struct SetArgs {
    /// Version to record
    pub version: u64,

    /// Record the version as dirty
    #[arg(long)]
    pub dirty: bool,
}

/// Arguments for migrate create
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Optional migration name ([a-zA-Z0-9_-]+)
    pub name: Option<String>,
}

/// Arguments for migrate history
#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: HistoryOutput,
}

/// History output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryOutput {
    /// Table format
    Table,
    /// JSON output
    Json,
}

/// Arguments for the apply command
#[derive(Args, Debug)]
#[command(group(ArgGroup::new("mode").required(true).args(["ddl", "dml"])))]
pub struct ApplyArgs {
    /// SQL file of schema-change statements
    #[arg(long, value_name = "FILE")]
    pub ddl: Option<String>,

    /// SQL file of data-modification statements
    #[arg(long, value_name = "FILE")]
    pub dml: Option<String>,

    /// Run DML statements one by one outside a transaction
    #[arg(long, requires = "dml")]
    pub partitioned: bool,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
