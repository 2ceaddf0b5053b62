//! Migrate command implementation

use anyhow::{Context, Result};
use tm_core::create_migration_file;
use tm_engine::{EngineError, HistoryRecord, SchemaVersion};

use crate::cli::{
    CreateArgs, GlobalArgs, HistoryArgs, HistoryOutput, MigrateArgs, MigrateCommands, SetArgs,
    UpArgs,
};
use crate::context::{load_config, RuntimeContext};

/// Execute the migrate command
pub async fn execute(args: &MigrateArgs, global: &GlobalArgs) -> Result<()> {
    match &args.command {
        MigrateCommands::Up(up) => execute_up(up, global).await,
        MigrateCommands::Version => execute_version(global).await,
        MigrateCommands::Set(set) => execute_set(set, global).await,
        MigrateCommands::Create(create) => execute_create(create, global),
        MigrateCommands::History(history) => execute_history(history, global).await,
        MigrateCommands::Status => execute_status(global).await,
    }
}

async fn execute_up(args: &UpArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let migrations = ctx.load_migrations()?;
    log::info!(
        "Loaded {} migrations from {}",
        migrations.len(),
        ctx.config.migrations_dir
    );

    let report = ctx
        .migrator()
        .up(&migrations, args.limit())
        .await
        .context("Migration failed")?;

    if report.is_empty() {
        println!("no change");
    }
    for applied in &report.applied {
        println!("{}", applied.label());
    }
    Ok(())
}

async fn execute_version(global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    match ctx.migrator().current_version().await {
        Ok(version) => println!("{}", format_version(&version)),
        Err(EngineError::NoMigration) => println!("No migrations."),
        Err(e) => return Err(e).context("Failed to read version"),
    }
    Ok(())
}

async fn execute_set(args: &SetArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    ctx.migrator()
        .set_version(args.version, args.dirty)
        .await
        .with_context(|| format!("Failed to set version {}", args.version))?;
    println!(
        "{}",
        format_version(&SchemaVersion {
            version: args.version,
            dirty: args.dirty,
        })
    );
    Ok(())
}

fn execute_create(args: &CreateArgs, global: &GlobalArgs) -> Result<()> {
    let (root, config) = load_config(global)?;
    let dir = config.migrations_path_absolute(&root);
    let path = create_migration_file(&dir, args.name.as_deref())
        .context("Failed to create migration file")?;
    println!("{}", path.display());
    Ok(())
}

async fn execute_history(args: &HistoryArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let history = ctx
        .migrator()
        .history()
        .await
        .context("Failed to read history")?;

    match args.output {
        HistoryOutput::Json => println!("{}", serde_json::to_string_pretty(&history)?),
        HistoryOutput::Table => print_history_table(&history),
    }
    Ok(())
}

async fn execute_status(global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let migrator = ctx.migrator();
    let status = migrator
        .determine_upgrade_status()
        .await
        .context("Failed to inspect version tables")?;

    println!("Version table: {}", ctx.config.version_table);
    println!("History table: {}", ctx.config.history_table());
    println!("State:         {status}");

    let pending = match migrator.current_version().await {
        Ok(version) => {
            println!("Version:       {}", format_version(&version));
            version.version
        }
        Err(EngineError::NoMigration) => {
            println!("Version:       none");
            0
        }
        Err(e) => return Err(e).context("Failed to read version"),
    };
    let migrations = ctx.load_migrations()?;
    println!("Pending:       {}", migrations.pending_after(pending).count());
    Ok(())
}

fn format_version(version: &SchemaVersion) -> String {
    if version.dirty {
        format!("{} (dirty)", version.version)
    } else {
        version.version.to_string()
    }
}

fn print_history_table(history: &[HistoryRecord]) {
    if history.is_empty() {
        println!("No history.");
        return;
    }
    println!(
        "{:<20} {:<6} {:<20} {:<20}",
        "VERSION", "DIRTY", "CREATED", "MODIFIED"
    );
    for record in history {
        println!(
            "{:<20} {:<6} {:<20} {:<20}",
            record.version,
            record.dirty,
            record.created.format("%Y-%m-%d %H:%M:%S"),
            record.modified.format("%Y-%m-%d %H:%M:%S"),
        );
    }
}

#[cfg(test)]
#[path = "migrate_test.rs"]
mod tests;
