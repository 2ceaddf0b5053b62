use super::*;
use crate::cli::{GlobalArgs, MigrateArgs};
use std::fs;
use tm_db::DuckDbBackend;
use tm_engine::{Migrator, VersionTables};

fn project() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("tidemark.yml"),
        "name: cli_test\nversion_table: SchemaMigrations\n",
    )
    .unwrap();
    let migrations = dir.path().join("migrations");
    fs::create_dir(&migrations).unwrap();
    fs::write(
        migrations.join("000001_singers.sql"),
        "CREATE TABLE Singers (SingerID BIGINT);",
    )
    .unwrap();
    fs::write(
        migrations.join("000002_seed.sql"),
        "INSERT INTO Singers VALUES (1);",
    )
    .unwrap();
    dir
}

fn global(dir: &tempfile::TempDir) -> GlobalArgs {
    GlobalArgs {
        verbose: false,
        project_dir: dir.path().display().to_string(),
        config: None,
        database: Some(dir.path().join("app.duckdb").display().to_string()),
        timeout_secs: None,
    }
}

fn migrate(command: MigrateCommands) -> MigrateArgs {
    MigrateArgs { command }
}

#[test]
fn test_format_version() {
    let clean = SchemaVersion {
        version: 42,
        dirty: false,
    };
    let dirty = SchemaVersion {
        version: 42,
        dirty: true,
    };
    assert_eq!(format_version(&clean), "42");
    assert_eq!(format_version(&dirty), "42 (dirty)");
}

#[tokio::test]
async fn test_up_then_set() {
    let dir = project();
    let global = global(&dir);

    execute(&migrate(MigrateCommands::Up(UpArgs { n: Some(1) })), &global)
        .await
        .unwrap();
    execute(&migrate(MigrateCommands::Up(UpArgs { n: None })), &global)
        .await
        .unwrap();
    execute(
        &migrate(MigrateCommands::Set(SetArgs {
            version: 2,
            dirty: true,
        })),
        &global,
    )
    .await
    .unwrap();

    let err = execute(&migrate(MigrateCommands::Up(UpArgs { n: None })), &global)
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("[M001]"));

    let db = DuckDbBackend::new(global.database.as_deref().unwrap()).unwrap();
    let migrator = Migrator::new(
        std::sync::Arc::new(db),
        VersionTables::new("SchemaMigrations"),
    );
    let version = migrator.current_version().await.unwrap();
    assert_eq!(version.version, 2);
    assert!(version.dirty);
    assert_eq!(migrator.history().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_version_and_history_on_empty_database() {
    let dir = project();
    let global = global(&dir);
    execute(&migrate(MigrateCommands::Version), &global)
        .await
        .unwrap();
    execute(
        &migrate(MigrateCommands::History(HistoryArgs {
            output: HistoryOutput::Json,
        })),
        &global,
    )
    .await
    .unwrap();
    execute(&migrate(MigrateCommands::Status), &global)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_create() {
    let dir = project();
    let global = global(&dir);
    execute(
        &migrate(MigrateCommands::Create(CreateArgs {
            name: Some("add_albums".to_string()),
        })),
        &global,
    )
    .await
    .unwrap();

    let created: Vec<String> = fs::read_dir(dir.path().join("migrations"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|n| n.ends_with("_add_albums.sql"))
        .collect();
    assert_eq!(created.len(), 1);
    assert!(!dir.path().join("app.duckdb").exists());

    let err = execute(
        &migrate(MigrateCommands::Create(CreateArgs {
            name: Some("bad name".to_string()),
        })),
        &global,
    )
    .await;
    assert!(err.is_err());
}

#[tokio::test]
async fn test_out_of_range_timeout_rejected() {
    let dir = project();
    let mut global = global(&dir);
    global.timeout_secs = Some(u64::MAX);

    let err = execute(&migrate(MigrateCommands::Up(UpArgs { n: None })), &global)
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("--timeout-secs"));
    assert!(!dir.path().join("app.duckdb").exists());
}
