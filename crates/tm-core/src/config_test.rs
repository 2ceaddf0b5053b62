use super::*;

#[test]
fn test_parse_minimal_config() {
    let config: Config = serde_yaml::from_str("name: test_project").unwrap();
    assert_eq!(config.name, "test_project");
    assert_eq!(config.migrations_dir, "migrations");
    assert_eq!(config.dialect, Dialect::DuckDb);
    assert_eq!(config.database.db_type, DbType::DuckDb);
    assert_eq!(config.database.path, ":memory:");
    assert_eq!(config.version_table, "schema_migrations");
    assert_eq!(config.history_table(), "schema_migrations_history");
    assert_eq!(config.timeout(), Duration::from_secs(3600));

    let root = PathBuf::from("/tmp/test");
    assert_eq!(config.migrations_path_absolute(&root), root.join("migrations"));
}

#[test]
fn test_parse_full_config() {
    let yaml = r#"
name: singers
migrations_dir: db/migrations
dialect: googlesql
database:
  type: duckdb
  path: ./singers.duckdb
version_table: SchemaMigrations
timeout_secs: 60
"#;
    let config: Config = serde_yaml::from_str(yaml).unwrap();
    config.validate().unwrap();
    assert_eq!(config.dialect, Dialect::BigQuery);
    assert_eq!(config.database.path, "./singers.duckdb");
    assert_eq!(config.history_table(), "SchemaMigrations_history");
    assert_eq!(config.timeout(), Duration::from_secs(60));
}

#[test]
fn test_unknown_field_rejected() {
    let result: Result<Config, _> = serde_yaml::from_str("name: x\nmodel_paths: [models]");
    assert!(result.is_err());
}

#[test]
fn test_validate_rejects_bad_table_name() {
    let mut config: Config = serde_yaml::from_str("name: x").unwrap();
    config.version_table = "schema migrations; DROP".to_string();
    assert!(matches!(
        config.validate(),
        Err(CoreError::ConfigInvalid { .. })
    ));
}

#[test]
fn test_validate_rejects_empty_name_and_zero_timeout() {
    let config: Config = serde_yaml::from_str("name: ''").unwrap();
    assert!(config.validate().is_err());

    let config: Config = serde_yaml::from_str("name: x\ntimeout_secs: 0").unwrap();
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_bounds_timeout() {
    let mut config: Config = serde_yaml::from_str("name: x").unwrap();
    config.timeout_secs = MAX_TIMEOUT_SECS;
    assert!(config.validate().is_ok());

    config.timeout_secs = MAX_TIMEOUT_SECS + 1;
    assert!(matches!(
        config.validate(),
        Err(CoreError::ConfigInvalid { .. })
    ));

    assert!(check_timeout_secs(u64::MAX).is_err());
    assert!(check_timeout_secs(1).is_ok());
}

#[test]
fn test_reserved_word_table_name_accepted() {
    // The engine quotes table names, so keywords are fine.
    let mut config: Config = serde_yaml::from_str("name: x").unwrap();
    config.version_table = "order".to_string();
    assert!(config.validate().is_ok());
    assert_eq!(config.history_table(), "order_history");
}

#[test]
fn test_load_from_dir() {
    let dir = tempfile::tempdir().unwrap();
    let result = Config::load_from_dir(dir.path());
    assert!(matches!(result, Err(CoreError::ConfigNotFound { .. })));

    std::fs::write(dir.path().join("tidemark.yaml"), "name: from_yaml\n").unwrap();
    let config = Config::load_from_dir(dir.path()).unwrap();
    assert_eq!(config.name, "from_yaml");
}

#[test]
fn test_is_plain_identifier() {
    assert!(is_plain_identifier("schema_migrations"));
    assert!(is_plain_identifier("_v2"));
    assert!(!is_plain_identifier("2fast"));
    assert!(!is_plain_identifier(""));
    assert!(!is_plain_identifier("a.b"));
}

#[test]
fn test_dialect_builds_tokenizer_dialect() {
    assert_eq!(Dialect::DuckDb.sql_dialect().name(), "duckdb");
    assert_eq!(Dialect::BigQuery.sql_dialect().name(), "bigquery");
    assert_eq!(Dialect::Generic.sql_dialect().name(), "generic");
}
