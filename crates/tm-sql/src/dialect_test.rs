use super::*;
use std::any::TypeId;

#[test]
fn test_dialect_names() {
    assert_eq!(DuckDbDialect::new().name(), "duckdb");
    assert_eq!(BigQueryDialect::new().name(), "bigquery");
    assert_eq!(GenericDialect::new().name(), "generic");
}

#[test]
fn test_duckdb_lexical_rules() {
    let dialect = DuckDbDialect::new();
    let inner = dialect.parser_dialect();
    assert!(inner.supports_nested_comments());
    assert!(inner.supports_string_escape_constant());
    assert!(!inner.supports_string_literal_backslash_escape());
    assert_eq!(inner.dialect(), TypeId::of::<SqlParserDuckDb>());
}

#[test]
fn test_bigquery_identifiers() {
    let dialect = BigQueryDialect::new();
    assert!(dialect.parser_dialect().is_delimited_identifier_start('`'));
}
