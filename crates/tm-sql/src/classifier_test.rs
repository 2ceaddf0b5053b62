use super::*;
use crate::dialect::BigQueryDialect;

const STMT_DDL: &str = "ALTER TABLE Singers ADD COLUMN Foo VARCHAR";
const STMT_PARTITIONED_DML: &str = "UPDATE Singers SET FirstName = 'Bar' WHERE SingerID = '1'";
const STMT_DML: &str = "INSERT INTO Singers(FirstName) VALUES('Bar')";

fn stmts(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_classify_statement() {
    let classifier = KeywordClassifier::duckdb();
    let cases = [
        (STMT_DDL, StatementKind::Ddl),
        ("CREATE TABLE t (id INT)", StatementKind::Ddl),
        ("DROP TABLE t", StatementKind::Ddl),
        (STMT_PARTITIONED_DML, StatementKind::PartitionedDml),
        ("DELETE FROM Singers WHERE SingerID = '1'", StatementKind::PartitionedDml),
        (STMT_DML, StatementKind::Dml),
        ("insert into t values (1)", StatementKind::Dml),
        ("update t set a = 1", StatementKind::PartitionedDml),
    ];
    for (sql, expected) in cases {
        assert_eq!(classifier.classify_statement(sql), expected, "{sql}");
    }
}

#[test]
fn test_leading_comment_and_hint_are_skipped() {
    let classifier = KeywordClassifier::duckdb();
    assert_eq!(
        classifier.classify_statement("-- backfill\n@{PDML_MAX_PARALLELISM=1} UPDATE t SET a = 1 WHERE TRUE"),
        StatementKind::PartitionedDml
    );
    assert_eq!(
        classifier.classify_statement("/* seed */ INSERT INTO t (id) VALUES (1)"),
        StatementKind::Dml
    );
}

#[test]
fn test_googlesql_dialect() {
    let classifier = KeywordClassifier::new(Box::new(BigQueryDialect::new()));
    assert_eq!(
        classifier.classify_statement("# note\nDELETE FROM `Singers` WHERE TRUE"),
        StatementKind::PartitionedDml
    );
    assert_eq!(
        classifier.classify_statement("CREATE TABLE `Albums` (id INT64) PRIMARY KEY (id)"),
        StatementKind::Ddl
    );
}

#[test]
fn test_keyword_inside_literal_is_not_dml() {
    let classifier = KeywordClassifier::duckdb();
    assert_eq!(
        classifier.classify_statement("CREATE VIEW v AS SELECT 'INSERT' AS op"),
        StatementKind::Ddl
    );
    assert_eq!(
        classifier.classify_statement("CREATE TABLE \"update\" (id INT)"),
        StatementKind::Ddl
    );
}

#[test]
fn test_classify_file_kinds() {
    let classifier = KeywordClassifier::duckdb();

    let kind = classifier.classify(&stmts(&[STMT_DDL, "CREATE INDEX i ON t (a)"]), "a.sql");
    assert_eq!(kind.unwrap(), StatementKind::Ddl);

    let kind = classifier.classify(&stmts(&[STMT_DML, STMT_DML]), "b.sql");
    assert_eq!(kind.unwrap(), StatementKind::Dml);

    let kind = classifier.classify(
        &stmts(&[STMT_PARTITIONED_DML, "DELETE FROM t WHERE a = 1"]),
        "c.sql",
    );
    assert_eq!(kind.unwrap(), StatementKind::PartitionedDml);
}

#[test]
fn test_empty_file_is_ddl() {
    let classifier = KeywordClassifier::duckdb();
    assert_eq!(classifier.classify(&[], "empty.sql").unwrap(), StatementKind::Ddl);
}

#[test]
fn test_update_and_insert_mixed_fails() {
    let classifier = KeywordClassifier::duckdb();
    let result = classifier.classify(&stmts(&[STMT_PARTITIONED_DML, STMT_DML]), "mixed.sql");
    match result {
        Err(SqlError::MixedStatementKinds { file, kinds }) => {
            assert_eq!(file, "mixed.sql");
            assert_eq!(kinds, "DML, PartitionedDML");
        }
        other => panic!("expected mixed kinds error, got {other:?}"),
    }
}

#[test]
fn test_ddl_and_dml_mixed_fails() {
    let classifier = KeywordClassifier::duckdb();
    let result = classifier.classify(&stmts(&[STMT_DDL, STMT_DML]), "mixed.sql");
    assert!(matches!(result, Err(SqlError::MixedStatementKinds { .. })));
}

#[test]
fn test_kind_display() {
    assert_eq!(StatementKind::Ddl.to_string(), "DDL");
    assert_eq!(StatementKind::Dml.to_string(), "DML");
    assert_eq!(StatementKind::PartitionedDml.to_string(), "PartitionedDML");
}
