use super::*;
use crate::dialect::{BigQueryDialect, DuckDbDialect};

fn split(sql: &str) -> Vec<String> {
    split_statements(sql, "test.sql", &DuckDbDialect::new()).unwrap()
}

#[test]
fn test_split_simple() {
    let stmts = split("CREATE TABLE a (id INT);\nCREATE TABLE b (id INT);\n");
    assert_eq!(stmts, vec!["CREATE TABLE a (id INT)", "CREATE TABLE b (id INT)"]);
}

#[test]
fn test_split_without_trailing_semicolon() {
    let stmts = split("CREATE TABLE a (id INT);\nCREATE TABLE b (id INT)");
    assert_eq!(stmts.len(), 2);
    assert_eq!(stmts[1], "CREATE TABLE b (id INT)");
}

#[test]
fn test_semicolon_inside_string_literal() {
    let stmts = split("INSERT INTO t VALUES ('a;b');\nINSERT INTO t VALUES ('c');");
    assert_eq!(
        stmts,
        vec!["INSERT INTO t VALUES ('a;b')", "INSERT INTO t VALUES ('c')"]
    );
}

#[test]
fn test_escaped_quote_preserved() {
    let stmts = split("INSERT INTO t VALUES ('it''s; fine');");
    assert_eq!(stmts, vec!["INSERT INTO t VALUES ('it''s; fine')"]);
}

#[test]
fn test_semicolon_inside_quoted_identifier() {
    let stmts = split("CREATE TABLE \"odd;name\" (id INT);");
    assert_eq!(stmts, vec!["CREATE TABLE \"odd;name\" (id INT)"]);
}

#[test]
fn test_comments_stripped() {
    let sql = "-- leading comment; with a separator\nCREATE TABLE a (id INT); /* block; comment */\nCREATE TABLE b (id INT);";
    let stmts = split(sql);
    assert_eq!(stmts, vec!["CREATE TABLE a (id INT)", "CREATE TABLE b (id INT)"]);
}

#[test]
fn test_trailing_line_comment_does_not_fuse_tokens() {
    let stmts = split("SELECT 1 -- note\nFROM t;");
    assert_eq!(stmts.len(), 1);
    assert!(!stmts[0].contains("note"));
    assert!(stmts[0].starts_with("SELECT 1"));
    assert!(stmts[0].ends_with("FROM t"));
}

#[test]
fn test_empty_and_comment_only_input() {
    assert!(split("").is_empty());
    assert!(split("  \n\t ").is_empty());
    assert!(split("-- nothing here\n/* nor here */").is_empty());
    assert!(split(";;\n;").is_empty());
}

#[test]
fn test_hash_comments_in_googlesql() {
    let sql = "# schema; v2\nALTER TABLE Singers ADD COLUMN Foo STRING(MAX);";
    let stmts = split_statements(sql, "v2.sql", &BigQueryDialect::new()).unwrap();
    assert_eq!(stmts, vec!["ALTER TABLE Singers ADD COLUMN Foo STRING(MAX)"]);
}

#[test]
fn test_unterminated_string_reports_file() {
    let result = split_statements("INSERT INTO t VALUES ('oops);", "broken.sql", &DuckDbDialect::new());
    match result {
        Err(SqlError::Tokenize { file, line, .. }) => {
            assert_eq!(file, "broken.sql");
            assert_eq!(line, 1);
        }
        other => panic!("expected tokenize error, got {other:?}"),
    }
}

#[test]
fn test_nested_block_comment() {
    let stmts = split(
        "CREATE TABLE n1 AS SELECT 1 /* outer /* inner */ still; comment */ AS x;\nCREATE TABLE n2 (id INT);",
    );
    assert_eq!(
        stmts,
        vec!["CREATE TABLE n1 AS SELECT 1   AS x", "CREATE TABLE n2 (id INT)"]
    );
}

#[test]
fn test_escape_string_constant() {
    let stmts = split("INSERT INTO t VALUES (E'a\\'b; c');\nINSERT INTO t VALUES (e'\\n');");
    assert_eq!(
        stmts,
        vec![
            "INSERT INTO t VALUES (E'a\\'b; c')",
            "INSERT INTO t VALUES (e'\\n')"
        ]
    );
}

#[test]
fn test_literals_kept_as_written() {
    let stmts = split("INSERT INTO t VALUES (0x1F, 1e3, 'héllo; wörld', $$x;y$$);");
    assert_eq!(
        stmts,
        vec!["INSERT INTO t VALUES (0x1F, 1e3, 'héllo; wörld', $$x;y$$)"]
    );
}

#[test]
fn test_statement_text_spans_lines() {
    let stmts = split("CREATE TABLE café (\n\tid INT,\n\tname VARCHAR\n);\n");
    assert_eq!(stmts, vec!["CREATE TABLE café (\n\tid INT,\n\tname VARCHAR\n)"]);
}
