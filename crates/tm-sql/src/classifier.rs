//! Statement kind classification
//!
//! Each statement is classified by its first meaningful keyword, skipping
//! whitespace, comments and `@{...}` statement hints. A migration file must
//! be single-purpose: every statement has to share one kind.

use serde::{Deserialize, Serialize};
use sqlparser::keywords::Keyword;
use sqlparser::tokenizer::Token;
use std::collections::BTreeSet;
use std::fmt;

use crate::dialect::{DuckDbDialect, SqlDialect};
use crate::error::{SqlError, SqlResult};
use crate::splitter::tokenize;

/// How a migration's statements must be executed
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StatementKind {
    /// Schema change (CREATE/ALTER/DROP/...)
    #[serde(rename = "DDL")]
    Ddl,
    /// Transactional data change (INSERT)
    #[serde(rename = "DML")]
    Dml,
    /// Non-transactional bulk data change (UPDATE/DELETE)
    #[serde(rename = "PartitionedDML")]
    PartitionedDml,
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatementKind::Ddl => write!(f, "DDL"),
            StatementKind::Dml => write!(f, "DML"),
            StatementKind::PartitionedDml => write!(f, "PartitionedDML"),
        }
    }
}

/// Pluggable statement classifier
pub trait StatementClassifier: Send + Sync {
    /// Classify a single statement
    fn classify_statement(&self, statement: &str) -> StatementKind;

    /// Classify a whole file; `file` is used for diagnostics only.
    ///
    /// An empty statement list is a no-op DDL batch.
    fn classify(&self, statements: &[String], file: &str) -> SqlResult<StatementKind> {
        let kinds: BTreeSet<StatementKind> = statements
            .iter()
            .map(|s| self.classify_statement(s))
            .collect();

        let mut iter = kinds.iter();
        match (iter.next(), iter.next()) {
            (None, _) => Ok(StatementKind::Ddl),
            (Some(kind), None) => Ok(*kind),
            _ => Err(SqlError::MixedStatementKinds {
                file: file.to_string(),
                kinds: kinds
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", "),
            }),
        }
    }
}

/// Classifier that looks at the first non-hint keyword of a statement
pub struct KeywordClassifier {
    dialect: Box<dyn SqlDialect>,
}

impl KeywordClassifier {
    /// Create a classifier that tokenizes with the given dialect
    pub fn new(dialect: Box<dyn SqlDialect>) -> Self {
        Self { dialect }
    }

    /// Create a classifier using the DuckDB dialect
    pub fn duckdb() -> Self {
        Self::new(Box::new(DuckDbDialect::new()))
    }
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::duckdb()
    }
}

impl StatementClassifier for KeywordClassifier {
    fn classify_statement(&self, statement: &str) -> StatementKind {
        let Ok(tokens) = tokenize(statement, self.dialect.as_ref()) else {
            return StatementKind::Ddl;
        };

        match first_keyword(&tokens) {
            Some(Keyword::INSERT) => StatementKind::Dml,
            Some(Keyword::UPDATE) | Some(Keyword::DELETE) => StatementKind::PartitionedDml,
            _ => StatementKind::Ddl,
        }
    }
}

/// Return the keyword of the first word token, skipping whitespace,
/// comments and `@{...}` hints.
fn first_keyword(tokens: &[Token]) -> Option<Keyword> {
    let mut iter = tokens
        .iter()
        .filter(|t| !matches!(t, Token::Whitespace(_)))
        .peekable();

    while let Some(token) = iter.next() {
        match token {
            Token::AtSign if matches!(iter.peek(), Some(Token::LBrace)) => {
                let mut depth = 0usize;
                for inner in iter.by_ref() {
                    match inner {
                        Token::LBrace => depth += 1,
                        Token::RBrace => {
                            depth -= 1;
                            if depth == 0 {
                                break;
                            }
                        }
                        _ => {}
                    }
                }
            }
            Token::Word(word) => return Some(word.keyword),
            _ => return None,
        }
    }
    None
}

#[cfg(test)]
#[path = "classifier_test.rs"]
mod tests;
