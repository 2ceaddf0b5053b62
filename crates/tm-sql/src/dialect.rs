//! SQL dialect abstraction

use sqlparser::dialect::{
    BigQueryDialect as SqlParserBigQuery, Dialect, DuckDbDialect as SqlParserDuckDb,
    GenericDialect as SqlParserGeneric,
};
use std::any::TypeId;

/// Trait for SQL dialect implementations
///
/// The dialect decides how the tokenizer treats quoting and comments, which
/// is what keeps a `;` inside a literal from splitting a statement.
pub trait SqlDialect: Send + Sync {
    /// Get the underlying sqlparser dialect
    fn parser_dialect(&self) -> &dyn Dialect;

    /// Get the dialect name
    fn name(&self) -> &'static str;
}

/// DuckDB SQL dialect
pub struct DuckDbDialect {
    dialect: DuckDbLexical,
}

impl DuckDbDialect {
    /// Create a new DuckDB dialect
    pub fn new() -> Self {
        Self {
            dialect: DuckDbLexical(SqlParserDuckDb {}),
        }
    }
}

/// sqlparser's DuckDB dialect plus the lexical rules DuckDB accepts but the
/// upstream dialect does not enable: nested block comments and `E'...'`
/// escape strings.
#[derive(Debug)]
struct DuckDbLexical(SqlParserDuckDb);

impl Dialect for DuckDbLexical {
    fn dialect(&self) -> TypeId {
        self.0.dialect()
    }

    fn is_identifier_start(&self, ch: char) -> bool {
        self.0.is_identifier_start(ch)
    }

    fn is_identifier_part(&self, ch: char) -> bool {
        self.0.is_identifier_part(ch)
    }

    fn is_delimited_identifier_start(&self, ch: char) -> bool {
        self.0.is_delimited_identifier_start(ch)
    }

    fn supports_nested_comments(&self) -> bool {
        true
    }

    fn supports_string_escape_constant(&self) -> bool {
        true
    }
}

impl Default for DuckDbDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlDialect for DuckDbDialect {
    fn parser_dialect(&self) -> &dyn Dialect {
        &self.dialect
    }

    fn name(&self) -> &'static str {
        "duckdb"
    }
}

/// GoogleSQL-style dialect (backtick identifiers, `#` comments, triple-quoted strings)
pub struct BigQueryDialect {
    dialect: SqlParserBigQuery,
}

impl BigQueryDialect {
    /// Create a new BigQuery/GoogleSQL dialect
    pub fn new() -> Self {
        Self {
            dialect: SqlParserBigQuery {},
        }
    }
}

impl Default for BigQueryDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlDialect for BigQueryDialect {
    fn parser_dialect(&self) -> &dyn Dialect {
        &self.dialect
    }

    fn name(&self) -> &'static str {
        "bigquery"
    }
}

/// ANSI-leaning generic dialect
pub struct GenericDialect {
    dialect: SqlParserGeneric,
}

impl GenericDialect {
    /// Create a new generic dialect
    pub fn new() -> Self {
        Self {
            dialect: SqlParserGeneric {},
        }
    }
}

impl Default for GenericDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlDialect for GenericDialect {
    fn parser_dialect(&self) -> &dyn Dialect {
        &self.dialect
    }

    fn name(&self) -> &'static str {
        "generic"
    }
}

#[cfg(test)]
#[path = "dialect_test.rs"]
mod tests;
