//! Database trait definition

use crate::error::DbResult;
use crate::row::{Row, RowKey};
use async_trait::async_trait;
use std::collections::BTreeSet;

/// Execution capability the migration engine calls through
///
/// Implementations must be Send + Sync for async operation.
#[async_trait]
pub trait Database: Send + Sync {
    /// Apply schema-change statements as one administrative operation,
    /// returning once the backend confirms completion
    async fn execute_schema_change(&self, statements: &[String]) -> DbResult<()>;

    /// Run statements inside one read-write transaction, returning the total
    /// number of affected rows
    async fn execute_transactional_update(&self, statements: &[String]) -> DbResult<i64>;

    /// Run one statement outside any explicit transaction, returning the
    /// number of affected rows
    async fn execute_bulk_update(&self, statement: &str) -> DbResult<i64>;

    /// Read at most one row of `columns` from `table`, optionally filtered by key
    async fn read_single_row(
        &self,
        table: &str,
        key: Option<RowKey<'_>>,
        columns: &[&str],
    ) -> DbResult<Option<Row>>;

    /// Read all rows of `columns` from `table`, optionally ordered by a column
    async fn read_rows(
        &self,
        table: &str,
        columns: &[&str],
        order_by: Option<&str>,
    ) -> DbResult<Vec<Row>>;

    /// Check if a table exists
    async fn table_exists(&self, name: &str) -> DbResult<bool>;

    /// Return the subset of `names` that exist as tables
    async fn existing_tables(&self, names: &[&str]) -> DbResult<BTreeSet<String>> {
        let mut found = BTreeSet::new();
        for name in names {
            if self.table_exists(name).await? {
                found.insert((*name).to_string());
            }
        }
        Ok(found)
    }

    /// Quote an identifier so reserved words and mixed case survive
    fn quote_ident(&self, ident: &str) -> String {
        format!("\"{}\"", ident.replace('"', "\"\""))
    }
}
