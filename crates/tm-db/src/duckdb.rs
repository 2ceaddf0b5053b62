//! DuckDB database backend implementation

use crate::error::{DbError, DbResult};
use crate::row::{Row, RowKey, Value};
use crate::traits::Database;
use async_trait::async_trait;
use chrono::DateTime;
use duckdb::types::{TimeUnit, Value as DuckValue};
use duckdb::{Connection, InterruptHandle};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// DuckDB database backend
///
/// DuckDB supports transactional DDL, so schema changes run inside one
/// transaction just like transactional updates.
///
/// Every call runs on the blocking thread pool. Dropping the returned future
/// before it completes (for example from `tokio::time::timeout`) interrupts
/// the statement in flight and skips the remaining ones, so an abandoned
/// transaction rolls back instead of running to completion.
pub struct DuckDbBackend {
    conn: Arc<Mutex<Connection>>,
    interrupt: Arc<InterruptHandle>,
}

impl DuckDbBackend {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self::from_connection(conn))
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{e}: {}", path.display())))?;
        Ok(Self::from_connection(conn))
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    fn from_connection(conn: Connection) -> Self {
        let interrupt = conn.interrupt_handle();
        Self {
            conn: Arc::new(Mutex::new(conn)),
            interrupt,
        }
    }

    /// Run `work` against the connection on the blocking pool.
    ///
    /// `work` receives a flag that turns true once the caller stops waiting;
    /// multi-statement work checks it before each statement.
    async fn run_blocking<T, F>(&self, work: F) -> DbResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection, &AtomicBool) -> DbResult<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        let cancelled = Arc::new(AtomicBool::new(false));
        let mut guard = InterruptOnDrop {
            cancelled: Arc::clone(&cancelled),
            interrupt: Arc::clone(&self.interrupt),
            armed: true,
        };

        let joined = tokio::task::spawn_blocking(move || {
            let conn = lock(&conn)?;
            work(&conn, &cancelled)
        })
        .await;
        guard.armed = false;

        joined.map_err(|e| DbError::ExecutionError(format!("database task failed: {e}")))?
    }
}

/// Interrupts the connection if the waiting future is dropped early.
struct InterruptOnDrop {
    cancelled: Arc<AtomicBool>,
    interrupt: Arc<InterruptHandle>,
    armed: bool,
}

impl Drop for InterruptOnDrop {
    fn drop(&mut self) {
        if self.armed {
            self.cancelled.store(true, Ordering::SeqCst);
            self.interrupt.interrupt();
            log::debug!("Interrupted in-flight DuckDB statement");
        }
    }
}

fn lock(conn: &Mutex<Connection>) -> DbResult<MutexGuard<'_, Connection>> {
    conn.lock().map_err(|e| DbError::MutexPoisoned(e.to_string()))
}

/// Execute `body` within a `BEGIN` / `COMMIT` transaction, rolling back on
/// error.
fn with_transaction<F, T>(conn: &Connection, body: F) -> DbResult<T>
where
    F: FnOnce(&Connection) -> DbResult<T>,
{
    conn.execute_batch("BEGIN TRANSACTION")
        .map_err(|e| DbError::TransactionError(format!("BEGIN failed: {e}")))?;

    let result = body(conn);

    match &result {
        Ok(_) => {
            if let Err(commit_err) = conn.execute_batch("COMMIT") {
                let _ = conn.execute_batch("ROLLBACK");
                return Err(DbError::TransactionError(format!(
                    "COMMIT failed: {commit_err}"
                )));
            }
        }
        Err(_) => {
            let _ = conn.execute_batch("ROLLBACK");
        }
    }
    result
}

fn check_cancelled(cancelled: &AtomicBool) -> DbResult<()> {
    if cancelled.load(Ordering::SeqCst) {
        return Err(DbError::Interrupted(
            "caller stopped waiting before the statement started".to_string(),
        ));
    }
    Ok(())
}

/// Execute a single statement, returning affected rows
fn execute_on(conn: &Connection, sql: &str, cancelled: &AtomicBool) -> DbResult<i64> {
    conn.execute(sql, [])
        .map(|n| n as i64)
        .map_err(|e| statement_error(e, sql, cancelled))
}

fn statement_error(err: duckdb::Error, sql: &str, cancelled: &AtomicBool) -> DbError {
    if cancelled.load(Ordering::SeqCst) {
        DbError::Interrupted(format!("{err}: {sql}"))
    } else {
        DbError::ExecutionError(format!("{err}: {sql}"))
    }
}

/// Run a query binding integer parameters and decode every row
fn query_rows(
    conn: &Connection,
    sql: &str,
    columns: &[String],
    params: &[i64],
) -> DbResult<Vec<Row>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(duckdb::params_from_iter(params.iter()))?;

    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        let mut values = Vec::with_capacity(columns.len());
        for idx in 0..columns.len() {
            let value: DuckValue = row.get(idx)?;
            values.push(convert_value(value));
        }
        out.push(Row::new(columns.to_vec(), values));
    }
    Ok(out)
}

fn table_exists_on(conn: &Connection, name: &str) -> DbResult<bool> {
    // Handle schema-qualified names
    let (schema, table) = match name.rfind('.') {
        Some(pos) => (&name[..pos], &name[pos + 1..]),
        None => ("main", name),
    };

    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM information_schema.tables WHERE table_schema = ? AND table_name = ?",
        duckdb::params![schema, table],
        |row| row.get(0),
    )?;

    Ok(count > 0)
}

fn convert_value(value: DuckValue) -> Value {
    match value {
        DuckValue::Null => Value::Null,
        DuckValue::Boolean(v) => Value::Bool(v),
        DuckValue::TinyInt(v) => Value::Int(v.into()),
        DuckValue::SmallInt(v) => Value::Int(v.into()),
        DuckValue::Int(v) => Value::Int(v.into()),
        DuckValue::BigInt(v) => Value::Int(v),
        DuckValue::UTinyInt(v) => Value::Int(v.into()),
        DuckValue::USmallInt(v) => Value::Int(v.into()),
        DuckValue::UInt(v) => Value::Int(v.into()),
        DuckValue::UBigInt(v) => i64::try_from(v)
            .map(Value::Int)
            .unwrap_or_else(|_| Value::Text(v.to_string())),
        DuckValue::HugeInt(v) => i64::try_from(v)
            .map(Value::Int)
            .unwrap_or_else(|_| Value::Text(v.to_string())),
        DuckValue::Text(v) => Value::Text(v),
        DuckValue::Timestamp(unit, raw) => {
            let micros = match unit {
                TimeUnit::Second => raw.saturating_mul(1_000_000),
                TimeUnit::Millisecond => raw.saturating_mul(1_000),
                TimeUnit::Microsecond => raw,
                TimeUnit::Nanosecond => raw / 1_000,
            };
            DateTime::from_timestamp_micros(micros)
                .map(Value::Timestamp)
                .unwrap_or(Value::Null)
        }
        other => Value::Text(format!("{other:?}")),
    }
}

#[async_trait]
impl Database for DuckDbBackend {
    async fn execute_schema_change(&self, statements: &[String]) -> DbResult<()> {
        let statements = statements.to_vec();
        self.run_blocking(move |conn, cancelled| {
            with_transaction(conn, |conn| {
                for statement in &statements {
                    check_cancelled(cancelled)?;
                    log::debug!("DDL: {}", statement);
                    conn.execute_batch(statement)
                        .map_err(|e| statement_error(e, statement, cancelled))?;
                }
                Ok(())
            })
        })
        .await
    }

    async fn execute_transactional_update(&self, statements: &[String]) -> DbResult<i64> {
        let statements = statements.to_vec();
        self.run_blocking(move |conn, cancelled| {
            with_transaction(conn, |conn| {
                let mut affected = 0i64;
                for statement in &statements {
                    check_cancelled(cancelled)?;
                    log::debug!("DML: {}", statement);
                    affected += execute_on(conn, statement, cancelled)?;
                }
                Ok(affected)
            })
        })
        .await
    }

    async fn execute_bulk_update(&self, statement: &str) -> DbResult<i64> {
        let statement = statement.to_string();
        self.run_blocking(move |conn, cancelled| {
            check_cancelled(cancelled)?;
            log::debug!("Bulk DML: {}", statement);
            execute_on(conn, &statement, cancelled)
        })
        .await
    }

    async fn read_single_row(
        &self,
        table: &str,
        key: Option<RowKey<'_>>,
        columns: &[&str],
    ) -> DbResult<Option<Row>> {
        let select = columns.join(", ");
        let (sql, params) = match key {
            Some(key) => (
                format!(
                    "SELECT {select} FROM {table} WHERE {} = ? LIMIT 1",
                    key.column
                ),
                vec![key.value],
            ),
            None => (format!("SELECT {select} FROM {table} LIMIT 1"), Vec::new()),
        };
        let columns = owned(columns);
        let rows = self
            .run_blocking(move |conn, _| query_rows(conn, &sql, &columns, &params))
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn read_rows(
        &self,
        table: &str,
        columns: &[&str],
        order_by: Option<&str>,
    ) -> DbResult<Vec<Row>> {
        let select = columns.join(", ");
        let sql = match order_by {
            Some(column) => format!("SELECT {select} FROM {table} ORDER BY {column}"),
            None => format!("SELECT {select} FROM {table}"),
        };
        let columns = owned(columns);
        self.run_blocking(move |conn, _| query_rows(conn, &sql, &columns, &[]))
            .await
    }

    async fn table_exists(&self, name: &str) -> DbResult<bool> {
        let name = name.to_string();
        self.run_blocking(move |conn, _| table_exists_on(conn, &name))
            .await
    }
}

fn owned(columns: &[&str]) -> Vec<String> {
    columns.iter().map(|c| c.to_string()).collect()
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
