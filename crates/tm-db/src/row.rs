//! Backend-neutral row representation

use crate::error::{DbError, DbResult};
use chrono::{DateTime, Utc};

/// A single column value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Text(String),
    Timestamp(DateTime<Utc>),
}

/// Primary-key filter for [`crate::Database::read_single_row`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowKey<'a> {
    pub column: &'a str,
    pub value: i64,
}

impl<'a> RowKey<'a> {
    pub fn new(column: &'a str, value: i64) -> Self {
        Self { column, value }
    }
}

/// One result row with named columns
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Vec<String>,
    values: Vec<Value>,
}

impl Row {
    /// Build a row from parallel column/value lists
    pub fn new(columns: Vec<String>, values: Vec<Value>) -> Self {
        Self { columns, values }
    }

    /// Raw value of a column
    pub fn get(&self, column: &str) -> DbResult<&Value> {
        self.columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(column))
            .and_then(|idx| self.values.get(idx))
            .ok_or_else(|| DbError::RowDecode {
                column: column.to_string(),
                message: "no such column".to_string(),
            })
    }

    pub fn get_i64(&self, column: &str) -> DbResult<i64> {
        match self.get(column)? {
            Value::Int(v) => Ok(*v),
            other => Err(type_mismatch(column, "integer", other)),
        }
    }

    pub fn get_bool(&self, column: &str) -> DbResult<bool> {
        match self.get(column)? {
            Value::Bool(v) => Ok(*v),
            other => Err(type_mismatch(column, "boolean", other)),
        }
    }

    pub fn get_timestamp(&self, column: &str) -> DbResult<DateTime<Utc>> {
        match self.get(column)? {
            Value::Timestamp(v) => Ok(*v),
            other => Err(type_mismatch(column, "timestamp", other)),
        }
    }

    pub fn get_text(&self, column: &str) -> DbResult<&str> {
        match self.get(column)? {
            Value::Text(v) => Ok(v),
            other => Err(type_mismatch(column, "text", other)),
        }
    }
}

fn type_mismatch(column: &str, expected: &str, found: &Value) -> DbError {
    DbError::RowDecode {
        column: column.to_string(),
        message: format!("expected {expected}, found {found:?}"),
    }
}
