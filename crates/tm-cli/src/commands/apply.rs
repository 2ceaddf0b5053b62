//! Apply command implementation
//!
//! Runs one SQL file directly. The version store is not consulted or updated.

use anyhow::{Context, Result};
use std::path::Path;
use tm_db::Database;
use tm_sql::split_statements;

use crate::cli::{ApplyArgs, GlobalArgs};
use crate::context::RuntimeContext;

/// Execute the apply command
pub async fn execute(args: &ApplyArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let dialect = ctx.config.dialect.sql_dialect();

    match (&args.ddl, &args.dml) {
        (Some(file), None) => {
            let statements = read_statements(file, dialect.as_ref())?;
            apply_ddl(ctx.db.as_ref(), &statements).await?;
        }
        (None, Some(file)) => {
            let statements = read_statements(file, dialect.as_ref())?;
            let rows = apply_dml(ctx.db.as_ref(), &statements, args.partitioned).await?;
            println!("{rows} rows affected.");
        }
        _ => anyhow::bail!("Specify exactly one of --ddl or --dml"),
    }
    Ok(())
}

fn read_statements(file: &str, dialect: &dyn tm_sql::SqlDialect) -> Result<Vec<String>> {
    let path = Path::new(file);
    let sql = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.to_string());
    Ok(split_statements(&sql, &name, dialect)?)
}

pub(crate) async fn apply_ddl(db: &dyn Database, statements: &[String]) -> Result<()> {
    if statements.is_empty() {
        return Ok(());
    }
    db.execute_schema_change(statements)
        .await
        .context("Failed to apply DDL")
}

pub(crate) async fn apply_dml(
    db: &dyn Database,
    statements: &[String],
    partitioned: bool,
) -> Result<i64> {
    if !partitioned {
        return db
            .execute_transactional_update(statements)
            .await
            .context("Failed to apply DML");
    }
    let mut total = 0;
    for statement in statements {
        total += db
            .execute_bulk_update(statement)
            .await
            .with_context(|| format!("Failed to apply partitioned DML: {statement}"))?;
    }
    Ok(total)
}

#[cfg(test)]
#[path = "apply_test.rs"]
mod tests;
