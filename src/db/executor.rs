/// Execution Module
///
/// Runs built statements against the live connection. Reads decode
/// positional rows; writes run in one of two modes:
///
/// - **Autocommit** (default): execute and commit immediately. Failures
///   propagate to the caller, constraint violations as `Integrity`.
/// - **Atomic**: wrap the statement in an exclusive transaction with
///   exactly one commit or one rollback. Statement and commit failures
///   are rolled back and logged, never raised; the returned
///   `WriteReport` carries the success/failure signal instead.
use crate::core::{ReflectqlError, Result};
use crate::db::builder::Statement;
use crate::value::{Row, Value};
use rusqlite::{params_from_iter, Connection, ErrorCode, TransactionBehavior};
use tracing::error;

/// Write execution mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Execute and commit immediately; failures propagate
    #[default]
    Autocommit,
    /// Exclusive transaction; failures roll back and are logged
    Atomic,
}

/// Outcome of a write. `committed` is false only for atomic writes that
/// rolled back; autocommit failures surface as errors instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteReport {
    pub committed: bool,
    pub rows_affected: usize,
}

/// Classifies a driver error, separating constraint violations from
/// other store-native failures.
fn classify(e: rusqlite::Error) -> ReflectqlError {
    match &e {
        rusqlite::Error::SqliteFailure(code, _)
            if code.code == ErrorCode::ConstraintViolation =>
        {
            ReflectqlError::Integrity(e.to_string())
        }
        _ => ReflectqlError::Database(e),
    }
}

fn run(conn: &Connection, stmt: &Statement) -> Result<usize> {
    conn.execute(&stmt.sql, params_from_iter(stmt.params.iter()))
        .map_err(classify)
}

/// Executes a write statement in the requested mode.
///
/// # Errors
///
/// Autocommit mode surfaces every failure (`Integrity` for constraint
/// violations, `Database` otherwise). Atomic mode only fails when the
/// transaction boundary itself cannot be opened (`Transaction`); all
/// later failures roll back, log, and report `committed: false`.
pub fn execute_write(conn: &mut Connection, stmt: &Statement, mode: WriteMode) -> Result<WriteReport> {
    match mode {
        WriteMode::Autocommit => {
            let rows_affected = run(conn, stmt)?;
            Ok(WriteReport {
                committed: true,
                rows_affected,
            })
        }
        WriteMode::Atomic => {
            let tx = conn
                .transaction_with_behavior(TransactionBehavior::Exclusive)
                .map_err(|e| {
                    ReflectqlError::Transaction(format!(
                        "failed to begin exclusive transaction: {}",
                        e
                    ))
                })?;

            match run(&tx, stmt) {
                Ok(rows_affected) => match tx.commit() {
                    Ok(()) => Ok(WriteReport {
                        committed: true,
                        rows_affected,
                    }),
                    Err(e) => {
                        error!(error = %e, sql = %stmt.sql, "atomic commit failed; rolled back");
                        Ok(WriteReport {
                            committed: false,
                            rows_affected: 0,
                        })
                    }
                },
                Err(e) => {
                    error!(error = %e, sql = %stmt.sql, "atomic statement failed; rolling back");
                    if let Err(rollback_err) = tx.rollback() {
                        error!(error = %rollback_err, "rollback failed");
                    }
                    Ok(WriteReport {
                        committed: false,
                        rows_affected: 0,
                    })
                }
            }
        }
    }
}

fn decode_row(row: &rusqlite::Row, column_count: usize) -> rusqlite::Result<Row> {
    let mut values = Vec::with_capacity(column_count);
    for i in 0..column_count {
        values.push(Value::from(row.get_ref(i)?));
    }
    Ok(Row::new(values))
}

/// Executes a select and returns the first matching row, or `None` when
/// no row matches. A defined no-row signal, not an error.
pub fn fetch_one(conn: &Connection, stmt: &Statement) -> Result<Option<Row>> {
    let mut prepared = conn.prepare(&stmt.sql)?;
    let column_count = prepared.column_count();
    let mut rows = prepared.query(params_from_iter(stmt.params.iter()))?;

    match rows.next()? {
        Some(row) => Ok(Some(decode_row(row, column_count)?)),
        None => Ok(None),
    }
}

/// Executes a select and returns every matching row in store-native order.
pub fn fetch_all(conn: &Connection, stmt: &Statement) -> Result<Vec<Row>> {
    let mut prepared = conn.prepare(&stmt.sql)?;
    let column_count = prepared.column_count();
    let rows = prepared
        .query_map(params_from_iter(stmt.params.iter()), |row| {
            decode_row(row, column_count)
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}
