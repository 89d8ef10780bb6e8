use std::sync::Arc;

use rusqlite::params_from_iter;

use super::config::{SharedSqliteConnection, SqlitePooledConnection};
use super::params::convert_params;
use super::query::build_result_set;
use crate::error::OrmError;
use crate::results::ResultSet;
use crate::statements::is_insert;
use crate::types::RowValues;

/// Run `func` against the connection on Tokio's blocking pool.
pub(crate) async fn run_blocking<F, R>(conn: SharedSqliteConnection, func: F) -> Result<R, OrmError>
where
    F: FnOnce(&mut rusqlite::Connection) -> Result<R, OrmError> + Send + 'static,
    R: Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let mut guard = conn.blocking_lock();
        func(&mut guard)
    })
    .await
    .map_err(|e| OrmError::ExecutionError(format!("sqlite spawn_blocking join error: {e}")))?
}

/// Execute one statement. Row-returning statements produce rows; anything else reports
/// the change count and, for inserts, the generated rowid read under the same lock.
///
/// # Errors
/// Returns `OrmError` if preparation or execution fails.
pub async fn execute(
    conn: &SqlitePooledConnection,
    sql: &str,
    params: &[RowValues],
) -> Result<ResultSet, OrmError> {
    let sql = sql.to_owned();
    let values = convert_params(params);
    run_blocking(Arc::clone(&**conn), move |guard| {
        let mut stmt = guard.prepare(&sql)?;
        if stmt.column_count() > 0 {
            return build_result_set(&mut stmt, &values);
        }
        let changed = stmt.execute(params_from_iter(values.iter()))?;
        let last_insert_id = is_insert(&sql).then(|| guard.last_insert_rowid());
        Ok(ResultSet::from_dml(changed as u64, last_insert_id))
    })
    .await
}

/// Execute unparameterised SQL, possibly several statements.
///
/// # Errors
/// Returns `OrmError` if any statement fails.
pub async fn execute_batch(conn: &SqlitePooledConnection, sql: &str) -> Result<(), OrmError> {
    let sql = sql.to_owned();
    run_blocking(Arc::clone(&**conn), move |guard| {
        guard.execute_batch(&sql)?;
        Ok(())
    })
    .await
}

pub async fn begin(conn: &SqlitePooledConnection) -> Result<(), OrmError> {
    execute_batch(conn, "BEGIN").await
}

/// Commit if a transaction is open; a connection in autocommit mode has nothing to commit.
pub async fn commit(conn: &SqlitePooledConnection) -> Result<(), OrmError> {
    finish(conn, "COMMIT").await
}

pub async fn rollback(conn: &SqlitePooledConnection) -> Result<(), OrmError> {
    finish(conn, "ROLLBACK").await
}

async fn finish(conn: &SqlitePooledConnection, statement: &'static str) -> Result<(), OrmError> {
    run_blocking(Arc::clone(&**conn), move |guard| {
        if !guard.is_autocommit() {
            guard.execute_batch(statement)?;
        }
        Ok(())
    })
    .await
}
