use mysql_async::Conn;
use mysql_async::prelude::Queryable;

use super::params::convert_params;
use super::query::build_result_set;
use crate::error::OrmError;
use crate::results::ResultSet;
use crate::statements::is_insert;
use crate::types::RowValues;

/// Execute one statement with the binary protocol.
///
/// Statements without a column list report the affected-row count and, for inserts,
/// `LAST_INSERT_ID()` from the same OK packet.
///
/// # Errors
/// Returns `OrmError::Mysql` if the server rejects the statement.
pub async fn execute(
    conn: &mut Conn,
    sql: &str,
    params: &[RowValues],
) -> Result<ResultSet, OrmError> {
    let mut result = conn.exec_iter(sql, convert_params(params)).await?;
    let column_names: Vec<String> = result
        .columns()
        .map(|columns| columns.iter().map(|c| c.name_str().into_owned()).collect())
        .unwrap_or_default();

    if column_names.is_empty() {
        let rows_affected = result.affected_rows();
        let last_insert_id = if is_insert(sql) {
            result.last_insert_id().and_then(|id| i64::try_from(id).ok())
        } else {
            None
        };
        result.drop_result().await?;
        return Ok(ResultSet::from_dml(rows_affected, last_insert_id));
    }

    let rows: Vec<mysql_async::Row> = result.collect().await?;
    result.drop_result().await?;
    Ok(build_result_set(column_names, &rows))
}

/// Execute unparameterised SQL with the text protocol.
///
/// # Errors
/// Returns `OrmError::Mysql` if the server rejects the statement.
pub async fn execute_batch(conn: &mut Conn, sql: &str) -> Result<(), OrmError> {
    conn.query_drop(sql).await?;
    Ok(())
}

pub async fn begin(conn: &mut Conn) -> Result<(), OrmError> {
    execute_batch(conn, "START TRANSACTION").await
}

pub async fn commit(conn: &mut Conn) -> Result<(), OrmError> {
    execute_batch(conn, "COMMIT").await
}

pub async fn rollback(conn: &mut Conn) -> Result<(), OrmError> {
    execute_batch(conn, "ROLLBACK").await
}
