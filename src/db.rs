//! Query and mutation operations.
//!
//! Every function takes the caller's [`ExecutionContext`] and runs inside one
//! [`ConnectionScope`](crate::ConnectionScope): on an inactive context the call opens and
//! releases its own connection, on an active one it reuses the caller's. SQL uses `?`
//! for bound values. DML is committed unless the context has an open transaction.

use tracing::debug;

use crate::context::ExecutionContext;
use crate::error::OrmError;
use crate::results::Record;
use crate::statements::insert_sql;
use crate::types::RowValues;

/// Outcome of [`insert_returning_id`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertOutcome {
    pub rows_affected: u64,
    /// Key generated for the inserted row, read from the same round trip.
    pub last_insert_id: Option<i64>,
}

/// First row of a query, or `None` when nothing matched.
///
/// The statement runs to completion and its rows are buffered before the first is taken, so
/// add a `LIMIT 1` when the query can match many rows.
///
/// # Errors
/// Returns `OrmError::ParameterError` on a placeholder/parameter count mismatch, or the
/// backend's error.
pub async fn select_one(
    ctx: &mut ExecutionContext,
    sql: &str,
    params: &[RowValues],
) -> Result<Option<Record>, OrmError> {
    let mut scope = ctx.scope();
    let mut cursor = scope.cursor().await?;
    cursor.execute(sql, params).await?;
    Ok(cursor.fetch_one())
}

/// All rows of a query; empty when nothing matched.
///
/// # Errors
/// Returns `OrmError::ParameterError` on a placeholder/parameter count mismatch, or the
/// backend's error.
pub async fn select(
    ctx: &mut ExecutionContext,
    sql: &str,
    params: &[RowValues],
) -> Result<Vec<Record>, OrmError> {
    let mut scope = ctx.scope();
    let mut cursor = scope.cursor().await?;
    cursor.execute(sql, params).await?;
    Ok(cursor.fetch_all())
}

/// Insert one row built from `fields` (column, value) and return the affected-row count.
///
/// ```rust,no_run
/// # async fn demo(ctx: &mut lazy_orm::ExecutionContext) -> Result<(), lazy_orm::OrmError> {
/// use lazy_orm::RowValues;
///
/// let n = lazy_orm::insert(ctx, "student", &[
///     ("name", RowValues::from("zj")),
///     ("score", RowValues::Int(104)),
/// ]).await?;
/// assert_eq!(n, 1);
/// # Ok(())
/// # }
/// ```
///
/// # Errors
/// Returns `OrmError::ParameterError` for an empty field list,
/// `OrmError::InvalidIdentifier` for a bad table or column name, or the backend's error.
pub async fn insert(
    ctx: &mut ExecutionContext,
    table: &str,
    fields: &[(&str, RowValues)],
) -> Result<u64, OrmError> {
    Ok(insert_returning_id(ctx, table, fields).await?.rows_affected)
}

/// Insert one row and return the affected-row count together with the generated key,
/// both taken from the insert itself.
///
/// # Errors
/// Same as [`insert`].
pub async fn insert_returning_id(
    ctx: &mut ExecutionContext,
    table: &str,
    fields: &[(&str, RowValues)],
) -> Result<InsertOutcome, OrmError> {
    let sql = insert_sql(table, fields.iter().map(|(name, _)| *name))?;
    let params: Vec<RowValues> = fields.iter().map(|(_, value)| value.clone()).collect();

    let mut scope = ctx.scope();
    let outcome = {
        let mut cursor = scope.cursor().await?;
        let rows_affected = cursor.execute(&sql, &params).await?;
        InsertOutcome {
            rows_affected,
            last_insert_id: cursor.last_insert_id(),
        }
    };
    scope.commit_unless_in_transaction().await?;
    debug!(table, last_insert_id = ?outcome.last_insert_id, "Inserted row");
    Ok(outcome)
}

/// Execute a parameterised UPDATE or DELETE and return the affected-row count.
///
/// # Errors
/// Returns `OrmError::ParameterError` on a placeholder/parameter count mismatch, or the
/// backend's error.
pub async fn update(
    ctx: &mut ExecutionContext,
    sql: &str,
    params: &[RowValues],
) -> Result<u64, OrmError> {
    let mut scope = ctx.scope();
    let rows_affected = {
        let mut cursor = scope.cursor().await?;
        cursor.execute(sql, params).await?
    };
    scope.commit_unless_in_transaction().await?;
    Ok(rows_affected)
}

/// Execute unparameterised SQL such as generated DDL.
///
/// # Errors
/// Returns the backend's error.
pub async fn execute(ctx: &mut ExecutionContext, sql: &str) -> Result<(), OrmError> {
    let mut scope = ctx.scope();
    scope.cursor().await?.execute_batch(sql).await?;
    scope.commit_unless_in_transaction().await
}
