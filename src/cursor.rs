use std::sync::Arc;

use tracing::{debug, trace};

use crate::error::OrmError;
use crate::pool::PhysicalConnection;
use crate::results::Record;
use crate::translation::{PlaceholderStyle, translate_placeholders};
use crate::types::RowValues;

/// A statement handle borrowed from a context's physical connection.
///
/// SQL handed to [`Cursor::execute`] uses `?` markers; they are rewritten to the
/// backend's native form and counted against the bound parameters first. Rows are
/// buffered, so the cursor can be dropped at any point without leaving results pending
/// on the connection.
pub struct Cursor<'c> {
    conn: &'c mut PhysicalConnection,
    style: PlaceholderStyle,
    description: Option<Arc<Vec<String>>>,
    rows: std::vec::IntoIter<Record>,
    rowcount: u64,
    last_insert_id: Option<i64>,
}

impl<'c> Cursor<'c> {
    pub(crate) fn new(conn: &'c mut PhysicalConnection, style: PlaceholderStyle) -> Self {
        Cursor {
            conn,
            style,
            description: None,
            rows: Vec::new().into_iter(),
            rowcount: 0,
            last_insert_id: None,
        }
    }

    /// Execute one statement and return its row count: rows fetched for queries, rows
    /// affected for DML.
    ///
    /// Query rows are read in full and buffered on the cursor; the fetch methods drain
    /// that buffer.
    ///
    /// # Errors
    /// Returns `OrmError::ParameterError` when the number of `?` markers differs from
    /// `params.len()`, otherwise the backend's error unchanged.
    pub async fn execute(&mut self, sql: &str, params: &[RowValues]) -> Result<u64, OrmError> {
        let translated = translate_placeholders(sql, self.style);
        if translated.markers != params.len() {
            return Err(OrmError::ParameterError(format!(
                "statement has {} placeholders but {} parameters were supplied",
                translated.markers,
                params.len()
            )));
        }
        debug!(sql = %translated.sql, args = ?params, "Executing SQL");

        let result = self.conn.execute(&translated.sql, params).await?;
        self.description = result.get_column_names().cloned();
        self.last_insert_id = result.last_insert_id;
        self.rowcount = if self.description.is_some() {
            result.results.len() as u64
        } else {
            result.rows_affected
        };
        self.rows = result.results.into_iter();
        Ok(self.rowcount)
    }

    /// Run unparameterised SQL (DDL, session statements). No placeholder rewriting.
    ///
    /// # Errors
    /// Returns the backend's error unchanged.
    pub async fn execute_batch(&mut self, sql: &str) -> Result<(), OrmError> {
        debug!(sql = %sql, "Executing SQL batch");
        self.conn.execute_batch(sql).await?;
        self.description = None;
        self.rows = Vec::new().into_iter();
        self.rowcount = 0;
        self.last_insert_id = None;
        Ok(())
    }

    /// Next buffered row of the last query.
    pub fn fetch_one(&mut self) -> Option<Record> {
        self.rows.next()
    }

    /// Remaining buffered rows of the last query.
    pub fn fetch_all(&mut self) -> Vec<Record> {
        self.rows.by_ref().collect()
    }

    /// Column names reported for the last query; `None` after DML.
    #[must_use]
    pub fn description(&self) -> Option<&[String]> {
        self.description.as_deref().map(Vec::as_slice)
    }

    #[must_use]
    pub fn rowcount(&self) -> u64 {
        self.rowcount
    }

    /// Key generated by the last statement, when it was an insert.
    #[must_use]
    pub fn last_insert_id(&self) -> Option<i64> {
        self.last_insert_id
    }
}

impl Drop for Cursor<'_> {
    fn drop(&mut self) {
        trace!(pending = self.rows.len(), "Cursor released");
    }
}
