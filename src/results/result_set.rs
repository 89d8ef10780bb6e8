use std::collections::HashMap;
use std::sync::Arc;

use super::row::{Record, index_columns};
use crate::types::RowValues;

/// The outcome of one executed statement.
///
/// Row-returning statements fill `results`; DML fills `rows_affected` and, for inserts
/// into a table with an auto-increment key, `last_insert_id`.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    /// The rows returned by the query
    pub results: Vec<Record>,
    /// The number of rows affected (for DML statements)
    pub rows_affected: u64,
    /// Key generated by the statement, when it was an insert.
    pub last_insert_id: Option<i64>,
    column_names: Option<Arc<Vec<String>>>,
    column_index: Option<Arc<HashMap<String, usize>>>,
}

impl ResultSet {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> ResultSet {
        ResultSet {
            results: Vec::with_capacity(capacity),
            ..ResultSet::default()
        }
    }

    /// A result for a statement that returned no rows.
    #[must_use]
    pub fn from_dml(rows_affected: u64, last_insert_id: Option<i64>) -> ResultSet {
        ResultSet {
            rows_affected,
            last_insert_id,
            ..ResultSet::default()
        }
    }

    /// Set the column names for this result set (to be shared by all rows)
    pub fn set_column_names(&mut self, column_names: Arc<Vec<String>>) {
        self.column_index = Some(Arc::new(index_columns(&column_names)));
        self.column_names = Some(column_names);
    }

    #[must_use]
    pub fn get_column_names(&self) -> Option<&Arc<Vec<String>>> {
        self.column_names.as_ref()
    }

    /// Append a row; ignored until column names are set.
    pub fn add_row_values(&mut self, row_values: Vec<RowValues>) {
        if let (Some(names), Some(index)) = (&self.column_names, &self.column_index) {
            self.results.push(Record::with_index(
                Arc::clone(names),
                row_values,
                Arc::clone(index),
            ));
        }
    }
}
