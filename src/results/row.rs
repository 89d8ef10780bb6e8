use std::collections::HashMap;
use std::sync::Arc;

use crate::error::OrmError;
use crate::types::RowValues;

/// One row returned by a query.
///
/// Column names are the ones reported by the driver, in result order, and are shared by
/// every row of the same result set. A `Record` is immutable once built.
#[derive(Debug, Clone)]
pub struct Record {
    column_names: Arc<Vec<String>>,
    values: Vec<RowValues>,
    // Internal cache for faster column lookups (to avoid repeated string comparisons)
    column_index_cache: Arc<HashMap<String, usize>>,
}

impl Record {
    /// Create a record from column names and the matching values.
    #[must_use]
    pub fn new(column_names: Arc<Vec<String>>, values: Vec<RowValues>) -> Self {
        let cache = Arc::new(index_columns(&column_names));
        Self::with_index(column_names, values, cache)
    }

    pub(crate) fn with_index(
        column_names: Arc<Vec<String>>,
        values: Vec<RowValues>,
        column_index_cache: Arc<HashMap<String, usize>>,
    ) -> Self {
        Self {
            column_names,
            values,
            column_index_cache,
        }
    }

    #[must_use]
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    #[must_use]
    pub fn values(&self) -> &[RowValues] {
        &self.values
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get the index of a column by name
    #[must_use]
    pub fn get_column_index(&self, column_name: &str) -> Option<usize> {
        if let Some(&idx) = self.column_index_cache.get(column_name) {
            return Some(idx);
        }
        self.column_names.iter().position(|col| col == column_name)
    }

    /// Get a value by column name, or `None` if the column is absent.
    #[must_use]
    pub fn get(&self, column_name: &str) -> Option<&RowValues> {
        self.get_column_index(column_name)
            .and_then(|idx| self.values.get(idx))
    }

    /// Get a value by column name.
    ///
    /// # Errors
    /// Returns [`OrmError::MissingKey`] when the record has no such column.
    pub fn try_get(&self, column_name: &str) -> Result<&RowValues, OrmError> {
        self.get(column_name)
            .ok_or_else(|| OrmError::missing_key(column_name))
    }

    /// Get a value from the row by column index
    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&RowValues> {
        self.values.get(index)
    }

    /// Iterate `(column, value)` pairs in result order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RowValues)> {
        self.column_names
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }
}

impl std::ops::Index<&str> for Record {
    type Output = RowValues;

    /// Panics when the column is absent; use [`Record::try_get`] for a fallible lookup.
    fn index(&self, column_name: &str) -> &Self::Output {
        match self.get(column_name) {
            Some(value) => value,
            None => panic!("record has no key \"{column_name}\""),
        }
    }
}

pub(crate) fn index_columns(column_names: &[String]) -> HashMap<String, usize> {
    column_names
        .iter()
        .enumerate()
        .map(|(i, name)| (name.clone(), i))
        .collect()
}
