use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

use super::Model;
use crate::context::ExecutionContext;
use crate::db;
use crate::error::OrmError;
use crate::results::Record;
use crate::statements::{delete_by_id_sql, update_by_id_sql};
use crate::types::RowValues;

/// A row of model `M`: column name to value.
///
/// An instance holds only what was set on it or loaded into it; declared fields that
/// are still missing take their defaults when the instance is inserted or updated.
pub struct ModelInstance<M: Model> {
    values: BTreeMap<String, RowValues>,
    _model: PhantomData<fn() -> M>,
}

impl<M: Model> ModelInstance<M> {
    #[must_use]
    pub fn new() -> Self {
        ModelInstance {
            values: BTreeMap::new(),
            _model: PhantomData,
        }
    }

    /// Instance holding every column of `record`.
    #[must_use]
    pub fn from_record(record: &Record) -> Self {
        let mut instance = Self::new();
        for (column, value) in record.iter() {
            instance.values.insert(column.to_string(), value.clone());
        }
        instance
    }

    /// # Errors
    /// Returns `OrmError::MissingKey` when no value is set under `key`.
    pub fn get(&self, key: &str) -> Result<&RowValues, OrmError> {
        self.values.get(key).ok_or_else(|| OrmError::missing_key(key))
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<RowValues>) {
        self.values.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<RowValues>) -> Self {
        self.set(key, value);
        self
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// The primary key, once the instance has been inserted or loaded.
    #[must_use]
    pub fn id(&self) -> Option<i64> {
        self.values.get("id").and_then(RowValues::as_int).copied()
    }

    #[must_use]
    pub fn values(&self) -> &BTreeMap<String, RowValues> {
        &self.values
    }

    /// Insert this instance, filling missing fields with their defaults, and record the
    /// generated key as `id`. Fields declared non-insertable are left to the database.
    ///
    /// # Errors
    /// Returns the backend's error, or `OrmError::ParameterError` when the model has
    /// no insertable fields.
    pub async fn insert(&mut self, ctx: &mut ExecutionContext) -> Result<u64, OrmError> {
        let meta = M::meta();
        let columns = self.materialize(|field| field.is_insertable());
        let fields: Vec<(&str, RowValues)> = columns
            .iter()
            .map(|name| (*name, self.values[*name].clone()))
            .collect();

        let outcome = db::insert_returning_id(ctx, meta.table_name(), &fields).await?;
        if let Some(id) = outcome.last_insert_id {
            self.values.insert("id".to_string(), RowValues::Int(id));
        }
        Ok(outcome.rows_affected)
    }

    /// Write every updatable field back to the row keyed by this instance's `id`.
    ///
    /// # Errors
    /// Returns `OrmError::MissingKey` when the instance has no `id`, or the backend's
    /// error.
    pub async fn update(&mut self, ctx: &mut ExecutionContext) -> Result<u64, OrmError> {
        let id = self.require_id()?;
        let columns = self.materialize(|field| field.is_updatable());
        let sql = update_by_id_sql(M::table_name(), columns.iter().copied())?;
        let mut params: Vec<RowValues> = columns
            .iter()
            .map(|name| self.values[*name].clone())
            .collect();
        params.push(RowValues::Int(id));
        db::update(ctx, &sql, &params).await
    }

    /// Delete the row keyed by this instance's `id`.
    ///
    /// # Errors
    /// Returns `OrmError::MissingKey` when the instance has no `id`, or the backend's
    /// error.
    pub async fn delete(&self, ctx: &mut ExecutionContext) -> Result<u64, OrmError> {
        let id = self.require_id()?;
        let sql = delete_by_id_sql(M::table_name())?;
        db::update(ctx, &sql, &[RowValues::Int(id)]).await
    }

    fn require_id(&self) -> Result<i64, OrmError> {
        self.id().ok_or_else(|| OrmError::missing_key("id"))
    }

    /// Fill defaults for the selected declared fields and return their names in
    /// declaration order.
    fn materialize(&mut self, include: impl Fn(&super::Field) -> bool) -> Vec<&'static str> {
        let mut columns = Vec::new();
        for (name, field) in M::meta().fields().filter(|(_, field)| include(field)) {
            self.values
                .entry(name.to_string())
                .or_insert_with(|| field.default_value());
            columns.push(name);
        }
        columns
    }
}

impl<M: Model> Default for ModelInstance<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Model> Clone for ModelInstance<M> {
    fn clone(&self) -> Self {
        ModelInstance {
            values: self.values.clone(),
            _model: PhantomData,
        }
    }
}

impl<M: Model> PartialEq for ModelInstance<M> {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

impl<M: Model> fmt::Debug for ModelInstance<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(M::table_name())
            .field("values", &self.values)
            .finish()
    }
}

impl<M: Model> std::ops::Index<&str> for ModelInstance<M> {
    type Output = RowValues;

    fn index(&self, key: &str) -> &RowValues {
        match self.values.get(key) {
            Some(value) => value,
            None => panic!("\"{}\" has no key \"{key}\"", M::table_name()),
        }
    }
}
