//! Declarative models.
//!
//! A model is a marker type implementing [`Model`], whose [`ModelMeta`] names the table
//! and its [`Field`]s. Rows are handled as [`ModelInstance`]s. The [`model!`](crate::model!)
//! macro declares both in one step:
//!
//! ```rust
//! use lazy_orm::prelude::*;
//!
//! lazy_orm::model! {
//!     pub struct Blog as "blogs" {
//!         title: Field::char(),
//!         create_time: Field::time(),
//!         content: Field::text(),
//!     }
//! }
//!
//! assert_eq!(Blog::table_name(), "blogs");
//! let sql = Blog::create_table_sql(DatabaseType::Mysql, "utf8")?;
//! assert!(sql.starts_with("CREATE TABLE `blogs`"));
//! # Ok::<(), lazy_orm::OrmError>(())
//! ```

mod field;
mod instance;
mod macros;
mod meta;
mod schema;

pub use field::{Field, FieldDefault, FieldKind};
pub use instance::ModelInstance;
pub use meta::{ModelMeta, ModelMetaBuilder};
pub use schema::create_table_sql;

use async_trait::async_trait;

use crate::context::ExecutionContext;
use crate::db;
use crate::error::OrmError;
use crate::statements::select_where_sql;
use crate::types::{DatabaseType, RowValues};

/// A table-backed model type.
///
/// Implementors only supply [`meta`](Model::meta); everything else is provided. Criteria
/// and field lists are `(column, value)` pairs.
#[async_trait]
pub trait Model: Sized + Send + Sync + 'static {
    /// Metadata for this type, built once.
    fn meta() -> &'static ModelMeta;

    fn table_name() -> &'static str {
        Self::meta().table_name()
    }

    /// An empty instance.
    #[allow(clippy::new_ret_no_self)]
    fn new() -> ModelInstance<Self> {
        ModelInstance::new()
    }

    /// # Errors
    /// See [`create_table_sql`].
    fn create_table_sql(dialect: DatabaseType, charset: &str) -> Result<String, OrmError> {
        Self::meta().create_table_sql(dialect, charset)
    }

    /// Create this model's table in the context's database.
    ///
    /// # Errors
    /// Returns the backend's error, e.g. when the table already exists.
    async fn create_table(ctx: &mut ExecutionContext) -> Result<(), OrmError> {
        let engine = std::sync::Arc::clone(ctx.engine());
        let sql = Self::create_table_sql(engine.db_type(), engine.charset())?;
        db::execute(ctx, &sql).await
    }

    /// The first row matching every criterion.
    ///
    /// # Errors
    /// Returns `OrmError::NotFound` when nothing matches, `OrmError::ParameterError` for
    /// empty criteria, or the backend's error.
    async fn get(
        ctx: &mut ExecutionContext,
        criteria: &[(&str, RowValues)],
    ) -> Result<ModelInstance<Self>, OrmError> {
        let (sql, params) = lookup(Self::table_name(), criteria)?;
        match db::select_one(ctx, &sql, &params).await? {
            Some(record) => Ok(ModelInstance::from_record(&record)),
            None => Err(OrmError::NotFound {
                table: Self::table_name().to_string(),
            }),
        }
    }

    /// Every row matching all criteria; empty when none do.
    ///
    /// # Errors
    /// Returns `OrmError::ParameterError` for empty criteria, or the backend's error.
    async fn filter(
        ctx: &mut ExecutionContext,
        criteria: &[(&str, RowValues)],
    ) -> Result<Vec<ModelInstance<Self>>, OrmError> {
        let (sql, params) = lookup(Self::table_name(), criteria)?;
        let records = db::select(ctx, &sql, &params).await?;
        Ok(records.iter().map(ModelInstance::from_record).collect())
    }

    /// Insert a new row from `fields` (missing fields take their defaults) and return it
    /// with its generated `id`. Always inserts, even if an identical row exists.
    ///
    /// # Errors
    /// Returns `OrmError::ParameterError` when a name is not a declared field, or the
    /// backend's error.
    async fn create(
        ctx: &mut ExecutionContext,
        fields: &[(&str, RowValues)],
    ) -> Result<ModelInstance<Self>, OrmError> {
        let mut instance = Self::new();
        for (name, value) in fields {
            if !Self::meta().contains_field(name) {
                return Err(OrmError::ParameterError(format!(
                    "{:?} is not a field of `{}`",
                    name,
                    Self::table_name()
                )));
            }
            instance.set(*name, value.clone());
        }
        instance.insert(ctx).await?;
        Ok(instance)
    }

    /// The first row matching `fields`, or a newly created one. The flag is true when the
    /// row was created.
    ///
    /// # Errors
    /// Same as [`filter`](Model::filter) and [`create`](Model::create).
    async fn get_or_create(
        ctx: &mut ExecutionContext,
        fields: &[(&str, RowValues)],
    ) -> Result<(ModelInstance<Self>, bool), OrmError> {
        let mut scope = ctx.scope();
        if let Some(existing) = Self::filter(&mut scope, fields).await?.into_iter().next() {
            return Ok((existing, false));
        }
        Ok((Self::create(&mut scope, fields).await?, true))
    }
}

fn lookup(
    table: &str,
    criteria: &[(&str, RowValues)],
) -> Result<(String, Vec<RowValues>), OrmError> {
    let sql = select_where_sql(table, criteria.iter().map(|(name, _)| *name))?;
    let params = criteria.iter().map(|(_, value)| value.clone()).collect();
    Ok((sql, params))
}
