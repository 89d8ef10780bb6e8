//! Convenient imports for common functionality.
//!
//! ```rust
//! use lazy_orm::prelude::*;
//! ```

pub use crate::config::{DatabaseOptions, DatabaseOptionsBuilder};
pub use crate::context::ExecutionContext;
pub use crate::db::{
    InsertOutcome, execute, insert, insert_returning_id, select, select_one, update,
};
pub use crate::error::OrmError;
pub use crate::model::{Field, FieldKind, Model, ModelInstance, ModelMeta};
pub use crate::pool::{Engine, EngineStats, configure};
pub use crate::results::{Record, ResultSet};
pub use crate::scope::ConnectionScope;
pub use crate::types::{DatabaseType, RowValues};
