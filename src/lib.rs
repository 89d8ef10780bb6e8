//! Lazy per-context database connections and a small declarative ORM.
//!
//! One [`Engine`] is configured per process. Work is done through an
//! [`ExecutionContext`], which checks a physical connection out of the engine's pool the
//! first time it is needed and hands it back when the context is cleaned up. Every query
//! function runs inside a [`ConnectionScope`], so calls nested inside an active context
//! share its connection.
//!
//! ```rust,no_run
//! use lazy_orm::prelude::*;
//!
//! lazy_orm::model! {
//!     pub struct Student {
//!         name: Field::text(),
//!         score: Field::integer(),
//!         subject: Field::text(),
//!     }
//! }
//!
//! # async fn demo() -> Result<(), OrmError> {
//! configure(DatabaseOptions::mysql("root", "x", "test")).await?;
//! let mut ctx = ExecutionContext::from_global()?;
//!
//! Student::create_table(&mut ctx).await?;
//! let mut zj = Student::new()
//!     .with("name", "zj")
//!     .with("score", 104_i64)
//!     .with("subject", "yuwen");
//! zj.insert(&mut ctx).await?;
//!
//! let mut found = Student::get(&mut ctx, &[("score", 104_i64.into())]).await?;
//! found.set("name", "zj2");
//! found.update(&mut ctx).await?;
//! found.delete(&mut ctx).await?;
//! # Ok(())
//! # }
//! ```
//!
//! Backends are selected with cargo features: `mysql` (via `mysql_async`) and `sqlite`
//! (via `rusqlite` pooled with `bb8`), both on by default.

pub mod config;
pub mod context;
pub mod cursor;
pub mod db;
pub mod error;
pub mod model;
pub mod pool;
pub mod prelude;
pub mod results;
pub mod scope;
pub mod statements;
pub mod translation;
pub mod types;

#[cfg(feature = "mysql")]
pub mod mysql;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use config::{DatabaseOptions, DatabaseOptionsBuilder};
pub use context::{ExecutionContext, LazyConnection};
pub use cursor::Cursor;
pub use db::{InsertOutcome, execute, insert, insert_returning_id, select, select_one, update};
pub use error::OrmError;
pub use model::{Field, Model, ModelInstance, ModelMeta};
pub use pool::{Engine, EngineStats, configure, engine};
pub use results::{Record, ResultSet};
pub use scope::ConnectionScope;
pub use translation::PlaceholderStyle;
pub use types::{DatabaseType, RowValues};
