#[cfg(feature = "mysql")]
use mysql_async::Pool as MysqlPool;

#[cfg(feature = "sqlite")]
use crate::sqlite::SqlitePool;

use crate::config::DatabaseOptions;
use crate::error::OrmError;
use crate::types::DatabaseType;

/// Connection pool for the configured backend.
#[derive(Clone)]
pub enum EnginePool {
    #[cfg(feature = "mysql")]
    Mysql(MysqlPool),
    #[cfg(feature = "sqlite")]
    Sqlite(SqlitePool),
}

impl std::fmt::Debug for EnginePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            #[cfg(feature = "mysql")]
            Self::Mysql(_) => f.debug_tuple("Mysql").field(&"<Pool>").finish(),
            #[cfg(feature = "sqlite")]
            Self::Sqlite(pool) => f.debug_tuple("Sqlite").field(&pool.state()).finish(),
            #[allow(unreachable_patterns)]
            _ => f.write_str("EnginePool"),
        }
    }
}

impl EnginePool {
    /// Build the pool for `opts.db_type`. No connection is opened here.
    ///
    /// # Errors
    /// Returns `OrmError::Unimplemented` when the backend's feature is not compiled in,
    /// or the backend's configuration error.
    pub(crate) async fn build(opts: &DatabaseOptions) -> Result<Self, OrmError> {
        match opts.db_type {
            #[cfg(feature = "mysql")]
            DatabaseType::Mysql => Ok(EnginePool::Mysql(crate::mysql::build_pool(opts)?)),
            #[cfg(feature = "sqlite")]
            DatabaseType::Sqlite => {
                let pool = crate::sqlite::config::build_pool(opts).await?;
                Ok(EnginePool::Sqlite(pool))
            }
            #[allow(unreachable_patterns)]
            other => Err(OrmError::Unimplemented(format!(
                "{other:?} support is not enabled in the current build"
            ))),
        }
    }
}
