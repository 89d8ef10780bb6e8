#[cfg(feature = "mysql")]
use mysql_async::Conn as MysqlConn;

#[cfg(feature = "sqlite")]
use crate::sqlite::SqlitePooledConnection;

use super::types::EnginePool;
use crate::error::OrmError;
use crate::results::ResultSet;
use crate::types::RowValues;

/// One physical connection checked out of the engine's pool.
///
/// Dropping it hands the connection back to its pool.
pub enum PhysicalConnection {
    #[cfg(feature = "mysql")]
    Mysql(MysqlConn),
    #[cfg(feature = "sqlite")]
    Sqlite(SqlitePooledConnection),
}

impl std::fmt::Debug for PhysicalConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            #[cfg(feature = "mysql")]
            Self::Mysql(conn) => f.debug_tuple("Mysql").field(&conn.id()).finish(),
            #[cfg(feature = "sqlite")]
            Self::Sqlite(_) => f.debug_tuple("Sqlite").field(&"<Connection>").finish(),
            #[allow(unreachable_patterns)]
            _ => f.write_str("PhysicalConnection"),
        }
    }
}

impl PhysicalConnection {
    /// Check a connection out of `pool`.
    ///
    /// # Errors
    /// Returns the backend error if no connection can be established.
    pub(crate) async fn checkout(pool: &EnginePool) -> Result<Self, OrmError> {
        match pool {
            #[cfg(feature = "mysql")]
            EnginePool::Mysql(pool) => Ok(PhysicalConnection::Mysql(pool.get_conn().await?)),
            #[cfg(feature = "sqlite")]
            EnginePool::Sqlite(pool) => Ok(PhysicalConnection::Sqlite(pool.get_owned().await?)),
            #[allow(unreachable_patterns)]
            _ => Err(unsupported()),
        }
    }

    /// Run one statement already written in the backend's native placeholder style.
    ///
    /// # Errors
    /// Returns the backend error if the statement fails.
    pub async fn execute(
        &mut self,
        sql: &str,
        params: &[RowValues],
    ) -> Result<ResultSet, OrmError> {
        match self {
            #[cfg(feature = "mysql")]
            Self::Mysql(conn) => crate::mysql::executor::execute(conn, sql, params).await,
            #[cfg(feature = "sqlite")]
            Self::Sqlite(conn) => crate::sqlite::executor::execute(conn, sql, params).await,
            #[allow(unreachable_patterns)]
            _ => Err(unsupported()),
        }
    }

    /// Run unparameterised SQL such as DDL.
    ///
    /// # Errors
    /// Returns the backend error if the statement fails.
    pub async fn execute_batch(&mut self, sql: &str) -> Result<(), OrmError> {
        match self {
            #[cfg(feature = "mysql")]
            Self::Mysql(conn) => crate::mysql::executor::execute_batch(conn, sql).await,
            #[cfg(feature = "sqlite")]
            Self::Sqlite(conn) => crate::sqlite::executor::execute_batch(conn, sql).await,
            #[allow(unreachable_patterns)]
            _ => Err(unsupported()),
        }
    }

    pub(crate) async fn begin(&mut self) -> Result<(), OrmError> {
        match self {
            #[cfg(feature = "mysql")]
            Self::Mysql(conn) => crate::mysql::executor::begin(conn).await,
            #[cfg(feature = "sqlite")]
            Self::Sqlite(conn) => crate::sqlite::executor::begin(conn).await,
            #[allow(unreachable_patterns)]
            _ => Err(unsupported()),
        }
    }

    pub(crate) async fn commit(&mut self) -> Result<(), OrmError> {
        match self {
            #[cfg(feature = "mysql")]
            Self::Mysql(conn) => crate::mysql::executor::commit(conn).await,
            #[cfg(feature = "sqlite")]
            Self::Sqlite(conn) => crate::sqlite::executor::commit(conn).await,
            #[allow(unreachable_patterns)]
            _ => Err(unsupported()),
        }
    }

    pub(crate) async fn rollback(&mut self) -> Result<(), OrmError> {
        match self {
            #[cfg(feature = "mysql")]
            Self::Mysql(conn) => crate::mysql::executor::rollback(conn).await,
            #[cfg(feature = "sqlite")]
            Self::Sqlite(conn) => crate::sqlite::executor::rollback(conn).await,
            #[allow(unreachable_patterns)]
            _ => Err(unsupported()),
        }
    }
}

fn unsupported() -> OrmError {
    OrmError::Unimplemented("This database type is not enabled in the current build".to_string())
}
