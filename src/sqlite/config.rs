use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use bb8::{ManageConnection, Pool, PooledConnection};
use tokio::sync::Mutex;

use crate::config::DatabaseOptions;
use crate::error::OrmError;

/// A `rusqlite` connection shared between the async side and the blocking pool.
pub type SharedSqliteConnection = Arc<Mutex<rusqlite::Connection>>;
pub type SqlitePool = Pool<SqliteManager>;
pub type SqlitePooledConnection = PooledConnection<'static, SqliteManager>;

const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// bb8 manager opening `SQLite` connections to one database file.
#[derive(Debug, Clone)]
pub struct SqliteManager {
    path: PathBuf,
    busy_timeout: Duration,
}

impl SqliteManager {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_busy_timeout(mut self, busy_timeout: Duration) -> Self {
        self.busy_timeout = busy_timeout;
        self
    }

    /// Build a pool from this manager.
    ///
    /// # Errors
    /// Returns `OrmError` if creating the pool fails.
    pub async fn build_pool(self, max_size: Option<u32>) -> Result<SqlitePool, OrmError> {
        let mut builder = Pool::builder();
        if let Some(max_size) = max_size {
            builder = builder.max_size(max_size);
        }
        Ok(builder.build(self).await?)
    }
}

impl ManageConnection for SqliteManager {
    type Connection = SharedSqliteConnection;
    type Error = rusqlite::Error;

    #[allow(clippy::manual_async_fn)]
    fn connect(&self) -> impl Future<Output = Result<Self::Connection, Self::Error>> + Send {
        let path = self.path.clone();
        let busy_timeout = self.busy_timeout;
        async move {
            let conn = rusqlite::Connection::open(&path)?;
            conn.busy_timeout(busy_timeout)?;
            conn.execute_batch("PRAGMA journal_mode = WAL;")?;
            Ok(Arc::new(Mutex::new(conn)))
        }
    }

    #[allow(clippy::manual_async_fn)]
    fn is_valid(
        &self,
        conn: &mut Self::Connection,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send {
        let conn = Arc::clone(conn);
        async move {
            let guard = conn.lock().await;
            guard.execute_batch("SELECT 1")
        }
    }

    /// A connection handed back mid-transaction is discarded rather than reused.
    fn has_broken(&self, conn: &mut Self::Connection) -> bool {
        conn.try_lock().map_or(true, |guard| !guard.is_autocommit())
    }
}

/// Build the `SQLite` pool described by `opts`; `opts.database` is the file path.
///
/// The `busy_timeout_ms` extra overrides the default five second busy timeout.
///
/// # Errors
/// Returns `OrmError::ConfigError` for a malformed extra, or the pool build error.
pub(crate) async fn build_pool(opts: &DatabaseOptions) -> Result<SqlitePool, OrmError> {
    let mut manager = SqliteManager::new(&opts.database);
    if let Some(ms) = opts.extras.get("busy_timeout_ms") {
        let ms: u64 = ms.parse().map_err(|e| {
            OrmError::ConfigError(format!("busy_timeout_ms {ms:?} is not a number: {e}"))
        })?;
        manager = manager.with_busy_timeout(Duration::from_millis(ms));
    }
    manager.build_pool(opts.pool_max_size).await
}
