//! The process-wide engine: options plus the backend pool every context draws from.

pub mod connection;
pub mod types;

pub use connection::PhysicalConnection;
pub use types::EnginePool;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use tracing::{debug, info};

use crate::config::DatabaseOptions;
use crate::error::OrmError;
use crate::translation::PlaceholderStyle;
use crate::types::DatabaseType;

static ENGINE: OnceLock<Arc<Engine>> = OnceLock::new();

/// Connection counters for an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EngineStats {
    /// Physical connections checked out so far.
    pub opened: u64,
    /// Physical connections handed back so far.
    pub released: u64,
}

impl EngineStats {
    /// Connections currently checked out.
    #[must_use]
    pub fn in_use(&self) -> u64 {
        self.opened.saturating_sub(self.released)
    }
}

/// Configuration and connection pool for one database.
///
/// Usually built once through [`configure`]; tests and embedders that want several
/// independent databases can build engines directly with [`Engine::new`] and pass them to
/// [`ExecutionContext::new`](crate::ExecutionContext::new).
#[derive(Debug)]
pub struct Engine {
    options: DatabaseOptions,
    pool: EnginePool,
    opened: AtomicU64,
    released: AtomicU64,
}

impl Engine {
    /// Validate `options` and build the pool.
    ///
    /// # Errors
    /// Returns `OrmError::ConfigError` for invalid options, or the backend's error.
    pub async fn new(options: DatabaseOptions) -> Result<Arc<Engine>, OrmError> {
        options.validate()?;
        let pool = EnginePool::build(&options).await?;
        info!(
            db_type = ?options.db_type,
            host = %options.host,
            port = options.port,
            database = %options.database,
            "Initialized database engine"
        );
        Ok(Arc::new(Engine {
            options,
            pool,
            opened: AtomicU64::new(0),
            released: AtomicU64::new(0),
        }))
    }

    #[must_use]
    pub fn options(&self) -> &DatabaseOptions {
        &self.options
    }

    #[must_use]
    pub fn db_type(&self) -> DatabaseType {
        self.options.db_type
    }

    #[must_use]
    pub fn charset(&self) -> &str {
        &self.options.charset
    }

    #[must_use]
    pub fn placeholder_style(&self) -> PlaceholderStyle {
        self.options.db_type.placeholder_style()
    }

    #[must_use]
    pub fn stats(&self) -> EngineStats {
        EngineStats {
            opened: self.opened.load(Ordering::SeqCst),
            released: self.released.load(Ordering::SeqCst),
        }
    }

    pub(crate) async fn connect(&self) -> Result<PhysicalConnection, OrmError> {
        let conn = PhysicalConnection::checkout(&self.pool).await?;
        let opened = self.opened.fetch_add(1, Ordering::SeqCst) + 1;
        info!(opened, "[CONN] [OPEN]");
        Ok(conn)
    }

    pub(crate) fn release(&self, conn: PhysicalConnection) {
        drop(conn);
        let released = self.released.fetch_add(1, Ordering::SeqCst) + 1;
        info!(released, "[CONN] [CLOSE]");
    }
}

/// Build the process-wide engine. Callable once.
///
/// # Errors
/// Returns `OrmError::ConfigError` if an engine is already configured or the options are
/// invalid.
pub async fn configure(options: DatabaseOptions) -> Result<Arc<Engine>, OrmError> {
    if ENGINE.get().is_some() {
        return Err(already_configured());
    }
    let engine = Engine::new(options).await?;
    ENGINE
        .set(Arc::clone(&engine))
        .map_err(|_| already_configured())?;
    debug!("Global engine installed");
    Ok(engine)
}

/// The engine installed by [`configure`].
///
/// # Errors
/// Returns `OrmError::ConfigError` when [`configure`] has not run.
pub fn engine() -> Result<Arc<Engine>, OrmError> {
    ENGINE
        .get()
        .cloned()
        .ok_or_else(|| OrmError::ConfigError("database engine is not configured".to_string()))
}

fn already_configured() -> OrmError {
    OrmError::ConfigError("database engine is already configured".to_string())
}
