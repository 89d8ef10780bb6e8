//! Execution contexts and the lazily opened connection they hold.
//!
//! An [`ExecutionContext`] is the unit of work: it owns at most one [`LazyConnection`],
//! which checks a physical connection out of the engine's pool the first time a cursor
//! is requested and hands it back on cleanup. Contexts are plain values passed by
//! `&mut`; there is no ambient per-thread state.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::cursor::Cursor;
use crate::error::OrmError;
use crate::pool::{self, Engine, PhysicalConnection};
use crate::scope::ConnectionScope;

/// Holder of a physical connection that is opened on first use.
#[derive(Debug)]
pub struct LazyConnection {
    engine: Arc<Engine>,
    physical: Option<PhysicalConnection>,
}

impl LazyConnection {
    #[must_use]
    pub fn new(engine: Arc<Engine>) -> Self {
        LazyConnection {
            engine,
            physical: None,
        }
    }

    /// True once a physical connection has been checked out.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.physical.is_some()
    }

    /// A cursor on the physical connection, opening it first if needed.
    ///
    /// # Errors
    /// Returns the backend's error if the connection cannot be opened.
    pub async fn cursor(&mut self) -> Result<Cursor<'_>, OrmError> {
        let style = self.engine.placeholder_style();
        let conn = self.physical_mut().await?;
        Ok(Cursor::new(conn, style))
    }

    async fn physical_mut(&mut self) -> Result<&mut PhysicalConnection, OrmError> {
        let conn = match self.physical.take() {
            Some(conn) => conn,
            None => self.engine.connect().await?,
        };
        Ok(self.physical.insert(conn))
    }

    pub(crate) async fn begin(&mut self) -> Result<(), OrmError> {
        self.physical_mut().await?.begin().await
    }

    /// Commit on the open connection; nothing to do when none was opened.
    ///
    /// # Errors
    /// Returns the backend's error unchanged.
    pub async fn commit(&mut self) -> Result<(), OrmError> {
        match self.physical.as_mut() {
            Some(conn) => conn.commit().await,
            None => Ok(()),
        }
    }

    /// # Errors
    /// Returns the backend's error unchanged.
    pub async fn rollback(&mut self) -> Result<(), OrmError> {
        match self.physical.as_mut() {
            Some(conn) => conn.rollback().await,
            None => Ok(()),
        }
    }

    /// Hand the physical connection back to the pool. Safe to call repeatedly.
    pub fn cleanup(&mut self) {
        if let Some(conn) = self.physical.take() {
            self.engine.release(conn);
        }
    }
}

impl Drop for LazyConnection {
    fn drop(&mut self) {
        self.cleanup();
    }
}

/// One unit of work against the engine.
///
/// Uninitialized until [`init`](Self::init) (or a [`ConnectionScope`]) activates it;
/// [`cleanup`](Self::cleanup) returns it to the uninitialized state. While active, every
/// operation run through it shares one physical connection.
///
/// ```rust,no_run
/// # async fn demo() -> Result<(), lazy_orm::OrmError> {
/// use lazy_orm::prelude::*;
///
/// configure(DatabaseOptions::mysql("root", "x", "test")).await?;
/// let mut ctx = ExecutionContext::from_global()?;
/// let sql = "SELECT * FROM `student` WHERE `score`=?";
/// let rows = select(&mut ctx, sql, &[104_i64.into()]).await?;
/// assert!(!ctx.is_active());
/// # drop(rows);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ExecutionContext {
    engine: Arc<Engine>,
    connection: Option<LazyConnection>,
    transaction_depth: u32,
}

impl ExecutionContext {
    #[must_use]
    pub fn new(engine: Arc<Engine>) -> Self {
        ExecutionContext {
            engine,
            connection: None,
            transaction_depth: 0,
        }
    }

    /// A context on the engine installed by [`configure`](crate::configure).
    ///
    /// # Errors
    /// Returns `OrmError::ConfigError` when no engine has been configured.
    pub fn from_global() -> Result<Self, OrmError> {
        Ok(Self::new(pool::engine()?))
    }

    #[must_use]
    pub fn engine(&self) -> &Arc<Engine> {
        &self.engine
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.connection.is_some()
    }

    /// Activate the context with a fresh, unopened connection.
    ///
    /// # Errors
    /// Returns `OrmError::ExecutionError` if the context is already active.
    pub fn init(&mut self) -> Result<(), OrmError> {
        if self.is_active() {
            return Err(OrmError::ExecutionError(
                "execution context is already active".to_string(),
            ));
        }
        self.activate();
        Ok(())
    }

    pub(crate) fn activate(&mut self) {
        self.connection = Some(LazyConnection::new(Arc::clone(&self.engine)));
        self.transaction_depth = 0;
    }

    /// Release the connection (if one was opened) and deactivate. An open transaction is
    /// discarded with its connection.
    pub fn cleanup(&mut self) {
        if self.transaction_depth > 0 {
            warn!(
                depth = self.transaction_depth,
                "Cleaning up context with an open transaction"
            );
        }
        self.transaction_depth = 0;
        if let Some(mut connection) = self.connection.take() {
            connection.cleanup();
        }
    }

    /// A cursor on this context's connection, opening it on first use.
    ///
    /// # Errors
    /// Returns `OrmError::ExecutionError` if the context is not active, or the backend's
    /// error if the connection cannot be opened.
    pub async fn cursor(&mut self) -> Result<Cursor<'_>, OrmError> {
        self.connection_mut()?.cursor().await
    }

    /// Run operations on this context inside a scope; see [`ConnectionScope`].
    pub fn scope(&mut self) -> ConnectionScope<'_> {
        ConnectionScope::enter(self)
    }

    #[must_use]
    pub fn transaction_depth(&self) -> u32 {
        self.transaction_depth
    }

    /// Open a transaction, or join the one already open.
    ///
    /// # Errors
    /// Returns `OrmError::ExecutionError` if the context is not active, or the backend's
    /// error.
    pub async fn begin(&mut self) -> Result<(), OrmError> {
        let depth = self.transaction_depth;
        if depth == 0 {
            self.connection_mut()?.begin().await?;
        } else {
            self.connection_mut()?;
        }
        self.transaction_depth = depth + 1;
        debug!(depth = self.transaction_depth, "Transaction begun");
        Ok(())
    }

    /// Leave one transaction level; leaving the outermost commits.
    ///
    /// # Errors
    /// Returns `OrmError::ExecutionError` if the context is not active, or the backend's
    /// error.
    pub async fn commit(&mut self) -> Result<(), OrmError> {
        match self.transaction_depth {
            0 | 1 => {
                self.transaction_depth = 0;
                self.connection_mut()?.commit().await
            }
            depth => {
                self.connection_mut()?;
                self.transaction_depth = depth - 1;
                Ok(())
            }
        }
    }

    /// Roll back the whole transaction regardless of depth.
    ///
    /// # Errors
    /// Returns `OrmError::ExecutionError` if the context is not active, or the backend's
    /// error.
    pub async fn rollback(&mut self) -> Result<(), OrmError> {
        self.transaction_depth = 0;
        self.connection_mut()?.rollback().await
    }

    pub(crate) async fn commit_unless_in_transaction(&mut self) -> Result<(), OrmError> {
        if self.transaction_depth == 0 {
            self.connection_mut()?.commit().await?;
        }
        Ok(())
    }

    fn connection_mut(&mut self) -> Result<&mut LazyConnection, OrmError> {
        self.connection.as_mut().ok_or_else(|| {
            OrmError::ExecutionError("execution context is not active".to_string())
        })
    }
}

impl Drop for ExecutionContext {
    fn drop(&mut self) {
        self.cleanup();
    }
}
