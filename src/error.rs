use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrmError {
    #[cfg(feature = "mysql")]
    #[error(transparent)]
    Mysql(#[from] mysql_async::Error),

    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Parameter error: {0}")]
    ParameterError(String),

    #[error("SQL execution error: {0}")]
    ExecutionError(String),

    #[error("Invalid SQL identifier: {0:?}")]
    InvalidIdentifier(String),

    /// A record or model instance has no value under `key`.
    #[error("no key \"{key}\"")]
    MissingKey { key: String },

    /// A lookup expected one row and the backend returned none.
    #[error("no matching row in `{table}`")]
    NotFound { table: String },

    #[error("Unimplemented feature: {0}")]
    Unimplemented(String),
}

impl OrmError {
    pub(crate) fn missing_key(key: impl Into<String>) -> Self {
        OrmError::MissingKey { key: key.into() }
    }

    /// True when a lookup matched no row.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, OrmError::NotFound { .. })
    }
}

#[cfg(feature = "sqlite")]
impl From<bb8::RunError<rusqlite::Error>> for OrmError {
    fn from(err: bb8::RunError<rusqlite::Error>) -> Self {
        match err {
            bb8::RunError::User(e) => OrmError::Sqlite(e),
            bb8::RunError::TimedOut => {
                OrmError::ConnectionError("SQLite pool checkout timed out".to_string())
            }
        }
    }
}
