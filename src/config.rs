use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::OrmError;
use crate::statements::is_identifier;
use crate::types::DatabaseType;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 3306;
pub const DEFAULT_CHARSET: &str = "utf8";

/// Options handed once to [`configure`](crate::configure) to build the process-wide engine.
///
/// For `SQLite` the `database` field is the file path and the network fields are ignored.
/// `extras` carries driver-specific settings; for `MySQL` they become connection URL
/// query parameters (e.g. `pool_max`, `prefer_socket`).
///
/// ```rust
/// use lazy_orm::DatabaseOptions;
///
/// let opts = DatabaseOptions::from_json(r#"{"user":"root","password":"x","database":"test"}"#)?;
/// assert_eq!(opts.host, "localhost");
/// assert_eq!(opts.port, 3306);
/// assert_eq!(opts.charset, "utf8");
/// # Ok::<(), lazy_orm::OrmError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseOptions {
    pub db_type: DatabaseType,
    pub user: String,
    pub password: String,
    pub database: String,
    pub host: String,
    pub port: u16,
    pub charset: String,
    pub pool_max_size: Option<u32>,
    pub extras: BTreeMap<String, String>,
}

impl Default for DatabaseOptions {
    fn default() -> Self {
        Self {
            db_type: DatabaseType::default(),
            user: String::new(),
            password: String::new(),
            database: String::new(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            charset: DEFAULT_CHARSET.to_string(),
            pool_max_size: None,
            extras: BTreeMap::new(),
        }
    }
}

impl DatabaseOptions {
    /// `MySQL` options with the stated defaults for host, port and charset.
    #[must_use]
    pub fn mysql(
        user: impl Into<String>,
        password: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            db_type: DatabaseType::Mysql,
            user: user.into(),
            password: password.into(),
            database: database.into(),
            ..Self::default()
        }
    }

    /// `SQLite` options for the database file at `path`.
    #[must_use]
    pub fn sqlite(path: impl Into<String>) -> Self {
        Self {
            db_type: DatabaseType::Sqlite,
            database: path.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn builder(db_type: DatabaseType) -> DatabaseOptionsBuilder {
        DatabaseOptionsBuilder::new(db_type)
    }

    /// Parse options from JSON; absent keys take their defaults.
    ///
    /// # Errors
    /// Returns `OrmError::ConfigError` if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self, OrmError> {
        serde_json::from_str(json)
            .map_err(|e| OrmError::ConfigError(format!("invalid database options: {e}")))
    }

    /// Check the options before an engine is built from them.
    ///
    /// # Errors
    /// Returns `OrmError::ConfigError` naming the first offending option.
    pub fn validate(&self) -> Result<(), OrmError> {
        if self.database.is_empty() {
            return Err(OrmError::ConfigError("database must be set".to_string()));
        }
        if self.pool_max_size == Some(0) {
            return Err(OrmError::ConfigError(
                "pool_max_size must be greater than zero".to_string(),
            ));
        }
        match self.db_type {
            DatabaseType::Mysql => {
                if self.user.is_empty() {
                    return Err(OrmError::ConfigError("user must be set".to_string()));
                }
                if self.host.is_empty() {
                    return Err(OrmError::ConfigError("host must be set".to_string()));
                }
                if !is_identifier(&self.charset) {
                    return Err(OrmError::ConfigError(format!(
                        "charset {:?} is not a valid character set name",
                        self.charset
                    )));
                }
            }
            DatabaseType::Sqlite => {}
        }
        Ok(())
    }
}

/// Fluent builder for [`DatabaseOptions`].
#[derive(Debug, Clone)]
pub struct DatabaseOptionsBuilder {
    opts: DatabaseOptions,
}

impl DatabaseOptionsBuilder {
    #[must_use]
    pub fn new(db_type: DatabaseType) -> Self {
        Self {
            opts: DatabaseOptions {
                db_type,
                ..DatabaseOptions::default()
            },
        }
    }

    #[must_use]
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.opts.user = user.into();
        self
    }

    #[must_use]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.opts.password = password.into();
        self
    }

    #[must_use]
    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.opts.database = database.into();
        self
    }

    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.opts.host = host.into();
        self
    }

    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.opts.port = port;
        self
    }

    #[must_use]
    pub fn charset(mut self, charset: impl Into<String>) -> Self {
        self.opts.charset = charset.into();
        self
    }

    #[must_use]
    pub fn pool_max_size(mut self, size: u32) -> Self {
        self.opts.pool_max_size = Some(size);
        self
    }

    #[must_use]
    pub fn extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.opts.extras.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn finish(self) -> DatabaseOptions {
        self.opts
    }
}
