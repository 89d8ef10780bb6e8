use mysql_async::{Opts, OptsBuilder, Pool, PoolConstraints, PoolOpts};
use url::Url;

use crate::config::DatabaseOptions;
use crate::error::OrmError;

/// Render `opts` as a `mysql://` URL. Extras become query parameters so any option
/// `mysql_async` understands in URL form can be passed through.
///
/// # Errors
/// Returns `OrmError::ConfigError` if the host, port or credentials cannot be encoded.
pub fn connection_url(opts: &DatabaseOptions) -> Result<Url, OrmError> {
    let invalid = |what: &str| OrmError::ConfigError(format!("invalid MySQL {what}"));

    let mut url = Url::parse("mysql://localhost")
        .map_err(|e| OrmError::ConfigError(format!("invalid MySQL url: {e}")))?;
    url.set_host(Some(&opts.host))
        .map_err(|e| OrmError::ConfigError(format!("invalid MySQL host {:?}: {e}", opts.host)))?;
    url.set_port(Some(opts.port)).map_err(|()| invalid("port"))?;
    url.set_username(&opts.user).map_err(|()| invalid("user"))?;
    if !opts.password.is_empty() {
        url.set_password(Some(&opts.password))
            .map_err(|()| invalid("password"))?;
    }
    url.set_path(&opts.database);
    if !opts.extras.is_empty() {
        let mut query = url.query_pairs_mut();
        for (key, value) in &opts.extras {
            query.append_pair(key, value);
        }
    }
    Ok(url)
}

/// Build the process-wide `MySQL` pool. Connections are checked out lazily, so this does
/// not touch the server.
///
/// # Errors
/// Returns `OrmError::ConfigError` if the options do not form a valid `MySQL` URL.
pub fn build_pool(opts: &DatabaseOptions) -> Result<Pool, OrmError> {
    let url = connection_url(opts)?;
    let parsed = Opts::from_url(url.as_str())
        .map_err(|e| OrmError::ConfigError(format!("invalid MySQL options: {e}")))?;

    let mut builder = OptsBuilder::from_opts(parsed)
        .init(vec![format!("SET NAMES {}", opts.charset)]);
    if let Some(max) = opts.pool_max_size {
        let constraints = PoolConstraints::new(0, max as usize).ok_or_else(|| {
            OrmError::ConfigError(format!("invalid MySQL pool size {max}"))
        })?;
        builder = builder.pool_opts(PoolOpts::default().with_constraints(constraints));
    }
    Ok(Pool::new(builder))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DatabaseType;

    #[test]
    fn url_uses_stated_defaults() {
        let opts = DatabaseOptions::mysql("root", "x", "test");
        assert_eq!(
            connection_url(&opts).unwrap().as_str(),
            "mysql://root:x@localhost:3306/test"
        );
    }

    #[test]
    fn url_encodes_credentials_and_extras() {
        let opts = DatabaseOptions::builder(DatabaseType::Mysql)
            .user("app")
            .password("p@ss/word")
            .database("shop")
            .host("db.internal")
            .port(3307)
            .extra("prefer_socket", "false")
            .finish();
        let url = connection_url(&opts).unwrap();
        assert_eq!(url.host_str(), Some("db.internal"));
        assert_eq!(url.port(), Some(3307));
        assert_eq!(url.password(), Some("p%40ss%2Fword"));
        assert_eq!(url.query(), Some("prefer_socket=false"));
        assert!(Opts::from_url(url.as_str()).is_ok());
    }
}
