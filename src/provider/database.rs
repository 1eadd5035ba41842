use std::str::FromStr;

use tracing::{info, warn};

use crate::{
    configuration::{Config, TlsMode},
    dao::{ConnectOption, PoolOption, PoolType, SslMode},
    error::Error,
    model::{Table, Trade},
};

#[derive(Debug)]
pub struct DatabasePool {
    pub trade: Table<Trade>,
    pub pool: PoolType,
}

impl DatabasePool {
    /// Builds the pool without opening a connection; the first query
    /// connects. Bad URLs still fail here.
    pub fn new(config: &Config) -> Result<DatabasePool, Error> {
        let options = Self::connect_options(config)?;

        if config.tls_mode == TlsMode::RequireNoVerify {
            warn!(
                "Database TLS is required but the server certificate is not verified"
            );
        }

        let pool = PoolOption::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect_lazy_with(options);

        info!(
            "Database pool ready (max connections: {}, tls: {:?})",
            config.max_connections, config.tls_mode
        );

        Ok(Self::from_pool(pool))
    }

    pub fn from_pool(pool: PoolType) -> DatabasePool {
        DatabasePool {
            trade: Table::new(pool.clone()),
            pool,
        }
    }

    /// Parses `DATABASE_URL` and applies the transport policy. Any
    /// `sslmode` carried in the URL is overridden.
    pub fn connect_options(config: &Config) -> Result<ConnectOption, Error> {
        let options = ConnectOption::from_str(&config.database_url)
            .map_err(|e| {
                Error::ConfigurationError(format!(
                    "Invalid database URL: {}",
                    e
                ))
            })?;

        let ssl_mode = match config.tls_mode {
            TlsMode::RequireNoVerify => SslMode::Require,
            TlsMode::Disabled => SslMode::Disable,
        };

        Ok(options.ssl_mode(ssl_mode))
    }

    /// Liveness probe.
    pub async fn ping(&self) -> Result<(), Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Waits for checked out connections to come back, then closes every
    /// connection. Later acquires fail with `PoolClosed`.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database pool closed");
    }

    pub fn get_pool(&self) -> &PoolType {
        &self.pool
    }
}
