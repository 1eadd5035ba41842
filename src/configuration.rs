use std::{
    env, fmt, fs, io, ops::Deref, str::FromStr, sync::Arc, time::Duration,
};

use crate::{error::Error, provider::DatabasePool};

#[derive(Debug)]
pub struct AppState<T>(Arc<T>);

impl<T> AppState<T> {
    pub fn new(state: T) -> AppState<T> {
        AppState(Arc::new(state))
    }
}

impl<T> Clone for AppState<T> {
    fn clone(&self) -> AppState<T> {
        AppState(Arc::clone(&self.0))
    }
}

impl<T> Deref for AppState<T> {
    type Target = Arc<T>;

    fn deref(&self) -> &Arc<T> {
        &self.0
    }
}

#[derive(Debug)]
pub struct State {
    pub config: Config,
    pub database: DatabasePool,
}

impl State {
    pub fn new(config: Config, database: DatabasePool) -> State {
        Self { config, database }
    }
}

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_WORKERS: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Production,
    Development,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Environment::Production => write!(f, "production"),
            Environment::Development => write!(f, "development"),
        }
    }
}

impl FromStr for Environment {
    type Err = io::Error;

    /// Only the exact value `production` selects the production profile.
    fn from_str(value: &str) -> Result<Environment, Self::Err> {
        match value {
            "production" => Ok(Environment::Production),
            _ => Ok(Environment::Development),
        }
    }
}

/// Transport security applied to every pooled datastore connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlsMode {
    /// Encryption is mandatory but the server certificate chain is not
    /// verified, so any certificate is accepted.
    RequireNoVerify,
    Disabled,
}

impl From<Environment> for TlsMode {
    fn from(value: Environment) -> Self {
        match value {
            Environment::Production => TlsMode::RequireNoVerify,
            Environment::Development => TlsMode::Disabled,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub environment: Environment,
    pub tls_mode: TlsMode,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    pub server_host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    /// HTTP worker threads. One by default, so requests are interleaved on a
    /// single event loop and only suspend on datastore calls.
    pub workers: usize,
}

impl Config {
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|origin| origin == "*")
    }
}

pub fn get_configuration() -> Result<Config, Error> {
    parse_configuration(|key| env::var(key))
}

/// Builds the configuration from a variable lookup. Unset optional
/// variables fall back to their defaults; set but unparsable ones are
/// errors.
pub fn parse_configuration<F>(lookup: F) -> Result<Config, Error>
where
    F: Fn(&str) -> Result<String, env::VarError>,
{
    let optional = |key: &str| -> Result<Option<String>, Error> {
        match lookup(key) {
            Ok(value) if value.trim().is_empty() => Ok(None),
            Ok(value) => Ok(Some(value.trim().to_owned())),
            Err(env::VarError::NotPresent) => Ok(None),
            Err(e) => Err(Error::from(e)),
        }
    };

    let database_url = optional("DATABASE_URL")?.ok_or_else(|| {
        Error::ConfigurationError(String::from("DATABASE_URL is required"))
    })?;

    let environment: Environment = match optional("NODE_ENV")? {
        Some(value) => value.parse()?,
        None => Environment::Development,
    };
    let tls_mode = TlsMode::from(environment);

    let server_host =
        optional("HOST")?.unwrap_or_else(|| DEFAULT_HOST.to_owned());

    let port: u16 = match optional("PORT")? {
        Some(value) => value.parse()?,
        None => DEFAULT_PORT,
    };

    let allowed_origins = optional("ALLOWED_ORIGINS")?
        .unwrap_or_else(|| String::from("*"))
        .split(',')
        .map(|item| item.trim().to_owned())
        .filter(|item| !item.is_empty())
        .collect::<Vec<String>>();

    let max_connections: u32 = match optional("DATABASE_MAX_CONNECTIONS")? {
        Some(value) => value.parse()?,
        None => DEFAULT_MAX_CONNECTIONS,
    };

    if max_connections == 0 {
        return Err(Error::ConfigurationError(String::from(
            "DATABASE_MAX_CONNECTIONS must be greater than zero",
        )));
    }

    let acquire_timeout: u64 = match optional("DATABASE_ACQUIRE_TIMEOUT")? {
        Some(value) => value.parse()?,
        None => DEFAULT_ACQUIRE_TIMEOUT_SECS,
    };

    let workers: usize = match optional("WORKERS")? {
        Some(value) => value.parse()?,
        None => DEFAULT_WORKERS,
    };

    if workers == 0 {
        return Err(Error::ConfigurationError(String::from(
            "WORKERS must be greater than zero",
        )));
    }

    let config = Config {
        database_url,
        environment,
        tls_mode,
        max_connections,
        acquire_timeout: Duration::from_secs(acquire_timeout),
        server_host,
        port,
        allowed_origins,
        workers,
    };

    Ok(config)
}

/// Loads `.env` from the working directory when it exists. Variables that
/// are already present in the process environment are left untouched.
pub fn set_configuration() -> Result<(), Error> {
    let config_file: &str = ".env";

    let config_string = match fs::read_to_string(config_file) {
        Ok(data) => data,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(Error::from(e)),
    };

    for (key, value) in parse_config_string(&config_string) {
        if env::var_os(&key).is_none() {
            env::set_var(key, value);
        }
    }

    Ok(())
}

fn parse_config_string(config: &str) -> Vec<(String, String)> {
    config
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| {
            let value = value.trim();
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(value);
            (key.trim().to_owned(), value.to_owned())
        })
        .collect()
}
