use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use trades::{
    configuration::{
        get_configuration, set_configuration, AppState, Config, State,
    },
    error::Error,
    helpers::install_panic_hook,
    provider::DatabasePool,
    server,
};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let result = app_main().await;

    if let Err(err) = &result {
        error!("{}", err);
    }

    result
}

async fn app_main() -> Result<(), Error> {
    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_level(true)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    install_panic_hook();

    let (config, database) = match init() {
        Ok((config, database)) => (config, database),
        Err(e @ Error::ConfigurationError(_)) => return Err(e),
        Err(e) => return Err(Error::ConfigurationError(e.to_string())),
    };

    info!("Starting in {} mode", config.environment);

    let state = State::new(config, database);
    let app_state = AppState::new(state);

    server::server_task(&app_state).await
}

fn init() -> Result<(Config, DatabasePool), Error> {
    set_configuration()?;
    let config = get_configuration()?;
    let database = DatabasePool::new(&config)?;
    Ok((config, database))
}
