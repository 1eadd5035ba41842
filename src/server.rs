use std::time::Duration;

use actix_cors::Cors;
use actix_web::{
    dev::Server, http::header, middleware, web, App, HttpServer,
};
use anyhow::Context;
use tracing::info;

use crate::{
    configuration::{AppState, Config, State},
    controller::{health, trades, version},
    error::Error,
    helpers::shutdown_signal,
};

/// Largest accepted request body, 100 KiB.
pub const BODY_LIMIT: usize = 100 * 1024;
pub const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

/// Serves until SIGINT/SIGTERM, lets in-flight responses flush, then drains
/// and closes the database pool.
pub async fn server_task(app_state: &AppState<State>) -> Result<(), Error> {
    let app = app_state.clone();
    let server = init_server(app)?;
    let handle = server.handle();

    let stop = tokio::spawn(async move {
        shutdown_signal().await;
        info!("Stopping HTTP server, waiting for in-flight requests");
        handle.stop(true).await;
    });

    let result = tokio::spawn(server).await?;
    stop.abort();

    app_state.database.close().await;
    result?;

    info!("Server stopped");
    Ok(())
}

fn init_server(app_state: AppState<State>) -> Result<Server, Error> {
    let host = app_state.config.server_host.to_owned();
    let port = app_state.config.port;
    let workers = app_state.config.workers;

    let server = HttpServer::new(move || {
        App::new()
            .wrap(cors(&app_state.config))
            .wrap(middleware::Compress::default())
            .app_data(web::Data::new(app_state.clone()))
            .configure(routes)
    })
    .workers(workers)
    .bind((host.as_str(), port))
    .with_context(|| format!("could not bind {}:{}", host, port))?
    .disable_signals()
    .shutdown_timeout(SHUTDOWN_TIMEOUT.as_secs())
    .run();

    info!("Server running on {}:{} with {} worker(s)", host, port, workers);

    Ok(server)
}

pub fn cors(config: &Config) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
        .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE]);

    if config.allows_any_origin() {
        return cors.allow_any_origin().send_wildcard();
    }

    let allowed = config.allowed_origins.clone();
    cors.allowed_origin_fn(move |origin, _| {
        if let Ok(origin) = origin.to_str() {
            return allowed.iter().any(|item| item == origin);
        }
        false
    })
}

/// Routes plus extractor settings. Oversized bodies and malformed ids are
/// reported through `Error` like any other failure.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::PayloadConfig::new(BODY_LIMIT))
        .app_data(
            web::PathConfig::default().error_handler(|err, _| {
                Error::InvalidInput(err.to_string()).into()
            }),
        )
        .service(trades::index)
        .service(trades::show)
        .service(trades::create)
        .service(trades::update)
        .service(trades::remove)
        .service(health::index)
        .service(version::index);
}
