//! mlops-quickstart HTTP Server
//!
//! Trains the model, then serves `/health` and `/predict`.

#[cfg(feature = "http-server")]
use mlops_quickstart::{Config, Result};

#[cfg(feature = "http-server")]
#[actix_rt::main]
async fn main() -> Result<()> {
    use actix_web::{App, HttpServer};
    use mlops_quickstart::api::{configure_routes, init_api_server_state, RequestContext};
    use mlops_quickstart::{Component, InferenceService};

    // Load configuration
    let config = Config::load()?;

    // Initialize logger
    mlops_quickstart::logging::init(&config.logging)?;

    log::info!(
        "Starting {} {} ({})",
        config.logging.service,
        config.logging.version,
        config.logging.env
    );

    // Train before binding; a failed start never serves
    let mut service = InferenceService::new();
    if let Err(err) = service.start() {
        log::error!("Service did not become ready: {}", err);
        return Err(err);
    }

    let state = init_api_server_state(service.slot());

    log::info!(
        "Server will listen on {}:{}",
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(RequestContext)
            .configure(configure_routes)
    })
    .workers(config.server.workers)
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await?;

    service.stop()?;
    log::info!("Server stopped.");

    Ok(())
}

#[cfg(not(feature = "http-server"))]
fn main() {
    eprintln!("HTTP server feature is not enabled.");
    eprintln!("Please compile with: cargo build --features http-server");
    std::process::exit(1);
}
