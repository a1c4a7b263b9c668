use actix_web::{App, HttpServer};
use password_validator::app::{build_state, configure};
use password_validator::config::load_config;
use password_validator::health::mark_started;
use password_validator::types::StartupError;
use password_validator::{SERVICE_NAME, VERSION};

#[actix_web::main]
async fn main() -> Result<(), StartupError> {
    dotenvy::dotenv().ok();

    let config = load_config()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    let state = build_state(&config.engine)?;
    let bind_address = (config.server.host.clone(), config.server.port);
    log::info!(
        "Starting {SERVICE_NAME} {VERSION} on {}:{} with {} workers",
        bind_address.0,
        bind_address.1,
        config.server.workers
    );
    mark_started();

    HttpServer::new(move || App::new().configure(|cfg| configure(cfg, &state)))
        .workers(config.server.workers)
        .bind(&bind_address)
        .map_err(|e| StartupError::ServerBind(e.to_string()))?
        .run()
        .await
        .map_err(|e| StartupError::ServerBind(e.to_string()))
}
