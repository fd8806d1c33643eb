mod config;
mod error;
mod handlers;
mod twilio;
mod types;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use log::info;
use tower_http::cors::CorsLayer;

use config::Config;
use handlers::AppState;
use twilio::{CallPlacer, TwilioClient};

pub(crate) fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/callmom", post(handlers::callmom))
        .route("/health", get(handlers::health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pretty_env_logger::init_timed();

    // Refuses to start unless every required variable is set.
    let config = Config::from_env()?;
    info!("Loaded {:?}", config);

    let caller: Arc<dyn CallPlacer> = Arc::new(TwilioClient::new(&config)?);
    let port = config.port;
    let state = Arc::new(AppState { config, caller });

    let addr = format!("0.0.0.0:{}", port);
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}
