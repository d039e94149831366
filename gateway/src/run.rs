//! Server wiring.

use dotenvy::dotenv;
use std::net::SocketAddr;
use std::sync::Arc;

use paygate_local::util::{SigDown, Telemetry};
use paygate_local::{GatewayLocal, handlers};

use crate::config::Config;

/// Initializes and runs the gateway server until SIGTERM or SIGINT.
///
/// - Loads `.env` variables.
/// - Installs logging, and OTLP export when the `telemetry` feature is on.
/// - Builds the in-memory gateway from the configuration.
/// - Starts an Axum HTTP server with the gateway handlers.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env variables
    dotenv().ok();

    let telemetry = Telemetry::new()
        .with_name(env!("CARGO_PKG_NAME"))
        .with_version(env!("CARGO_PKG_VERSION"))
        .register();

    let config = Config::load()?;
    let payment_policy = config.payment_policy()?;
    let item_policy = config.item_policy();
    tracing::info!(
        products = config.catalog().items().len(),
        ?payment_policy,
        ?item_policy,
        "Gateway configured"
    );

    let gateway = GatewayLocal::new(config.catalog().clone(), payment_policy)
        .with_item_policy(item_policy);
    let axum_state = Arc::new(gateway);

    let http_endpoints = handlers::app(axum_state).layer(telemetry.http_tracing());

    let addr = SocketAddr::new(config.host(), config.port());
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .inspect_err(|e| tracing::error!("Failed to bind to {}: {}", addr, e))?;

    let sig_down = SigDown::try_new()?;
    let axum_cancellation_token = sig_down.cancellation_token();
    let axum_graceful_shutdown = async move { axum_cancellation_token.cancelled().await };
    axum::serve(listener, http_endpoints)
        .with_graceful_shutdown(axum_graceful_shutdown)
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
