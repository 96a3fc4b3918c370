use order_sidecar::{config::Config, health, router, AppState};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load Config
    let config = Config::from_env()?;

    // 2. Build shared state (sidecar client, logger, metrics)
    let state = AppState::new(config)?;
    let logger = state.logger.clone();

    logger.info("Order service starting up", Some(&json!({
        "port": state.config.port,
        "dapr_http_endpoint": state.config.dapr_http_endpoint,
        "pubsub": state.config.pubsub_name,
        "topic": state.config.pubsub_topic,
        "kvstore": state.config.kvstore_name,
        "invoke_app_id": state.config.invoke_app_id,
        "api_token_set": state.config.dapr_api_token.is_some(),
    })));

    // 3. Sidecar health probe drives readiness
    tokio::spawn(health::watch_sidecar(state.clone()));

    // 4. Serve until Ctrl-C, letting in-flight requests finish
    let addr = SocketAddr::from(([0, 0, 0, 0], state.config.port));
    let listener = TcpListener::bind(addr).await?;
    logger.info(&format!("server listening at :{}", state.config.port), None);

    let draining = state.draining.clone();
    let readiness = state.readiness.clone();
    let shutdown_logger = logger.clone();
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                shutdown_logger.error(&format!("Failed to listen for shutdown signal: {}", e), None);
            }
            readiness.store(false, Ordering::SeqCst);
            draining.store(true, Ordering::SeqCst);
            shutdown_logger.info("Shutdown signal received, draining", None);
        })
        .await?;

    logger.info("Order service shutdown", None);
    Ok(())
}
