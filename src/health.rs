use crate::app::AppState;
use axum::{extract::State, http::StatusCode, routing::get, Router};
use serde_json::json;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tokio::time::{Interval, MissedTickBehavior};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/readyz", get(ready_handler))
        .route("/metrics", get(metrics_handler))
        .route("/_build", get(build_handler))
}

async fn health_handler() -> &'static str {
    "OK"
}

async fn ready_handler(State(state): State<AppState>) -> (StatusCode, &'static str) {
    if state.draining.load(Ordering::SeqCst) {
        (StatusCode::SERVICE_UNAVAILABLE, "DRAINING")
    } else if state.readiness.load(Ordering::SeqCst) {
        (StatusCode::OK, "READY")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "NOT_READY")
    }
}

async fn build_handler(State(state): State<AppState>) -> String {
    state.version.clone()
}

async fn metrics_handler(State(state): State<AppState>) -> (StatusCode, String) {
    let data = state.metrics.encode();
    (StatusCode::OK, String::from_utf8_lossy(&data).to_string())
}

/// Ticks every `ms`; a slow health call delays the next tick instead of
/// firing a burst of catch-up calls.
pub(crate) fn check_interval(ms: u64) -> Interval {
    let mut interval = tokio::time::interval(Duration::from_millis(ms));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

/// Polls the sidecar health endpoint and mirrors the result into readiness.
/// Runs until draining starts.
pub async fn watch_sidecar(state: AppState) {
    let mut interval = check_interval(state.config.sidecar_probe_interval_ms);
    loop {
        interval.tick().await;
        if state.draining.load(Ordering::SeqCst) {
            break;
        }
        let healthy = probe_once(&state).await;
        let was_ready = state.readiness.swap(healthy, Ordering::SeqCst);
        if healthy != was_ready {
            if healthy {
                state.logger.info("Sidecar is healthy", Some(&json!({
                    "endpoint": state.manager.dapr().endpoint(),
                })));
            } else {
                state.logger.error("Sidecar health probe failing", Some(&json!({
                    "endpoint": state.manager.dapr().endpoint(),
                })));
            }
        }
    }
}

pub async fn probe_once(state: &AppState) -> bool {
    match state.manager.dapr().healthz().await {
        Ok(()) => {
            state.metrics.sidecar_ready.set(1);
            true
        }
        Err(e) => {
            state.metrics.sidecar_ready.set(0);
            state.logger.error("Sidecar health probe error", Some(&json!({
                "error": e.to_string(),
                "kind": e.kind(),
            })));
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_check_interval_delays_missed_ticks() {
        let interval = check_interval(100);
        assert_eq!(interval.missed_tick_behavior(), MissedTickBehavior::Delay);
        assert_eq!(interval.period(), Duration::from_millis(100));
    }
}
