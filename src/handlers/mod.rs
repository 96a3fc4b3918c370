use crate::app::AppState;
use crate::error::DaprError;
use axum::Json;
use serde_json::{json, Value};

pub mod common;
pub mod invoke;
pub mod kv;
pub mod orders;
pub mod pubsub;

/// Logs a failed sidecar call with the order it was made for.
pub(crate) fn log_sidecar_error(state: &AppState, msg: &str, order_id: &str, err: &DaprError) {
    state.logger.error(msg, Some(&json!({
        "order_id": order_id,
        "error": err.to_string(),
        "kind": err.kind(),
    })));
}

/// Subscriber reply telling the sidecar not to redeliver. Topic deliveries
/// are never retried, so every failure ends here.
pub(crate) fn drop_message(state: &AppState, msg: &str, context: Value) -> Json<Value> {
    state.metrics.messages_dropped_total.inc();
    state.logger.error(msg, Some(&context));
    Json(json!({ "status": "DROP" }))
}
