use super::log_sidecar_error;
use crate::app::AppState;
use crate::error::AppError;
use crate::extract::AnyJson;
use crate::model::Order;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

async fn forward_invoke(state: &AppState, method: &str, order: &Order) -> Result<Response, AppError> {
    let order_id = order.order_id.to_string();
    match state.manager.invoke(method, order).await {
        Ok(reply) => {
            state.logger.info("Invocation successful", Some(&json!({
                "order_id": order_id,
                "app_id": state.config.invoke_app_id,
                "method": method,
            })));
            Ok(match reply {
                Value::Null => StatusCode::OK.into_response(),
                body => Json(body).into_response(),
            })
        }
        Err(e) => {
            log_sidecar_error(
                state,
                &format!("Error invoking app {} at /{}", state.config.invoke_app_id, method),
                &order_id,
                &e,
            );
            Err(AppError::sidecar("failed to invoke app", e))
        }
    }
}

pub async fn invoke_orders(
    State(state): State<AppState>,
    AnyJson(order): AnyJson<Order>,
) -> Result<Response, AppError> {
    forward_invoke(&state, "invoke/neworders", &order).await
}

pub async fn send_request(
    State(state): State<AppState>,
    AnyJson(order): AnyJson<Order>,
) -> Result<Response, AppError> {
    forward_invoke(&state, "receiverequest", &order).await
}

/// Target side of an invocation: logs and echoes the order.
pub async fn receive_invocation(
    State(state): State<AppState>,
    AnyJson(order): AnyJson<Order>,
) -> Json<Order> {
    state.metrics.invocations_received_total.inc();
    state.logger.info("Request received", Some(&json!({
        "order": order,
    })));
    Json(order)
}
