use super::{drop_message, log_sidecar_error};
use crate::app::AppState;
use crate::error::AppError;
use crate::extract::AnyJson;
use crate::model::{CloudEvent, Order};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Order>>, AppError> {
    let orders = state.manager.list().await
        .map_err(|e| AppError::sidecar("failed to list orders", e))?;
    Ok(Json(orders))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Order>, AppError> {
    match state.manager.get_order(&id).await {
        Ok(Some(order)) => Ok(Json(order)),
        Ok(None) => Err(AppError::NotFound("order not found".to_string())),
        Err(e) => {
            log_sidecar_error(&state, "http - v1 - get order", &id, &e);
            Err(AppError::sidecar("failed to get order", e))
        }
    }
}

pub async fn create(
    State(state): State<AppState>,
    AnyJson(order): AnyJson<Order>,
) -> Result<(StatusCode, Json<Order>), AppError> {
    let order_id = order.order_id.to_string();
    match state.manager.create(order).await {
        Ok(order) => {
            state.logger.info("Order created", Some(&json!({
                "order_id": order_id,
                "topic": state.config.pubsub_topic,
            })));
            Ok((StatusCode::CREATED, Json(order)))
        }
        Err(e) => {
            log_sidecar_error(&state, "http - v1 - create order", &order_id, &e);
            Err(AppError::sidecar("failed to create order", e))
        }
    }
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if let Err(e) = state.manager.delete(&id).await {
        log_sidecar_error(&state, "http - v1 - delete order", &id, &e);
        return Err(AppError::sidecar("failed to delete order", e));
    }
    Ok(StatusCode::OK)
}

/// Topic delivery for orders created through `POST /v1/orders`; persists
/// them in the state store. Failures are logged and the event dropped.
pub async fn on_new_order(
    State(state): State<AppState>,
    event: Result<AnyJson<CloudEvent<Order>>, AppError>,
) -> Json<Value> {
    state.metrics.messages_received_total.inc();
    let event = match event {
        Ok(AnyJson(event)) => event,
        Err(e) => {
            return drop_message(&state, "Dropping undecodable order event", json!({ "error": e.to_string() }));
        }
    };
    let order_id = event.data.order_id.to_string();
    if let Err(e) = state.manager.on_new_order(&event.data).await {
        return drop_message(&state, "error handling new order", json!({
            "order_id": order_id,
            "event_id": event.id,
            "error": e.to_string(),
            "kind": e.kind(),
        }));
    }
    state.logger.info("Order stored from topic", Some(&json!({
        "order_id": order_id,
        "event_id": event.id,
    })));
    Json(json!({ "success": true }))
}
