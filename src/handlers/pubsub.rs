use super::{drop_message, log_sidecar_error};
use crate::app::{AppState, MANAGER_SUBSCRIPTION_ROUTE};
use crate::error::AppError;
use crate::extract::AnyJson;
use crate::model::{CloudEvent, Order, Subscription};
use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

async fn forward_publish(state: &AppState, order: &Order) -> Result<(), AppError> {
    let order_id = order.order_id.to_string();
    match state.manager.publish(order).await {
        Ok(()) => {
            state.logger.info(&format!("Published data: {}", order_id), Some(&json!({
                "pubsub": state.config.pubsub_name,
                "topic": state.config.pubsub_topic,
                "product": order.product(),
                "quantity": order.quantity(),
            })));
            Ok(())
        }
        Err(e) => {
            log_sidecar_error(state, &format!("Error publishing order: {}", order_id), &order_id, &e);
            Err(AppError::sidecar("failed to publish order", e))
        }
    }
}

pub async fn publish_order(
    State(state): State<AppState>,
    AnyJson(order): AnyJson<Order>,
) -> Result<StatusCode, AppError> {
    forward_publish(&state, &order).await?;
    Ok(StatusCode::OK)
}

/// Combined-demo variant that echoes the published order.
pub async fn publish(
    State(state): State<AppState>,
    AnyJson(order): AnyJson<Order>,
) -> Result<Json<Order>, AppError> {
    forward_publish(&state, &order).await?;
    Ok(Json(order))
}

pub async fn receive_order(
    State(state): State<AppState>,
    event: Result<AnyJson<CloudEvent<Value>>, AppError>,
) -> Json<Value> {
    state.metrics.messages_received_total.inc();
    let event = match event {
        Ok(AnyJson(event)) => event,
        Err(e) => {
            return drop_message(&state, "Dropping undecodable event", json!({ "error": e.to_string() }));
        }
    };
    state.logger.info(&format!("Order received: {}", event.data), Some(&json!({
        "event_id": event.id,
        "topic": event.topic,
        "pubsub": event.pubsubname,
    })));
    Json(json!({ "success": true }))
}

pub async fn subscriptions(State(state): State<AppState>) -> Json<Vec<Subscription>> {
    Json(state.manager.subscriptions(MANAGER_SUBSCRIPTION_ROUTE))
}
