use super::log_sidecar_error;
use crate::app::AppState;
use crate::error::AppError;
use crate::extract::AnyJson;
use crate::model::Order;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

async fn store(state: &AppState, order: &Order) -> Result<(), AppError> {
    let order_id = order.order_id.to_string();
    match state.manager.save(order).await {
        Ok(()) => {
            state.logger.info(&format!("Order saved successfully: {}", order_id), Some(&json!({
                "store": state.config.kvstore_name,
                "key": state.manager.state_key(&order_id),
            })));
            Ok(())
        }
        Err(e) => {
            log_sidecar_error(state, &format!("Error saving order: {}", order_id), &order_id, &e);
            Err(AppError::sidecar("failed to save order", e))
        }
    }
}

async fn fetch(state: &AppState, order_id: &str) -> Result<Value, AppError> {
    match state.manager.get(order_id).await {
        Ok(Some(value)) => {
            state.logger.info("Retrieved order", Some(&json!({
                "order_id": order_id,
                "order": value,
            })));
            Ok(value)
        }
        Ok(None) => {
            state.logger.info(&format!("Key {} does not exist", state.manager.state_key(order_id)), None);
            Err(AppError::NotFound("order not found".to_string()))
        }
        Err(e) => {
            log_sidecar_error(state, &format!("Error retrieving order: {}", order_id), order_id, &e);
            Err(AppError::sidecar("failed to get order", e))
        }
    }
}

async fn remove(state: &AppState, order_id: &str) -> Result<(), AppError> {
    match state.manager.delete(order_id).await {
        Ok(()) => {
            state.logger.info(&format!("Deleted order: {}", order_id), None);
            Ok(())
        }
        Err(e) => {
            log_sidecar_error(state, &format!("Error deleting order: {}", order_id), order_id, &e);
            Err(AppError::sidecar("failed to delete order", e))
        }
    }
}

pub async fn save_order(
    State(state): State<AppState>,
    AnyJson(order): AnyJson<Order>,
) -> Result<StatusCode, AppError> {
    store(&state, &order).await?;
    Ok(StatusCode::OK)
}

pub async fn get_order(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    fetch(&state, &order_id).await.map(Json)
}

pub async fn delete_order(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> Result<StatusCode, AppError> {
    remove(&state, &order_id).await?;
    Ok(StatusCode::OK)
}

// Combined-demo routes take the whole order in the body.

pub async fn save_kv(
    State(state): State<AppState>,
    AnyJson(order): AnyJson<Order>,
) -> Result<Json<Value>, AppError> {
    store(&state, &order).await?;
    Ok(Json(json!({ "success": true })))
}

pub async fn get_kv(
    State(state): State<AppState>,
    AnyJson(order): AnyJson<Order>,
) -> Result<Json<Value>, AppError> {
    fetch(&state, &order.order_id.to_string()).await.map(Json)
}

pub async fn delete_kv(
    State(state): State<AppState>,
    AnyJson(order): AnyJson<Order>,
) -> Result<Json<Value>, AppError> {
    remove(&state, &order.order_id.to_string()).await?;
    Ok(Json(json!({ "success": true })))
}
