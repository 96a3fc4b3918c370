use crate::config::Config;
use crate::dapr::DaprClient;
use crate::error::DaprError;
use crate::handlers::{common, invoke, kv, orders, pubsub};
use crate::health;
use crate::manager::OrderManager;
use crate::observability::{metrics::Metrics, Logger};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::{atomic::AtomicBool, Arc};

/// Route the sidecar delivers manager subscriptions to.
pub const MANAGER_SUBSCRIPTION_ROUTE: &str = "/pubsub/neworder";

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub manager: OrderManager,
    pub logger: Logger,
    pub metrics: Arc<Metrics>,
    pub readiness: Arc<AtomicBool>,
    pub draining: Arc<AtomicBool>,
    pub version: String,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, DaprError> {
        let metrics = Arc::new(Metrics::new());
        let dapr = DaprClient::from_config(&config, metrics.clone())?;
        let manager = OrderManager::new(dapr, &config);
        Ok(Self {
            logger: Logger::new(config.app_id.clone()),
            config: Arc::new(config),
            manager,
            metrics,
            readiness: Arc::new(AtomicBool::new(false)),
            draining: Arc::new(AtomicBool::new(false)),
            version: env!("CARGO_PKG_VERSION").to_string(),
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(common::hello))
        .route("/dapr/subscribe", get(pubsub::subscriptions))
        // pub/sub
        .route("/pubsub/orders", post(pubsub::publish_order))
        .route("/pubsub/neworders", post(pubsub::receive_order))
        .route("/publish", post(pubsub::publish))
        .route("/consume", post(pubsub::receive_order))
        // service invocation
        .route("/invoke/orders", post(invoke::invoke_orders))
        .route("/invoke/neworders", post(invoke::receive_invocation))
        .route("/sendrequest", post(invoke::send_request))
        .route("/receiverequest", post(invoke::receive_invocation))
        // key/value
        .route("/kv/orders", post(kv::save_order))
        .route("/kv/orders/:order_id", get(kv::get_order).delete(kv::delete_order))
        .route("/savekv", post(kv::save_kv))
        .route("/getkv", post(kv::get_kv))
        .route("/deletekv", post(kv::delete_kv))
        // order manager
        .route("/v1/orders", get(orders::list).post(orders::create))
        .route("/v1/orders/:id", get(orders::get).delete(orders::delete))
        .route(MANAGER_SUBSCRIPTION_ROUTE, post(orders::on_new_order))
        .merge(health::routes())
        .with_state(state)
}
