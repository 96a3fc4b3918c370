use crate::config::Config;
use crate::dapr::DaprClient;
use crate::error::DaprError;
use crate::model::{Order, StateItem, Subscription};
use serde_json::Value;

/// Order operations over the sidecar's pub/sub, invocation and state APIs.
///
/// Component names and the state key prefix come from [`Config`]; each
/// method is a single sidecar call.
#[derive(Clone)]
pub struct OrderManager {
    dapr: DaprClient,
    pubsub: String,
    topic: String,
    statestore: String,
    key_prefix: String,
    invoke_app_id: String,
}

impl OrderManager {
    pub fn new(dapr: DaprClient, config: &Config) -> Self {
        Self {
            dapr,
            pubsub: config.pubsub_name.clone(),
            topic: config.pubsub_topic.clone(),
            statestore: config.kvstore_name.clone(),
            key_prefix: config.kv_key_prefix.clone(),
            invoke_app_id: config.invoke_app_id.clone(),
        }
    }

    pub fn dapr(&self) -> &DaprClient {
        &self.dapr
    }

    pub fn state_key(&self, order_id: &str) -> String {
        format!("{}{}", self.key_prefix, order_id)
    }

    pub async fn publish(&self, order: &Order) -> Result<(), DaprError> {
        self.dapr.publish_event(&self.pubsub, &self.topic, order).await
    }

    pub async fn invoke(&self, method: &str, order: &Order) -> Result<Value, DaprError> {
        self.dapr.invoke_method(&self.invoke_app_id, method, order).await
    }

    pub async fn save(&self, order: &Order) -> Result<(), DaprError> {
        let value = serde_json::to_value(order).map_err(|e| DaprError::InvalidRequest(e.to_string()))?;
        let item = StateItem {
            key: self.state_key(&order.order_id.to_string()),
            value,
        };
        self.dapr.save_state(&self.statestore, &[item]).await
    }

    /// Stored value as-is; `None` when the key does not exist.
    pub async fn get(&self, order_id: &str) -> Result<Option<Value>, DaprError> {
        self.dapr.get_state(&self.statestore, &self.state_key(order_id)).await
    }

    pub async fn get_order(&self, order_id: &str) -> Result<Option<Order>, DaprError> {
        match self.get(order_id).await? {
            Some(v) => serde_json::from_value(v)
                .map(Some)
                .map_err(|e| DaprError::Decode(format!("stored order {}: {}", order_id, e))),
            None => Ok(None),
        }
    }

    pub async fn delete(&self, order_id: &str) -> Result<(), DaprError> {
        self.dapr.delete_state(&self.statestore, &self.state_key(order_id)).await
    }

    /// The state API has no key listing, so this is always empty.
    pub async fn list(&self) -> Result<Vec<Order>, DaprError> {
        Ok(Vec::new())
    }

    /// Publishes a new order and hands it back.
    pub async fn create(&self, order: Order) -> Result<Order, DaprError> {
        self.publish(&order).await?;
        Ok(order)
    }

    /// Topic delivery of an order created through [`OrderManager::create`].
    pub async fn on_new_order(&self, order: &Order) -> Result<(), DaprError> {
        self.save(order).await
    }

    pub fn subscriptions(&self, route: &str) -> Vec<Subscription> {
        vec![Subscription {
            pubsubname: self.pubsub.clone(),
            topic: self.topic.clone(),
            route: route.to_string(),
        }]
    }
}
