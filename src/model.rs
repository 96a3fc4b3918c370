use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Order identifier. Callers send it either as a number or a string and it
/// is re-serialized in the same shape.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum OrderId {
    Number(i64),
    Text(String),
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderId::Number(n) => write!(f, "{}", n),
            OrderId::Text(s) => f.write_str(s),
        }
    }
}

/// An order as sent by callers. Only `orderId` is required; every other
/// field (`product`, `quantity`, ...) is kept exactly as received, nulls
/// included, and forwarded to the sidecar unchanged.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Order {
    #[serde(rename = "orderId")]
    pub order_id: OrderId,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Order {
    pub fn product(&self) -> Option<&str> {
        self.fields.get("product").and_then(Value::as_str)
    }

    /// Quantity as a count, whether sent as a number or a numeric string.
    pub fn quantity(&self) -> Option<u64> {
        match self.fields.get("quantity")? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CloudEvent<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specversion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datacontenttype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pubsubname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traceid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traceparent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracestate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    pub data: T,
}

/// Entry of the programmatic subscription list served on `/dapr/subscribe`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Subscription {
    pub pubsubname: String,
    pub topic: String,
    pub route: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StateItem {
    pub key: String,
    pub value: Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_order_id_keeps_shape() {
        let numeric: Order = serde_json::from_value(json!({"orderId": 5})).unwrap();
        assert_eq!(numeric.order_id, OrderId::Number(5));
        assert_eq!(serde_json::to_value(&numeric).unwrap(), json!({"orderId": 5}));

        let text: Order = serde_json::from_value(json!({"orderId": "A-5"})).unwrap();
        assert_eq!(text.order_id.to_string(), "A-5");
        assert_eq!(serde_json::to_value(&text).unwrap(), json!({"orderId": "A-5"}));
    }

    #[test]
    fn test_order_optional_and_extra_fields() {
        let body = json!({"orderId": 9, "product": "kiwi", "quantity": 3, "note": "gift"});
        let order: Order = serde_json::from_value(body.clone()).unwrap();
        assert_eq!(order.product(), Some("kiwi"));
        assert_eq!(order.quantity(), Some(3));
        assert_eq!(order.fields.get("note"), Some(&json!("gift")));
        assert_eq!(serde_json::to_value(&order).unwrap(), body);
    }

    #[test]
    fn test_order_fields_pass_through_as_sent() {
        let body = json!({"orderId": "A-1", "product": null, "quantity": "2"});
        let order: Order = serde_json::from_value(body.clone()).unwrap();
        assert_eq!(order.product(), None);
        assert_eq!(order.quantity(), Some(2));
        assert_eq!(serde_json::to_value(&order).unwrap(), body);

        let odd: Order = serde_json::from_value(json!({"orderId": 1, "quantity": -4})).unwrap();
        assert_eq!(odd.quantity(), None);
    }

    #[test]
    fn test_order_requires_id() {
        assert!(serde_json::from_value::<Order>(json!({"product": "kiwi"})).is_err());
    }

    #[test]
    fn test_cloud_event_from_sidecar() {
        let raw = json!({
            "id": "5929aaac-a5e2-4ca1-859c-edfe73f11565",
            "source": "checkout",
            "type": "com.dapr.event.sent",
            "specversion": "1.0",
            "datacontenttype": "application/json",
            "topic": "orders",
            "pubsubname": "pubsub",
            "traceid": "00-ab-cd-01",
            "data": {"orderId": 1}
        });
        let event: CloudEvent<Order> = serde_json::from_value(raw).unwrap();
        assert_eq!(event.topic.as_deref(), Some("orders"));
        assert_eq!(event.event_type.as_deref(), Some("com.dapr.event.sent"));
        assert_eq!(event.data.order_id, OrderId::Number(1));
        assert!(event.tracestate.is_none());
    }
}
