pub mod pii;
pub mod metrics;

use chrono::Utc;
use serde_json::{json, Value};
use self::pii::mask_pii;

/// JSON-lines logger. INFO goes to stdout, ERROR to stderr.
#[derive(Clone)]
pub struct Logger {
    app_id: String,
}

impl Logger {
    pub fn new(app_id: String) -> Self {
        Self { app_id }
    }

    pub fn info(&self, msg: &str, context: Option<&Value>) {
        let entry = self.build_entry("INFO", msg, context);
        println!("{}", serde_json::to_string(&entry).unwrap_or_default());
    }

    pub fn error(&self, msg: &str, context: Option<&Value>) {
        let entry = self.build_entry("ERROR", msg, context);
        eprintln!("{}", serde_json::to_string(&entry).unwrap_or_default());
    }

    fn build_entry(&self, level: &str, msg: &str, context: Option<&Value>) -> Value {
        let mut base = json!({
            "ts": Utc::now().to_rfc3339(),
            "level": level,
            "msg": mask_pii(msg),
            "app_id": self.app_id,
        });

        if let (Some(base_obj), Some(ctx_obj)) = (base.as_object_mut(), context.and_then(Value::as_object)) {
            for (k, v) in ctx_obj {
                base_obj.insert(k.clone(), mask_value(v));
            }
        }

        base
    }
}

// Order payloads are logged whole, so nested strings get masked too.
fn mask_value(v: &Value) -> Value {
    match v {
        Value::String(s) => Value::String(mask_pii(s)),
        Value::Array(items) => Value::Array(items.iter().map(mask_value).collect()),
        Value::Object(map) => Value::Object(
            map.iter().map(|(k, v)| (k.clone(), mask_value(v))).collect(),
        ),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logger_structure() {
        let logger = Logger::new("orders-test".to_string());
        let context = json!({"order_id": 17, "customer": "buyer@example.com"});

        let entry = logger.build_entry("INFO", "Order saved for buyer@example.com", Some(&context));

        assert_eq!(entry["level"], "INFO");
        assert_eq!(entry["app_id"], "orders-test");
        assert!(entry["ts"].is_string());
        assert_eq!(entry["msg"], "Order saved for ***@***.***");
        assert_eq!(entry["order_id"], 17);
        assert_eq!(entry["customer"], "***@***.***");
    }

    #[test]
    fn test_nested_context_is_masked() {
        let logger = Logger::new("orders-test".to_string());
        let context = json!({"order": {"orderId": "a1", "contact": ["x@shop.io"]}});

        let entry = logger.build_entry("ERROR", "Error publishing order", Some(&context));

        assert_eq!(entry["order"]["orderId"], "a1");
        assert_eq!(entry["order"]["contact"][0], "***@***.***");
    }

    #[test]
    fn test_non_object_context_ignored() {
        let logger = Logger::new("orders-test".to_string());
        let entry = logger.build_entry("INFO", "hello", Some(&json!("scalar")));
        assert_eq!(entry.as_object().map(|o| o.len()), Some(4));
    }
}
