use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub dapr_http_endpoint: String,
    pub dapr_api_token: Option<String>,
    pub pubsub_name: String,
    pub pubsub_topic: String,
    pub kvstore_name: String,
    pub kv_key_prefix: String,
    pub invoke_app_id: String,
    pub app_id: String,
    pub dapr_request_timeout_ms: u64,
    pub sidecar_probe_interval_ms: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let port = env::var("PORT")
            .or_else(|_| env::var("APP_PORT"))
            .unwrap_or_else(|_| "5001".to_string())
            .parse::<u16>()
            .map_err(|_| "PORT must be a number between 1 and 65535".to_string())?;
        if port == 0 {
            return Err("PORT must be between 1 and 65535".to_string());
        }

        let dapr_http_port = env::var("DAPR_HTTP_PORT")
            .unwrap_or_else(|_| "3500".to_string())
            .parse::<u16>()
            .map_err(|_| "DAPR_HTTP_PORT must be a number between 1 and 65535".to_string())?;
        if dapr_http_port == 0 {
            return Err("DAPR_HTTP_PORT must be between 1 and 65535".to_string());
        }

        let dapr_http_endpoint = match env::var("DAPR_HTTP_ENDPOINT") {
            Ok(v) if !v.trim().is_empty() => v.trim().trim_end_matches('/').to_string(),
            _ => format!("http://localhost:{}", dapr_http_port),
        };
        if !dapr_http_endpoint.starts_with("http://") && !dapr_http_endpoint.starts_with("https://") {
            return Err("DAPR_HTTP_ENDPOINT must start with http:// or https://".to_string());
        }

        let dapr_api_token = env::var("DAPR_API_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty());

        let pubsub_name = env::var("PUBSUB_NAME").unwrap_or_else(|_| "pubsub".to_string());
        if !is_valid_component_name(&pubsub_name) {
            return Err("PUBSUB_NAME invalid format".to_string());
        }

        let pubsub_topic = env::var("PUBSUB_TOPIC").unwrap_or_else(|_| "orders".to_string());
        if !is_valid_component_name(&pubsub_topic) {
            return Err("PUBSUB_TOPIC invalid format".to_string());
        }

        let kvstore_name = env::var("KVSTORE_NAME").unwrap_or_else(|_| "kvstore".to_string());
        if !is_valid_component_name(&kvstore_name) {
            return Err("KVSTORE_NAME invalid format".to_string());
        }

        // An empty prefix is allowed: keys are then the bare order id.
        let kv_key_prefix = env::var("KV_KEY_PREFIX").unwrap_or_else(|_| "order".to_string());

        let invoke_app_id = env::var("INVOKE_APPID").unwrap_or_else(|_| "target".to_string());
        if !is_valid_component_name(&invoke_app_id) {
            return Err("INVOKE_APPID invalid format".to_string());
        }

        let app_id = env::var("APP_ID")
            .unwrap_or_else(|_| format!("orders-{}", uuid::Uuid::new_v4()));
        if app_id.trim().is_empty() {
            return Err("APP_ID cannot be empty".to_string());
        }

        let dapr_request_timeout_ms = env::var("DAPR_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| "10000".to_string())
            .parse::<u64>()
            .map_err(|_| "DAPR_REQUEST_TIMEOUT_MS must be a number".to_string())?;
        if !(100..=300_000).contains(&dapr_request_timeout_ms) {
            return Err("DAPR_REQUEST_TIMEOUT_MS must be between 100 and 300000".to_string());
        }

        let sidecar_probe_interval_ms = env::var("SIDECAR_PROBE_INTERVAL_MS")
            .unwrap_or_else(|_| "5000".to_string())
            .parse::<u64>()
            .map_err(|_| "SIDECAR_PROBE_INTERVAL_MS must be a number".to_string())?;
        if !(100..=600_000).contains(&sidecar_probe_interval_ms) {
            return Err("SIDECAR_PROBE_INTERVAL_MS must be between 100 and 600000".to_string());
        }

        Ok(Config {
            port,
            dapr_http_endpoint,
            dapr_api_token,
            pubsub_name,
            pubsub_topic,
            kvstore_name,
            kv_key_prefix,
            invoke_app_id,
            app_id,
            dapr_request_timeout_ms,
            sidecar_probe_interval_ms,
        })
    }
}

fn is_valid_component_name(s: &str) -> bool {
    if s.trim().is_empty() {
        return false;
    }
    let allowed = s.chars().all(|c| {
        c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-'
    });
    allowed && !s.contains("..") && !s.starts_with('.') && !s.ends_with('.')
}
