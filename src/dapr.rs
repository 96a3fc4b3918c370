//! Thin HTTP client for the sidecar's local API.
//!
//! Each method is one request against the sidecar; failures are surfaced as
//! [`DaprError`] and never retried.

use crate::config::Config;
use crate::error::DaprError;
use crate::model::StateItem;
use crate::observability::metrics::Metrics;
use reqwest::{Method, RequestBuilder, StatusCode, Url};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};

const API_TOKEN_HEADER: &str = "dapr-api-token";
const APP_ID_HEADER: &str = "dapr-app-id";

#[derive(Clone)]
pub struct DaprClient {
    http: reqwest::Client,
    endpoint: Url,
    api_token: Option<String>,
    metrics: Arc<Metrics>,
}

impl DaprClient {
    pub fn new(
        endpoint: &str,
        api_token: Option<String>,
        timeout: Duration,
        metrics: Arc<Metrics>,
    ) -> Result<Self, DaprError> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| DaprError::InvalidRequest(format!("bad sidecar endpoint {}: {}", endpoint, e)))?;
        if endpoint.cannot_be_a_base() {
            return Err(DaprError::InvalidRequest(format!("bad sidecar endpoint {}", endpoint)));
        }
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, endpoint, api_token, metrics })
    }

    pub fn from_config(config: &Config, metrics: Arc<Metrics>) -> Result<Self, DaprError> {
        Self::new(
            &config.dapr_http_endpoint,
            config.dapr_api_token.clone(),
            Duration::from_millis(config.dapr_request_timeout_ms),
            metrics,
        )
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    /// `POST /v1.0/publish/{pubsub}/{topic}`
    pub async fn publish_event<T: Serialize + ?Sized>(
        &self,
        pubsub: &str,
        topic: &str,
        data: &T,
    ) -> Result<(), DaprError> {
        let url = self.url(&["v1.0", "publish", pubsub, topic])?;
        let req = self.request(Method::POST, url).json(data);
        self.timed("publish", async {
            check_status(req.send().await?).await?;
            Ok(())
        })
        .await
    }

    /// Calls `method` on `app_id` through the sidecar and returns the reply
    /// body (`Null` when empty, a string when it is not JSON).
    pub async fn invoke_method<T: Serialize + ?Sized>(
        &self,
        app_id: &str,
        method: &str,
        data: &T,
    ) -> Result<Value, DaprError> {
        let segments: Vec<&str> = method.split('/').filter(|s| !s.is_empty()).collect();
        let url = self.url(&segments)?;
        let req = self
            .request(Method::POST, url)
            .header(APP_ID_HEADER, app_id)
            .json(data);
        self.timed("invoke", async {
            let res = check_status(req.send().await?).await?;
            let body = res.text().await?;
            if body.trim().is_empty() {
                return Ok(Value::Null);
            }
            Ok(serde_json::from_str::<Value>(&body).unwrap_or(Value::String(body)))
        })
        .await
    }

    /// `POST /v1.0/state/{store}`
    pub async fn save_state(&self, store: &str, items: &[StateItem]) -> Result<(), DaprError> {
        let url = self.url(&["v1.0", "state", store])?;
        let req = self.request(Method::POST, url).json(items);
        self.timed("state_save", async {
            check_status(req.send().await?).await?;
            Ok(())
        })
        .await
    }

    /// `GET /v1.0/state/{store}/{key}`. The sidecar answers 204 for a
    /// missing key, which maps to `None`.
    pub async fn get_state(&self, store: &str, key: &str) -> Result<Option<Value>, DaprError> {
        let url = self.url(&["v1.0", "state", store, key])?;
        let req = self.request(Method::GET, url);
        self.timed("state_get", async {
            let res = check_status(req.send().await?).await?;
            if res.status() == StatusCode::NO_CONTENT {
                return Ok(None);
            }
            let body = res.bytes().await?;
            if body.is_empty() {
                return Ok(None);
            }
            serde_json::from_slice::<Value>(&body)
                .map(Some)
                .map_err(|e| DaprError::Decode(e.to_string()))
        })
        .await
    }

    /// `DELETE /v1.0/state/{store}/{key}`
    pub async fn delete_state(&self, store: &str, key: &str) -> Result<(), DaprError> {
        let url = self.url(&["v1.0", "state", store, key])?;
        let req = self.request(Method::DELETE, url);
        self.timed("state_delete", async {
            check_status(req.send().await?).await?;
            Ok(())
        })
        .await
    }

    /// `GET /v1.0/healthz`
    pub async fn healthz(&self) -> Result<(), DaprError> {
        let url = self.url(&["v1.0", "healthz"])?;
        check_status(self.request(Method::GET, url).send().await?).await?;
        Ok(())
    }

    fn url(&self, segments: &[&str]) -> Result<Url, DaprError> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| DaprError::InvalidRequest(format!("bad sidecar endpoint {}", self.endpoint)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match &self.api_token {
            Some(token) => builder.header(API_TOKEN_HEADER, token),
            None => builder,
        }
    }

    async fn timed<T, F>(&self, op: &str, fut: F) -> Result<T, DaprError>
    where
        F: std::future::Future<Output = Result<T, DaprError>>,
    {
        let start = Instant::now();
        let result = fut.await;
        self.metrics
            .observe_call(op, start.elapsed().as_secs_f64(), result.is_ok());
        result
    }
}

async fn check_status(res: reqwest::Response) -> Result<reqwest::Response, DaprError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let body = res.text().await.unwrap_or_default();
    Err(DaprError::Status { status: status.as_u16(), body })
}
