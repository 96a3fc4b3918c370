use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::error::Error as _;

/// Failure talking to the sidecar.
#[derive(Debug, thiserror::Error)]
pub enum DaprError {
    #[error("sidecar request failed: {0}")]
    Transport(String),

    #[error("sidecar returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode sidecar response: {0}")]
    Decode(String),

    #[error("invalid sidecar request: {0}")]
    InvalidRequest(String),
}

impl DaprError {
    /// Classification used for the `kind` log field. Nothing is retried.
    pub fn is_transient(&self) -> bool {
        match self {
            DaprError::Transport(msg) => {
                msg.contains("connect") || msg.contains("timed out") || msg.contains("broken pipe")
            }
            DaprError::Status { status, .. } => *status >= 500,
            DaprError::Decode(_) | DaprError::InvalidRequest(_) => false,
        }
    }

    pub fn kind(&self) -> &'static str {
        if self.is_transient() {
            "transient"
        } else {
            "permanent"
        }
    }
}

impl From<reqwest::Error> for DaprError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            DaprError::Decode(e.to_string())
        } else if e.is_builder() {
            DaprError::InvalidRequest(e.to_string())
        } else {
            // reqwest hides the root cause behind "error sending request"
            let mut msg = e.to_string();
            let mut source = e.source();
            while let Some(cause) = source {
                msg.push_str(": ");
                msg.push_str(&cause.to_string());
                source = cause.source();
            }
            DaprError::Transport(msg)
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// The client sees only `message`; `source` belongs in the log.
    #[error("{message}: {source}")]
    Sidecar { message: String, source: DaprError },
}

impl AppError {
    pub fn sidecar<S: Into<String>>(message: S, source: DaprError) -> Self {
        AppError::Sidecar { message: message.into(), source }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Sidecar { message, .. } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        (status, Json(json!({ "error": error_message }))).into_response()
    }
}

impl From<DaprError> for AppError {
    fn from(err: DaprError) -> Self {
        AppError::sidecar("sidecar request failed", err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(DaprError::Transport("tcp connect error".into()).is_transient());
        assert!(DaprError::Status { status: 503, body: String::new() }.is_transient());
        assert!(!DaprError::Status { status: 400, body: String::new() }.is_transient());
        assert_eq!(DaprError::Decode("eof".into()).kind(), "permanent");
    }

    #[test]
    fn test_status_codes() {
        let resp = AppError::NotFound("order not found".into()).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = AppError::BadRequest("bad json".into()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = AppError::from(DaprError::Status { status: 404, body: "missing".into() }).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_sidecar_detail_stays_out_of_body() {
        let err = DaprError::Transport("error sending request for url (http://127.0.0.1:3500/v1.0/state/kvstore)".into());
        let resp = AppError::sidecar("failed to get order", err).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, json!({"error": "failed to get order"}));
    }
}
