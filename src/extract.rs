use crate::error::AppError;
use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;

/// JSON body extractor that ignores `Content-Type`.
///
/// The sidecar delivers events as `application/cloudevents+json` and
/// invocation callers do not always set a content type, so the body is
/// parsed as JSON whatever the header says.
#[derive(Debug, Clone)]
pub struct AnyJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for AnyJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        serde_json::from_slice(&bytes)
            .map(AnyJson)
            .map_err(|e| AppError::BadRequest(format!("invalid JSON body: {}", e)))
    }
}
