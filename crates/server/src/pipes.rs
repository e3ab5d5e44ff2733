//! Request-body validation.
//!
//! [`ValidatedJson`] only accepts DTOs that declare validation rules; path
//! parameters and other primitive inputs never pass through it.

use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use common::http_error::HttpError;
use models::validation::{parse_validated, Validate};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

/// Extractor that parses the JSON body, validates it against `T`'s rules and
/// deserializes it. An empty body is treated as `{}`.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: Validate + DeserializeOwned,
{
    type Rejection = HttpError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rej| HttpError::new(rej.status(), rej.body_text()))?;

        let value: Value = if bytes.iter().all(u8::is_ascii_whitespace) {
            Value::Object(Default::default())
        } else {
            serde_json::from_slice(&bytes)
                .map_err(|e| HttpError::bad_request(format!("Invalid JSON body: {e}")))?
        };

        parse_validated::<T>(value).map(ValidatedJson).map_err(|e| {
            debug!(error = %e, "request body rejected");
            HttpError::bad_request(e.to_string())
        })
    }
}
