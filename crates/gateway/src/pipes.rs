use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use common::http_error::HttpError;
use models::user_schema;
use serde_json::Value;
use tracing::debug;

/// JSON body checked against [`user_schema`]. Validation stops at the first
/// problem and answers 400 with that message.
#[derive(Debug, Clone)]
pub struct ValidatedUser(pub Value);

#[async_trait]
impl<S> FromRequest<S> for ValidatedUser
where
    S: Send + Sync,
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

        user_schema().validate(&value).map_err(|e| {
            debug!(error = %e, "user body rejected");
            HttpError::bad_request(e.to_string())
        })?;
        Ok(ValidatedUser(value))
    }
}
