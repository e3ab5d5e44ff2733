//! JSON error bodies shared by the HTTP services.
//!
//! Bodies follow the `{statusCode, message, error?}` shape clients of the
//! sample services already expect.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpError {
    pub status: StatusCode,
    pub message: String,
    pub error: Option<&'static str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HttpErrorBody<'a> {
    status_code: u16,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'static str>,
}

impl HttpError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into(), error: None }
    }

    /// 400 with the `"Bad Request"` error label.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self { status: StatusCode::BAD_REQUEST, message: message.into(), error: Some("Bad Request") }
    }

    /// 401 carrying only a message.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.status.as_u16(), self.message)
    }
}

impl std::error::Error for HttpError {}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body = HttpErrorBody {
            status_code: self.status.as_u16(),
            message: &self.message,
            error: self.error,
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_request_body_carries_label() -> anyhow::Result<()> {
        let err = HttpError::bad_request("Validation failed: name must be a string");
        let body = serde_json::to_value(HttpErrorBody {
            status_code: err.status.as_u16(),
            message: &err.message,
            error: err.error,
        })?;
        assert_eq!(
            body,
            serde_json::json!({
                "statusCode": 400,
                "message": "Validation failed: name must be a string",
                "error": "Bad Request"
            })
        );
        Ok(())
    }

    #[test]
    fn unauthorized_body_has_no_label() -> anyhow::Result<()> {
        let err = HttpError::unauthorized("Invalid token");
        let body = serde_json::to_value(HttpErrorBody {
            status_code: err.status.as_u16(),
            message: &err.message,
            error: err.error,
        })?;
        assert_eq!(body, serde_json::json!({"statusCode": 401, "message": "Invalid token"}));
        Ok(())
    }
}
