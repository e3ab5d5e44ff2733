//! Uniform `{message, success, data}` response body of the cats handlers.
//!
//! Failures are flattened into `success: false` with the error message as
//! `data`; the HTTP status stays 200.

use std::fmt::Display;

use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::warn;

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub message: &'static str,
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(message: &'static str, data: T) -> Self {
        Self { message, success: true, data }
    }
}

impl Envelope<String> {
    pub fn failed(message: &'static str, error: impl Display) -> Self {
        Self { message, success: false, data: error.to_string() }
    }
}

/// Wrap a handler outcome in the envelope.
pub fn respond<T, E>(ok: &'static str, failed: &'static str, result: Result<T, E>) -> Response
where
    T: Serialize,
    E: Display,
{
    match result {
        Ok(data) => Json(Envelope::ok(ok, data)).into_response(),
        Err(e) => {
            warn!(error = %e, "{failed}");
            Json(Envelope::failed(failed, e)).into_response()
        }
    }
}
