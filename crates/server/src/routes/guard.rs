use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use common::http_error::HttpError;
use service::CatsService;
use tracing::warn;

#[derive(Clone)]
pub struct ServerAuthConfig {
    /// The only credential accepted on guarded routes.
    pub token: String,
}

#[derive(Clone)]
pub struct ServerState {
    pub cats: Arc<CatsService>,
    pub auth: ServerAuthConfig,
}

/// Guard for the cats handler group: the `authorization` header must be
/// present and equal the configured token. Runs before body validation and
/// before any store access.
pub async fn require_token(
    State(state): State<ServerState>,
    req: Request,
    next: Next,
) -> Result<Response, HttpError> {
    let rejection = match req.headers().get(AUTHORIZATION).map(|v| v.as_bytes()) {
        None | Some(b"") => Some("Authorization token is missing"),
        Some(t) if t != state.auth.token.as_bytes() => Some("Invalid token"),
        Some(_) => None,
    };

    if let Some(message) = rejection {
        warn!(path = %req.uri().path(), reason = message, "request rejected by guard");
        return Err(HttpError::unauthorized(message));
    }
    Ok(next.run(req).await)
}
