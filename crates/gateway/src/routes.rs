use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use common::http_error::HttpError;
use common::types::Health;
use serde_json::{json, Value};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{error, Level};
use transport::{ClientProxy, TransportError};

use crate::pipes::ValidatedUser;

#[derive(Clone)]
pub struct GatewayState {
    pub users: Arc<ClientProxy>,
}

async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

fn relay_failure(pattern: &str, err: TransportError) -> HttpError {
    error!(pattern, error = %err, "users worker call failed");
    HttpError::internal()
}

/// `POST /create`
async fn create(
    State(state): State<GatewayState>,
    ValidatedUser(user): ValidatedUser,
) -> Result<(StatusCode, Json<Value>), HttpError> {
    let reply = state
        .users
        .send(&json!({"cmd": "create_user"}), user)
        .await
        .map_err(|e| relay_failure("create_user", e))?;
    Ok((StatusCode::CREATED, Json(reply)))
}

/// `GET /users`
async fn users(State(state): State<GatewayState>) -> Result<Json<Value>, HttpError> {
    let reply = state
        .users
        .send(&json!({"cmd": "get_users"}), json!({}))
        .await
        .map_err(|e| relay_failure("get_users", e))?;
    Ok(Json(reply))
}

pub fn build_router(state: GatewayState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/create", post(create))
        .route("/users", get(users))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}
