pub mod cats;
pub mod guard;

use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use common::types::Health;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::interceptor;
use guard::ServerState;

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn metrics() -> (axum::http::StatusCode, String) {
    common::metrics::encode_metrics()
}

/// Build the application router: public health and metrics routes plus the guarded cats group.
///
/// Layer order on the cats group is guard, then interceptor, then the body
/// pipe inside each handler.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics));

    let cats = Router::new()
        .route("/cats", post(cats::create).get(cats::find_all))
        .route(
            "/cats/:id",
            get(cats::find_one).put(cats::update).delete(cats::remove),
        )
        .route_layer(middleware::from_fn(interceptor::logging_interceptor))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            guard::require_token,
        ));

    public
        .merge(cats)
        .with_state(state)
        .layer(middleware::from_fn(interceptor::logger))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
