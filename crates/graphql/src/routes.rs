use axum::{
    extract::State,
    response::Html,
    routing::get,
    Json, Router,
};
use common::types::Health;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::schema::CatsSchema;

async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn execute(
    State(schema): State<CatsSchema>,
    Json(req): Json<async_graphql::Request>,
) -> Json<async_graphql::Response> {
    Json(schema.execute(req).await)
}

async fn graphiql() -> Html<String> {
    Html(
        async_graphql::http::GraphiQLSource::build()
            .endpoint("/graphql")
            .finish(),
    )
}

pub fn build_router(schema: CatsSchema, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/graphql", get(graphiql).post(execute))
        .with_state(schema)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}
