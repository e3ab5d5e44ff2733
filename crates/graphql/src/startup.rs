use std::sync::Arc;

use configs::AppConfig;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::{routes, schema};

/// Public entry: run the GraphQL server on `graphql.host:graphql.port`.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let cats = service::cats::from_config(&cfg.storage).await?;
    let schema = schema::build_schema(Arc::new(cats));
    let app = routes::build_router(schema, CorsLayer::very_permissive());

    let listener = tokio::net::TcpListener::bind(cfg.graphql.addr()).await?;
    info!(addr = %listener.local_addr()?, "cats GraphQL server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
