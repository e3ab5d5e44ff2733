use std::sync::Arc;

use axum::Router;
use configs::AppConfig;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes::{
    self,
    guard::{ServerAuthConfig, ServerState},
};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Wire the cats service and the guard configuration from `cfg`.
pub async fn build_state(cfg: &AppConfig) -> anyhow::Result<ServerState> {
    let cats = service::cats::from_config(&cfg.storage).await?;
    Ok(ServerState {
        cats: Arc::new(cats),
        auth: ServerAuthConfig { token: cfg.auth.token.clone() },
    })
}

/// Public entry: build the app and run the REST server.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let state = build_state(&cfg).await?;
    let app: Router = routes::build_router(state, build_cors());

    let addr = cfg.server.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %listener.local_addr()?, "cats REST server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
