use std::sync::Arc;

use configs::AppConfig;
use tower_http::cors::CorsLayer;
use tracing::info;
use transport::ClientProxy;

use crate::routes::{build_router, GatewayState};

/// Public entry: serve the gateway and forward to the worker at
/// `worker.host:worker.port`. The worker connection is opened lazily.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let users = Arc::new(ClientProxy::new(cfg.worker.addr()));
    let app = build_router(GatewayState { users }, CorsLayer::very_permissive());

    let listener = tokio::net::TcpListener::bind(cfg.gateway.addr()).await?;
    info!(addr = %listener.local_addr()?, worker = %cfg.worker.addr(), "users gateway listening");
    axum::serve(listener, app).await?;
    Ok(())
}
