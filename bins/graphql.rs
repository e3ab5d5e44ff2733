use std::process::ExitCode;

use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use tracing::{error, info};

fn init_logging() {
    dotenv().ok();
    init_logging_default();
    info!(service = "graphql", event = "logger_init", "tracing subscriber initialized");
}

fn main() -> ExitCode {
    init_logging();

    let cfg = match configs::AppConfig::load_and_validate() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(service = "graphql", event = "config_invalid", error = %e, "failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    let threads = cfg.server.worker_threads;
    common::process::run_service("graphql", threads, graphql::run(cfg))
}
