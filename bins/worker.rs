use std::process::ExitCode;

use common::utils::logging::init_logging_json;
use dotenvy::dotenv;
use tracing::{error, info};

fn init_logging() {
    dotenv().ok();
    init_logging_json();
    info!(service = "worker", event = "logger_init", "tracing subscriber initialized");
}

fn main() -> ExitCode {
    init_logging();

    let cfg = match configs::AppConfig::load_and_validate() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(service = "worker", event = "config_invalid", error = %e, "failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    common::process::run_service("worker", None, worker::run(cfg))
}
