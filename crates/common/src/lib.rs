//! Shared building blocks for the sample services: logging setup, HTTP error
//! bodies, Prometheus metrics and the process bootstrap used by every binary.

pub mod http_error;
pub mod metrics;
pub mod process;
pub mod types;
pub mod utils;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health { status: "ok" };
        assert_eq!(h.status, "ok");
    }
}
