pub mod envelope;
pub mod interceptor;
pub mod pipes;
pub mod routes;
pub mod startup;

pub use routes::guard::{ServerAuthConfig, ServerState};
pub use startup::run;
