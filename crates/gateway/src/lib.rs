//! HTTP front door for the users worker: validates requests and forwards
//! them over the message transport.

pub mod pipes;
pub mod routes;
pub mod startup;

pub use routes::{build_router, GatewayState};
pub use startup::run;
