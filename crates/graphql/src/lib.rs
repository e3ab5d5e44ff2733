//! GraphQL flavour of the cats API.
//! - `schema`: query and mutation roots over [`service::CatsService`].
//! - `routes`: the axum router serving `/graphql`.

pub mod routes;
pub mod schema;
pub mod startup;

pub use schema::{build_schema, CatsSchema};
pub use startup::run;
