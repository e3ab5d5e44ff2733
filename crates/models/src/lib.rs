//! Entities, request DTOs and the two request validation engines shared by the
//! cats and users services.

pub mod cat;
pub mod errors;
pub mod schema;
pub mod user;
pub mod validation;

pub use cat::{Cat, CatPatch, CreateCatDto, UpdateCatDto};
pub use errors::ModelError;
pub use user::{user_schema, User};
