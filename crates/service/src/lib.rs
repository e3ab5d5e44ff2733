//! Service layer for the sample apps.
//! - `cats`: the cat store behind a swappable repository trait.
//! - `user_service`: the users worker's append-only store.
//! - `storage`: reusable file-backed storage helpers.

pub mod cats;
pub mod errors;
pub mod storage;
pub mod user_service;

pub use cats::{
    repository::{CatRepository, InMemoryCatRepository, JsonFileCatRepository},
    service::CatsService,
};
pub use errors::ServiceError;
pub use user_service::UsersService;
