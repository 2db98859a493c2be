// Domain layer module exports
// Entities, value objects, pagination rules and the persistence contracts.
// Nothing in here knows about HTTP.

pub mod errors;
pub mod pagination;
pub mod player;
pub mod repositories;
pub mod team;
pub mod user;
pub mod value_objects;

pub use errors::{RepositoryError, RepositoryResult};
