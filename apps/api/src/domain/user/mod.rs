// User domain module
// Password hashes live only in `UserCredentials`; `User` is safe to serialise.

#![allow(clippy::module_inception)]

pub mod user;
pub mod value_objects;

pub use user::{User, UserChanges, UserCredentials};
pub use value_objects::{Password, Username};
