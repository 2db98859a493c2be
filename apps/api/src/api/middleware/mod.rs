pub mod auth;

pub use auth::SharedSecret;
