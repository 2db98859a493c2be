// Infrastructure layer module
// SQLite connection handling and the repository adapters

pub mod database;
pub mod repositories;

pub use database::Database;
