//! League API Library
//!
//! Teams, players and users behind a shared-secret REST API, with the
//! team rosters kept consistent with each player's team reference.

pub mod api;
pub mod auth;
pub mod config;
pub mod domain;
pub mod infrastructure;
