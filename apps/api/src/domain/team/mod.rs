// Team domain module
// A team owns a denormalized, insertion-ordered list of its player ids.

#![allow(clippy::module_inception)]

pub mod team;

pub use team::{Team, TeamChanges, TeamWithPlayers};
