// Player domain module
// A player's `team` field is the authoritative side of team membership.

#![allow(clippy::module_inception)]

pub mod player;
pub mod value_objects;

pub use player::{Player, PlayerChanges, PlayerWithTeam};
pub use value_objects::JerseyNumber;
