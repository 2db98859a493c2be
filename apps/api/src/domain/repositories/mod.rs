// Persistence contracts
// Implementations live in the infrastructure layer.

pub mod player_repository;
pub mod roster;
pub mod team_repository;
pub mod user_repository;

pub use player_repository::PlayerRepository;
pub use roster::Roster;
pub use team_repository::TeamRepository;
pub use user_repository::UserRepository;
