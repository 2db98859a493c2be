// Repository implementations (data access layer)
// SQLite adapters for the domain repository traits

mod rows;
pub mod sqlite_player_repository;
pub mod sqlite_roster;
pub mod sqlite_team_repository;
pub mod sqlite_user_repository;

pub use sqlite_player_repository::SqlitePlayerRepository;
pub use sqlite_roster::SqliteRoster;
pub use sqlite_team_repository::SqliteTeamRepository;
pub use sqlite_user_repository::SqliteUserRepository;
