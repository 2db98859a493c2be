use std::sync::Arc;

use crate::config::Config;
use crate::domain::repositories::{PlayerRepository, Roster, TeamRepository, UserRepository};
use crate::infrastructure::repositories::{
    SqlitePlayerRepository, SqliteRoster, SqliteTeamRepository, SqliteUserRepository,
};
use crate::infrastructure::Database;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub teams: Arc<dyn TeamRepository>,
    pub players: Arc<dyn PlayerRepository>,
    pub users: Arc<dyn UserRepository>,
    pub roster: Arc<dyn Roster>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Wires the SQLite adapters onto one pool
    pub fn new(database: &Database, config: Config) -> Self {
        let pool = database.pool().clone();
        Self {
            teams: Arc::new(SqliteTeamRepository::new(pool.clone())),
            players: Arc::new(SqlitePlayerRepository::new(pool.clone())),
            users: Arc::new(SqliteUserRepository::new(pool.clone())),
            roster: Arc::new(SqliteRoster::new(pool)),
            config: Arc::new(config),
        }
    }
}
