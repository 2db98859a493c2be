use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::RepositoryResult;
use crate::domain::pagination::{Page, PageRequest};
use crate::domain::player::{Player, PlayerWithTeam};

/// Repository trait for players
///
/// Read-only. Player writes go through [`Roster`](super::Roster) so that
/// `Player.team` and `Team.players` always change together.
#[async_trait]
pub trait PlayerRepository: Send + Sync {
    /// List players with their owning team expanded
    async fn list(&self, request: &PageRequest) -> RepositoryResult<Page<PlayerWithTeam>>;

    /// Find a player by its ID
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Player>>;

    /// Find a player by its ID with its owning team expanded
    async fn find_with_team(&self, id: Uuid) -> RepositoryResult<Option<PlayerWithTeam>>;
}
