use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::RepositoryResult;
use crate::domain::player::{Player, PlayerChanges, PlayerWithTeam};

/// Keeps `Team.players` and `Player.team` consistent
///
/// Every transition writes both sides atomically.
///
/// # Transitions
/// ```text
/// (none) --attach--> member of T --detach--> (deleted)
///                    member of T --update(team = U)--> member of U
/// ```
#[async_trait]
pub trait Roster: Send + Sync {
    /// Insert a new player and append its id to its team's player list
    ///
    /// Fails with `TeamNotFound` (and writes nothing) if the team is missing.
    async fn attach(&self, player: &Player) -> RepositoryResult<PlayerWithTeam>;

    /// Remove a player's id from its team's list, then delete the player
    ///
    /// Returns the deleted snapshot, `None` if the player does not exist.
    async fn detach(&self, player_id: Uuid) -> RepositoryResult<Option<PlayerWithTeam>>;

    /// Apply a partial update; a changed `team` moves the player between lists
    ///
    /// Fails with `TeamNotFound` (and writes nothing) if the target team is
    /// missing.
    async fn update(
        &self,
        player_id: Uuid,
        changes: &PlayerChanges,
    ) -> RepositoryResult<Option<PlayerWithTeam>>;

    /// Rebuild every team's player list from the players' `team` fields
    ///
    /// Idempotent. Returns the number of teams whose list changed.
    async fn reconcile(&self) -> RepositoryResult<u64>;
}
