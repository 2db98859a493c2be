use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::RepositoryResult;
use crate::domain::pagination::{Page, PageRequest};
use crate::domain::team::{Team, TeamChanges, TeamWithPlayers};

/// Repository trait for teams
///
/// Not-found is reported as `Ok(None)`, never as an error.
#[async_trait]
pub trait TeamRepository: Send + Sync {
    /// List teams ordered by name, each with its players expanded
    /// (players inside a team are ordered by name)
    async fn list(&self, request: &PageRequest) -> RepositoryResult<Page<TeamWithPlayers>>;

    /// Find a team by its ID
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Team>>;

    /// Find a team by its ID with its players expanded in roster order
    async fn find_with_players(&self, id: Uuid) -> RepositoryResult<Option<TeamWithPlayers>>;

    /// Insert a new team
    async fn create(&self, team: &Team) -> RepositoryResult<Team>;

    /// Apply a partial update and return the updated team
    async fn update(&self, id: Uuid, changes: &TeamChanges) -> RepositoryResult<Option<Team>>;

    /// Delete a team and return the deleted snapshot
    ///
    /// Fails with `TeamNotEmpty` while any player still belongs to the team.
    async fn delete(&self, id: Uuid) -> RepositoryResult<Option<Team>>;
}
