use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::sqlite_player_repository::{
    delete_player, fetch_player, insert_player, touch_player, update_player, with_team,
};
use super::sqlite_team_repository::{fetch_team, pull_player, push_player};
use crate::domain::errors::{RepositoryError, RepositoryResult};
use crate::domain::player::{Player, PlayerChanges, PlayerWithTeam};
use crate::domain::repositories::Roster;

/// SQLite implementation of the roster maintainer
///
/// Each transition runs in one transaction and writes before it reads, so
/// the transaction holds SQLite's write lock for its whole read-modify-write.
pub struct SqliteRoster {
    pool: SqlitePool,
}

impl SqliteRoster {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Roster for SqliteRoster {
    async fn attach(&self, player: &Player) -> RepositoryResult<PlayerWithTeam> {
        let mut tx = self.pool.begin().await?;
        let now = Utc::now();

        let created = insert_player(&mut tx, player).await?;

        if !push_player(&mut tx, created.team, created.id, now).await? {
            tx.rollback().await?;
            return Err(RepositoryError::TeamNotFound(created.team));
        }

        let team = fetch_team(&mut tx, created.team).await?.ok_or_else(|| {
            RepositoryError::ReferenceInconsistency(format!(
                "team {} vanished while attaching player {}",
                created.team, created.id
            ))
        })?;

        tx.commit().await?;

        tracing::info!(player_id = %created.id, team_id = %team.id, "player attached to team");

        Ok(PlayerWithTeam {
            player: created,
            team: Some(team),
        })
    }

    async fn detach(&self, player_id: Uuid) -> RepositoryResult<Option<PlayerWithTeam>> {
        let mut tx = self.pool.begin().await?;
        let now = Utc::now();

        let Some(deleted) = delete_player(&mut tx, player_id).await? else {
            tx.rollback().await?;
            return Ok(None);
        };

        if !pull_player(&mut tx, deleted.team, deleted.id, now).await? {
            // Nothing can point at the player any more, so the delete still stands
            tracing::warn!(
                player_id = %deleted.id,
                team_id = %deleted.team,
                "reference inconsistency: deleted player belonged to a missing team"
            );
        }

        let snapshot = with_team(&mut tx, deleted).await?;
        tx.commit().await?;

        tracing::info!(player_id = %player_id, "player detached and deleted");

        Ok(Some(snapshot))
    }

    async fn update(
        &self,
        player_id: Uuid,
        changes: &PlayerChanges,
    ) -> RepositoryResult<Option<PlayerWithTeam>> {
        if changes.is_empty() {
            let mut conn = self.pool.acquire().await?;
            return match fetch_player(&mut conn, player_id).await? {
                Some(player) => with_team(&mut conn, player).await.map(Some),
                None => Ok(None),
            };
        }

        let mut tx = self.pool.begin().await?;
        let now = Utc::now();

        if !touch_player(&mut tx, player_id, now).await? {
            tx.rollback().await?;
            return Ok(None);
        }

        let current = fetch_player(&mut tx, player_id).await?.ok_or_else(|| {
            RepositoryError::ReferenceInconsistency(format!(
                "player {} vanished during update",
                player_id
            ))
        })?;

        if let Some(target) = changes.transfer_target(&current) {
            if !push_player(&mut tx, target, player_id, now).await? {
                tx.rollback().await?;
                return Err(RepositoryError::TeamNotFound(target));
            }

            if !pull_player(&mut tx, current.team, player_id, now).await? {
                tracing::warn!(
                    player_id = %player_id,
                    team_id = %current.team,
                    "reference inconsistency: transferred player left a missing team"
                );
            }

            tracing::info!(
                player_id = %player_id,
                from = %current.team,
                to = %target,
                "player transferred"
            );
        }

        let updated = update_player(&mut tx, player_id, changes, now)
            .await?
            .ok_or_else(|| {
                RepositoryError::ReferenceInconsistency(format!(
                    "player {} vanished during update",
                    player_id
                ))
            })?;

        let snapshot = with_team(&mut tx, updated).await?;
        tx.commit().await?;

        Ok(Some(snapshot))
    }

    async fn reconcile(&self) -> RepositoryResult<u64> {
        let mut tx = self.pool.begin().await?;

        let repaired = sqlx::query(
            r#"
            UPDATE teams
            SET players = (
                    SELECT json_group_array(id)
                    FROM (SELECT id FROM players WHERE players.team_id = teams.id ORDER BY rowid)
                ),
                updated_at = ?
            WHERE json(teams.players) <> (
                    SELECT json_group_array(id)
                    FROM (SELECT id FROM players WHERE players.team_id = teams.id ORDER BY rowid)
                )
            "#,
        )
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let orphans: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM players WHERE team_id NOT IN (SELECT id FROM teams)",
        )
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        if orphans > 0 {
            tracing::warn!(orphans, "players reference teams that no longer exist");
        }
        tracing::info!(repaired, "roster reconciliation finished");

        Ok(repaired)
    }
}
