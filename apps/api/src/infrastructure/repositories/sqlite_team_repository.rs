use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

use super::rows::{
    convert_all, id_array, order_by, total, window, PlayerRow, TeamRow, PLAYER_COLUMNS,
    TEAM_COLUMNS,
};
use crate::domain::errors::{RepositoryError, RepositoryResult};
use crate::domain::pagination::{Page, PageRequest};
use crate::domain::player::Player;
use crate::domain::repositories::TeamRepository;
use crate::domain::team::{Team, TeamChanges, TeamWithPlayers};

/// SQLite implementation of TeamRepository
///
/// `teams.players` is a JSON array of player ids kept in insertion order.
pub struct SqliteTeamRepository {
    pool: SqlitePool,
}

impl SqliteTeamRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TeamRepository for SqliteTeamRepository {
    async fn list(&self, request: &PageRequest) -> RepositoryResult<Page<TeamWithPlayers>> {
        let mut conn = self.pool.acquire().await?;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM teams")
            .fetch_one(&mut *conn)
            .await?;

        let (limit, offset) = window(request);
        let sql = format!(
            "SELECT {} FROM teams {} LIMIT ? OFFSET ?",
            TEAM_COLUMNS,
            order_by(request.sort)
        );
        let rows = sqlx::query_as::<_, TeamRow>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&mut *conn)
            .await?;
        let teams: Vec<Team> = convert_all(rows)?;

        let player_ids = teams.iter().flat_map(|team| team.players.iter().copied());
        let players = fetch_players_by_name(&mut conn, player_ids).await?;

        let docs = teams
            .into_iter()
            .map(|team| {
                let members: HashSet<Uuid> = team.players.iter().copied().collect();
                let players = players
                    .iter()
                    .filter(|player| members.contains(&player.id))
                    .cloned()
                    .collect();
                TeamWithPlayers { team, players }
            })
            .collect();

        Ok(Page::new(docs, total(count), request))
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Team>> {
        let mut conn = self.pool.acquire().await?;
        fetch_team(&mut conn, id).await
    }

    async fn find_with_players(&self, id: Uuid) -> RepositoryResult<Option<TeamWithPlayers>> {
        let mut conn = self.pool.acquire().await?;

        let Some(team) = fetch_team(&mut conn, id).await? else {
            return Ok(None);
        };

        let mut by_id: HashMap<Uuid, Player> =
            fetch_players_by_name(&mut conn, team.players.iter().copied())
                .await?
                .into_iter()
                .map(|player| (player.id, player))
                .collect();

        // Roster order, ids without a record drop out
        let players = team
            .players
            .iter()
            .filter_map(|player_id| by_id.remove(player_id))
            .collect();

        Ok(Some(TeamWithPlayers { team, players }))
    }

    async fn create(&self, team: &Team) -> RepositoryResult<Team> {
        let sql = format!(
            "INSERT INTO teams ({cols}) VALUES (?, ?, ?, ?, ?, ?) RETURNING {cols}",
            cols = TEAM_COLUMNS
        );
        let row = sqlx::query_as::<_, TeamRow>(&sql)
            .bind(team.id.to_string())
            .bind(&team.name)
            .bind(&team.logo)
            .bind(id_array(team.players.iter().copied())?)
            .bind(team.created_at)
            .bind(team.updated_at)
            .fetch_one(&self.pool)
            .await?;

        Team::try_from(row)
    }

    async fn update(&self, id: Uuid, changes: &TeamChanges) -> RepositoryResult<Option<Team>> {
        if changes.is_empty() {
            return self.find_by_id(id).await;
        }

        let sql = format!(
            r#"
            UPDATE teams
            SET name = COALESCE(?, name),
                logo = COALESCE(?, logo),
                updated_at = ?
            WHERE id = ?
            RETURNING {}
            "#,
            TEAM_COLUMNS
        );
        let row = sqlx::query_as::<_, TeamRow>(&sql)
            .bind(changes.name.as_ref().map(|name| name.as_str()))
            .bind(changes.logo.as_deref())
            .bind(Utc::now())
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Team::try_from).transpose()
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<Option<Team>> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            r#"
            DELETE FROM teams
            WHERE id = ?
              AND NOT EXISTS (SELECT 1 FROM players WHERE team_id = ?)
            RETURNING {}
            "#,
            TEAM_COLUMNS
        );
        let row = sqlx::query_as::<_, TeamRow>(&sql)
            .bind(id.to_string())
            .bind(id.to_string())
            .fetch_optional(&mut *tx)
            .await?;

        if let Some(row) = row {
            tx.commit().await?;
            return Team::try_from(row).map(Some);
        }

        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM teams WHERE id = ?)")
            .bind(id.to_string())
            .fetch_one(&mut *tx)
            .await?;
        tx.rollback().await?;

        if exists {
            Err(RepositoryError::TeamNotEmpty(id))
        } else {
            Ok(None)
        }
    }
}

/// Loads one team on an existing connection or transaction
pub(crate) async fn fetch_team(
    conn: &mut SqliteConnection,
    id: Uuid,
) -> RepositoryResult<Option<Team>> {
    let sql = format!("SELECT {} FROM teams WHERE id = ?", TEAM_COLUMNS);
    let row = sqlx::query_as::<_, TeamRow>(&sql)
        .bind(id.to_string())
        .fetch_optional(&mut *conn)
        .await?;

    row.map(Team::try_from).transpose()
}

/// Loads the given teams keyed by id; ids without a record are skipped
pub(crate) async fn fetch_teams(
    conn: &mut SqliteConnection,
    ids: impl IntoIterator<Item = Uuid>,
) -> RepositoryResult<HashMap<Uuid, Team>> {
    let sql = format!(
        "SELECT {} FROM teams WHERE id IN (SELECT value FROM json_each(?))",
        TEAM_COLUMNS
    );
    let rows = sqlx::query_as::<_, TeamRow>(&sql)
        .bind(id_array(ids)?)
        .fetch_all(&mut *conn)
        .await?;

    Ok(convert_all::<_, Team>(rows)?
        .into_iter()
        .map(|team| (team.id, team))
        .collect())
}

/// Appends a player id to a team's list, skipping it if already present
///
/// Returns `false` if the team does not exist.
pub(crate) async fn push_player(
    conn: &mut SqliteConnection,
    team_id: Uuid,
    player_id: Uuid,
    now: DateTime<Utc>,
) -> RepositoryResult<bool> {
    let result = sqlx::query(
        r#"
        UPDATE teams
        SET players = CASE
                WHEN EXISTS (SELECT 1 FROM json_each(teams.players) WHERE value = ?)
                THEN players
                ELSE json_insert(players, '$[#]', ?)
            END,
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(player_id.to_string())
    .bind(player_id.to_string())
    .bind(now)
    .bind(team_id.to_string())
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Removes every occurrence of a player id from a team's list
///
/// Returns `false` if the team does not exist.
pub(crate) async fn pull_player(
    conn: &mut SqliteConnection,
    team_id: Uuid,
    player_id: Uuid,
    now: DateTime<Utc>,
) -> RepositoryResult<bool> {
    let result = sqlx::query(
        r#"
        UPDATE teams
        SET players = (
                SELECT json_group_array(value)
                FROM json_each(teams.players)
                WHERE value <> ?
            ),
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(player_id.to_string())
    .bind(now)
    .bind(team_id.to_string())
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Loads the given players ordered by name; ids without a record are skipped
async fn fetch_players_by_name(
    conn: &mut SqliteConnection,
    ids: impl IntoIterator<Item = Uuid>,
) -> RepositoryResult<Vec<Player>> {
    let sql = format!(
        r#"
        SELECT {} FROM players
        WHERE id IN (SELECT value FROM json_each(?))
        ORDER BY name ASC, rowid ASC
        "#,
        PLAYER_COLUMNS
    );
    let rows = sqlx::query_as::<_, PlayerRow>(&sql)
        .bind(id_array(ids)?)
        .fetch_all(&mut *conn)
        .await?;

    convert_all(rows)
}
