use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

use super::rows::{convert_all, order_by, total, window, PlayerRow, PLAYER_COLUMNS};
use super::sqlite_team_repository::{fetch_team, fetch_teams};
use crate::domain::errors::RepositoryResult;
use crate::domain::pagination::{Page, PageRequest};
use crate::domain::player::{Player, PlayerChanges, PlayerWithTeam};
use crate::domain::repositories::PlayerRepository;

/// SQLite implementation of PlayerRepository
pub struct SqlitePlayerRepository {
    pool: SqlitePool,
}

impl SqlitePlayerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlayerRepository for SqlitePlayerRepository {
    async fn list(&self, request: &PageRequest) -> RepositoryResult<Page<PlayerWithTeam>> {
        let mut conn = self.pool.acquire().await?;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM players")
            .fetch_one(&mut *conn)
            .await?;

        let (limit, offset) = window(request);
        let sql = format!(
            "SELECT {} FROM players {} LIMIT ? OFFSET ?",
            PLAYER_COLUMNS,
            order_by(request.sort)
        );
        let rows = sqlx::query_as::<_, PlayerRow>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&mut *conn)
            .await?;
        let players: Vec<Player> = convert_all(rows)?;

        let teams = fetch_teams(&mut conn, players.iter().map(|player| player.team)).await?;

        let docs = players
            .into_iter()
            .map(|player| PlayerWithTeam {
                team: teams.get(&player.team).cloned(),
                player,
            })
            .collect();

        Ok(Page::new(docs, total(count), request))
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Player>> {
        let mut conn = self.pool.acquire().await?;
        fetch_player(&mut conn, id).await
    }

    async fn find_with_team(&self, id: Uuid) -> RepositoryResult<Option<PlayerWithTeam>> {
        let mut conn = self.pool.acquire().await?;

        match fetch_player(&mut conn, id).await? {
            Some(player) => with_team(&mut conn, player).await.map(Some),
            None => Ok(None),
        }
    }
}

pub(crate) async fn fetch_player(
    conn: &mut SqliteConnection,
    id: Uuid,
) -> RepositoryResult<Option<Player>> {
    let sql = format!("SELECT {} FROM players WHERE id = ?", PLAYER_COLUMNS);
    let row = sqlx::query_as::<_, PlayerRow>(&sql)
        .bind(id.to_string())
        .fetch_optional(&mut *conn)
        .await?;

    row.map(Player::try_from).transpose()
}

/// Expands the owning team; a missing team expands to `None`
pub(crate) async fn with_team(
    conn: &mut SqliteConnection,
    player: Player,
) -> RepositoryResult<PlayerWithTeam> {
    let team = fetch_team(conn, player.team).await?;
    Ok(PlayerWithTeam { player, team })
}

pub(crate) async fn insert_player(
    conn: &mut SqliteConnection,
    player: &Player,
) -> RepositoryResult<Player> {
    let sql = format!(
        "INSERT INTO players ({cols}) VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING {cols}",
        cols = PLAYER_COLUMNS
    );
    let row = sqlx::query_as::<_, PlayerRow>(&sql)
        .bind(player.id.to_string())
        .bind(&player.name)
        .bind(player.number)
        .bind(&player.position)
        .bind(player.team.to_string())
        .bind(player.created_at)
        .bind(player.updated_at)
        .fetch_one(&mut *conn)
        .await?;

    Player::try_from(row)
}

pub(crate) async fn update_player(
    conn: &mut SqliteConnection,
    id: Uuid,
    changes: &PlayerChanges,
    now: DateTime<Utc>,
) -> RepositoryResult<Option<Player>> {
    let sql = format!(
        r#"
        UPDATE players
        SET name = COALESCE(?, name),
            number = COALESCE(?, number),
            position = COALESCE(?, position),
            team_id = COALESCE(?, team_id),
            updated_at = ?
        WHERE id = ?
        RETURNING {}
        "#,
        PLAYER_COLUMNS
    );
    let row = sqlx::query_as::<_, PlayerRow>(&sql)
        .bind(changes.name.as_ref().map(|name| name.as_str()))
        .bind(changes.number.map(|number| number.value()))
        .bind(changes.position.as_ref().map(|position| position.as_str()))
        .bind(changes.team.map(|team| team.to_string()))
        .bind(now)
        .bind(id.to_string())
        .fetch_optional(&mut *conn)
        .await?;

    row.map(Player::try_from).transpose()
}

/// Bumps `updated_at` only; used to take the write lock before reading
pub(crate) async fn touch_player(
    conn: &mut SqliteConnection,
    id: Uuid,
    now: DateTime<Utc>,
) -> RepositoryResult<bool> {
    let result = sqlx::query("UPDATE players SET updated_at = ? WHERE id = ?")
        .bind(now)
        .bind(id.to_string())
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub(crate) async fn delete_player(
    conn: &mut SqliteConnection,
    id: Uuid,
) -> RepositoryResult<Option<Player>> {
    let sql = format!("DELETE FROM players WHERE id = ? RETURNING {}", PLAYER_COLUMNS);
    let row = sqlx::query_as::<_, PlayerRow>(&sql)
        .bind(id.to_string())
        .fetch_optional(&mut *conn)
        .await?;

    row.map(Player::try_from).transpose()
}
