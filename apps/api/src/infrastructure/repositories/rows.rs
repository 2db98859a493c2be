// Row types shared by the SQLite adapters and their conversion into
// domain records. Ids are stored as hyphenated text.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::errors::RepositoryError;
use crate::domain::pagination::{PageRequest, SortDirection};
use crate::domain::player::Player;
use crate::domain::team::Team;
use crate::domain::user::{User, UserCredentials};

pub(crate) const TEAM_COLUMNS: &str = "id, name, logo, players, created_at, updated_at";
pub(crate) const PLAYER_COLUMNS: &str = "id, name, number, position, team_id, created_at, updated_at";
pub(crate) const USER_COLUMNS: &str = "id, name, username, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct TeamRow {
    pub id: String,
    pub name: String,
    pub logo: Option<String>,
    pub players: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<TeamRow> for Team {
    type Error = RepositoryError;

    fn try_from(row: TeamRow) -> Result<Self, Self::Error> {
        Ok(Team {
            id: parse_id(&row.id)?,
            name: row.name,
            logo: row.logo,
            players: serde_json::from_str(&row.players)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct PlayerRow {
    pub id: String,
    pub name: String,
    pub number: i64,
    pub position: String,
    pub team_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<PlayerRow> for Player {
    type Error = RepositoryError;

    fn try_from(row: PlayerRow) -> Result<Self, Self::Error> {
        Ok(Player {
            id: parse_id(&row.id)?,
            name: row.name,
            number: row.number,
            position: row.position,
            team: parse_id(&row.team_id)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct UserRow {
    pub id: String,
    pub name: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: parse_id(&row.id)?,
            name: row.name,
            username: row.username,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct CredentialsRow {
    pub id: String,
    pub password_hash: String,
}

impl TryFrom<CredentialsRow> for UserCredentials {
    type Error = RepositoryError;

    fn try_from(row: CredentialsRow) -> Result<Self, Self::Error> {
        Ok(UserCredentials {
            id: parse_id(&row.id)?,
            password_hash: row.password_hash,
        })
    }
}

pub(crate) fn parse_id(raw: &str) -> Result<Uuid, RepositoryError> {
    Uuid::parse_str(raw).map_err(|e| RepositoryError::Corrupt(format!("bad id {:?}: {}", raw, e)))
}

/// Converts a batch of rows, failing on the first bad one
pub(crate) fn convert_all<R, T>(rows: Vec<R>) -> Result<Vec<T>, RepositoryError>
where
    T: TryFrom<R, Error = RepositoryError>,
{
    rows.into_iter().map(T::try_from).collect()
}

/// JSON array of ids, suitable for `json_each(?)`
pub(crate) fn id_array(ids: impl IntoIterator<Item = Uuid>) -> Result<String, RepositoryError> {
    Ok(serde_json::to_string(&ids.into_iter().collect::<Vec<_>>())?)
}

/// `ORDER BY` for name-sorted lists; ties and unsorted lists keep insertion order
pub(crate) fn order_by(sort: Option<SortDirection>) -> String {
    match sort {
        Some(direction) => format!("ORDER BY name {}, rowid ASC", direction.as_sql()),
        None => "ORDER BY rowid ASC".to_string(),
    }
}

/// `(limit, offset)` bind values; SQLite reads a negative limit as "no limit"
pub(crate) fn window(request: &PageRequest) -> (i64, i64) {
    let limit = request
        .take()
        .map_or(-1, |take| i64::try_from(take).unwrap_or(i64::MAX));
    let offset = i64::try_from(request.skip()).unwrap_or(i64::MAX);
    (limit, offset)
}

pub(crate) fn total(count: i64) -> u64 {
    u64::try_from(count).unwrap_or(0)
}
