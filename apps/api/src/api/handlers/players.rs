use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::teams::TeamSummaryResponse;
use super::{not_found, parse_path_id, ListQuery};
use crate::api::assets::AssetUrls;
use crate::api::errors::ApiError;
use crate::api::response::ApiResponse;
use crate::api::state::AppState;
use crate::api::validation::{
    jersey_number, optional_jersey_number, optional_team_id, optional_text, required_text,
    team_id, Validator,
};
use crate::domain::pagination::Page;
use crate::domain::player::{Player, PlayerChanges, PlayerWithTeam};

/// Request body for creating a player
///
/// `number` may be a JSON integer or a numeric string.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlayerRequest {
    pub name: Option<String>,
    pub number: Option<Value>,
    pub position: Option<String>,
    pub team_id: Option<String>,
}

/// Request body for a partial player update; `teamId` moves the player
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlayerRequest {
    pub name: Option<String>,
    pub number: Option<Value>,
    pub position: Option<String>,
    pub team_id: Option<String>,
}

/// Player with the owning team expanded (without its player list)
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub number: i64,
    pub position: String,
    pub team: Option<TeamSummaryResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PlayerResponse {
    pub fn new(expanded: PlayerWithTeam, assets: &AssetUrls) -> Self {
        let player = expanded.player;
        Self {
            id: player.id,
            name: player.name,
            number: player.number,
            position: player.position,
            team: expanded
                .team
                .map(|team| TeamSummaryResponse::new(team, assets)),
            created_at: player.created_at,
            updated_at: player.updated_at,
        }
    }
}

/// Player without its `team` field, as embedded in a team
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSummaryResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub number: i64,
    pub position: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Player> for PlayerSummaryResponse {
    fn from(player: Player) -> Self {
        Self {
            id: player.id,
            name: player.name,
            number: player.number,
            position: player.position,
            created_at: player.created_at,
            updated_at: player.updated_at,
        }
    }
}

/// List players with their teams
///
/// GET /api/v1/player?page&limit&sort
pub async fn list_players(
    State(state): State<AppState>,
    assets: AssetUrls,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Page<PlayerResponse>>>, ApiError> {
    let request = query.resolve(&state.config.pagination.players);
    let page = state.players.list(&request).await?;

    Ok(Json(ApiResponse::ok(
        page.map(|player| PlayerResponse::new(player, &assets)),
    )))
}

/// Get a player by ID with its team
///
/// GET /api/v1/player/:id
pub async fn get_player(
    State(state): State<AppState>,
    assets: AssetUrls,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<PlayerResponse>>, ApiError> {
    let id = parse_path_id(&id, "player")?;
    let player = state
        .players
        .find_with_team(id)
        .await?
        .ok_or_else(|| not_found("player"))?;

    Ok(Json(ApiResponse::ok(PlayerResponse::new(player, &assets))))
}

/// Create a player and add it to its team
///
/// POST /api/v1/player
pub async fn create_player(
    State(state): State<AppState>,
    assets: AssetUrls,
    payload: Result<Json<CreatePlayerRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<PlayerResponse>>, ApiError> {
    let Json(req) = payload?;

    let mut v = Validator::new();
    let name = v.check("name", &req.name, required_text("name", req.name.as_deref()));
    let number = v.check("number", &req.number, jersey_number(req.number.as_ref()));
    let position = v.check(
        "position",
        &req.position,
        required_text("position", req.position.as_deref()),
    );
    let team = v.check("teamId", &req.team_id, team_id(req.team_id.as_deref()));
    let player = v.finish(|| Some(Player::new(name?, number?, position?, team?)))?;

    let created = state.roster.attach(&player).await?;

    Ok(Json(ApiResponse::ok(PlayerResponse::new(created, &assets))))
}

/// Partially update a player, moving it to another team if `teamId` changes
///
/// PATCH /api/v1/player/:id
pub async fn update_player(
    State(state): State<AppState>,
    assets: AssetUrls,
    Path(id): Path<String>,
    payload: Result<Json<UpdatePlayerRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<PlayerResponse>>, ApiError> {
    let Json(req) = payload?;

    let mut v = Validator::new();
    let name = v.check("name", &req.name, optional_text("name", req.name.as_deref()));
    let number = v.check(
        "number",
        &req.number,
        optional_jersey_number(req.number.as_ref()),
    );
    let position = v.check(
        "position",
        &req.position,
        optional_text("position", req.position.as_deref()),
    );
    let team = v.check(
        "teamId",
        &req.team_id,
        optional_team_id(req.team_id.as_deref()),
    );
    let changes = v.finish(|| {
        Some(PlayerChanges {
            name: name?,
            number: number?,
            position: position?,
            team: team?,
        })
    })?;

    let id = parse_path_id(&id, "player")?;
    let player = state
        .roster
        .update(id, &changes)
        .await?
        .ok_or_else(|| not_found("player"))?;

    Ok(Json(ApiResponse::ok(PlayerResponse::new(player, &assets))))
}

/// Remove a player from its team and delete it
///
/// DELETE /api/v1/player/:id
pub async fn delete_player(
    State(state): State<AppState>,
    assets: AssetUrls,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<PlayerResponse>>, ApiError> {
    let id = parse_path_id(&id, "player")?;
    let player = state
        .roster
        .detach(id)
        .await?
        .ok_or_else(|| not_found("player"))?;

    Ok(Json(ApiResponse::with_message(
        "success delete player!",
        PlayerResponse::new(player, &assets),
    )))
}
