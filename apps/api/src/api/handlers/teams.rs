use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::players::PlayerSummaryResponse;
use super::{not_found, parse_path_id, ListQuery};
use crate::api::assets::AssetUrls;
use crate::api::errors::ApiError;
use crate::api::response::ApiResponse;
use crate::api::state::AppState;
use crate::api::validation::{optional_text, required_text, Validator};
use crate::domain::pagination::Page;
use crate::domain::team::{Team, TeamChanges, TeamWithPlayers};

/// Request body for creating a team
#[derive(Debug, Deserialize)]
pub struct CreateTeamRequest {
    pub name: Option<String>,
    pub logo: Option<String>,
}

/// Request body for a partial team update
#[derive(Debug, Deserialize)]
pub struct UpdateTeamRequest {
    pub name: Option<String>,
    pub logo: Option<String>,
}

/// Team with its player ids
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub logo: Option<String>,
    pub players: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TeamResponse {
    pub fn new(team: Team, assets: &AssetUrls) -> Self {
        Self {
            id: team.id,
            logo: assets.team_logo(team.logo.as_deref()),
            name: team.name,
            players: team.players,
            created_at: team.created_at,
            updated_at: team.updated_at,
        }
    }
}

/// Team with its players expanded (each without its `team` field)
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamDetailResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub logo: Option<String>,
    pub players: Vec<PlayerSummaryResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TeamDetailResponse {
    pub fn new(expanded: TeamWithPlayers, assets: &AssetUrls) -> Self {
        let team = expanded.team;
        Self {
            id: team.id,
            logo: assets.team_logo(team.logo.as_deref()),
            name: team.name,
            players: expanded
                .players
                .into_iter()
                .map(PlayerSummaryResponse::from)
                .collect(),
            created_at: team.created_at,
            updated_at: team.updated_at,
        }
    }
}

/// Team without its player list, as embedded in a player
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamSummaryResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub logo: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TeamSummaryResponse {
    pub fn new(team: Team, assets: &AssetUrls) -> Self {
        Self {
            id: team.id,
            logo: assets.team_logo(team.logo.as_deref()),
            name: team.name,
            created_at: team.created_at,
            updated_at: team.updated_at,
        }
    }
}

/// List teams with their players
///
/// GET /api/v1/team?page&limit&sort
pub async fn list_teams(
    State(state): State<AppState>,
    assets: AssetUrls,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Page<TeamDetailResponse>>>, ApiError> {
    let request = query.resolve(&state.config.pagination.teams);
    let page = state.teams.list(&request).await?;

    Ok(Json(ApiResponse::ok(
        page.map(|team| TeamDetailResponse::new(team, &assets)),
    )))
}

/// Get a team by ID with its players
///
/// GET /api/v1/team/:id
pub async fn get_team(
    State(state): State<AppState>,
    assets: AssetUrls,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<TeamDetailResponse>>, ApiError> {
    let id = parse_path_id(&id, "team")?;
    let team = state
        .teams
        .find_with_players(id)
        .await?
        .ok_or_else(|| not_found("team"))?;

    Ok(Json(ApiResponse::ok(TeamDetailResponse::new(team, &assets))))
}

/// Create a new team
///
/// POST /api/v1/team
pub async fn create_team(
    State(state): State<AppState>,
    assets: AssetUrls,
    payload: Result<Json<CreateTeamRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<TeamResponse>>, ApiError> {
    let Json(req) = payload?;

    let mut v = Validator::new();
    let name = v.check("name", &req.name, required_text("name", req.name.as_deref()));
    let team = v.finish(|| Some(Team::new(name?, req.logo)))?;

    let team = state.teams.create(&team).await?;
    tracing::info!(team_id = %team.id, "team created");

    Ok(Json(ApiResponse::ok(TeamResponse::new(team, &assets))))
}

/// Partially update a team
///
/// PATCH /api/v1/team/:id
pub async fn update_team(
    State(state): State<AppState>,
    assets: AssetUrls,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTeamRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<TeamResponse>>, ApiError> {
    let Json(req) = payload?;

    let mut v = Validator::new();
    let name = v.check("name", &req.name, optional_text("name", req.name.as_deref()));
    let changes = v.finish(|| {
        Some(TeamChanges {
            name: name?,
            logo: req.logo,
        })
    })?;

    let id = parse_path_id(&id, "team")?;
    let team = state
        .teams
        .update(id, &changes)
        .await?
        .ok_or_else(|| not_found("team"))?;

    Ok(Json(ApiResponse::ok(TeamResponse::new(team, &assets))))
}

/// Delete a team that has no players left
///
/// DELETE /api/v1/team/:id
pub async fn delete_team(
    State(state): State<AppState>,
    assets: AssetUrls,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<TeamResponse>>, ApiError> {
    let id = parse_path_id(&id, "team")?;
    let team = state
        .teams
        .delete(id)
        .await?
        .ok_or_else(|| not_found("team"))?;

    tracing::info!(team_id = %team.id, "team deleted");

    Ok(Json(ApiResponse::with_message(
        "success delete team!",
        TeamResponse::new(team, &assets),
    )))
}
