// API layer module (adapters for controllers)
// Follows Hexagonal Architecture - API is an adapter

pub mod assets;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod state;
pub mod validation;

use axum::{
    middleware::from_extractor_with_state,
    routing::{get, patch},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use handlers::{players, root, teams, users};
use middleware::SharedSecret;
use state::AppState;

/// Builds the application router
///
/// Everything under `/api/v1` sits behind the shared-secret gate; unmatched
/// paths fall through to the public asset directory.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        // Team routes
        .route("/team", get(teams::list_teams).post(teams::create_team))
        .route(
            "/team/:id",
            get(teams::get_team)
                .patch(teams::update_team)
                .delete(teams::delete_team),
        )
        // Player routes
        .route(
            "/player",
            get(players::list_players).post(players::create_player),
        )
        .route(
            "/player/:id",
            get(players::get_player)
                .patch(players::update_player)
                .delete(players::delete_player),
        )
        // User routes
        .route("/user", get(users::list_users).post(users::create_user))
        .route(
            "/user/:id",
            get(users::get_user)
                .patch(users::update_user)
                .delete(users::delete_user),
        )
        .route("/user/:id/password", patch(users::change_password))
        .route_layer(from_extractor_with_state::<SharedSecret, AppState>(
            state.clone(),
        ));

    let public = ServeDir::new(&state.config.public_dir);

    Router::new()
        .route("/", get(root::index))
        .route("/health", get(root::health_check))
        .nest("/api/v1", api)
        .fallback_service(public)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
