use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::api::errors::ApiError;
use crate::api::state::AppState;

const INVALID_CREDENTIAL: &str = "Invalid Credential";

/// Shared-secret gate for the `/api` routes
///
/// Expects `authorization: <scheme> <token>` where the token equals the
/// configured secret. A missing header is a 401; a wrong token is a 400
/// unless the auth policy unifies it to 401.
///
/// Applied to a whole router:
/// ```rust,ignore
/// router.route_layer(middleware::from_extractor_with_state::<SharedSecret, _>(state))
/// ```
pub struct SharedSecret;

#[async_trait]
impl FromRequestParts<AppState> for SharedSecret {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| ApiError::unauthorized(INVALID_CREDENTIAL))?;

        let token = header
            .to_str()
            .ok()
            .and_then(|value| value.split(' ').nth(1));

        if token == Some(state.config.secret_key.as_str()) {
            return Ok(SharedSecret);
        }

        if state.config.auth.mismatch_unauthorized {
            Err(ApiError::unauthorized(INVALID_CREDENTIAL))
        } else {
            Err(ApiError::bad_request(INVALID_CREDENTIAL))
        }
    }
}
