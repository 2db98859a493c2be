// HTTP handlers
// Validate, call the store or the roster, shape the response.

pub mod players;
pub mod root;
pub mod teams;
pub mod users;

use serde::Deserialize;
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::domain::pagination::{PageRequest, PaginationPolicy};

/// Raw `page`, `limit` and `sort` query parameters
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort: Option<String>,
}

impl ListQuery {
    pub fn resolve(&self, policy: &PaginationPolicy) -> PageRequest {
        PageRequest::resolve(
            self.page.as_deref(),
            self.limit.as_deref(),
            self.sort.as_deref(),
            policy,
        )
    }
}

/// Parses a path id; a malformed id is reported like a missing record
pub(crate) fn parse_path_id(raw: &str, entity: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| not_found(entity))
}

pub(crate) fn not_found(entity: &str) -> ApiError {
    ApiError::not_found(format!("{} not found!", entity))
}
