use thiserror::Error;
use uuid::Uuid;

/// Errors raised by the record store and the roster maintainer
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("team not found: {0}")]
    TeamNotFound(Uuid),

    #[error("team {0} still has players")]
    TeamNotEmpty(Uuid),

    #[error("reference inconsistency: {0}")]
    ReferenceInconsistency(String),

    #[error("corrupt record: {0}")]
    Corrupt(String),

    #[error("invalid JSON column: {0}")]
    Json(#[from] serde_json::Error),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;
