use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::RepositoryResult;
use crate::domain::pagination::{Page, PageRequest};
use crate::domain::user::{User, UserChanges, UserCredentials};

/// Repository trait for users
///
/// Only `find_credentials` ever returns the password hash.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// List users
    async fn list(&self, request: &PageRequest) -> RepositoryResult<Page<User>>;

    /// Find a user by ID
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<User>>;

    /// Load the stored password hash for a user
    async fn find_credentials(&self, id: Uuid) -> RepositoryResult<Option<UserCredentials>>;

    /// Whether another user already has this username
    async fn username_taken(&self, username: &str, except: Option<Uuid>) -> RepositoryResult<bool>;

    /// Create a new user with an already hashed password
    async fn create(&self, user: &User, password_hash: &str) -> RepositoryResult<User>;

    /// Apply a partial profile update
    async fn update(&self, id: Uuid, changes: &UserChanges) -> RepositoryResult<Option<User>>;

    /// Replace the stored password hash
    async fn update_password(&self, id: Uuid, password_hash: &str) -> RepositoryResult<Option<User>>;

    /// Delete a user and return the deleted snapshot
    async fn delete(&self, id: Uuid) -> RepositoryResult<Option<User>>;
}
