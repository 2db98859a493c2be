use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::rows::{convert_all, order_by, total, window, CredentialsRow, UserRow, USER_COLUMNS};
use crate::domain::errors::RepositoryResult;
use crate::domain::pagination::{Page, PageRequest};
use crate::domain::repositories::UserRepository;
use crate::domain::user::{User, UserChanges, UserCredentials};

/// SQLite implementation of UserRepository
///
/// Every query except `find_credentials` selects `USER_COLUMNS`, which leaves
/// out the password hash.
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn list(&self, request: &PageRequest) -> RepositoryResult<Page<User>> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        let (limit, offset) = window(request);
        let sql = format!(
            "SELECT {} FROM users {} LIMIT ? OFFSET ?",
            USER_COLUMNS,
            order_by(request.sort)
        );
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(Page::new(convert_all(rows)?, total(count), request))
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS);
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(User::try_from).transpose()
    }

    async fn find_credentials(&self, id: Uuid) -> RepositoryResult<Option<UserCredentials>> {
        let row = sqlx::query_as::<_, CredentialsRow>(
            "SELECT id, password_hash FROM users WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserCredentials::try_from).transpose()
    }

    async fn username_taken(&self, username: &str, except: Option<Uuid>) -> RepositoryResult<bool> {
        let taken: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM users WHERE username = ? AND id IS NOT ?)",
        )
        .bind(username)
        .bind(except.map(|id| id.to_string()))
        .fetch_one(&self.pool)
        .await?;

        Ok(taken)
    }

    async fn create(&self, user: &User, password_hash: &str) -> RepositoryResult<User> {
        let sql = format!(
            r#"
            INSERT INTO users (id, name, username, password_hash, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING {}
            "#,
            USER_COLUMNS
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(user.id.to_string())
            .bind(&user.name)
            .bind(&user.username)
            .bind(password_hash)
            .bind(user.created_at)
            .bind(user.updated_at)
            .fetch_one(&self.pool)
            .await?;

        User::try_from(row)
    }

    async fn update(&self, id: Uuid, changes: &UserChanges) -> RepositoryResult<Option<User>> {
        if changes.is_empty() {
            return self.find_by_id(id).await;
        }

        let sql = format!(
            r#"
            UPDATE users
            SET name = COALESCE(?, name),
                username = COALESCE(?, username),
                updated_at = ?
            WHERE id = ?
            RETURNING {}
            "#,
            USER_COLUMNS
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(changes.name.as_ref().map(|name| name.as_str()))
            .bind(changes.username.as_ref().map(|username| username.as_str()))
            .bind(Utc::now())
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(User::try_from).transpose()
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> RepositoryResult<Option<User>> {
        let sql = format!(
            "UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ? RETURNING {}",
            USER_COLUMNS
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(password_hash)
            .bind(Utc::now())
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(User::try_from).transpose()
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<Option<User>> {
        let sql = format!("DELETE FROM users WHERE id = ? RETURNING {}", USER_COLUMNS);
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(User::try_from).transpose()
    }
}
