use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::value_objects::Username;
use crate::domain::value_objects::RequiredText;

/// User record as returned by every read path
///
/// Carries no password material.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(name: RequiredText, username: Username) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into_inner(),
            username: username.into_inner(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Internal view used to verify a password
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub id: Uuid,
    pub password_hash: String,
}

/// Partial update of a user's profile; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserChanges {
    pub name: Option<RequiredText>,
    pub username: Option<Username>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.username.is_none()
    }
}
