use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::player::Player;
use crate::domain::value_objects::RequiredText;

/// Team record
///
/// # Invariants
/// - Name is never blank
/// - Every id in `players` belongs to a player whose `team` is this team's id
///   (maintained by the roster, never by direct edits)
#[derive(Debug, Clone, PartialEq)]
pub struct Team {
    pub id: Uuid,
    pub name: String,
    /// File name of the logo; turned into a URL by the HTTP layer
    pub logo: Option<String>,
    pub players: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Team {
    /// Creates a team with a fresh id and an empty player list
    ///
    /// # Example
    /// ```
    /// use league_api::domain::team::Team;
    /// use league_api::domain::value_objects::RequiredText;
    ///
    /// let team = Team::new(RequiredText::new("name", "Lions").unwrap(), None);
    /// assert_eq!(team.name, "Lions");
    /// assert!(team.players.is_empty());
    /// ```
    pub fn new(name: RequiredText, logo: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into_inner(),
            logo,
            players: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update of a team; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamChanges {
    pub name: Option<RequiredText>,
    pub logo: Option<String>,
}

impl TeamChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.logo.is_none()
    }
}

/// A team with its players expanded inline
#[derive(Debug, Clone, PartialEq)]
pub struct TeamWithPlayers {
    pub team: Team,
    pub players: Vec<Player>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_team_has_no_players() {
        let team = Team::new(RequiredText::new("name", "Lions").unwrap(), Some("lions.png".into()));

        assert_eq!(team.name, "Lions");
        assert_eq!(team.logo.as_deref(), Some("lions.png"));
        assert!(team.players.is_empty());
        assert_eq!(team.created_at, team.updated_at);
    }

    #[test]
    fn new_teams_get_distinct_ids() {
        let a = Team::new(RequiredText::new("name", "A").unwrap(), None);
        let b = Team::new(RequiredText::new("name", "B").unwrap(), None);

        assert_ne!(a.id, b.id);
    }

    #[test]
    fn empty_changes() {
        assert!(TeamChanges::default().is_empty());
        assert!(!TeamChanges {
            logo: Some("x.png".into()),
            ..TeamChanges::default()
        }
        .is_empty());
    }
}
