use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::value_objects::JerseyNumber;
use crate::domain::team::Team;
use crate::domain::value_objects::RequiredText;

/// Player record
///
/// # Invariants
/// - Belongs to exactly one team, which must exist
/// - `number` is never negative
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub id: Uuid,
    pub name: String,
    pub number: i64,
    pub position: String,
    pub team: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Player {
    /// Creates a player with a fresh id for the given team
    ///
    /// The team's player list is not touched here; attaching the player is
    /// the roster's job.
    pub fn new(
        name: RequiredText,
        number: JerseyNumber,
        position: RequiredText,
        team: Uuid,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into_inner(),
            number: number.value(),
            position: position.into_inner(),
            team,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update of a player; `None` leaves a field untouched
///
/// A `team` change moves the player between rosters and must go through
/// the roster maintainer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerChanges {
    pub name: Option<RequiredText>,
    pub number: Option<JerseyNumber>,
    pub position: Option<RequiredText>,
    pub team: Option<Uuid>,
}

impl PlayerChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.number.is_none() && self.position.is_none() && self.team.is_none()
    }

    /// The team this update moves the player to, if it moves at all
    pub fn transfer_target(&self, player: &Player) -> Option<Uuid> {
        self.team.filter(|team| *team != player.team)
    }
}

/// A player with the owning team expanded inline
///
/// `team` is `None` when the referenced team no longer exists.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerWithTeam {
    pub player: Player,
    pub team: Option<Team>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(team: Uuid) -> Player {
        Player::new(
            RequiredText::new("name", "Kai").unwrap(),
            JerseyNumber::new(7).unwrap(),
            RequiredText::new("position", "FW").unwrap(),
            team,
        )
    }

    #[test]
    fn new_player_points_at_team() {
        let team = Uuid::new_v4();
        let player = player(team);

        assert_eq!(player.team, team);
        assert_eq!(player.number, 7);
        assert_eq!(player.position, "FW");
    }

    #[test]
    fn transfer_target_ignores_same_team() {
        let team = Uuid::new_v4();
        let player = player(team);

        let same = PlayerChanges {
            team: Some(team),
            ..PlayerChanges::default()
        };
        assert_eq!(same.transfer_target(&player), None);

        let other = Uuid::new_v4();
        let moving = PlayerChanges {
            team: Some(other),
            ..PlayerChanges::default()
        };
        assert_eq!(moving.transfer_target(&player), Some(other));
    }

    #[test]
    fn empty_changes() {
        assert!(PlayerChanges::default().is_empty());
    }
}
