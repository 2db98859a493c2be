//! Integration tests for repository layer
//!
//! These tests verify that the SQLite adapters behave correctly against a
//! fresh in-memory database, including the roster transitions that keep
//! `Team.players` and `Player.team` consistent.

use league_api::auth::password::{hash_password, verify_password};
use league_api::domain::pagination::{PageRequest, PaginationPolicy, SortFallback};
use league_api::domain::player::{JerseyNumber, Player, PlayerChanges};
use league_api::domain::repositories::{
    PlayerRepository, Roster, TeamRepository, UserRepository,
};
use league_api::domain::team::{Team, TeamChanges};
use league_api::domain::user::{User, UserChanges, Username};
use league_api::domain::value_objects::RequiredText;
use league_api::domain::RepositoryError;
use league_api::infrastructure::repositories::{
    SqlitePlayerRepository, SqliteRoster, SqliteTeamRepository, SqliteUserRepository,
};
use league_api::infrastructure::Database;
use std::collections::HashSet;
use std::sync::Arc;

use uuid::Uuid;

struct Repos {
    database: Database,
    teams: SqliteTeamRepository,
    players: SqlitePlayerRepository,
    users: SqliteUserRepository,
    roster: SqliteRoster,
}

/// Set up repositories on a fresh in-memory database
async fn setup() -> Repos {
    let database = Database::in_memory()
        .await
        .expect("Failed to open in-memory database");
    let pool = database.pool().clone();

    Repos {
        teams: SqliteTeamRepository::new(pool.clone()),
        players: SqlitePlayerRepository::new(pool.clone()),
        users: SqliteUserRepository::new(pool.clone()),
        roster: SqliteRoster::new(pool),
        database,
    }
}

fn text(value: &str) -> RequiredText {
    RequiredText::new("field", value).unwrap()
}

fn new_team(name: &str) -> Team {
    Team::new(text(name), None)
}

fn new_player(name: &str, team: Uuid) -> Player {
    Player::new(text(name), JerseyNumber::new(10).unwrap(), text("C"), team)
}

/// Insert a player row directly, leaving every team list untouched
async fn insert_raw_player(database: &Database, name: &str, team: Uuid) -> Uuid {
    let player = new_player(name, team);
    sqlx::query(
        "INSERT INTO players (id, name, number, position, team_id, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(player.id.to_string())
    .bind(&player.name)
    .bind(player.number)
    .bind(&player.position)
    .bind(player.team.to_string())
    .bind(player.created_at)
    .bind(player.updated_at)
    .execute(database.pool())
    .await
    .expect("Failed to insert raw player");

    player.id
}

fn all() -> PageRequest {
    PageRequest::resolve(Some("all"), None, None, &PaginationPolicy::default())
}

#[tokio::test]
async fn test_team_repository_create_and_find() {
    let repos = setup().await;

    let team = Team::new(text("Lions"), Some("lions.png".to_string()));
    let created = repos.teams.create(&team).await.expect("create team");

    assert_eq!(created.id, team.id);
    assert_eq!(created.name, "Lions");
    assert_eq!(created.logo.as_deref(), Some("lions.png"));
    assert!(created.players.is_empty());

    let found = repos
        .teams
        .find_by_id(team.id)
        .await
        .expect("find team")
        .expect("team exists");
    assert_eq!(found.name, "Lions");

    let missing = repos.teams.find_by_id(Uuid::new_v4()).await.unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_team_repository_update_is_partial() {
    let repos = setup().await;
    let team = repos
        .teams
        .create(&Team::new(text("Lions"), Some("lions.png".to_string())))
        .await
        .unwrap();

    let changes = TeamChanges {
        name: Some(text("Big Lions")),
        logo: None,
    };
    let updated = repos
        .teams
        .update(team.id, &changes)
        .await
        .unwrap()
        .expect("team exists");

    assert_eq!(updated.name, "Big Lions");
    assert_eq!(updated.logo.as_deref(), Some("lions.png"));
    assert!(updated.updated_at >= team.updated_at);

    let missing = repos
        .teams
        .update(Uuid::new_v4(), &changes)
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_empty_updates_leave_records_untouched() {
    let repos = setup().await;
    let team = repos.teams.create(&new_team("Lions")).await.unwrap();
    let kai = repos.roster.attach(&new_player("Kai", team.id)).await.unwrap();

    let same_team = repos
        .teams
        .update(team.id, &TeamChanges::default())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(same_team.name, "Lions");

    let same_player = repos
        .roster
        .update(kai.player.id, &PlayerChanges::default())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(same_player.player.updated_at, kai.player.updated_at);
    assert_eq!(same_player.team.map(|t| t.id), Some(team.id));

    let missing = repos
        .users
        .update(Uuid::new_v4(), &UserChanges::default())
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_attach_appends_to_team_roster() {
    let repos = setup().await;
    let team = repos.teams.create(&new_team("Lions")).await.unwrap();

    let first = repos.roster.attach(&new_player("Kai", team.id)).await.unwrap();
    let second = repos.roster.attach(&new_player("Ari", team.id)).await.unwrap();

    let snapshot = second.team.expect("team expanded");
    assert_eq!(snapshot.players, vec![first.player.id, second.player.id]);

    // Roster order, not name order
    let expanded = repos
        .teams
        .find_with_players(team.id)
        .await
        .unwrap()
        .unwrap();
    let names: Vec<&str> = expanded.players.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Kai", "Ari"]);
}

#[tokio::test]
async fn test_attach_to_missing_team_writes_nothing() {
    let repos = setup().await;
    let missing = Uuid::new_v4();

    let err = repos
        .roster
        .attach(&new_player("Kai", missing))
        .await
        .unwrap_err();

    assert!(matches!(err, RepositoryError::TeamNotFound(id) if id == missing));

    let page = repos.players.list(&all()).await.unwrap();
    assert_eq!(page.total_docs, 0);
}

#[tokio::test]
async fn test_detach_removes_from_roster_and_deletes() {
    let repos = setup().await;
    let team = repos.teams.create(&new_team("Lions")).await.unwrap();
    let kai = repos.roster.attach(&new_player("Kai", team.id)).await.unwrap();
    let ari = repos.roster.attach(&new_player("Ari", team.id)).await.unwrap();

    let deleted = repos
        .roster
        .detach(kai.player.id)
        .await
        .unwrap()
        .expect("player existed");
    assert_eq!(deleted.player.name, "Kai");

    let team = repos.teams.find_by_id(team.id).await.unwrap().unwrap();
    assert_eq!(team.players, vec![ari.player.id]);
    assert!(repos.players.find_by_id(kai.player.id).await.unwrap().is_none());

    // Second delete finds nothing
    assert!(repos.roster.detach(kai.player.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_detach_player_of_missing_team() {
    let repos = setup().await;

    // Raw insert bypasses the roster, leaving a dangling team reference
    let orphan = insert_raw_player(&repos.database, "Kai", Uuid::new_v4()).await;

    let deleted = repos
        .roster
        .detach(orphan)
        .await
        .unwrap()
        .expect("player existed");

    assert!(deleted.team.is_none());
    assert!(repos.players.find_by_id(orphan).await.unwrap().is_none());
}

#[tokio::test]
async fn test_transfer_moves_player_between_rosters() {
    let repos = setup().await;
    let lions = repos.teams.create(&new_team("Lions")).await.unwrap();
    let tigers = repos.teams.create(&new_team("Tigers")).await.unwrap();
    let kai = repos.roster.attach(&new_player("Kai", lions.id)).await.unwrap();

    let changes = PlayerChanges {
        team: Some(tigers.id),
        number: Some(JerseyNumber::new(23).unwrap()),
        ..PlayerChanges::default()
    };
    let moved = repos
        .roster
        .update(kai.player.id, &changes)
        .await
        .unwrap()
        .expect("player exists");

    assert_eq!(moved.player.team, tigers.id);
    assert_eq!(moved.player.number, 23);
    assert_eq!(moved.team.map(|t| t.players), Some(vec![kai.player.id]));

    let lions = repos.teams.find_by_id(lions.id).await.unwrap().unwrap();
    assert!(lions.players.is_empty());
}

#[tokio::test]
async fn test_transfer_to_missing_team_is_rolled_back() {
    let repos = setup().await;
    let lions = repos.teams.create(&new_team("Lions")).await.unwrap();
    let kai = repos.roster.attach(&new_player("Kai", lions.id)).await.unwrap();

    let changes = PlayerChanges {
        name: Some(text("Kai Renamed")),
        team: Some(Uuid::new_v4()),
        ..PlayerChanges::default()
    };
    let err = repos
        .roster
        .update(kai.player.id, &changes)
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::TeamNotFound(_)));

    let player = repos.players.find_by_id(kai.player.id).await.unwrap().unwrap();
    assert_eq!(player.name, "Kai");
    assert_eq!(player.team, lions.id);

    let lions = repos.teams.find_by_id(lions.id).await.unwrap().unwrap();
    assert_eq!(lions.players, vec![kai.player.id]);
}

#[tokio::test]
async fn test_update_without_transfer_keeps_roster() {
    let repos = setup().await;
    let lions = repos.teams.create(&new_team("Lions")).await.unwrap();
    let kai = repos.roster.attach(&new_player("Kai", lions.id)).await.unwrap();

    let changes = PlayerChanges {
        position: Some(text("PF")),
        team: Some(lions.id),
        ..PlayerChanges::default()
    };
    let updated = repos
        .roster
        .update(kai.player.id, &changes)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.player.position, "PF");
    assert_eq!(updated.team.unwrap().players, vec![kai.player.id]);

    let missing = repos
        .roster
        .update(Uuid::new_v4(), &changes)
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_team_delete_requires_empty_roster() {
    let repos = setup().await;
    let lions = repos.teams.create(&new_team("Lions")).await.unwrap();
    let kai = repos.roster.attach(&new_player("Kai", lions.id)).await.unwrap();

    let err = repos.teams.delete(lions.id).await.unwrap_err();
    assert!(matches!(err, RepositoryError::TeamNotEmpty(id) if id == lions.id));

    repos.roster.detach(kai.player.id).await.unwrap();

    let deleted = repos.teams.delete(lions.id).await.unwrap().expect("deleted");
    assert_eq!(deleted.name, "Lions");
    assert!(repos.teams.delete(lions.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_reconcile_repairs_raw_writes() {
    let repos = setup().await;
    let lions = repos.teams.create(&new_team("Lions")).await.unwrap();
    let tigers = repos.teams.create(&new_team("Tigers")).await.unwrap();

    // Raw inserts never touch the rosters
    let kai = insert_raw_player(&repos.database, "Kai", lions.id).await;
    let ari = insert_raw_player(&repos.database, "Ari", lions.id).await;

    let repaired = repos.roster.reconcile().await.unwrap();
    assert_eq!(repaired, 1);

    let lions_now = repos.teams.find_by_id(lions.id).await.unwrap().unwrap();
    assert_eq!(lions_now.players, vec![kai, ari]);
    let tigers_now = repos.teams.find_by_id(tigers.id).await.unwrap().unwrap();
    assert!(tigers_now.players.is_empty());

    // Idempotent
    assert_eq!(repos.roster.reconcile().await.unwrap(), 0);

    // Raw team change leaves a stale entry behind
    sqlx::query("UPDATE players SET team_id = ? WHERE id = ?")
        .bind(tigers.id.to_string())
        .bind(ari.to_string())
        .execute(repos.database.pool())
        .await
        .unwrap();

    assert_eq!(repos.roster.reconcile().await.unwrap(), 2);
    let lions_now = repos.teams.find_by_id(lions.id).await.unwrap().unwrap();
    assert_eq!(lions_now.players, vec![kai]);
    let tigers_now = repos.teams.find_by_id(tigers.id).await.unwrap().unwrap();
    assert_eq!(tigers_now.players, vec![ari]);
}

#[tokio::test]
async fn test_player_list_pages_and_expands_team() {
    let repos = setup().await;
    let lions = repos.teams.create(&new_team("Lions")).await.unwrap();
    for i in 1..=12 {
        repos
            .roster
            .attach(&new_player(&format!("Player {:02}", i), lions.id))
            .await
            .unwrap();
    }

    let request = PageRequest::resolve(
        Some("2"),
        Some("5"),
        Some("desc"),
        &PaginationPolicy::default(),
    );
    let page = repos.players.list(&request).await.unwrap();

    assert_eq!(page.total_docs, 12);
    assert_eq!(page.total_pages, 3);
    let names: Vec<&str> = page.docs.iter().map(|p| p.player.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Player 07", "Player 06", "Player 05", "Player 04", "Player 03"]
    );
    assert!(page
        .docs
        .iter()
        .all(|p| p.team.as_ref().map(|t| t.id) == Some(lions.id)));
}

#[tokio::test]
async fn test_unsorted_list_keeps_insertion_order() {
    let repos = setup().await;
    for name in ["Zed", "Ann", "Mo"] {
        repos.teams.create(&new_team(name)).await.unwrap();
    }

    let policy = PaginationPolicy::default().with_sort_fallback(SortFallback::Unsorted);
    let request = PageRequest::resolve(None, None, None, &policy);
    let page = repos.teams.list(&request).await.unwrap();

    let names: Vec<&str> = page.docs.iter().map(|t| t.team.name.as_str()).collect();
    assert_eq!(names, vec!["Zed", "Ann", "Mo"]);
}

#[tokio::test]
async fn test_user_repository_lifecycle() {
    let repos = setup().await;

    let user = User::new(text("Ana"), Username::new("ana").unwrap());
    let password_hash = hash_password("Secret123").expect("hash password");
    let created = repos.users.create(&user, &password_hash).await.unwrap();
    assert_eq!(created.username, "ana");

    assert!(repos.users.username_taken("ana", None).await.unwrap());
    assert!(!repos.users.username_taken("ana", Some(user.id)).await.unwrap());
    assert!(!repos.users.username_taken("bob", None).await.unwrap());

    let credentials = repos
        .users
        .find_credentials(user.id)
        .await
        .unwrap()
        .expect("user exists");
    assert!(verify_password("Secret123", &credentials.password_hash).unwrap());

    let changes = UserChanges {
        username: Some(Username::new("ana2").unwrap()),
        ..UserChanges::default()
    };
    let updated = repos.users.update(user.id, &changes).await.unwrap().unwrap();
    assert_eq!(updated.username, "ana2");
    assert_eq!(updated.name, "Ana");

    let new_hash = hash_password("Better456").unwrap();
    repos
        .users
        .update_password(user.id, &new_hash)
        .await
        .unwrap()
        .expect("user exists");
    let credentials = repos.users.find_credentials(user.id).await.unwrap().unwrap();
    assert!(verify_password("Better456", &credentials.password_hash).unwrap());
    assert!(!verify_password("Secret123", &credentials.password_hash).unwrap());

    let deleted = repos.users.delete(user.id).await.unwrap().expect("deleted");
    assert_eq!(deleted.id, user.id);
    assert!(repos.users.find_by_id(user.id).await.unwrap().is_none());
    assert!(repos.users.delete(user.id).await.unwrap().is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_attach_and_detach_keep_roster_exact() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("league.db").display());
    let database = Database::connect(&url).await.expect("open file database");

    let teams = Arc::new(SqliteTeamRepository::new(database.pool().clone()));
    let roster = Arc::new(SqliteRoster::new(database.pool().clone()));
    let team = teams.create(&new_team("Lions")).await.unwrap();

    let attaches: Vec<_> = (0..40)
        .map(|i| {
            let roster = Arc::clone(&roster);
            let player = new_player(&format!("Player {:02}", i), team.id);
            tokio::spawn(async move { roster.attach(&player).await })
        })
        .collect();

    let mut attached = Vec::new();
    for handle in attaches {
        let created = handle.await.expect("attach task").expect("attach");
        attached.push(created.player.id);
    }

    let team_now = teams.find_by_id(team.id).await.unwrap().unwrap();
    assert_eq!(team_now.players.len(), 40);
    let listed: HashSet<Uuid> = team_now.players.iter().copied().collect();
    assert_eq!(listed, attached.iter().copied().collect::<HashSet<_>>());

    let detaches: Vec<_> = attached
        .iter()
        .take(20)
        .map(|id| {
            let roster = Arc::clone(&roster);
            let id = *id;
            tokio::spawn(async move { roster.detach(id).await })
        })
        .collect();

    for handle in detaches {
        let deleted = handle.await.expect("detach task").expect("detach");
        assert!(deleted.is_some());
    }

    let team_now = teams.find_by_id(team.id).await.unwrap().unwrap();
    let survivors: HashSet<Uuid> = attached.iter().skip(20).copied().collect();
    assert_eq!(team_now.players.len(), 20);
    assert_eq!(team_now.players.iter().copied().collect::<HashSet<_>>(), survivors);

    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM players")
        .fetch_one(database.pool())
        .await
        .unwrap();
    assert_eq!(remaining, 20);

    database.close().await;
}

#[tokio::test]
async fn test_database_close() {
    let repos = setup().await;
    repos.database.close().await;

    assert!(repos.teams.find_by_id(Uuid::new_v4()).await.is_err());
}
