//! End-to-end tests for the connection handshake and community leaderboard
//!
//! Run with: cargo test -p integration-tests --test social_graph_tests

use chrono::Duration;

use integration_tests::{test_now, unique_id, TestApp};
use mintup_core::entities::{PairStatus, Registration, RegistrationStatus};
use mintup_core::leaderboard::LeaderboardLimits;
use mintup_core::traits::RegistrationRepository;
use mintup_core::{Caller, DomainError};
use mintup_service::ServiceError;

fn assert_domain_error(err: &ServiceError, expected: &DomainError) {
    match err {
        ServiceError::Domain(actual) => assert_eq!(actual.code(), expected.code()),
        other => panic!("expected domain error {expected:?}, got {other:?}"),
    }
}

// ============================================================================
// Connection Handshake Tests
// ============================================================================

#[tokio::test]
async fn test_connection_happy_path_is_idempotent() {
    let app = TestApp::new();
    let community = unique_id();
    let event = app.seed_event(community, 0).await;
    let initiator = app.seed_attendee(community, event.id, Some("Ada")).await;
    let acceptor = app.seed_attendee(community, event.id, Some("Bob")).await;

    let t0 = test_now();
    let issued = app
        .connections()
        .initiate(Caller::user(initiator.id), event.id, acceptor.id, t0)
        .await
        .unwrap();
    assert_eq!(issued.expires_at, t0 + Duration::minutes(5));

    let first = app
        .connections()
        .confirm(
            Caller::user(acceptor.id),
            &issued.connection_token,
            t0 + Duration::milliseconds(1),
        )
        .await
        .unwrap();
    assert!(first.success);

    // Confirm is safe to retry and returns the same record.
    let second = app
        .connections()
        .confirm(
            Caller::user(acceptor.id),
            &issued.connection_token,
            t0 + Duration::seconds(30),
        )
        .await
        .unwrap();
    assert_eq!(first.connection_id, second.connection_id);
}

#[tokio::test]
async fn test_expired_token_is_terminal() {
    let app = TestApp::new();
    let community = unique_id();
    let event = app.seed_event(community, 0).await;
    let initiator = app.seed_attendee(community, event.id, Some("Ada")).await;
    let acceptor = app.seed_attendee(community, event.id, Some("Bob")).await;

    let t0 = test_now();
    let issued = app
        .connections()
        .initiate(Caller::user(initiator.id), event.id, acceptor.id, t0)
        .await
        .unwrap();

    // One millisecond past the deadline: the attempt fails and the record
    // is lazily moved to its terminal state.
    let err = app
        .connections()
        .confirm(
            Caller::user(acceptor.id),
            &issued.connection_token,
            t0 + Duration::minutes(5) + Duration::milliseconds(1),
        )
        .await
        .unwrap_err();
    assert_domain_error(&err, &DomainError::ConnectionTokenExpired);
    assert_eq!(err.status_code(), 400);

    // Even a later attempt inside the original window fails: Expired does
    // not resurrect.
    let err = app
        .connections()
        .confirm(
            Caller::user(acceptor.id),
            &issued.connection_token,
            t0 + Duration::milliseconds(1),
        )
        .await
        .unwrap_err();
    assert_domain_error(&err, &DomainError::ConnectionTokenExpired);
}

#[tokio::test]
async fn test_self_connection_rejected() {
    let app = TestApp::new();
    let community = unique_id();
    let event = app.seed_event(community, 0).await;
    let user = app.seed_attendee(community, event.id, Some("Ada")).await;

    let err = app
        .connections()
        .initiate(Caller::user(user.id), event.id, user.id, test_now())
        .await
        .unwrap_err();
    assert_domain_error(&err, &DomainError::SelfConnection);
    assert_eq!(err.status_code(), 400);
}

#[tokio::test]
async fn test_confirm_by_wrong_user_is_denied() {
    let app = TestApp::new();
    let community = unique_id();
    let event = app.seed_event(community, 0).await;
    let initiator = app.seed_attendee(community, event.id, Some("Ada")).await;
    let acceptor = app.seed_attendee(community, event.id, Some("Bob")).await;
    let bystander = app.seed_attendee(community, event.id, Some("Cyn")).await;

    let t0 = test_now();
    let issued = app
        .connections()
        .initiate(Caller::user(initiator.id), event.id, acceptor.id, t0)
        .await
        .unwrap();

    // A third party cannot redeem on the acceptor's behalf.
    let err = app
        .connections()
        .confirm(
            Caller::user(bystander.id),
            &issued.connection_token,
            t0 + Duration::milliseconds(1),
        )
        .await
        .unwrap_err();
    assert_domain_error(&err, &DomainError::ConnectionNotIntended);
    assert_eq!(err.status_code(), 403);

    // Neither can the initiator self-confirm.
    let err = app
        .connections()
        .confirm(
            Caller::user(initiator.id),
            &issued.connection_token,
            t0 + Duration::milliseconds(1),
        )
        .await
        .unwrap_err();
    assert_domain_error(&err, &DomainError::ConnectionNotIntended);
}

#[tokio::test]
async fn test_confirmed_pair_blocks_reversed_initiation() {
    let app = TestApp::new();
    let community = unique_id();
    let event = app.seed_event(community, 0).await;
    let a = app.seed_attendee(community, event.id, Some("Ada")).await;
    let b = app.seed_attendee(community, event.id, Some("Bob")).await;

    let t0 = test_now();
    let issued = app
        .connections()
        .initiate(Caller::user(a.id), event.id, b.id, t0)
        .await
        .unwrap();
    app.connections()
        .confirm(
            Caller::user(b.id),
            &issued.connection_token,
            t0 + Duration::seconds(1),
        )
        .await
        .unwrap();

    // The unordered pair already holds a confirmed record; both orderings
    // are blocked.
    let err = app
        .connections()
        .initiate(Caller::user(b.id), event.id, a.id, t0 + Duration::minutes(1))
        .await
        .unwrap_err();
    assert_domain_error(&err, &DomainError::ConnectionAlreadyExists);
    assert_eq!(err.status_code(), 409);

    let err = app
        .connections()
        .initiate(Caller::user(a.id), event.id, b.id, t0 + Duration::minutes(1))
        .await
        .unwrap_err();
    assert_domain_error(&err, &DomainError::ConnectionAlreadyExists);
}

#[tokio::test]
async fn test_pending_reverse_pair_does_not_block() {
    let app = TestApp::new();
    let community = unique_id();
    let event = app.seed_event(community, 0).await;
    let a = app.seed_attendee(community, event.id, Some("Ada")).await;
    let b = app.seed_attendee(community, event.id, Some("Bob")).await;

    let t0 = test_now();
    app.connections()
        .initiate(Caller::user(a.id), event.id, b.id, t0)
        .await
        .unwrap();

    // Both directions may hold live tokens simultaneously.
    let reversed = app
        .connections()
        .initiate(Caller::user(b.id), event.id, a.id, t0)
        .await;
    assert!(reversed.is_ok());
}

#[tokio::test]
async fn test_reinitiation_supersedes_previous_token() {
    let app = TestApp::new();
    let community = unique_id();
    let event = app.seed_event(community, 0).await;
    let initiator = app.seed_attendee(community, event.id, Some("Ada")).await;
    let acceptor = app.seed_attendee(community, event.id, Some("Bob")).await;

    let t0 = test_now();
    let first = app
        .connections()
        .initiate(Caller::user(initiator.id), event.id, acceptor.id, t0)
        .await
        .unwrap();
    let second = app
        .connections()
        .initiate(
            Caller::user(initiator.id),
            event.id,
            acceptor.id,
            t0 + Duration::minutes(1),
        )
        .await
        .unwrap();
    assert_ne!(first.connection_token, second.connection_token);

    // The superseded token no longer resolves.
    let err = app
        .connections()
        .confirm(
            Caller::user(acceptor.id),
            &first.connection_token,
            t0 + Duration::minutes(1),
        )
        .await
        .unwrap_err();
    assert_domain_error(&err, &DomainError::InvalidConnectionToken);

    // The fresh one redeems.
    let confirmed = app
        .connections()
        .confirm(
            Caller::user(acceptor.id),
            &second.connection_token,
            t0 + Duration::minutes(2),
        )
        .await;
    assert!(confirmed.is_ok());
}

#[tokio::test]
async fn test_unknown_token_rejected() {
    let app = TestApp::new();
    let user = unique_id();

    let err = app
        .connections()
        .confirm(Caller::user(user), "1748779200000-nosuchtoken", test_now())
        .await
        .unwrap_err();
    assert_domain_error(&err, &DomainError::InvalidConnectionToken);
}

#[tokio::test]
async fn test_anonymous_callers_rejected() {
    let app = TestApp::new();
    let community = unique_id();
    let event = app.seed_event(community, 0).await;
    let acceptor = app.seed_attendee(community, event.id, Some("Bob")).await;

    let err = app
        .connections()
        .initiate(Caller::Anonymous, event.id, acceptor.id, test_now())
        .await
        .unwrap_err();
    assert_domain_error(&err, &DomainError::Unauthenticated);
    assert_eq!(err.status_code(), 401);

    let err = app
        .connections()
        .confirm(Caller::Anonymous, "any-token", test_now())
        .await
        .unwrap_err();
    assert_domain_error(&err, &DomainError::Unauthenticated);
}

#[tokio::test]
async fn test_both_parties_must_be_registered() {
    let app = TestApp::new();
    let community = unique_id();
    let event = app.seed_event(community, 0).await;
    let registered = app.seed_attendee(community, event.id, Some("Ada")).await;
    let unregistered = app.seed_member(community, Some("Bob")).await;

    let err = app
        .connections()
        .initiate(
            Caller::user(registered.id),
            event.id,
            unregistered.id,
            test_now(),
        )
        .await
        .unwrap_err();
    assert_domain_error(&err, &DomainError::NotRegisteredForEvent);

    let err = app
        .connections()
        .initiate(
            Caller::user(unregistered.id),
            event.id,
            registered.id,
            test_now(),
        )
        .await
        .unwrap_err();
    assert_domain_error(&err, &DomainError::NotRegisteredForEvent);
}

#[tokio::test]
async fn test_rejected_registration_still_counts_as_registered() {
    // Registration existence is checked regardless of review status; a
    // rejected attendee can still be connected to.
    let app = TestApp::new();
    let community = unique_id();
    let event = app.seed_event(community, 0).await;
    let initiator = app.seed_attendee(community, event.id, Some("Ada")).await;
    let rejected = app.seed_member(community, Some("Bob")).await;
    app.seed_registration(event.id, rejected.id, RegistrationStatus::Rejected, false)
        .await;

    let issued = app
        .connections()
        .initiate(Caller::user(initiator.id), event.id, rejected.id, test_now())
        .await;
    assert!(issued.is_ok());
}

#[tokio::test]
async fn test_configured_token_ttl_is_honored() {
    use std::sync::Arc;

    use mintup_common::{
        AppConfig, AppSettings, ConnectionConfig, Environment, LeaderboardConfig, SnowflakeConfig,
    };
    use mintup_service::ServiceContextBuilder;
    use mintup_store::MemoryStore;

    let config = AppConfig {
        app: AppSettings {
            name: "mintup".to_string(),
            env: Environment::Development,
        },
        leaderboard: LeaderboardConfig {
            max_top_entries: 3,
            max_streak_entries: 3,
        },
        connection: ConnectionConfig { token_ttl_secs: 60 },
        snowflake: SnowflakeConfig { worker_id: 7 },
    };

    let store = MemoryStore::new();
    let ctx = ServiceContextBuilder::new()
        .configure(&config)
        .event_repo(Arc::new(store.events()))
        .registration_repo(Arc::new(store.registrations()))
        .member_repo(Arc::new(store.members()))
        .connection_repo(Arc::new(store.connections()))
        .build()
        .unwrap();

    let event_id = unique_id();
    let (a, b) = (unique_id(), unique_id());
    for user in [a, b] {
        let registration = Registration::new(user, event_id, test_now());
        store.registrations().create(&registration).await.unwrap();
    }

    let t0 = test_now();
    let service = mintup_service::ConnectionService::new(&ctx);
    let issued = service
        .initiate(Caller::user(a), event_id, b, t0)
        .await
        .unwrap();
    assert_eq!(issued.expires_at, t0 + Duration::seconds(60));

    let err = service
        .confirm(
            Caller::user(b),
            &issued.connection_token,
            t0 + Duration::seconds(61),
        )
        .await
        .unwrap_err();
    assert_domain_error(&err, &DomainError::ConnectionTokenExpired);
}

// ============================================================================
// Pair Status Tests
// ============================================================================

#[tokio::test]
async fn test_pair_status_progression() {
    let app = TestApp::new();
    let community = unique_id();
    let event = app.seed_event(community, 0).await;
    let a = app.seed_attendee(community, event.id, Some("Ada")).await;
    let b = app.seed_attendee(community, event.id, Some("Bob")).await;

    let t0 = test_now();
    let none = app
        .connections()
        .status_between(event.id, a.id, b.id, t0)
        .await
        .unwrap();
    assert_eq!(none, PairStatus::None);

    let issued = app
        .connections()
        .initiate(Caller::user(a.id), event.id, b.id, t0)
        .await
        .unwrap();
    let pending = app
        .connections()
        .status_between(event.id, b.id, a.id, t0 + Duration::seconds(1))
        .await
        .unwrap();
    assert_eq!(pending, PairStatus::Pending);

    app.connections()
        .confirm(
            Caller::user(b.id),
            &issued.connection_token,
            t0 + Duration::seconds(2),
        )
        .await
        .unwrap();
    let confirmed = app
        .connections()
        .status_between(event.id, a.id, b.id, t0 + Duration::seconds(3))
        .await
        .unwrap();
    assert_eq!(confirmed, PairStatus::Confirmed);
}

#[tokio::test]
async fn test_pair_status_reads_stale_pending_as_expired() {
    let app = TestApp::new();
    let community = unique_id();
    let event = app.seed_event(community, 0).await;
    let a = app.seed_attendee(community, event.id, Some("Ada")).await;
    let b = app.seed_attendee(community, event.id, Some("Bob")).await;

    let t0 = test_now();
    let issued = app
        .connections()
        .initiate(Caller::user(a.id), event.id, b.id, t0)
        .await
        .unwrap();

    let status = app
        .connections()
        .status_between(event.id, a.id, b.id, t0 + Duration::minutes(6))
        .await
        .unwrap();
    assert_eq!(status, PairStatus::Expired);

    // The read did not patch the record; a confirm inside the window still
    // lands.
    let confirmed = app
        .connections()
        .confirm(
            Caller::user(b.id),
            &issued.connection_token,
            t0 + Duration::minutes(4),
        )
        .await;
    assert!(confirmed.is_ok());
}

// ============================================================================
// Confirmed Connections Listing Tests
// ============================================================================

#[tokio::test]
async fn test_confirmed_for_resolves_other_party_and_intentions() {
    let app = TestApp::new();
    let community = unique_id();
    let event = app.seed_event(community, 0).await;
    let me = app.seed_attendee(community, event.id, Some("Ada")).await;

    let bob = app.seed_member(community, Some("Bob")).await;
    let bob_registration = Registration::new(bob.id, event.id, test_now())
        .with_status(RegistrationStatus::Approved)
        .with_check_in(test_now())
        .with_intentions(vec!["hiring".to_string(), "find a cofounder".to_string()]);
    app.store
        .registrations()
        .create(&bob_registration)
        .await
        .unwrap();

    let cyn = app.seed_attendee(community, event.id, Some("Cyn")).await;

    let t0 = test_now();
    // I initiate toward Bob; Cyn initiates toward me. Bob confirms first,
    // Cyn's record confirms later.
    let to_bob = app
        .connections()
        .initiate(Caller::user(me.id), event.id, bob.id, t0)
        .await
        .unwrap();
    app.connections()
        .confirm(
            Caller::user(bob.id),
            &to_bob.connection_token,
            t0 + Duration::seconds(10),
        )
        .await
        .unwrap();

    let from_cyn = app
        .connections()
        .initiate(Caller::user(cyn.id), event.id, me.id, t0 + Duration::minutes(1))
        .await
        .unwrap();
    app.connections()
        .confirm(
            Caller::user(me.id),
            &from_cyn.connection_token,
            t0 + Duration::minutes(2),
        )
        .await
        .unwrap();

    let listing = app
        .connections()
        .confirmed_for(Caller::user(me.id), event.id)
        .await
        .unwrap();

    // Most recent confirmation first, regardless of who initiated.
    assert_eq!(listing.len(), 2);
    assert_eq!(listing[0].user_id, cyn.id.to_string());
    assert_eq!(listing[0].name.as_deref(), Some("Cyn"));
    assert!(listing[0].event_intentions.is_empty());
    assert_eq!(listing[1].user_id, bob.id.to_string());
    assert_eq!(
        listing[1].event_intentions,
        vec!["hiring".to_string(), "find a cofounder".to_string()]
    );
}

#[tokio::test]
async fn test_confirmed_for_excludes_pending_and_foreign_connections() {
    let app = TestApp::new();
    let community = unique_id();
    let event = app.seed_event(community, 0).await;
    let me = app.seed_attendee(community, event.id, Some("Ada")).await;
    let bob = app.seed_attendee(community, event.id, Some("Bob")).await;
    let cyn = app.seed_attendee(community, event.id, Some("Cyn")).await;

    let t0 = test_now();
    // Pending toward Bob (never confirmed) and a confirmed pair between Bob
    // and Cyn that does not involve me.
    app.connections()
        .initiate(Caller::user(me.id), event.id, bob.id, t0)
        .await
        .unwrap();
    let others = app
        .connections()
        .initiate(Caller::user(bob.id), event.id, cyn.id, t0)
        .await
        .unwrap();
    app.connections()
        .confirm(
            Caller::user(cyn.id),
            &others.connection_token,
            t0 + Duration::seconds(5),
        )
        .await
        .unwrap();

    let listing = app
        .connections()
        .confirmed_for(Caller::user(me.id), event.id)
        .await
        .unwrap();
    assert!(listing.is_empty());
}

#[tokio::test]
async fn test_confirmed_for_unknown_event_is_not_found() {
    let app = TestApp::new();
    let err = app
        .connections()
        .confirmed_for(Caller::user(unique_id()), unique_id())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound { .. }));
    assert_eq!(err.status_code(), 404);
}

// ============================================================================
// Leaderboard End-to-End Tests
// ============================================================================

#[tokio::test]
async fn test_leaderboard_over_store() {
    let app = TestApp::new();
    let community = unique_id();
    // Three completed events, newest first: e3 (1 day ago), e2, e1.
    let e1 = app.seed_event(community, 3).await;
    let e2 = app.seed_event(community, 2).await;
    let e3 = app.seed_event(community, 1).await;

    // Ada attends all three; Bob misses the middle one; Cyn only the oldest.
    let ada = app.seed_attendee(community, e1.id, Some("Ada")).await;
    app.seed_registration(e2.id, ada.id, RegistrationStatus::Approved, true)
        .await;
    app.seed_registration(e3.id, ada.id, RegistrationStatus::Approved, true)
        .await;

    let bob = app.seed_attendee(community, e1.id, Some("Bob")).await;
    app.seed_registration(e3.id, bob.id, RegistrationStatus::Approved, true)
        .await;

    let cyn = app.seed_attendee(community, e1.id, Some("Cyn")).await;

    let board = app
        .leaderboards()
        .community_leaderboard(community, test_now(), None)
        .await
        .unwrap();

    let top: Vec<(String, u32)> = board
        .top_attendees
        .iter()
        .map(|entry| (entry.user_id.clone(), entry.total_events_attended))
        .collect();
    assert_eq!(
        top,
        vec![
            (ada.id.to_string(), 3),
            (bob.id.to_string(), 2),
            (cyn.id.to_string(), 1),
        ]
    );
    assert_eq!(board.top_attendees[0].rank, 1);
    assert_eq!(board.top_attendees[2].rank, 3);

    // Streaks from the most recent event backward: Ada 3, Bob 1 (gap at e2),
    // Cyn absent.
    let streaks: Vec<(String, u32)> = board
        .attendance_streak
        .iter()
        .map(|entry| (entry.user_id.clone(), entry.streak))
        .collect();
    assert_eq!(
        streaks,
        vec![(ada.id.to_string(), 3), (bob.id.to_string(), 1)]
    );
}

#[tokio::test]
async fn test_leaderboard_respects_limit_override() {
    let app = TestApp::new();
    let community = unique_id();
    let event = app.seed_event(community, 1).await;
    for name in ["Ada", "Bob", "Cyn", "Dee", "Eve"] {
        app.seed_attendee(community, event.id, Some(name)).await;
    }

    let board = app
        .leaderboards()
        .community_leaderboard(community, test_now(), Some(LeaderboardLimits::new(2, 2)))
        .await
        .unwrap();
    assert_eq!(board.top_attendees.len(), 2);
    assert_eq!(board.top_attendees[0].name.as_deref(), Some("Ada"));
    assert_eq!(board.top_attendees[1].name.as_deref(), Some("Bob"));
}

#[tokio::test]
async fn test_leaderboard_unknown_community_is_empty() {
    let app = TestApp::new();
    let board = app
        .leaderboards()
        .community_leaderboard(unique_id(), test_now(), None)
        .await
        .unwrap();
    assert!(board.top_attendees.is_empty());
    assert!(board.attendance_streak.is_empty());
}

#[tokio::test]
async fn test_leaderboard_response_serializes_for_the_mini_app() {
    let app = TestApp::new();
    let community = unique_id();
    let event = app.seed_event(community, 1).await;
    let ada = app.seed_attendee(community, event.id, Some("Ada")).await;

    let board = app
        .leaderboards()
        .community_leaderboard(community, test_now(), None)
        .await
        .unwrap();
    let json = serde_json::to_value(&board).unwrap();

    assert_eq!(json["top_attendees"][0]["user_id"], ada.id.to_string());
    assert_eq!(json["top_attendees"][0]["rank"], 1);
    assert_eq!(json["attendance_streak"][0]["streak"], 1);
}
