//! Test fixtures and data seeders
//!
//! Provides a ready-to-use service stack over the in-memory store plus
//! helpers for seeding communities, events, and attendees.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};

use mintup_core::entities::{Event, MemberProfile, Registration, RegistrationStatus};
use mintup_core::traits::{EventRepository, MemberRepository, RegistrationRepository};
use mintup_core::value_objects::Snowflake;
use mintup_service::{ConnectionService, LeaderboardService, ServiceContext, ServiceContextBuilder};
use mintup_store::MemoryStore;

/// Counter for unique test ids
static COUNTER: AtomicI64 = AtomicI64::new(5000000);

/// Generate a unique test Snowflake ID
pub fn unique_id() -> Snowflake {
    Snowflake::new(COUNTER.fetch_add(1, Ordering::SeqCst))
}

/// Fixed test instant; every test derives offsets from this
pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

/// A service stack wired over a fresh in-memory store
pub struct TestApp {
    pub store: MemoryStore,
    pub ctx: ServiceContext,
}

impl TestApp {
    /// Create a new app with default settings (5 minute token TTL)
    pub fn new() -> Self {
        let store = MemoryStore::new();
        let ctx = ServiceContextBuilder::new()
            .event_repo(Arc::new(store.events()))
            .registration_repo(Arc::new(store.registrations()))
            .member_repo(Arc::new(store.members()))
            .connection_repo(Arc::new(store.connections()))
            .build()
            .expect("service context should build");
        Self { store, ctx }
    }

    /// Connection service over this app's context
    pub fn connections(&self) -> ConnectionService<'_> {
        ConnectionService::new(&self.ctx)
    }

    /// Leaderboard service over this app's context
    pub fn leaderboards(&self) -> LeaderboardService<'_> {
        LeaderboardService::new(&self.ctx)
    }

    /// Seed an event that started `days_ago` days before [`test_now`]
    /// (negative for future events)
    pub async fn seed_event(&self, community_id: Snowflake, days_ago: i64) -> Event {
        let event = Event::new(
            unique_id(),
            community_id,
            "Community meetup",
            test_now() - Duration::days(days_ago),
        );
        self.store.events().create(&event).await.unwrap();
        event
    }

    /// Seed a community member
    pub async fn seed_member(&self, community_id: Snowflake, name: Option<&str>) -> MemberProfile {
        let id = unique_id();
        let mut member = MemberProfile::new(id, format!("https://cdn.mintup.app/{id}.png"));
        if let Some(name) = name {
            member = member.with_name(name);
        }
        self.store
            .members()
            .create(community_id, &member)
            .await
            .unwrap();
        member
    }

    /// Seed a registration with explicit status and check-in
    pub async fn seed_registration(
        &self,
        event_id: Snowflake,
        user_id: Snowflake,
        status: RegistrationStatus,
        checked_in: bool,
    ) -> Registration {
        let mut registration =
            Registration::new(user_id, event_id, test_now() - Duration::days(7)).with_status(status);
        if checked_in {
            registration.record_check_in(test_now());
        }
        self.store
            .registrations()
            .create(&registration)
            .await
            .unwrap();
        registration
    }

    /// Seed a member who registered for and checked in at an event
    pub async fn seed_attendee(
        &self,
        community_id: Snowflake,
        event_id: Snowflake,
        name: Option<&str>,
    ) -> MemberProfile {
        let member = self.seed_member(community_id, name).await;
        self.seed_registration(event_id, member.id, RegistrationStatus::Approved, true)
            .await;
        member
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}
