//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs; the store adapter provides the
//! implementation. Each mutation method must execute atomically against its
//! own record reads within one call - the connection handshake relies on
//! this to keep the one-confirmed-record-per-pair invariant under concurrent
//! initiations and confirms.

use async_trait::async_trait;

use crate::entities::{Connection, Event, MemberProfile, Registration};
use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Event Repository
// ============================================================================

#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Find event by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Event>>;

    /// List all events of a community
    async fn find_by_community(&self, community_id: Snowflake) -> RepoResult<Vec<Event>>;

    /// Create a new event
    async fn create(&self, event: &Event) -> RepoResult<()>;
}

// ============================================================================
// Registration Repository
// ============================================================================

#[async_trait]
pub trait RegistrationRepository: Send + Sync {
    /// Find a user's registration for an event
    async fn find(&self, event_id: Snowflake, user_id: Snowflake)
        -> RepoResult<Option<Registration>>;

    /// List all registrations for an event
    async fn find_by_event(&self, event_id: Snowflake) -> RepoResult<Vec<Registration>>;

    /// Create a new registration
    async fn create(&self, registration: &Registration) -> RepoResult<()>;

    /// Replace an existing registration (status change, check-in)
    async fn update(&self, registration: &Registration) -> RepoResult<()>;
}

// ============================================================================
// Member Repository
// ============================================================================

#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Find a member profile within a community roster
    async fn find(
        &self,
        community_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<MemberProfile>>;

    /// List the full member roster of a community
    async fn find_by_community(&self, community_id: Snowflake) -> RepoResult<Vec<MemberProfile>>;

    /// Add a member to a community roster
    async fn create(&self, community_id: Snowflake, member: &MemberProfile) -> RepoResult<()>;
}

// ============================================================================
// Connection Repository
// ============================================================================

#[async_trait]
pub trait ConnectionRepository: Send + Sync {
    /// Find the connection holding a token
    ///
    /// Tokens are unique across live records; a token superseded by
    /// re-initiation no longer resolves.
    async fn find_by_token(&self, token: &str) -> RepoResult<Option<Connection>>;

    /// Find the record for an ordered (initiator, acceptor) pair at an event
    async fn find_pair(
        &self,
        event_id: Snowflake,
        initiator_user_id: Snowflake,
        acceptor_user_id: Snowflake,
    ) -> RepoResult<Option<Connection>>;

    /// List all connections a user participates in at an event, either side
    async fn find_by_participant(
        &self,
        event_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Vec<Connection>>;

    /// Insert a new connection record
    async fn create(&self, connection: &Connection) -> RepoResult<()>;

    /// Patch an existing record (status transition or token re-issue)
    async fn update(&self, connection: &Connection) -> RepoResult<()>;
}
