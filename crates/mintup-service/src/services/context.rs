//! Service context - dependency container for services
//!
//! Holds the repository ports, the id generator, and operational settings
//! needed by services.

use std::sync::Arc;

use chrono::Duration;

use mintup_common::AppConfig;
use mintup_core::leaderboard::LeaderboardLimits;
use mintup_core::traits::{
    ConnectionRepository, EventRepository, MemberRepository, RegistrationRepository,
};
use mintup_core::{Snowflake, SnowflakeGenerator};

/// Service context containing all dependencies
///
/// This is the dependency container that gets passed to all services. It
/// provides access to:
/// - Store repositories (ports; the adapter is the caller's choice)
/// - Snowflake generator for ID generation
/// - Connection token lifetime and leaderboard defaults
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    event_repo: Arc<dyn EventRepository>,
    registration_repo: Arc<dyn RegistrationRepository>,
    member_repo: Arc<dyn MemberRepository>,
    connection_repo: Arc<dyn ConnectionRepository>,

    // Services
    snowflake_generator: Arc<SnowflakeGenerator>,

    // Settings
    token_ttl: Duration,
    leaderboard_limits: LeaderboardLimits,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        event_repo: Arc<dyn EventRepository>,
        registration_repo: Arc<dyn RegistrationRepository>,
        member_repo: Arc<dyn MemberRepository>,
        connection_repo: Arc<dyn ConnectionRepository>,
        snowflake_generator: Arc<SnowflakeGenerator>,
        token_ttl: Duration,
        leaderboard_limits: LeaderboardLimits,
    ) -> Self {
        Self {
            event_repo,
            registration_repo,
            member_repo,
            connection_repo,
            snowflake_generator,
            token_ttl,
            leaderboard_limits,
        }
    }

    // === Repositories ===

    /// Get the event repository
    pub fn event_repo(&self) -> &dyn EventRepository {
        self.event_repo.as_ref()
    }

    /// Get the registration repository
    pub fn registration_repo(&self) -> &dyn RegistrationRepository {
        self.registration_repo.as_ref()
    }

    /// Get the member repository
    pub fn member_repo(&self) -> &dyn MemberRepository {
        self.member_repo.as_ref()
    }

    /// Get the connection repository
    pub fn connection_repo(&self) -> &dyn ConnectionRepository {
        self.connection_repo.as_ref()
    }

    // === Settings ===

    /// How long an issued connection token stays redeemable
    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }

    /// Default truncation limits for leaderboards
    pub fn leaderboard_limits(&self) -> LeaderboardLimits {
        self.leaderboard_limits
    }

    // === Services ===

    /// Generate a new Snowflake ID
    pub fn generate_id(&self) -> Snowflake {
        self.snowflake_generator.generate()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("token_ttl", &self.token_ttl)
            .field("leaderboard_limits", &self.leaderboard_limits)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    event_repo: Option<Arc<dyn EventRepository>>,
    registration_repo: Option<Arc<dyn RegistrationRepository>>,
    member_repo: Option<Arc<dyn MemberRepository>>,
    connection_repo: Option<Arc<dyn ConnectionRepository>>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
    token_ttl: Option<Duration>,
    leaderboard_limits: Option<LeaderboardLimits>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn event_repo(mut self, repo: Arc<dyn EventRepository>) -> Self {
        self.event_repo = Some(repo);
        self
    }

    pub fn registration_repo(mut self, repo: Arc<dyn RegistrationRepository>) -> Self {
        self.registration_repo = Some(repo);
        self
    }

    pub fn member_repo(mut self, repo: Arc<dyn MemberRepository>) -> Self {
        self.member_repo = Some(repo);
        self
    }

    pub fn connection_repo(mut self, repo: Arc<dyn ConnectionRepository>) -> Self {
        self.connection_repo = Some(repo);
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    pub fn token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = Some(ttl);
        self
    }

    pub fn leaderboard_limits(mut self, limits: LeaderboardLimits) -> Self {
        self.leaderboard_limits = Some(limits);
        self
    }

    /// Apply operational settings from the application configuration
    pub fn configure(mut self, config: &AppConfig) -> Self {
        self.token_ttl = Some(config.connection.token_ttl());
        self.leaderboard_limits = Some(LeaderboardLimits::new(
            config.leaderboard.max_top_entries,
            config.leaderboard.max_streak_entries,
        ));
        self.snowflake_generator = Some(Arc::new(SnowflakeGenerator::new(
            config.snowflake.worker_id,
        )));
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required repository is missing
    pub fn build(self) -> super::error::ServiceResult<ServiceContext> {
        use super::error::ServiceError;

        Ok(ServiceContext::new(
            self.event_repo
                .ok_or_else(|| ServiceError::validation("event_repo is required"))?,
            self.registration_repo
                .ok_or_else(|| ServiceError::validation("registration_repo is required"))?,
            self.member_repo
                .ok_or_else(|| ServiceError::validation("member_repo is required"))?,
            self.connection_repo
                .ok_or_else(|| ServiceError::validation("connection_repo is required"))?,
            self.snowflake_generator
                .unwrap_or_else(|| Arc::new(SnowflakeGenerator::default())),
            self.token_ttl.unwrap_or_else(|| Duration::minutes(5)),
            self.leaderboard_limits.unwrap_or_default(),
        ))
    }
}
