//! Leaderboard service
//!
//! Assembles a community's events, per-event registrations, and member
//! roster from the store and hands them to the pure builder in
//! `mintup-core::leaderboard`. The instant `now` comes from the caller so
//! the computation stays deterministic and clock-free.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

use mintup_core::entities::Registration;
use mintup_core::leaderboard::{self, LeaderboardLimits};
use mintup_core::Snowflake;

use crate::dto::LeaderboardResponse;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Leaderboard service
pub struct LeaderboardService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> LeaderboardService<'a> {
    /// Create a new LeaderboardService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Build the attendance leaderboard for a community
    ///
    /// `limits` falls back to the configured defaults. Unknown communities
    /// and communities without events or members yield empty rankings, never
    /// an error.
    #[instrument(skip(self))]
    pub async fn community_leaderboard(
        &self,
        community_id: Snowflake,
        now: DateTime<Utc>,
        limits: Option<LeaderboardLimits>,
    ) -> ServiceResult<LeaderboardResponse> {
        let limits = limits.unwrap_or_else(|| self.ctx.leaderboard_limits());

        let events = self.ctx.event_repo().find_by_community(community_id).await?;
        let members = self
            .ctx
            .member_repo()
            .find_by_community(community_id)
            .await?;

        let mut registrations_by_event: HashMap<Snowflake, Vec<Registration>> =
            HashMap::with_capacity(events.len());
        for event in &events {
            let registrations = self.ctx.registration_repo().find_by_event(event.id).await?;
            registrations_by_event.insert(event.id, registrations);
        }

        let board = leaderboard::build(&events, &registrations_by_event, &members, now, limits);

        debug!(
            community_id = %community_id,
            top_attendees = board.top_attendees.len(),
            streaks = board.attendance_streak.len(),
            "Leaderboard built"
        );

        Ok(LeaderboardResponse::from(board))
    }
}
