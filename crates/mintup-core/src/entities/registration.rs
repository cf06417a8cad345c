//! Registration entity - a user's ticket for an event

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// Registration review status
///
/// Closed sum so a future variant forces review of every eligibility check
/// that matches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationStatus {
    Pending,
    Approved,
    Rejected,
}

/// Physical-presence marker stamped at the door
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckIn {
    pub checked_in_at: DateTime<Utc>,
}

/// Registration entity (junction between user and event)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub user_id: Snowflake,
    pub event_id: Snowflake,
    pub status: RegistrationStatus,
    pub check_in: Option<CheckIn>,
    pub event_intentions: Vec<String>,
    pub registered_at: DateTime<Utc>,
}

impl Registration {
    /// Create a new pending Registration
    pub fn new(user_id: Snowflake, event_id: Snowflake, registered_at: DateTime<Utc>) -> Self {
        Self {
            user_id,
            event_id,
            status: RegistrationStatus::Pending,
            check_in: None,
            event_intentions: Vec::new(),
            registered_at,
        }
    }

    /// Set the review status
    pub fn with_status(mut self, status: RegistrationStatus) -> Self {
        self.status = status;
        self
    }

    /// Attach goal tags the attendee declared for this event
    pub fn with_intentions(mut self, intentions: Vec<String>) -> Self {
        self.event_intentions = intentions;
        self
    }

    /// Record a door check-in
    pub fn record_check_in(&mut self, now: DateTime<Utc>) {
        self.check_in = Some(CheckIn { checked_in_at: now });
    }

    /// Builder form of [`record_check_in`](Self::record_check_in)
    pub fn with_check_in(mut self, now: DateTime<Utc>) -> Self {
        self.record_check_in(now);
        self
    }

    /// Whether this registration counts as in-person attendance
    ///
    /// Non-rejected and check-in-marked. Roster membership is checked
    /// separately by the leaderboard builder.
    pub fn has_attended(&self) -> bool {
        match self.status {
            RegistrationStatus::Rejected => false,
            RegistrationStatus::Pending | RegistrationStatus::Approved => self.check_in.is_some(),
        }
    }
}
