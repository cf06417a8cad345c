//! Event entity - a scheduled gathering within a community

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// Event entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub id: Snowflake,
    pub community_id: Snowflake,
    pub title: String,
    pub start_date: DateTime<Utc>,
}

impl Event {
    /// Create a new Event
    pub fn new(
        id: Snowflake,
        community_id: Snowflake,
        title: impl Into<String>,
        start_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            community_id,
            title: title.into(),
            start_date,
        }
    }

    /// Whether the event has already started as of `now`
    ///
    /// Only started events count toward attendance streaks.
    #[inline]
    pub fn is_completed(&self, now: DateTime<Utc>) -> bool {
        self.start_date <= now
    }
}
