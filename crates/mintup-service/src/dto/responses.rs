//! Response DTOs
//!
//! All response DTOs implement `Serialize` for JSON output. Snowflake IDs
//! are serialized as strings for JavaScript compatibility.

use chrono::{DateTime, Utc};
use serde::Serialize;

use mintup_core::leaderboard::{Leaderboard, RankedAttendee, RankedStreak};

// ============================================================================
// Connection Responses
// ============================================================================

/// Result of initiating a connection: the secret to render as a QR code
/// and its deadline
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionTokenResponse {
    pub connection_token: String,
    pub expires_at: DateTime<Utc>,
}

/// Result of confirming a connection
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionConfirmedResponse {
    pub success: bool,
    pub connection_id: String,
}

impl ConnectionConfirmedResponse {
    pub fn new(connection_id: impl ToString) -> Self {
        Self {
            success: true,
            connection_id: connection_id.to_string(),
        }
    }
}

/// A confirmed counterpart at an event, with their declared goals
#[derive(Debug, Clone, Serialize)]
pub struct ConnectedAttendeeResponse {
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub image_url: String,
    pub event_intentions: Vec<String>,
    pub connected_at: DateTime<Utc>,
}

// ============================================================================
// Leaderboard Responses
// ============================================================================

/// One row of the top-attendees ranking
#[derive(Debug, Clone, Serialize)]
pub struct RankedEntryResponse {
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub image_url: String,
    pub rank: u32,
    pub total_events_attended: u32,
}

impl From<RankedAttendee> for RankedEntryResponse {
    fn from(entry: RankedAttendee) -> Self {
        Self {
            user_id: entry.user_id.to_string(),
            name: entry.name,
            image_url: entry.image_url,
            rank: entry.rank,
            total_events_attended: entry.total_events_attended,
        }
    }
}

/// One row of the attendance-streak ranking
#[derive(Debug, Clone, Serialize)]
pub struct StreakEntryResponse {
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub image_url: String,
    pub rank: u32,
    pub streak: u32,
}

impl From<RankedStreak> for StreakEntryResponse {
    fn from(entry: RankedStreak) -> Self {
        Self {
            user_id: entry.user_id.to_string(),
            name: entry.name,
            image_url: entry.image_url,
            rank: entry.rank,
            streak: entry.streak,
        }
    }
}

/// Full leaderboard snapshot for a community
#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardResponse {
    pub top_attendees: Vec<RankedEntryResponse>,
    pub attendance_streak: Vec<StreakEntryResponse>,
}

impl From<Leaderboard> for LeaderboardResponse {
    fn from(board: Leaderboard) -> Self {
        Self {
            top_attendees: board
                .top_attendees
                .into_iter()
                .map(RankedEntryResponse::from)
                .collect(),
            attendance_streak: board
                .attendance_streak
                .into_iter()
                .map(StreakEntryResponse::from)
                .collect(),
        }
    }
}
