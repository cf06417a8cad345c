//! Data transfer objects for API responses
//!
//! Response DTOs serialize domain results for the JavaScript Mini App:
//! Snowflake ids become strings, instants stay RFC 3339.

pub mod responses;

pub use responses::{
    ConnectedAttendeeResponse, ConnectionConfirmedResponse, ConnectionTokenResponse,
    LeaderboardResponse, RankedEntryResponse, StreakEntryResponse,
};
