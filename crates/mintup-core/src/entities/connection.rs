//! Connection entity - an event-scoped social link between two attendees
//!
//! Established by a two-step handshake: the initiator requests a token,
//! shares it out of band (QR code), and the acceptor redeems it before
//! expiry. State machine per record:
//!
//! ```text
//! Pending(expires_at) --confirm before expiry--> Confirmed(confirmed_at)
//! Pending(expires_at) --confirm after expiry---> Expired
//! ```
//!
//! `Confirmed` and `Expired` are terminal. Expiry is lazy: nothing sweeps
//! pending records in the background.

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// Connection lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    /// Token issued, waiting for the acceptor to redeem it
    Pending { expires_at: DateTime<Utc> },
    /// Mutually recorded
    Confirmed { confirmed_at: DateTime<Utc> },
    /// Token lapsed before redemption
    Expired,
}

/// Coarse order-independent status of a user pair at an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PairStatus {
    None,
    Expired,
    Pending,
    Confirmed,
}

/// Connection entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub id: Snowflake,
    pub event_id: Snowflake,
    pub initiator_user_id: Snowflake,
    pub acceptor_user_id: Snowflake,
    /// Shared secret while pending; kept on the record afterwards for audit
    pub connection_token: String,
    pub status: ConnectionStatus,
    pub created_at: DateTime<Utc>,
}

impl Connection {
    /// Create a new pending Connection
    pub fn new(
        id: Snowflake,
        event_id: Snowflake,
        initiator_user_id: Snowflake,
        acceptor_user_id: Snowflake,
        connection_token: String,
        expires_at: DateTime<Utc>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            event_id,
            initiator_user_id,
            acceptor_user_id,
            connection_token,
            status: ConnectionStatus::Pending { expires_at },
            created_at,
        }
    }

    /// Check if the connection has been confirmed
    #[inline]
    pub fn is_confirmed(&self) -> bool {
        matches!(self.status, ConnectionStatus::Confirmed { .. })
    }

    /// Check if the pending token has lapsed as of `now`
    ///
    /// False for confirmed and already-expired records; those states are
    /// terminal and no longer time-dependent.
    pub fn is_expired_by(&self, now: DateTime<Utc>) -> bool {
        match self.status {
            ConnectionStatus::Pending { expires_at } => now >= expires_at,
            ConnectionStatus::Confirmed { .. } | ConnectionStatus::Expired => false,
        }
    }

    /// Confirmation instant, if confirmed
    pub fn confirmed_at(&self) -> Option<DateTime<Utc>> {
        match self.status {
            ConnectionStatus::Confirmed { confirmed_at } => Some(confirmed_at),
            _ => None,
        }
    }

    /// Transition `Pending -> Confirmed`
    pub fn confirm(&mut self, now: DateTime<Utc>) {
        self.status = ConnectionStatus::Confirmed { confirmed_at: now };
    }

    /// Transition `Pending -> Expired`
    pub fn mark_expired(&mut self) {
        self.status = ConnectionStatus::Expired;
    }

    /// Re-issue the token on an unconfirmed record (re-initiation)
    pub fn reissue(&mut self, connection_token: String, expires_at: DateTime<Utc>) {
        self.connection_token = connection_token;
        self.status = ConnectionStatus::Pending { expires_at };
    }

    /// The counterpart of `user_id` on this record, if they participate
    pub fn other_party(&self, user_id: Snowflake) -> Option<Snowflake> {
        if self.initiator_user_id == user_id {
            Some(self.acceptor_user_id)
        } else if self.acceptor_user_id == user_id {
            Some(self.initiator_user_id)
        } else {
            None
        }
    }

    /// Coarse status as observed at `now` (read-time expiry, no patch)
    pub fn pair_status(&self, now: DateTime<Utc>) -> PairStatus {
        match self.status {
            ConnectionStatus::Confirmed { .. } => PairStatus::Confirmed,
            ConnectionStatus::Pending { expires_at } if now < expires_at => PairStatus::Pending,
            ConnectionStatus::Pending { .. } | ConnectionStatus::Expired => PairStatus::Expired,
        }
    }
}

/// Generate a fresh connection token
///
/// Millisecond timestamp prefix plus a random alphanumeric suffix; unique
/// across concurrent initiations with overwhelming probability. The token is
/// a short-lived shared secret, not a credential with cryptographic weight.
pub fn generate_connection_token(now: DateTime<Utc>) -> String {
    use rand::Rng;

    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    const SUFFIX_LEN: usize = 12;

    let mut rng = rand::thread_rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect();
    format!("{}-{suffix}", now.timestamp_millis())
}
