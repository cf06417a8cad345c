//! Domain errors - error types for the domain layer
//!
//! Four kinds matter to callers: unauthenticated, permission denied, invalid
//! argument, and conflict. The classification helpers below are the contract;
//! transports map them to whatever status scheme they speak.

use thiserror::Error;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Authentication
    // =========================================================================
    #[error("Authentication required")]
    Unauthenticated,

    // =========================================================================
    // Authorization
    // =========================================================================
    #[error("This connection is not intended for you")]
    ConnectionNotIntended,

    // =========================================================================
    // Validation / Precondition Errors
    // =========================================================================
    #[error("Cannot connect with yourself")]
    SelfConnection,

    #[error("Both users must be registered for this event")]
    NotRegisteredForEvent,

    #[error("Invalid connection token")]
    InvalidConnectionToken,

    #[error("Connection token has expired")]
    ConnectionTokenExpired,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Connection already exists")]
    ConnectionAlreadyExists,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Storage error: {0}")]
    StorageError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::ConnectionNotIntended => "CONNECTION_NOT_INTENDED",
            Self::SelfConnection => "SELF_CONNECTION",
            Self::NotRegisteredForEvent => "NOT_REGISTERED",
            Self::InvalidConnectionToken => "INVALID_CONNECTION_TOKEN",
            Self::ConnectionTokenExpired => "CONNECTION_TOKEN_EXPIRED",
            Self::ConnectionAlreadyExists => "CONNECTION_EXISTS",
            Self::StorageError(_) => "STORAGE_ERROR",
        }
    }

    /// Check if this is an authentication error
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::Unauthenticated)
    }

    /// Check if this is an authorization error
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::ConnectionNotIntended)
    }

    /// Check if this is a validation / precondition error
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Self::SelfConnection
                | Self::NotRegisteredForEvent
                | Self::InvalidConnectionToken
                | Self::ConnectionTokenExpired
        )
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::ConnectionAlreadyExists)
    }
}
