//! Caller identity - the authenticated principal of an operation
//!
//! The transport layer (Mini App session, SIWF, whatever fronts this core)
//! resolves authentication and hands the result in explicitly. Nothing in the
//! core reads ambient identity.

use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Resolved caller identity for a single operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Caller {
    /// No valid session
    Anonymous,
    /// Authenticated as the given user
    User(Snowflake),
}

impl Caller {
    /// Shorthand for an authenticated caller
    #[inline]
    pub const fn user(id: Snowflake) -> Self {
        Self::User(id)
    }

    /// Check whether the caller is unauthenticated
    #[inline]
    pub const fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous)
    }

    /// Return the authenticated user id, or `Unauthenticated`
    pub fn require_user(&self) -> Result<Snowflake, DomainError> {
        match self {
            Self::User(id) => Ok(*id),
            Self::Anonymous => Err(DomainError::Unauthenticated),
        }
    }
}
