//! Member profile - a user as seen through a community roster

use crate::value_objects::Snowflake;

/// Community member profile (identity is the user id)
///
/// Derived by the store from a user record plus community membership. Ids are
/// expected to be unique within a roster; duplicates make ranking undefined
/// and must be deduplicated upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberProfile {
    pub id: Snowflake,
    pub name: Option<String>,
    pub image_url: String,
}

impl MemberProfile {
    /// Create a new MemberProfile
    pub fn new(id: Snowflake, image_url: impl Into<String>) -> Self {
        Self {
            id,
            name: None,
            image_url: image_url.into(),
        }
    }

    /// Set the display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Case-folded name used for deterministic ordering; nameless members
    /// sort first
    pub fn sort_name(&self) -> String {
        self.name.as_deref().unwrap_or("").to_lowercase()
    }
}
