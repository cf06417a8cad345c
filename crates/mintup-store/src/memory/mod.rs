//! Shared in-memory tables and the repository views over them

mod connections;
mod events;
mod members;
mod registrations;

pub use connections::MemoryConnectionRepository;
pub use events::MemoryEventRepository;
pub use members::MemoryMemberRepository;
pub use registrations::MemoryRegistrationRepository;

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use mintup_core::entities::{Connection, Event, MemberProfile, Registration};
use mintup_core::value_objects::Snowflake;

/// Backing tables, guarded by a single lock
///
/// One lock for everything keeps every repository call atomic with respect
/// to all tables; contention is irrelevant at test/dev scale.
#[derive(Default)]
pub(crate) struct Tables {
    pub(crate) events: HashMap<Snowflake, Event>,
    /// Registrations per event; duplicates for the same user are allowed,
    /// as in the backing document store
    pub(crate) registrations: HashMap<Snowflake, Vec<Registration>>,
    /// Member rosters per community, in join order
    pub(crate) members: HashMap<Snowflake, Vec<MemberProfile>>,
    pub(crate) connections: HashMap<Snowflake, Connection>,
    /// Live token -> connection id; superseded tokens are evicted
    pub(crate) tokens: HashMap<String, Snowflake>,
}

/// In-memory document store
///
/// Cheap to clone; clones share the same tables.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Event repository view
    pub fn events(&self) -> MemoryEventRepository {
        MemoryEventRepository::new(Arc::clone(&self.inner))
    }

    /// Registration repository view
    pub fn registrations(&self) -> MemoryRegistrationRepository {
        MemoryRegistrationRepository::new(Arc::clone(&self.inner))
    }

    /// Member repository view
    pub fn members(&self) -> MemoryMemberRepository {
        MemoryMemberRepository::new(Arc::clone(&self.inner))
    }

    /// Connection repository view
    pub fn connections(&self) -> MemoryConnectionRepository {
        MemoryConnectionRepository::new(Arc::clone(&self.inner))
    }
}

pub(crate) type SharedTables = Arc<RwLock<Tables>>;
