//! In-memory implementation of EventRepository

use async_trait::async_trait;
use tracing::instrument;

use mintup_core::entities::Event;
use mintup_core::traits::{EventRepository, RepoResult};
use mintup_core::value_objects::Snowflake;

use super::SharedTables;

/// In-memory implementation of EventRepository
#[derive(Clone)]
pub struct MemoryEventRepository {
    tables: SharedTables,
}

impl MemoryEventRepository {
    pub(crate) fn new(tables: SharedTables) -> Self {
        Self { tables }
    }
}

#[async_trait]
impl EventRepository for MemoryEventRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Event>> {
        Ok(self.tables.read().events.get(&id).cloned())
    }

    #[instrument(skip(self))]
    async fn find_by_community(&self, community_id: Snowflake) -> RepoResult<Vec<Event>> {
        let tables = self.tables.read();
        let mut events: Vec<Event> = tables
            .events
            .values()
            .filter(|event| event.community_id == community_id)
            .cloned()
            .collect();
        // Stable listing order, oldest first
        events.sort_by(|a, b| a.start_date.cmp(&b.start_date).then_with(|| a.id.cmp(&b.id)));
        Ok(events)
    }

    #[instrument(skip(self, event))]
    async fn create(&self, event: &Event) -> RepoResult<()> {
        self.tables.write().events.insert(event.id, event.clone());
        Ok(())
    }
}
