//! In-memory implementation of RegistrationRepository

use async_trait::async_trait;
use tracing::instrument;

use mintup_core::entities::Registration;
use mintup_core::traits::{RegistrationRepository, RepoResult};
use mintup_core::value_objects::Snowflake;

use super::SharedTables;

/// In-memory implementation of RegistrationRepository
#[derive(Clone)]
pub struct MemoryRegistrationRepository {
    tables: SharedTables,
}

impl MemoryRegistrationRepository {
    pub(crate) fn new(tables: SharedTables) -> Self {
        Self { tables }
    }
}

#[async_trait]
impl RegistrationRepository for MemoryRegistrationRepository {
    #[instrument(skip(self))]
    async fn find(
        &self,
        event_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<Registration>> {
        let tables = self.tables.read();
        Ok(tables
            .registrations
            .get(&event_id)
            .and_then(|list| list.iter().find(|reg| reg.user_id == user_id))
            .cloned())
    }

    #[instrument(skip(self))]
    async fn find_by_event(&self, event_id: Snowflake) -> RepoResult<Vec<Registration>> {
        let tables = self.tables.read();
        Ok(tables
            .registrations
            .get(&event_id)
            .cloned()
            .unwrap_or_default())
    }

    #[instrument(skip(self, registration))]
    async fn create(&self, registration: &Registration) -> RepoResult<()> {
        self.tables
            .write()
            .registrations
            .entry(registration.event_id)
            .or_default()
            .push(registration.clone());
        Ok(())
    }

    #[instrument(skip(self, registration))]
    async fn update(&self, registration: &Registration) -> RepoResult<()> {
        let mut tables = self.tables.write();
        if let Some(list) = tables.registrations.get_mut(&registration.event_id) {
            if let Some(existing) = list
                .iter_mut()
                .find(|reg| reg.user_id == registration.user_id)
            {
                *existing = registration.clone();
            }
        }
        Ok(())
    }
}
