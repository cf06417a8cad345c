//! In-memory implementation of ConnectionRepository
//!
//! Maintains the token index alongside the records: a token resolves only
//! while its record carries it, and re-issuing a token on an existing record
//! evicts the superseded entry.

use async_trait::async_trait;
use tracing::instrument;

use mintup_core::entities::Connection;
use mintup_core::traits::{ConnectionRepository, RepoResult};
use mintup_core::value_objects::Snowflake;

use super::SharedTables;

/// In-memory implementation of ConnectionRepository
#[derive(Clone)]
pub struct MemoryConnectionRepository {
    tables: SharedTables,
}

impl MemoryConnectionRepository {
    pub(crate) fn new(tables: SharedTables) -> Self {
        Self { tables }
    }
}

#[async_trait]
impl ConnectionRepository for MemoryConnectionRepository {
    #[instrument(skip(self, token))]
    async fn find_by_token(&self, token: &str) -> RepoResult<Option<Connection>> {
        let tables = self.tables.read();
        Ok(tables
            .tokens
            .get(token)
            .and_then(|id| tables.connections.get(id))
            .cloned())
    }

    #[instrument(skip(self))]
    async fn find_pair(
        &self,
        event_id: Snowflake,
        initiator_user_id: Snowflake,
        acceptor_user_id: Snowflake,
    ) -> RepoResult<Option<Connection>> {
        let tables = self.tables.read();
        Ok(tables
            .connections
            .values()
            .find(|conn| {
                conn.event_id == event_id
                    && conn.initiator_user_id == initiator_user_id
                    && conn.acceptor_user_id == acceptor_user_id
            })
            .cloned())
    }

    #[instrument(skip(self))]
    async fn find_by_participant(
        &self,
        event_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Vec<Connection>> {
        let tables = self.tables.read();
        let mut connections: Vec<Connection> = tables
            .connections
            .values()
            .filter(|conn| {
                conn.event_id == event_id
                    && (conn.initiator_user_id == user_id || conn.acceptor_user_id == user_id)
            })
            .cloned()
            .collect();
        // Stable listing order; callers re-sort by their own criteria
        connections.sort_by_key(|conn| conn.id);
        Ok(connections)
    }

    #[instrument(skip(self, connection))]
    async fn create(&self, connection: &Connection) -> RepoResult<()> {
        let mut tables = self.tables.write();
        tables
            .tokens
            .insert(connection.connection_token.clone(), connection.id);
        tables.connections.insert(connection.id, connection.clone());
        Ok(())
    }

    #[instrument(skip(self, connection))]
    async fn update(&self, connection: &Connection) -> RepoResult<()> {
        let mut tables = self.tables.write();
        if let Some(previous) = tables.connections.get(&connection.id) {
            let previous_token = previous.connection_token.clone();
            if previous_token != connection.connection_token {
                tables.tokens.remove(&previous_token);
            }
        }
        tables
            .tokens
            .insert(connection.connection_token.clone(), connection.id);
        tables.connections.insert(connection.id, connection.clone());
        Ok(())
    }
}
