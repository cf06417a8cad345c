//! In-memory implementation of MemberRepository

use async_trait::async_trait;
use tracing::instrument;

use mintup_core::entities::MemberProfile;
use mintup_core::traits::{MemberRepository, RepoResult};
use mintup_core::value_objects::Snowflake;

use super::SharedTables;

/// In-memory implementation of MemberRepository
#[derive(Clone)]
pub struct MemoryMemberRepository {
    tables: SharedTables,
}

impl MemoryMemberRepository {
    pub(crate) fn new(tables: SharedTables) -> Self {
        Self { tables }
    }
}

#[async_trait]
impl MemberRepository for MemoryMemberRepository {
    #[instrument(skip(self))]
    async fn find(
        &self,
        community_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<MemberProfile>> {
        let tables = self.tables.read();
        Ok(tables
            .members
            .get(&community_id)
            .and_then(|roster| roster.iter().find(|member| member.id == user_id))
            .cloned())
    }

    #[instrument(skip(self))]
    async fn find_by_community(&self, community_id: Snowflake) -> RepoResult<Vec<MemberProfile>> {
        let tables = self.tables.read();
        Ok(tables
            .members
            .get(&community_id)
            .cloned()
            .unwrap_or_default())
    }

    #[instrument(skip(self, member))]
    async fn create(&self, community_id: Snowflake, member: &MemberProfile) -> RepoResult<()> {
        self.tables
            .write()
            .members
            .entry(community_id)
            .or_default()
            .push(member.clone());
        Ok(())
    }
}
