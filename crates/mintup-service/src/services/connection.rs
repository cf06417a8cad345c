//! Connection service
//!
//! Orchestrates the in-person connection handshake: token issuance,
//! redemption, pair-status lookups, and confirmed-connection listings.
//! Caller identity and the current instant are explicit parameters on every
//! operation; nothing here reads a clock or ambient session state.

use chrono::{DateTime, Utc};
use tracing::{info, instrument};

use mintup_core::entities::{generate_connection_token, Connection, ConnectionStatus, PairStatus};
use mintup_core::{Caller, DomainError, Snowflake};

use crate::dto::{ConnectedAttendeeResponse, ConnectionConfirmedResponse, ConnectionTokenResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Connection service
pub struct ConnectionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ConnectionService<'a> {
    /// Create a new ConnectionService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Issue a fresh connection token toward `acceptor_user_id`
    ///
    /// The caller becomes the initiator and is expected to show the returned
    /// token to the acceptor out of band (QR code). Re-initiating an
    /// unconfirmed pair re-issues the token on the existing record rather
    /// than accumulating duplicates.
    #[instrument(skip(self))]
    pub async fn initiate(
        &self,
        caller: Caller,
        event_id: Snowflake,
        acceptor_user_id: Snowflake,
        now: DateTime<Utc>,
    ) -> ServiceResult<ConnectionTokenResponse> {
        let initiator_user_id = caller.require_user()?;

        if initiator_user_id == acceptor_user_id {
            return Err(DomainError::SelfConnection.into());
        }

        // Any registration row satisfies the check, regardless of its review
        // status.
        let initiator_registered = self
            .ctx
            .registration_repo()
            .find(event_id, initiator_user_id)
            .await?
            .is_some();
        let acceptor_registered = self
            .ctx
            .registration_repo()
            .find(event_id, acceptor_user_id)
            .await?
            .is_some();
        if !initiator_registered || !acceptor_registered {
            return Err(DomainError::NotRegisteredForEvent.into());
        }

        // One confirmed record per unordered pair per event: a confirmed
        // record in either orientation blocks. A pending reverse record does
        // not - both directions may briefly hold live tokens.
        let forward = self
            .ctx
            .connection_repo()
            .find_pair(event_id, initiator_user_id, acceptor_user_id)
            .await?;
        let reverse = self
            .ctx
            .connection_repo()
            .find_pair(event_id, acceptor_user_id, initiator_user_id)
            .await?;
        if forward.as_ref().is_some_and(Connection::is_confirmed)
            || reverse.as_ref().is_some_and(Connection::is_confirmed)
        {
            return Err(DomainError::ConnectionAlreadyExists.into());
        }

        let connection_token = generate_connection_token(now);
        let expires_at = now + self.ctx.token_ttl();

        match forward {
            Some(mut existing) => {
                existing.reissue(connection_token.clone(), expires_at);
                self.ctx.connection_repo().update(&existing).await?;
            }
            None => {
                let connection = Connection::new(
                    self.ctx.generate_id(),
                    event_id,
                    initiator_user_id,
                    acceptor_user_id,
                    connection_token.clone(),
                    expires_at,
                    now,
                );
                self.ctx.connection_repo().create(&connection).await?;
            }
        }

        info!(
            event_id = %event_id,
            initiator_id = %initiator_user_id,
            acceptor_id = %acceptor_user_id,
            "Connection initiated"
        );

        Ok(ConnectionTokenResponse {
            connection_token,
            expires_at,
        })
    }

    /// Redeem a connection token as the designated acceptor
    ///
    /// Safe to retry: confirming an already-confirmed connection returns the
    /// same id without re-patching. A token presented after its deadline
    /// moves the record to its terminal `Expired` state (lazy expiry) before
    /// failing.
    #[instrument(skip(self, connection_token))]
    pub async fn confirm(
        &self,
        caller: Caller,
        connection_token: &str,
        now: DateTime<Utc>,
    ) -> ServiceResult<ConnectionConfirmedResponse> {
        let user_id = caller.require_user()?;

        let mut connection = self
            .ctx
            .connection_repo()
            .find_by_token(connection_token)
            .await?
            .ok_or(DomainError::InvalidConnectionToken)?;

        if connection.acceptor_user_id != user_id {
            return Err(DomainError::ConnectionNotIntended.into());
        }

        match connection.status {
            ConnectionStatus::Confirmed { .. } => {
                Ok(ConnectionConfirmedResponse::new(connection.id))
            }
            ConnectionStatus::Pending { expires_at } if now < expires_at => {
                connection.confirm(now);
                self.ctx.connection_repo().update(&connection).await?;

                info!(
                    connection_id = %connection.id,
                    event_id = %connection.event_id,
                    "Connection confirmed"
                );
                Ok(ConnectionConfirmedResponse::new(connection.id))
            }
            ConnectionStatus::Pending { .. } => {
                connection.mark_expired();
                self.ctx.connection_repo().update(&connection).await?;
                Err(DomainError::ConnectionTokenExpired.into())
            }
            ConnectionStatus::Expired => Err(DomainError::ConnectionTokenExpired.into()),
        }
    }

    /// Coarse status of the pair `{user_a, user_b}` at an event
    ///
    /// Order-independent; a pending record past its deadline reads as
    /// expired without being patched. Used to decide between offering
    /// "Connect" and showing "Connected".
    #[instrument(skip(self))]
    pub async fn status_between(
        &self,
        event_id: Snowflake,
        user_a: Snowflake,
        user_b: Snowflake,
        now: DateTime<Utc>,
    ) -> ServiceResult<PairStatus> {
        let forward = self
            .ctx
            .connection_repo()
            .find_pair(event_id, user_a, user_b)
            .await?;
        let reverse = self
            .ctx
            .connection_repo()
            .find_pair(event_id, user_b, user_a)
            .await?;

        Ok(forward
            .iter()
            .chain(reverse.iter())
            .map(|conn| conn.pair_status(now))
            .max()
            .unwrap_or(PairStatus::None))
    }

    /// Confirmed connections of the caller at an event
    ///
    /// Each entry resolves to the other party's profile plus the goals they
    /// declared on their registration, most recent confirmation first.
    #[instrument(skip(self))]
    pub async fn confirmed_for(
        &self,
        caller: Caller,
        event_id: Snowflake,
    ) -> ServiceResult<Vec<ConnectedAttendeeResponse>> {
        let user_id = caller.require_user()?;

        let event = self
            .ctx
            .event_repo()
            .find_by_id(event_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Event", event_id.to_string()))?;

        let connections = self
            .ctx
            .connection_repo()
            .find_by_participant(event_id, user_id)
            .await?;

        let mut confirmed: Vec<(Connection, DateTime<Utc>)> = connections
            .into_iter()
            .filter_map(|conn| conn.confirmed_at().map(|at| (conn, at)))
            .collect();
        confirmed.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| b.0.id.cmp(&a.0.id)));

        let mut responses = Vec::with_capacity(confirmed.len());
        for (connection, connected_at) in confirmed {
            let other_id = match connection.other_party(user_id) {
                Some(id) => id,
                None => continue,
            };

            let profile = match self
                .ctx
                .member_repo()
                .find(event.community_id, other_id)
                .await?
            {
                Some(profile) => profile,
                None => continue, // Skip if the other party left the community
            };

            let event_intentions = self
                .ctx
                .registration_repo()
                .find(event_id, other_id)
                .await?
                .map(|registration| registration.event_intentions)
                .unwrap_or_default();

            responses.push(ConnectedAttendeeResponse {
                user_id: other_id.to_string(),
                name: profile.name,
                image_url: profile.image_url,
                event_intentions,
                connected_at,
            });
        }

        Ok(responses)
    }
}
