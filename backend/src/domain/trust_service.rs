//! Trust scoring service.
//!
//! Owns the per-user trust profile cache: full recomputes on every trigger,
//! plus the one incremental adjustment in the system, the moderation warning
//! penalty. A recompute after a warning re-derives the profile from review
//! history, so the penalty decays rather than compounding.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use crate::domain::Error;
use crate::domain::ports::{
    ApplyWarningRequest, ProfileRefresh, RelationshipStore, RelationshipStoreError, ReviewStore,
    ReviewStoreError, TrustCommand, TrustProfileStore, TrustProfileStoreError, TrustQuery,
};
use crate::domain::scoring::{ScoringPolicy, TrustProfile, recompute_profile, warning_penalty};

fn map_review_store_error(error: ReviewStoreError) -> Error {
    match error {
        ReviewStoreError::Connection { message } => {
            Error::service_unavailable(format!("review store unavailable: {message}"))
        }
        ReviewStoreError::Query { message } => {
            Error::internal(format!("review store error: {message}"))
        }
    }
}

fn map_relationship_store_error(error: RelationshipStoreError) -> Error {
    match error {
        RelationshipStoreError::Connection { message } => {
            Error::service_unavailable(format!("relationship store unavailable: {message}"))
        }
        RelationshipStoreError::Query { message } => {
            Error::internal(format!("relationship store error: {message}"))
        }
    }
}

fn map_profile_store_error(error: TrustProfileStoreError) -> Error {
    match error {
        TrustProfileStoreError::Connection { message } => {
            Error::service_unavailable(format!("trust profile store unavailable: {message}"))
        }
        TrustProfileStoreError::Query { message } => {
            Error::internal(format!("trust profile store error: {message}"))
        }
    }
}

/// Service deriving and caching per-user trust profiles.
#[derive(Clone)]
pub struct TrustService<R, L, P> {
    review_store: Arc<R>,
    relationship_store: Arc<L>,
    profile_store: Arc<P>,
    policy: ScoringPolicy,
}

impl<R, L, P> TrustService<R, L, P> {
    /// Create a new service over the review, relationship, and profile
    /// stores.
    pub fn new(
        review_store: Arc<R>,
        relationship_store: Arc<L>,
        profile_store: Arc<P>,
        policy: ScoringPolicy,
    ) -> Self {
        Self {
            review_store,
            relationship_store,
            profile_store,
            policy,
        }
    }
}

impl<R, L, P> TrustService<R, L, P>
where
    R: ReviewStore,
    L: RelationshipStore,
    P: TrustProfileStore,
{
    /// Derive a profile from current history without persisting it.
    async fn derive_profile(&self, user_id: Uuid) -> Result<TrustProfile, Error> {
        let tally = self
            .review_store
            .tally_received(user_id)
            .await
            .map_err(map_review_store_error)?;
        let relationships = self
            .relationship_store
            .list_for_user(user_id)
            .await
            .map_err(map_relationship_store_error)?;

        Ok(recompute_profile(
            &self.policy,
            user_id,
            tally,
            &relationships,
        ))
    }
}

#[async_trait]
impl<R, L, P> ProfileRefresh for TrustService<R, L, P>
where
    R: ReviewStore,
    L: RelationshipStore,
    P: TrustProfileStore,
{
    async fn refresh_profile(&self, user_id: Uuid) -> Result<TrustProfile, Error> {
        let profile = self.derive_profile(user_id).await?;
        self.profile_store
            .put(&profile)
            .await
            .map_err(map_profile_store_error)?;

        info!(
            user_id = %user_id,
            aura_score = profile.aura_score,
            constellation_score = profile.constellation_score,
            "trust profile recomputed"
        );
        Ok(profile)
    }
}

#[async_trait]
impl<R, L, P> TrustCommand for TrustService<R, L, P>
where
    R: ReviewStore,
    L: RelationshipStore,
    P: TrustProfileStore,
{
    async fn apply_warning(&self, request: ApplyWarningRequest) -> Result<TrustProfile, Error> {
        if request.severity == 0 {
            return Err(Error::invalid_request("warning severity must be positive"));
        }

        let penalty = warning_penalty(&self.policy, request.severity);

        // Seed the row from current history first so the penalty has a
        // baseline to deduct from for users never scored before.
        if self
            .profile_store
            .find(request.user_id)
            .await
            .map_err(map_profile_store_error)?
            .is_none()
        {
            self.refresh_profile(request.user_id).await?;
        }

        let adjusted = self
            .profile_store
            .apply_penalty(request.user_id, penalty)
            .await
            .map_err(map_profile_store_error)?
            .ok_or_else(|| {
                Error::internal(format!(
                    "trust profile for {} vanished while applying a warning",
                    request.user_id
                ))
            })?;

        info!(
            user_id = %request.user_id,
            severity = request.severity,
            aura_score = adjusted.aura_score,
            "warning penalty applied"
        );
        Ok(adjusted)
    }
}

#[async_trait]
impl<R, L, P> TrustQuery for TrustService<R, L, P>
where
    R: ReviewStore,
    L: RelationshipStore,
    P: TrustProfileStore,
{
    async fn trust_profile(&self, user_id: Uuid) -> Result<TrustProfile, Error> {
        match self
            .profile_store
            .find(user_id)
            .await
            .map_err(map_profile_store_error)?
        {
            Some(profile) => Ok(profile),
            // Pure read: derive the newcomer view without writing it back.
            None => self.derive_profile(user_id).await,
        }
    }
}

#[cfg(test)]
#[path = "trust_service_tests.rs"]
mod tests;
