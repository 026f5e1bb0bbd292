//! Internal trigger ports linking the rendezvous and review workflows to the
//! relationship and trust recomputation pipeline.
//!
//! These exist as ports (rather than concrete service references) so each
//! service can be unit-tested with its downstream triggers mocked out.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::Error;
use crate::domain::scoring::TrustProfile;

/// Recompute pairwise relationship records from stored history.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RelationshipRefresh: Send + Sync {
    /// Recompute the directed record for `(user_id, partner_id)`.
    async fn refresh_pair(&self, user_id: Uuid, partner_id: Uuid) -> Result<(), Error>;

    /// Recompute both directions of a pairing.
    async fn refresh_both(&self, user_a: Uuid, user_b: Uuid) -> Result<(), Error>;
}

/// Recompute and persist a user's whole trust profile.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileRefresh: Send + Sync {
    /// Recompute the profile from current history and store it.
    async fn refresh_profile(&self, user_id: Uuid) -> Result<TrustProfile, Error>;
}
