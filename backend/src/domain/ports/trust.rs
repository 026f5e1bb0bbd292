//! Driving ports for trust profile reads and moderation penalties.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::Error;
use crate::domain::scoring::TrustProfile;

/// Request to apply a moderation warning to a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplyWarningRequest {
    pub user_id: Uuid,
    /// Positive severity; its constellation effect is capped by policy.
    pub severity: u32,
}

/// Driving port for moderation-triggered penalties.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TrustCommand: Send + Sync {
    /// Deduct the warning penalty from the user's stored profile.
    async fn apply_warning(&self, request: ApplyWarningRequest) -> Result<TrustProfile, Error>;
}

/// Driving port for trust profile reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TrustQuery: Send + Sync {
    /// Fetch the user's profile; users with no stored row read as the
    /// newcomer default derived from current history.
    async fn trust_profile(&self, user_id: Uuid) -> Result<TrustProfile, Error>;
}
