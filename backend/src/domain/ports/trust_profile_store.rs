//! Port for per-user trust profile rows.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::scoring::{TrustProfile, WarningPenalty};

/// Errors raised by trust profile store adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrustProfileStoreError {
    /// Store connection could not be established.
    #[error("trust profile store connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("trust profile store query failed: {message}")]
    Query { message: String },
}

impl TrustProfileStoreError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Port for reading and replacing trust profiles.
///
/// `put` always writes the whole profile in one statement so concurrent
/// recomputes resolve last-writer-wins with no field-level interleaving.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TrustProfileStore: Send + Sync {
    /// Find a stored profile.
    async fn find(&self, user_id: Uuid) -> Result<Option<TrustProfile>, TrustProfileStoreError>;

    /// Replace (or create) the stored profile wholesale.
    async fn put(&self, profile: &TrustProfile) -> Result<(), TrustProfileStoreError>;

    /// Atomically deduct a warning penalty from the stored profile, flooring
    /// both scores at zero. Returns the adjusted profile, or `None` when no
    /// row exists yet.
    async fn apply_penalty(
        &self,
        user_id: Uuid,
        penalty: WarningPenalty,
    ) -> Result<Option<TrustProfile>, TrustProfileStoreError>;
}
