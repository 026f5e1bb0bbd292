//! Port for pairwise relationship records.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::relationship::Relationship;

/// Errors raised by relationship store adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RelationshipStoreError {
    /// Store connection could not be established.
    #[error("relationship store connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("relationship store query failed: {message}")]
    Query { message: String },
}

impl RelationshipStoreError {
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

/// Port for upserting and reading directed relationship rows, keyed by
/// `(user_id, partner_id)`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RelationshipStore: Send + Sync {
    /// Write the whole recomputed record, replacing any existing row.
    async fn upsert(&self, relationship: &Relationship) -> Result<(), RelationshipStoreError>;

    /// All relationship rows from `user_id`'s perspective.
    async fn list_for_user(&self, user_id: Uuid)
    -> Result<Vec<Relationship>, RelationshipStoreError>;
}
