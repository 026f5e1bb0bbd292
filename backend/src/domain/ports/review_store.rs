//! Port for review persistence and received-review tallies.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::review::Review;
use crate::domain::scoring::ReviewTally;

/// Errors raised by review store adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReviewStoreError {
    /// Store connection could not be established.
    #[error("review store connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("review store query failed: {message}")]
    Query { message: String },
}

impl ReviewStoreError {
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

/// Port for writing reviews and reading review history.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewStore: Send + Sync {
    /// Insert the review, or overwrite the existing one for the same
    /// `(reviewer, target, trip)` triple.
    async fn upsert(&self, review: &Review) -> Result<(), ReviewStoreError>;

    /// All reviews written by `reviewer_id` about `target_id`.
    async fn list_authored_about(
        &self,
        reviewer_id: Uuid,
        target_id: Uuid,
    ) -> Result<Vec<Review>, ReviewStoreError>;

    /// Counts of reviews `target_id` has received, across all reviewers.
    async fn tally_received(&self, target_id: Uuid) -> Result<ReviewTally, ReviewStoreError>;
}
