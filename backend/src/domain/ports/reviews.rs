//! Driving port for filing reviews.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::Error;
use crate::domain::review::Emotion;

/// Request to file (or overwrite) a review for a completed trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReviewRequest {
    pub reviewer_id: Uuid,
    pub target_id: Uuid,
    pub trip_id: Uuid,
    pub emotion: Emotion,
    pub tags: Vec<String>,
    pub comment: Option<String>,
}

/// Driving port for review submission.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewCommand: Send + Sync {
    /// Upsert the review and synchronously refresh the affected relationship
    /// and trust profile before returning.
    async fn submit_review(&self, request: SubmitReviewRequest) -> Result<(), Error>;
}
