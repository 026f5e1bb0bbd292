//! Review submission service.
//!
//! Validates that a review refers to a confirmed, finished trip between the
//! right two users, upserts it, and synchronously refreshes the affected
//! relationship record and trust profile before returning.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::domain::Error;
use crate::domain::ports::{
    ProfileRefresh, RelationshipRefresh, ReviewCommand, ReviewStore, ReviewStoreError,
    SubmitReviewRequest, TripStore, TripStoreError,
};
use crate::domain::review::{Review, ReviewDraft};
use crate::domain::trip::{Trip, TripStatus};

fn map_trip_store_error(error: TripStoreError) -> Error {
    match error {
        TripStoreError::Connection { message } => {
            Error::service_unavailable(format!("trip store unavailable: {message}"))
        }
        TripStoreError::Query { message } => {
            Error::internal(format!("trip store error: {message}"))
        }
    }
}

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

/// Service filing reviews for completed trips.
#[derive(Clone)]
pub struct ReviewService<T, R, A, P> {
    trip_store: Arc<T>,
    review_store: Arc<R>,
    relationships: Arc<A>,
    profiles: Arc<P>,
    clock: Arc<dyn Clock>,
}

impl<T, R, A, P> ReviewService<T, R, A, P> {
    /// Create a new service over the stores and downstream refreshers.
    pub fn new(
        trip_store: Arc<T>,
        review_store: Arc<R>,
        relationships: Arc<A>,
        profiles: Arc<P>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            trip_store,
            review_store,
            relationships,
            profiles,
            clock,
        }
    }
}

/// A review may only be filed by one participant about the other.
fn check_parties(trip: &Trip, reviewer_id: Uuid, target_id: Uuid) -> Result<(), Error> {
    if !trip.is_participant(reviewer_id) {
        return Err(Error::forbidden(
            "only trip participants may review this trip",
        ));
    }
    if trip.counterpart(reviewer_id) != Some(target_id) {
        return Err(Error::forbidden(
            "reviews must be about the other trip participant",
        ));
    }
    Ok(())
}

#[async_trait]
impl<T, R, A, P> ReviewCommand for ReviewService<T, R, A, P>
where
    T: TripStore,
    R: ReviewStore,
    A: RelationshipRefresh,
    P: ProfileRefresh,
{
    async fn submit_review(&self, request: SubmitReviewRequest) -> Result<(), Error> {
        let trip = self
            .trip_store
            .find_by_id(request.trip_id)
            .await
            .map_err(map_trip_store_error)?
            .ok_or_else(|| Error::not_found(format!("trip {} not found", request.trip_id)))?;

        check_parties(&trip, request.reviewer_id, request.target_id)?;

        if trip.status() != TripStatus::Met {
            return Err(
                Error::invalid_state("trip meeting has not been confirmed")
                    .with_details(json!({ "status": trip.status().to_string() })),
            );
        }

        let now = self.clock.utc();
        if trip.effective_end_date() >= now.date_naive() {
            return Err(
                Error::invalid_state("trip has not finished yet").with_details(json!({
                    "endsOn": trip.effective_end_date().to_string(),
                })),
            );
        }

        let review = Review::new(ReviewDraft {
            reviewer_id: request.reviewer_id,
            target_id: request.target_id,
            trip_id: request.trip_id,
            emotion: request.emotion,
            tags: request.tags,
            comment: request.comment,
            submitted_at: now,
        })
        .map_err(|err| Error::invalid_request(format!("invalid review payload: {err}")))?;

        self.review_store
            .upsert(&review)
            .await
            .map_err(map_review_store_error)?;

        info!(
            trip_id = %request.trip_id,
            reviewer_id = %request.reviewer_id,
            target_id = %request.target_id,
            emotion = %review.emotion(),
            "review stored"
        );

        // The review reshapes how the target looks: their record about the
        // reviewer, then their profile.
        self.relationships
            .refresh_pair(request.target_id, request.reviewer_id)
            .await?;
        self.profiles.refresh_profile(request.target_id).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "review_service_tests.rs"]
mod tests;
