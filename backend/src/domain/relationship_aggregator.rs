//! Relationship aggregation service.
//!
//! Recomputes directed pairwise records in full from the trip and review
//! stores whenever a review lands or a trip completes. Opposite directions of
//! a pairing are independent rows, so both can be recomputed without
//! coordination.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use crate::domain::Error;
use crate::domain::ports::{
    RelationshipRefresh, RelationshipStore, RelationshipStoreError, ReviewStore, ReviewStoreError,
    TripStore, TripStoreError,
};
use crate::domain::relationship::summarise;

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

/// Service recomputing pairwise relationship records from scratch.
#[derive(Clone)]
pub struct RelationshipAggregator<T, R, L> {
    trip_store: Arc<T>,
    review_store: Arc<R>,
    relationship_store: Arc<L>,
}

impl<T, R, L> RelationshipAggregator<T, R, L> {
    /// Create a new aggregator over the three stores.
    pub fn new(trip_store: Arc<T>, review_store: Arc<R>, relationship_store: Arc<L>) -> Self {
        Self {
            trip_store,
            review_store,
            relationship_store,
        }
    }
}

#[async_trait]
impl<T, R, L> RelationshipRefresh for RelationshipAggregator<T, R, L>
where
    T: TripStore,
    R: ReviewStore,
    L: RelationshipStore,
{
    async fn refresh_pair(&self, user_id: Uuid, partner_id: Uuid) -> Result<(), Error> {
        let trips = self
            .trip_store
            .list_between(user_id, partner_id)
            .await
            .map_err(map_trip_store_error)?;
        let reviews = self
            .review_store
            .list_authored_about(partner_id, user_id)
            .await
            .map_err(map_review_store_error)?;

        let record = summarise(user_id, partner_id, &trips, &reviews);
        debug!(
            user_id = %user_id,
            partner_id = %partner_id,
            trips_count = record.trips_count,
            "recomputed relationship record"
        );

        self.relationship_store
            .upsert(&record)
            .await
            .map_err(map_relationship_store_error)
    }

    async fn refresh_both(&self, user_a: Uuid, user_b: Uuid) -> Result<(), Error> {
        self.refresh_pair(user_a, user_b).await?;
        self.refresh_pair(user_b, user_a).await
    }
}

#[cfg(test)]
#[path = "relationship_aggregator_tests.rs"]
mod tests;
