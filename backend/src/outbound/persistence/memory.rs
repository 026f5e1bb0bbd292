//! In-memory implementation of all four store ports.
//!
//! Backs integration tests and local development without PostgreSQL. All
//! tables live under one mutex, so `apply_transition` is trivially atomic
//! and exercises the same compare-and-set contract as the Diesel store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::ports::{
    RelationshipStore, RelationshipStoreError, ReviewStore, ReviewStoreError, TransitionOutcome,
    TripStore, TripStoreError, TripTransition, TrustProfileStore, TrustProfileStoreError,
};
use crate::domain::relationship::Relationship;
use crate::domain::review::{Emotion, Review};
use crate::domain::scoring::{ReviewTally, TrustProfile, WarningPenalty};
use crate::domain::trip::{Countdown, MeetMethod, Trip, TripDraft, TripStatus};

#[derive(Default)]
struct Tables {
    trips: HashMap<Uuid, Trip>,
    reviews: HashMap<(Uuid, Uuid, Uuid), Review>,
    relationships: HashMap<(Uuid, Uuid), Relationship>,
    profiles: HashMap<Uuid, TrustProfile>,
}

/// In-memory store implementing every driven port.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn transition_trip(trip: &Trip, transition: TripTransition) -> Result<Trip, TripStoreError> {
    let draft = match transition {
        TripTransition::BeginCountdown(countdown) => TripDraft {
            countdown: Some(countdown),
            ..base_draft(trip)
        },
        TripTransition::ConfirmMeet { met_at } => TripDraft {
            status: TripStatus::Met,
            countdown: None,
            met_at: Some(met_at),
            meet_method: MeetMethod::Button,
            ..base_draft(trip)
        },
        TripTransition::Cancel => TripDraft {
            status: TripStatus::Cancelled,
            countdown: None,
            ..base_draft(trip)
        },
    };

    Trip::new(draft).map_err(|err| TripStoreError::query(err.to_string()))
}

fn base_draft(trip: &Trip) -> TripDraft {
    TripDraft {
        id: trip.id(),
        user_a: trip.user_a(),
        user_b: trip.user_b(),
        start_date: trip.start_date(),
        end_date: trip.end_date(),
        status: trip.status(),
        countdown: trip.countdown(),
        met_at: trip.met_at(),
        meet_method: trip.meet_method(),
    }
}

#[async_trait]
impl TripStore for MemoryStore {
    async fn insert(&self, trip: &Trip) -> Result<(), TripStoreError> {
        let mut tables = self.tables.lock().await;
        tables.trips.insert(trip.id(), trip.clone());
        Ok(())
    }

    async fn find_by_id(&self, trip_id: Uuid) -> Result<Option<Trip>, TripStoreError> {
        let tables = self.tables.lock().await;
        Ok(tables.trips.get(&trip_id).cloned())
    }

    async fn apply_transition(
        &self,
        trip_id: Uuid,
        expected: Option<Countdown>,
        transition: TripTransition,
    ) -> Result<TransitionOutcome, TripStoreError> {
        let mut tables = self.tables.lock().await;
        let Some(trip) = tables.trips.get(&trip_id) else {
            return Ok(TransitionOutcome::Lost);
        };

        let admissible = match transition {
            TripTransition::BeginCountdown(_) | TripTransition::ConfirmMeet { .. } => {
                trip.status() == TripStatus::Ready && trip.countdown() == expected
            }
            TripTransition::Cancel => !trip.status().is_terminal(),
        };
        if !admissible {
            return Ok(TransitionOutcome::Lost);
        }

        let updated = transition_trip(trip, transition)?;
        tables.trips.insert(trip_id, updated);
        Ok(TransitionOutcome::Applied)
    }

    async fn list_between(
        &self,
        user_id: Uuid,
        partner_id: Uuid,
    ) -> Result<Vec<Trip>, TripStoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .trips
            .values()
            .filter(|trip| {
                trip.is_participant(user_id) && trip.counterpart(user_id) == Some(partner_id)
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ReviewStore for MemoryStore {
    async fn upsert(&self, review: &Review) -> Result<(), ReviewStoreError> {
        let mut tables = self.tables.lock().await;
        let key = (review.reviewer_id(), review.target_id(), review.trip_id());
        tables.reviews.insert(key, review.clone());
        Ok(())
    }

    async fn list_authored_about(
        &self,
        reviewer_id: Uuid,
        target_id: Uuid,
    ) -> Result<Vec<Review>, ReviewStoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .reviews
            .values()
            .filter(|review| {
                review.reviewer_id() == reviewer_id && review.target_id() == target_id
            })
            .cloned()
            .collect())
    }

    async fn tally_received(&self, target_id: Uuid) -> Result<ReviewTally, ReviewStoreError> {
        let tables = self.tables.lock().await;
        let received = tables
            .reviews
            .values()
            .filter(|review| review.target_id() == target_id);

        let mut tally = ReviewTally::default();
        for review in received {
            tally.total += 1;
            if review.emotion() == Emotion::Positive {
                tally.positive += 1;
            }
        }
        Ok(tally)
    }
}

#[async_trait]
impl RelationshipStore for MemoryStore {
    async fn upsert(&self, relationship: &Relationship) -> Result<(), RelationshipStoreError> {
        let mut tables = self.tables.lock().await;
        let key = (relationship.user_id, relationship.partner_id);
        tables.relationships.insert(key, relationship.clone());
        Ok(())
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<Relationship>, RelationshipStoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .relationships
            .values()
            .filter(|relationship| relationship.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl TrustProfileStore for MemoryStore {
    async fn find(&self, user_id: Uuid) -> Result<Option<TrustProfile>, TrustProfileStoreError> {
        let tables = self.tables.lock().await;
        Ok(tables.profiles.get(&user_id).cloned())
    }

    async fn put(&self, profile: &TrustProfile) -> Result<(), TrustProfileStoreError> {
        let mut tables = self.tables.lock().await;
        tables.profiles.insert(profile.user_id, profile.clone());
        Ok(())
    }

    async fn apply_penalty(
        &self,
        user_id: Uuid,
        penalty: WarningPenalty,
    ) -> Result<Option<TrustProfile>, TrustProfileStoreError> {
        let mut tables = self.tables.lock().await;
        let Some(profile) = tables.profiles.get_mut(&user_id) else {
            return Ok(None);
        };

        profile.aura_score = (profile.aura_score - penalty.aura).max(0.0);
        profile.constellation_score = (profile.constellation_score - penalty.constellation).max(0.0);
        Ok(Some(profile.clone()))
    }
}
