//! Rendezvous coordination service.
//!
//! Owns the meet-confirmation workflow over the trip store: decide the press
//! transition with the pure state machine, land it with a compare-and-set,
//! and trigger the downstream relationship and trust recomputes when a
//! meeting commits. A lost compare-and-set surfaces as `Conflict` for the
//! caller to retry; nothing is retried internally, because replaying a
//! non-idempotent transition here would itself be a correctness hazard.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::domain::Error;
use crate::domain::ports::{
    CancelTripRequest, MeetStatusRequest, PressMeetRequest, PressOutcome, ProfileRefresh,
    RelationshipRefresh, RendezvousCommand, RendezvousQuery, TransitionOutcome, TripStore,
    TripStoreError, TripTransition,
};
use crate::domain::rendezvous::{
    MeetStatus, PressDecision, PressRejection, RendezvousPolicy, decide_press, observe_status,
};
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

fn map_press_rejection(rejection: PressRejection) -> Error {
    match rejection {
        PressRejection::NotParticipant => {
            Error::forbidden("only trip participants may confirm a meeting")
        }
        PressRejection::NotConfirmable { status } => {
            Error::invalid_state(format!("trip is {status}, not ready for meet confirmation"))
                .with_details(json!({ "status": status.to_string() }))
        }
    }
}

fn lost_race() -> Error {
    Error::conflict("a concurrent press changed this trip; retry the request")
}

/// Service coordinating the two-party, timeout-bounded meet confirmation.
#[derive(Clone)]
pub struct RendezvousService<T, A, P> {
    trip_store: Arc<T>,
    relationships: Arc<A>,
    profiles: Arc<P>,
    clock: Arc<dyn Clock>,
    policy: RendezvousPolicy,
}

impl<T, A, P> RendezvousService<T, A, P> {
    /// Create a new service over the trip store and downstream refreshers.
    pub fn new(
        trip_store: Arc<T>,
        relationships: Arc<A>,
        profiles: Arc<P>,
        clock: Arc<dyn Clock>,
        policy: RendezvousPolicy,
    ) -> Self {
        Self {
            trip_store,
            relationships,
            profiles,
            clock,
            policy,
        }
    }
}

impl<T, A, P> RendezvousService<T, A, P>
where
    T: TripStore,
    A: RelationshipRefresh,
    P: ProfileRefresh,
{
    async fn load_trip(&self, trip_id: Uuid) -> Result<Trip, Error> {
        self.trip_store
            .find_by_id(trip_id)
            .await
            .map_err(map_trip_store_error)?
            .ok_or_else(|| Error::not_found(format!("trip {trip_id} not found")))
    }

    /// Synchronous fan-out after a confirmed meeting: both directed
    /// relationship records, then both participants' profiles.
    async fn propagate_meeting(&self, trip: &Trip) -> Result<(), Error> {
        self.relationships
            .refresh_both(trip.user_a(), trip.user_b())
            .await?;
        self.profiles.refresh_profile(trip.user_a()).await?;
        self.profiles.refresh_profile(trip.user_b()).await?;
        Ok(())
    }
}

#[async_trait]
impl<T, A, P> RendezvousCommand for RendezvousService<T, A, P>
where
    T: TripStore,
    A: RelationshipRefresh,
    P: ProfileRefresh,
{
    async fn press_meet(&self, request: PressMeetRequest) -> Result<PressOutcome, Error> {
        let trip = self.load_trip(request.trip_id).await?;
        let now = self.clock.utc();

        let decision = decide_press(&trip, request.caller_id, now, &self.policy)
            .map_err(map_press_rejection)?;

        match decision {
            PressDecision::AlreadyCounting(countdown) => Ok(PressOutcome::Countdown {
                started_by: countdown.started_by,
                expires_at: countdown.expires_at,
            }),
            PressDecision::BeginCountdown(countdown) => {
                let outcome = self
                    .trip_store
                    .apply_transition(
                        trip.id(),
                        trip.countdown(),
                        TripTransition::BeginCountdown(countdown),
                    )
                    .await
                    .map_err(map_trip_store_error)?;
                if outcome == TransitionOutcome::Lost {
                    return Err(lost_race());
                }

                info!(
                    trip_id = %trip.id(),
                    started_by = %countdown.started_by,
                    expires_at = %countdown.expires_at,
                    "rendezvous countdown started"
                );
                Ok(PressOutcome::Countdown {
                    started_by: countdown.started_by,
                    expires_at: countdown.expires_at,
                })
            }
            PressDecision::ConfirmMeet { met_at } => {
                let outcome = self
                    .trip_store
                    .apply_transition(
                        trip.id(),
                        trip.countdown(),
                        TripTransition::ConfirmMeet { met_at },
                    )
                    .await
                    .map_err(map_trip_store_error)?;
                if outcome == TransitionOutcome::Lost {
                    return Err(lost_race());
                }

                info!(
                    trip_id = %trip.id(),
                    confirmed_by = %request.caller_id,
                    met_at = %met_at,
                    "meeting confirmed"
                );
                self.propagate_meeting(&trip).await?;
                Ok(PressOutcome::Met { met_at })
            }
        }
    }

    async fn cancel_trip(&self, request: CancelTripRequest) -> Result<(), Error> {
        let trip = self.load_trip(request.trip_id).await?;
        if !trip.is_participant(request.caller_id) {
            return Err(Error::forbidden("only trip participants may cancel a trip"));
        }
        if trip.status().is_terminal() {
            return Err(
                Error::invalid_state(format!("trip is already {}", trip.status()))
                    .with_details(json!({ "status": trip.status().to_string() })),
            );
        }

        let outcome = self
            .trip_store
            .apply_transition(trip.id(), trip.countdown(), TripTransition::Cancel)
            .await
            .map_err(map_trip_store_error)?;
        if outcome == TransitionOutcome::Lost {
            return Err(lost_race());
        }

        info!(trip_id = %trip.id(), cancelled_by = %request.caller_id, "trip cancelled");
        Ok(())
    }
}

#[async_trait]
impl<T, A, P> RendezvousQuery for RendezvousService<T, A, P>
where
    T: TripStore,
    A: RelationshipRefresh,
    P: ProfileRefresh,
{
    async fn meet_status(&self, request: MeetStatusRequest) -> Result<MeetStatus, Error> {
        let trip = self.load_trip(request.trip_id).await?;
        if !trip.is_participant(request.caller_id) {
            return Err(Error::forbidden(
                "only trip participants may view meet status",
            ));
        }
        if trip.status() == TripStatus::Pending || trip.status() == TripStatus::Cancelled {
            return Err(
                Error::invalid_state(format!("trip is {}, no meet to report", trip.status()))
                    .with_details(json!({ "status": trip.status().to_string() })),
            );
        }

        Ok(observe_status(&trip, self.clock.utc()))
    }
}

#[cfg(test)]
#[path = "rendezvous_service_tests.rs"]
mod tests;
