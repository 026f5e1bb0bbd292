//! Driving ports for the rendezvous (meet confirmation) workflow.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::Error;
use crate::domain::rendezvous::MeetStatus;

/// Request to press the meet button on a trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PressMeetRequest {
    pub trip_id: Uuid,
    pub caller_id: Uuid,
}

/// What a successful press effected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressOutcome {
    /// The press started (or re-reported) a countdown; the other participant
    /// has until `expires_at` to confirm.
    Countdown {
        started_by: Uuid,
        expires_at: DateTime<Utc>,
    },
    /// The press confirmed the meeting.
    Met { met_at: DateTime<Utc> },
}

/// Request to read the current meet phase of a trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeetStatusRequest {
    pub trip_id: Uuid,
    pub caller_id: Uuid,
}

/// Request to cancel a trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CancelTripRequest {
    pub trip_id: Uuid,
    pub caller_id: Uuid,
}

/// Driving port for rendezvous mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RendezvousCommand: Send + Sync {
    /// Press the meet button; idempotent for the live countdown's starter.
    async fn press_meet(&self, request: PressMeetRequest) -> Result<PressOutcome, Error>;

    /// Cancel a non-terminal trip, clearing any live countdown.
    async fn cancel_trip(&self, request: CancelTripRequest) -> Result<(), Error>;
}

/// Driving port for rendezvous reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RendezvousQuery: Send + Sync {
    /// Report the current meet phase without mutating stored state.
    async fn meet_status(&self, request: MeetStatusRequest) -> Result<MeetStatus, Error>;
}
