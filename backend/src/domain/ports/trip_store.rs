//! Port for trip persistence and atomic rendezvous transitions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::trip::{Countdown, Trip};

/// Errors raised by trip store adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TripStoreError {
    /// Store connection could not be established.
    #[error("trip store connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("trip store query failed: {message}")]
    Query { message: String },
}

impl TripStoreError {
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

/// A conditional write against a trip's rendezvous state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripTransition {
    /// Record a fresh countdown (also overwrites an expired one).
    BeginCountdown(Countdown),
    /// Commit the meeting: status `met`, method `button`, countdown cleared.
    ConfirmMeet { met_at: DateTime<Utc> },
    /// Move a non-terminal trip to `cancelled`, clearing any countdown.
    Cancel,
}

/// Whether a conditional write took effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The store matched the expectation and applied the write.
    Applied,
    /// A concurrent mutation got there first; nothing was written.
    Lost,
}

/// Port for trip reads and compare-and-set rendezvous writes.
///
/// `apply_transition` is the linearisation point for concurrent presses on
/// one trip: the adapter must execute the expectation check and the write as
/// a single atomic unit (a conditional UPDATE, or an equivalent critical
/// section).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TripStore: Send + Sync {
    /// Persist a new trip (used by the external matching workflow and tests).
    async fn insert(&self, trip: &Trip) -> Result<(), TripStoreError>;

    /// Find a trip by id.
    async fn find_by_id(&self, trip_id: Uuid) -> Result<Option<Trip>, TripStoreError>;

    /// Conditionally apply a rendezvous transition.
    ///
    /// For countdown transitions, `expected` is the countdown as previously
    /// read (the raw stored value, not the lazily-expired view); the write
    /// only lands if the stored value still matches and the trip is still
    /// `ready`. `Cancel` ignores `expected` and lands on any non-terminal
    /// trip.
    async fn apply_transition(
        &self,
        trip_id: Uuid,
        expected: Option<Countdown>,
        transition: TripTransition,
    ) -> Result<TransitionOutcome, TripStoreError>;

    /// All trips between the two users, in either storage order.
    async fn list_between(
        &self,
        user_id: Uuid,
        partner_id: Uuid,
    ) -> Result<Vec<Trip>, TripStoreError>;
}
