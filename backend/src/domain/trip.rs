//! Trip aggregate: a planned, possibly-confirmed meeting between two users.
//!
//! A trip moves `pending → ready → met`, or to terminal `cancelled` from
//! either non-terminal state. The rendezvous countdown fields are only
//! populated while the trip is `ready`; they are cleared on every transition
//! out of that state.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a trip. `Met` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripStatus {
    Pending,
    Ready,
    Met,
    Cancelled,
}

impl TripStatus {
    /// Whether the status admits no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Met | Self::Cancelled)
    }
}

/// Error returned when parsing a trip status from string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseTripStatusError;

impl fmt::Display for TripStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => f.write_str("pending"),
            Self::Ready => f.write_str("ready"),
            Self::Met => f.write_str("met"),
            Self::Cancelled => f.write_str("cancelled"),
        }
    }
}

impl fmt::Display for ParseTripStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid trip status")
    }
}

impl std::error::Error for ParseTripStatusError {}

impl FromStr for TripStatus {
    type Err = ParseTripStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "ready" => Ok(Self::Ready),
            "met" => Ok(Self::Met),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(ParseTripStatusError),
        }
    }
}

/// How a met trip was confirmed, recorded for audit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeetMethod {
    /// No confirmation recorded yet.
    None,
    /// Both participants pressed the meet button within the window.
    Button,
}

/// Error returned when parsing a meet method from string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseMeetMethodError;

impl fmt::Display for MeetMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("none"),
            Self::Button => f.write_str("button"),
        }
    }
}

impl fmt::Display for ParseMeetMethodError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid meet method")
    }
}

impl std::error::Error for ParseMeetMethodError {}

impl FromStr for MeetMethod {
    type Err = ParseMeetMethodError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "none" => Ok(Self::None),
            "button" => Ok(Self::Button),
            _ => Err(ParseMeetMethodError),
        }
    }
}

/// A live rendezvous countdown: one participant has pressed and the other has
/// until `expires_at` to confirm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    pub started_by: Uuid,
    pub expires_at: DateTime<Utc>,
}

/// Input payload for [`Trip::new`].
#[derive(Debug, Clone)]
pub struct TripDraft {
    pub id: Uuid,
    pub user_a: Uuid,
    pub user_b: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: TripStatus,
    pub countdown: Option<Countdown>,
    pub met_at: Option<DateTime<Utc>>,
    pub meet_method: MeetMethod,
}

/// Validation errors emitted by the [`Trip`] constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TripValidationError {
    #[error("trip participants must be two distinct users")]
    SameParticipants,
    #[error("trip start date must not be after its end date")]
    DatesOutOfOrder,
    #[error("rendezvous countdown is only valid while the trip is ready")]
    CountdownOutsideReady,
    #[error("met timestamp must be present exactly when the trip status is met")]
    MetAtStatusMismatch,
    #[error("countdown starter must be one of the trip participants")]
    CountdownStarterNotParticipant,
}

/// A validated trip.
///
/// ## Invariants
/// - `user_a != user_b` and `start_date <= end_date`.
/// - `countdown` is only populated while `status == Ready`, and its starter is
///   one of the two participants.
/// - `met_at` is populated exactly when `status == Met`.
#[derive(Debug, Clone, PartialEq)]
pub struct Trip {
    id: Uuid,
    user_a: Uuid,
    user_b: Uuid,
    start_date: NaiveDate,
    end_date: NaiveDate,
    status: TripStatus,
    countdown: Option<Countdown>,
    met_at: Option<DateTime<Utc>>,
    meet_method: MeetMethod,
}

impl Trip {
    /// Creates a validated trip.
    pub fn new(draft: TripDraft) -> Result<Self, TripValidationError> {
        Self::try_from(draft)
    }

    /// Returns the trip id.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the first participant (storage order).
    pub fn user_a(&self) -> Uuid {
        self.user_a
    }

    /// Returns the second participant (storage order).
    pub fn user_b(&self) -> Uuid {
        self.user_b
    }

    /// Returns the planned start date.
    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    /// Returns the planned end date.
    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    /// Returns the lifecycle status.
    pub fn status(&self) -> TripStatus {
        self.status
    }

    /// Returns the live countdown fields as stored, without lazy expiry.
    pub fn countdown(&self) -> Option<Countdown> {
        self.countdown
    }

    /// Returns when the meeting was confirmed, if it was.
    pub fn met_at(&self) -> Option<DateTime<Utc>> {
        self.met_at
    }

    /// Returns how the meeting was confirmed.
    pub fn meet_method(&self) -> MeetMethod {
        self.meet_method
    }

    /// Whether the given user is one of the trip's two participants.
    pub fn is_participant(&self, user_id: Uuid) -> bool {
        self.user_a == user_id || self.user_b == user_id
    }

    /// Returns the other participant, or `None` when the user is not on the
    /// trip at all.
    pub fn counterpart(&self, user_id: Uuid) -> Option<Uuid> {
        if user_id == self.user_a {
            Some(self.user_b)
        } else if user_id == self.user_b {
            Some(self.user_a)
        } else {
            None
        }
    }

    /// The date the trip effectively ended: the later of the planned end date
    /// and the calendar date the meeting was confirmed on. A trip confirmed
    /// after its planned window is reviewable only once the confirmation day
    /// has passed.
    pub fn effective_end_date(&self) -> NaiveDate {
        match self.met_at {
            Some(met_at) => self.end_date.max(met_at.date_naive()),
            None => self.end_date,
        }
    }
}

impl TryFrom<TripDraft> for Trip {
    type Error = TripValidationError;

    fn try_from(draft: TripDraft) -> Result<Self, Self::Error> {
        let TripDraft {
            id,
            user_a,
            user_b,
            start_date,
            end_date,
            status,
            countdown,
            met_at,
            meet_method,
        } = draft;

        if user_a == user_b {
            return Err(TripValidationError::SameParticipants);
        }
        if start_date > end_date {
            return Err(TripValidationError::DatesOutOfOrder);
        }
        if countdown.is_some() && status != TripStatus::Ready {
            return Err(TripValidationError::CountdownOutsideReady);
        }
        if let Some(countdown) = countdown
            && countdown.started_by != user_a
            && countdown.started_by != user_b
        {
            return Err(TripValidationError::CountdownStarterNotParticipant);
        }
        if met_at.is_some() != (status == TripStatus::Met) {
            return Err(TripValidationError::MetAtStatusMismatch);
        }

        Ok(Self {
            id,
            user_a,
            user_b,
            start_date,
            end_date,
            status,
            countdown,
            met_at,
            meet_method,
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    use super::*;

    fn draft() -> TripDraft {
        TripDraft {
            id: Uuid::new_v4(),
            user_a: Uuid::new_v4(),
            user_b: Uuid::new_v4(),
            start_date: NaiveDate::from_ymd_opt(2026, 3, 1).expect("valid date"),
            end_date: NaiveDate::from_ymd_opt(2026, 3, 5).expect("valid date"),
            status: TripStatus::Ready,
            countdown: None,
            met_at: None,
            meet_method: MeetMethod::None,
        }
    }

    #[test]
    fn accepts_a_plain_ready_trip() {
        let trip = Trip::new(draft()).expect("valid trip");
        assert_eq!(trip.status(), TripStatus::Ready);
        assert!(trip.countdown().is_none());
    }

    #[test]
    fn rejects_identical_participants() {
        let mut input = draft();
        input.user_b = input.user_a;
        assert_eq!(
            Trip::new(input),
            Err(TripValidationError::SameParticipants)
        );
    }

    #[test]
    fn rejects_reversed_dates() {
        let mut input = draft();
        input.end_date = NaiveDate::from_ymd_opt(2026, 2, 1).expect("valid date");
        assert_eq!(Trip::new(input), Err(TripValidationError::DatesOutOfOrder));
    }

    #[rstest]
    #[case(TripStatus::Pending)]
    #[case(TripStatus::Cancelled)]
    fn rejects_countdown_outside_ready(#[case] status: TripStatus) {
        let mut input = draft();
        input.status = status;
        input.countdown = Some(Countdown {
            started_by: input.user_a,
            expires_at: Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).single().expect("valid"),
        });
        assert_eq!(
            Trip::new(input),
            Err(TripValidationError::CountdownOutsideReady)
        );
    }

    #[test]
    fn rejects_countdown_started_by_stranger() {
        let mut input = draft();
        input.countdown = Some(Countdown {
            started_by: Uuid::new_v4(),
            expires_at: Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).single().expect("valid"),
        });
        assert_eq!(
            Trip::new(input),
            Err(TripValidationError::CountdownStarterNotParticipant)
        );
    }

    #[test]
    fn ties_met_at_to_met_status() {
        let mut missing = draft();
        missing.status = TripStatus::Met;
        assert_eq!(
            Trip::new(missing),
            Err(TripValidationError::MetAtStatusMismatch)
        );

        let mut spurious = draft();
        spurious.met_at = Some(Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).single().expect("valid"));
        assert_eq!(
            Trip::new(spurious),
            Err(TripValidationError::MetAtStatusMismatch)
        );
    }

    #[test]
    fn effective_end_date_extends_to_late_confirmations() {
        let mut input = draft();
        input.status = TripStatus::Met;
        input.met_at = Some(Utc.with_ymd_and_hms(2026, 3, 9, 18, 0, 0).single().expect("valid"));
        input.meet_method = MeetMethod::Button;
        let trip = Trip::new(input).expect("valid trip");

        assert_eq!(
            trip.effective_end_date(),
            NaiveDate::from_ymd_opt(2026, 3, 9).expect("valid date")
        );
    }

    #[test]
    fn counterpart_identifies_the_other_participant() {
        let trip = Trip::new(draft()).expect("valid trip");
        assert_eq!(trip.counterpart(trip.user_a()), Some(trip.user_b()));
        assert_eq!(trip.counterpart(trip.user_b()), Some(trip.user_a()));
        assert_eq!(trip.counterpart(Uuid::new_v4()), None);
    }
}
