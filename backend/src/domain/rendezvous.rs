//! Rendezvous state machine: pure press-transition and status logic.
//!
//! The asymmetry between the first press (which only records intent) and the
//! second press (which commits) turns a symmetric two-party handshake into a
//! simple compare-and-set. These functions decide transitions; the store
//! adapters make them atomic.
//!
//! Expiry is lazy: nothing clears a stale countdown until the next press or
//! status read observes it against the injected clock.

use chrono::{DateTime, TimeDelta, Utc};
use uuid::Uuid;

use super::trip::{Countdown, MeetMethod, Trip, TripStatus};

/// Policy knobs for the rendezvous handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RendezvousPolicy {
    /// How long the second participant has to confirm after the first press.
    pub window: TimeDelta,
}

impl Default for RendezvousPolicy {
    fn default() -> Self {
        Self {
            window: TimeDelta::minutes(10),
        }
    }
}

/// Outcome a press should effect, decided against a snapshot of the trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressDecision {
    /// First press (or restart after expiry): start a fresh countdown.
    BeginCountdown(Countdown),
    /// Same starter pressed again while their countdown is live; nothing to
    /// write.
    AlreadyCounting(Countdown),
    /// The other participant pressed inside the window: commit the meeting.
    ConfirmMeet { met_at: DateTime<Utc> },
}

/// Reasons a press is rejected outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PressRejection {
    #[error("caller is not a participant of this trip")]
    NotParticipant,
    #[error("trip is {status}, not ready for meet confirmation")]
    NotConfirmable { status: TripStatus },
}

/// Decide what a press by `caller_id` at `now` should do.
///
/// A countdown whose expiry has passed is treated as absent (lazy expiry), so
/// a late press by either participant restarts a fresh countdown rather than
/// erroring.
pub fn decide_press(
    trip: &Trip,
    caller_id: Uuid,
    now: DateTime<Utc>,
    policy: &RendezvousPolicy,
) -> Result<PressDecision, PressRejection> {
    if !trip.is_participant(caller_id) {
        return Err(PressRejection::NotParticipant);
    }
    if trip.status() != TripStatus::Ready {
        return Err(PressRejection::NotConfirmable {
            status: trip.status(),
        });
    }

    let live = trip.countdown().filter(|countdown| countdown.expires_at > now);
    Ok(match live {
        None => PressDecision::BeginCountdown(Countdown {
            started_by: caller_id,
            expires_at: now + policy.window,
        }),
        Some(countdown) if countdown.started_by == caller_id => {
            PressDecision::AlreadyCounting(countdown)
        }
        Some(_) => PressDecision::ConfirmMeet { met_at: now },
    })
}

/// Read-only view of the rendezvous phase, as a press at `now` would find it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeetStatus {
    /// The meeting is confirmed.
    Met {
        met_at: DateTime<Utc>,
        method: MeetMethod,
    },
    /// One participant has pressed and the window is still open.
    Countdown {
        started_by: Uuid,
        expires_at: DateTime<Utc>,
        seconds_left: i64,
    },
    /// A countdown is stored but its window has closed.
    Expired,
    /// No press has been recorded.
    Idle,
}

/// Materialise the current phase for display without mutating anything.
pub fn observe_status(trip: &Trip, now: DateTime<Utc>) -> MeetStatus {
    if let Some(met_at) = trip.met_at() {
        return MeetStatus::Met {
            met_at,
            method: trip.meet_method(),
        };
    }

    match trip.countdown() {
        Some(countdown) if countdown.expires_at > now => MeetStatus::Countdown {
            started_by: countdown.started_by,
            expires_at: countdown.expires_at,
            seconds_left: (countdown.expires_at - now).num_seconds(),
        },
        Some(_) => MeetStatus::Expired,
        None => MeetStatus::Idle,
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use chrono::{NaiveDate, TimeZone, Utc};
    use rstest::rstest;

    use super::*;
    use crate::domain::trip::TripDraft;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 4, 10, 9, 0, 0).single().expect("valid")
    }

    fn ready_trip(countdown: Option<Countdown>) -> Trip {
        Trip::new(TripDraft {
            id: Uuid::new_v4(),
            user_a: Uuid::from_u128(1),
            user_b: Uuid::from_u128(2),
            start_date: NaiveDate::from_ymd_opt(2026, 4, 9).expect("valid date"),
            end_date: NaiveDate::from_ymd_opt(2026, 4, 12).expect("valid date"),
            status: TripStatus::Ready,
            countdown,
            met_at: None,
            meet_method: MeetMethod::None,
        })
        .expect("valid trip")
    }

    #[test]
    fn first_press_starts_a_countdown() {
        let trip = ready_trip(None);
        let decision = decide_press(&trip, trip.user_a(), t0(), &RendezvousPolicy::default())
            .expect("press accepted");

        assert_eq!(
            decision,
            PressDecision::BeginCountdown(Countdown {
                started_by: trip.user_a(),
                expires_at: t0() + TimeDelta::minutes(10),
            })
        );
    }

    #[test]
    fn repeat_press_by_the_starter_is_a_no_op() {
        let countdown = Countdown {
            started_by: Uuid::from_u128(1),
            expires_at: t0() + TimeDelta::minutes(10),
        };
        let trip = ready_trip(Some(countdown));
        let decision = decide_press(
            &trip,
            trip.user_a(),
            t0() + TimeDelta::minutes(2),
            &RendezvousPolicy::default(),
        )
        .expect("press accepted");

        assert_eq!(decision, PressDecision::AlreadyCounting(countdown));
    }

    #[test]
    fn counter_press_inside_the_window_confirms() {
        let trip = ready_trip(Some(Countdown {
            started_by: Uuid::from_u128(1),
            expires_at: t0() + TimeDelta::minutes(10),
        }));
        let pressed_at = t0() + TimeDelta::minutes(5);
        let decision = decide_press(&trip, trip.user_b(), pressed_at, &RendezvousPolicy::default())
            .expect("press accepted");

        assert_eq!(decision, PressDecision::ConfirmMeet { met_at: pressed_at });
    }

    #[test]
    fn counter_press_after_expiry_restarts_the_countdown() {
        let trip = ready_trip(Some(Countdown {
            started_by: Uuid::from_u128(1),
            expires_at: t0() + TimeDelta::minutes(10),
        }));
        let pressed_at = t0() + TimeDelta::seconds(700);
        let decision = decide_press(&trip, trip.user_b(), pressed_at, &RendezvousPolicy::default())
            .expect("press accepted");

        assert_eq!(
            decision,
            PressDecision::BeginCountdown(Countdown {
                started_by: trip.user_b(),
                expires_at: pressed_at + TimeDelta::minutes(10),
            })
        );
    }

    #[test]
    fn press_exactly_at_expiry_counts_as_expired() {
        let expires_at = t0() + TimeDelta::minutes(10);
        let trip = ready_trip(Some(Countdown {
            started_by: Uuid::from_u128(1),
            expires_at,
        }));
        let decision = decide_press(&trip, trip.user_b(), expires_at, &RendezvousPolicy::default())
            .expect("press accepted");

        assert!(matches!(decision, PressDecision::BeginCountdown(_)));
    }

    #[test]
    fn strangers_are_rejected() {
        let trip = ready_trip(None);
        let rejection = decide_press(&trip, Uuid::from_u128(99), t0(), &RendezvousPolicy::default())
            .expect_err("press rejected");

        assert_eq!(rejection, PressRejection::NotParticipant);
    }

    #[rstest]
    #[case(TripStatus::Pending)]
    #[case(TripStatus::Cancelled)]
    fn presses_outside_ready_are_rejected(#[case] status: TripStatus) {
        let draft = TripDraft {
            id: Uuid::new_v4(),
            user_a: Uuid::from_u128(1),
            user_b: Uuid::from_u128(2),
            start_date: NaiveDate::from_ymd_opt(2026, 4, 9).expect("valid date"),
            end_date: NaiveDate::from_ymd_opt(2026, 4, 12).expect("valid date"),
            status,
            countdown: None,
            met_at: None,
            meet_method: MeetMethod::None,
        };
        let trip = Trip::new(draft).expect("valid trip");

        let rejection = decide_press(&trip, trip.user_a(), t0(), &RendezvousPolicy::default())
            .expect_err("press rejected");
        assert_eq!(rejection, PressRejection::NotConfirmable { status });
    }

    #[test]
    fn status_reports_countdown_with_seconds_left() {
        let trip = ready_trip(Some(Countdown {
            started_by: Uuid::from_u128(1),
            expires_at: t0() + TimeDelta::minutes(10),
        }));

        let status = observe_status(&trip, t0() + TimeDelta::minutes(4));
        assert_eq!(
            status,
            MeetStatus::Countdown {
                started_by: Uuid::from_u128(1),
                expires_at: t0() + TimeDelta::minutes(10),
                seconds_left: 360,
            }
        );
    }

    #[test]
    fn status_reports_expired_without_mutating() {
        let trip = ready_trip(Some(Countdown {
            started_by: Uuid::from_u128(1),
            expires_at: t0() + TimeDelta::minutes(10),
        }));

        let status = observe_status(&trip, t0() + TimeDelta::minutes(11));
        assert_eq!(status, MeetStatus::Expired);
        // The stored countdown is untouched; only the view expires lazily.
        assert!(trip.countdown().is_some());
    }

    #[test]
    fn status_reports_met_with_method() {
        let met_at = t0();
        let trip = Trip::new(TripDraft {
            id: Uuid::new_v4(),
            user_a: Uuid::from_u128(1),
            user_b: Uuid::from_u128(2),
            start_date: NaiveDate::from_ymd_opt(2026, 4, 9).expect("valid date"),
            end_date: NaiveDate::from_ymd_opt(2026, 4, 12).expect("valid date"),
            status: TripStatus::Met,
            countdown: None,
            met_at: Some(met_at),
            meet_method: MeetMethod::Button,
        })
        .expect("valid trip");

        assert_eq!(
            observe_status(&trip, t0() + TimeDelta::hours(1)),
            MeetStatus::Met {
                met_at,
                method: MeetMethod::Button,
            }
        );
    }

    #[test]
    fn status_reports_idle_when_nothing_is_stored() {
        let trip = ready_trip(None);
        assert_eq!(observe_status(&trip, t0()), MeetStatus::Idle);
    }
}
