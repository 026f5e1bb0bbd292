//! End-to-end scenarios over the real services and in-memory stores: meet
//! confirmation, review filing, and the trust recomputes they trigger.

use chrono::TimeDelta;
use uuid::Uuid;

use trust_engine::domain::ErrorCode;
use trust_engine::domain::ports::{
    ApplyWarningRequest, CancelTripRequest, MeetStatusRequest, PressMeetRequest, PressOutcome,
    SubmitReviewRequest, TripStore,
};
use trust_engine::domain::rendezvous::MeetStatus;
use trust_engine::domain::review::Emotion;
use trust_engine::domain::scoring::AuraTone;
use trust_engine::domain::trip::TripStatus;

mod support;

use support::{Harness, harness, ready_trip, t0};

const USER_A: Uuid = Uuid::from_u128(0xA);
const USER_B: Uuid = Uuid::from_u128(0xB);
const TRIP_ID: Uuid = Uuid::from_u128(0x7);

fn press(user_id: Uuid) -> PressMeetRequest {
    PressMeetRequest {
        trip_id: TRIP_ID,
        caller_id: user_id,
    }
}

fn status_for(user_id: Uuid) -> MeetStatusRequest {
    MeetStatusRequest {
        trip_id: TRIP_ID,
        caller_id: user_id,
    }
}

async fn seeded_harness() -> Harness {
    let fixture = harness(t0());
    fixture
        .store
        .insert(&ready_trip(TRIP_ID, USER_A, USER_B))
        .await
        .expect("seed trip");
    fixture
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

#[tokio::test]
async fn first_press_starts_a_countdown_and_repeats_are_idempotent() {
    let fixture = seeded_harness().await;

    let first = fixture
        .state
        .rendezvous
        .press_meet(press(USER_A))
        .await
        .expect("first press");
    let PressOutcome::Countdown {
        started_by,
        expires_at,
    } = first
    else {
        panic!("expected a countdown, got {first:?}");
    };
    assert_eq!(started_by, USER_A);
    assert_eq!(expires_at, t0() + TimeDelta::minutes(10));

    fixture.clock.advance(TimeDelta::minutes(3));
    let second = fixture
        .state
        .rendezvous
        .press_meet(press(USER_A))
        .await
        .expect("repeat press");
    assert_eq!(second, first, "repeat press must not restart the countdown");
}

#[tokio::test]
async fn counter_press_inside_the_window_confirms_the_meeting() {
    let fixture = seeded_harness().await;

    fixture
        .state
        .rendezvous
        .press_meet(press(USER_A))
        .await
        .expect("opening press");
    fixture.clock.advance(TimeDelta::minutes(5));

    let outcome = fixture
        .state
        .rendezvous
        .press_meet(press(USER_B))
        .await
        .expect("counter press");
    assert_eq!(
        outcome,
        PressOutcome::Met {
            met_at: t0() + TimeDelta::minutes(5)
        }
    );

    let status = fixture
        .state
        .rendezvous_query
        .meet_status(status_for(USER_A))
        .await
        .expect("status");
    assert!(matches!(status, MeetStatus::Met { .. }));

    let stored = fixture
        .store
        .find_by_id(TRIP_ID)
        .await
        .expect("lookup")
        .expect("trip present");
    assert_eq!(stored.status(), TripStatus::Met);

    // The confirmation fans out to both participants' constellations.
    for user in [USER_A, USER_B] {
        let profile = fixture
            .state
            .trust_query
            .trust_profile(user)
            .await
            .expect("profile");
        assert!(
            profile.constellation_score > 0.0,
            "confirmed trip should register for {user}"
        );
    }
}

#[tokio::test]
async fn expired_countdown_reads_as_expired_and_a_late_press_restarts_it() {
    let fixture = seeded_harness().await;

    fixture
        .state
        .rendezvous
        .press_meet(press(USER_A))
        .await
        .expect("opening press");
    fixture.clock.advance(TimeDelta::minutes(11));

    let status = fixture
        .state
        .rendezvous_query
        .meet_status(status_for(USER_B))
        .await
        .expect("status");
    assert_eq!(status, MeetStatus::Expired);

    let outcome = fixture
        .state
        .rendezvous
        .press_meet(press(USER_B))
        .await
        .expect("late press");
    assert_eq!(
        outcome,
        PressOutcome::Countdown {
            started_by: USER_B,
            expires_at: t0() + TimeDelta::minutes(21),
        }
    );
}

#[tokio::test]
async fn cancel_clears_the_countdown_and_blocks_further_presses() {
    let fixture = seeded_harness().await;

    fixture
        .state
        .rendezvous
        .press_meet(press(USER_A))
        .await
        .expect("opening press");
    fixture
        .state
        .rendezvous
        .cancel_trip(CancelTripRequest {
            trip_id: TRIP_ID,
            caller_id: USER_B,
        })
        .await
        .expect("cancel");

    let error = fixture
        .state
        .rendezvous_query
        .meet_status(status_for(USER_A))
        .await
        .expect_err("status on a cancelled trip");
    assert_eq!(error.code(), ErrorCode::InvalidState);

    let stored = fixture
        .store
        .find_by_id(TRIP_ID)
        .await
        .expect("lookup")
        .expect("trip present");
    assert_eq!(stored.status(), TripStatus::Cancelled);
    assert!(stored.countdown().is_none());

    let error = fixture
        .state
        .rendezvous
        .press_meet(press(USER_A))
        .await
        .expect_err("press on a cancelled trip");
    assert_eq!(error.code(), ErrorCode::InvalidState);
}

#[tokio::test(flavor = "multi_thread")]
async fn simultaneous_presses_confirm_at_most_once() {
    for _ in 0..16 {
        let fixture = seeded_harness().await;
        let command_a = fixture.state.rendezvous.clone();
        let command_b = fixture.state.rendezvous.clone();

        let task_a = tokio::spawn(async move { command_a.press_meet(press(USER_A)).await });
        let task_b = tokio::spawn(async move { command_b.press_meet(press(USER_B)).await });
        let outcomes = [
            task_a.await.expect("task a"),
            task_b.await.expect("task b"),
        ];

        let met = outcomes
            .iter()
            .filter(|outcome| matches!(outcome, Ok(PressOutcome::Met { .. })))
            .count();
        assert!(met <= 1, "a meeting can only be confirmed once");

        for outcome in &outcomes {
            if let Err(error) = outcome {
                assert_eq!(
                    error.code(),
                    ErrorCode::Conflict,
                    "losing a race must surface as a retryable conflict"
                );
            }
        }

        let stored = fixture
            .store
            .find_by_id(TRIP_ID)
            .await
            .expect("lookup")
            .expect("trip present");
        if met == 1 {
            assert_eq!(stored.status(), TripStatus::Met);
        } else {
            assert!(stored.countdown().is_some() || stored.status() == TripStatus::Met);
        }
    }
}

#[tokio::test]
async fn review_is_embargoed_until_the_trip_has_finished() {
    let fixture = seeded_harness().await;

    fixture
        .state
        .rendezvous
        .press_meet(press(USER_A))
        .await
        .expect("opening press");
    fixture
        .state
        .rendezvous
        .press_meet(press(USER_B))
        .await
        .expect("confirming press");

    // Still mid-trip: the stay runs to 2026-04-12.
    let error = fixture
        .state
        .reviews
        .submit_review(SubmitReviewRequest {
            reviewer_id: USER_A,
            target_id: USER_B,
            trip_id: TRIP_ID,
            emotion: Emotion::Positive,
            tags: vec![],
            comment: None,
        })
        .await
        .expect_err("review during the trip");
    assert_eq!(error.code(), ErrorCode::InvalidState);
}

#[tokio::test]
async fn resubmitted_review_overwrites_rather_than_stacking() {
    let fixture = seeded_harness().await;

    fixture
        .state
        .rendezvous
        .press_meet(press(USER_A))
        .await
        .expect("opening press");
    fixture
        .state
        .rendezvous
        .press_meet(press(USER_B))
        .await
        .expect("confirming press");
    fixture.clock.advance(TimeDelta::days(3));

    fixture
        .state
        .reviews
        .submit_review(SubmitReviewRequest {
            reviewer_id: USER_A,
            target_id: USER_B,
            trip_id: TRIP_ID,
            emotion: Emotion::Positive,
            tags: vec!["punctual".into()],
            comment: None,
        })
        .await
        .expect("first submission");

    let warm = fixture
        .state
        .trust_query
        .trust_profile(USER_B)
        .await
        .expect("profile");
    assert_eq!(warm.aura_tone, AuraTone::Warm);
    assert_close(warm.aura_score, 72.0);

    fixture
        .state
        .reviews
        .submit_review(SubmitReviewRequest {
            reviewer_id: USER_A,
            target_id: USER_B,
            trip_id: TRIP_ID,
            emotion: Emotion::Negative,
            tags: vec![],
            comment: Some("changed my mind".into()),
        })
        .await
        .expect("resubmission");

    // One review total: a stacked pair would smooth to 60, an overwrite to 52.
    let revised = fixture
        .state
        .trust_query
        .trust_profile(USER_B)
        .await
        .expect("profile");
    assert_eq!(revised.aura_tone, AuraTone::Neutral);
    assert_close(revised.aura_score, 52.0);
}

#[tokio::test]
async fn warning_penalty_deducts_from_the_stored_profile_and_floors_at_zero() {
    let fixture = seeded_harness().await;

    fixture
        .state
        .rendezvous
        .press_meet(press(USER_A))
        .await
        .expect("opening press");
    fixture
        .state
        .rendezvous
        .press_meet(press(USER_B))
        .await
        .expect("confirming press");

    let before = fixture
        .state
        .trust_query
        .trust_profile(USER_B)
        .await
        .expect("profile");
    assert_close(before.aura_score, 65.0);

    let adjusted = fixture
        .state
        .trust
        .apply_warning(ApplyWarningRequest {
            user_id: USER_B,
            severity: 20,
        })
        .await
        .expect("warning");
    assert_close(adjusted.aura_score, 57.0);
    assert_close(
        adjusted.constellation_score,
        (before.constellation_score - 15.0).max(0.0),
    );

    // Pile on until both scores bottom out.
    for _ in 0..12 {
        fixture
            .state
            .trust
            .apply_warning(ApplyWarningRequest {
                user_id: USER_B,
                severity: 20,
            })
            .await
            .expect("warning");
    }
    let floored = fixture
        .state
        .trust_query
        .trust_profile(USER_B)
        .await
        .expect("profile");
    assert_close(floored.aura_score, 0.0);
    assert_close(floored.constellation_score, 0.0);
}
