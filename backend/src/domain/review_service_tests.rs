//! Tests for the review submission service.

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use mockable::Clock;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::{
    MockProfileRefresh, MockRelationshipRefresh, MockReviewStore, MockTripStore,
};
use crate::domain::review::Emotion;
use crate::domain::scoring::{AuraTone, TrustProfile};
use crate::domain::trip::{MeetMethod, TripDraft};

const REVIEWER: Uuid = Uuid::from_u128(0xA);
const TARGET: Uuid = Uuid::from_u128(0xB);
const TRIP_ID: Uuid = Uuid::from_u128(0x7);

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

fn met_trip() -> Trip {
    Trip::new(TripDraft {
        id: TRIP_ID,
        user_a: REVIEWER,
        user_b: TARGET,
        start_date: NaiveDate::from_ymd_opt(2026, 4, 9).expect("valid date"),
        end_date: NaiveDate::from_ymd_opt(2026, 4, 12).expect("valid date"),
        status: TripStatus::Met,
        countdown: None,
        met_at: Utc.with_ymd_and_hms(2026, 4, 10, 18, 0, 0).single(),
        meet_method: MeetMethod::Button,
    })
    .expect("valid trip")
}

fn request() -> SubmitReviewRequest {
    SubmitReviewRequest {
        reviewer_id: REVIEWER,
        target_id: TARGET,
        trip_id: TRIP_ID,
        emotion: Emotion::Positive,
        tags: vec!["punctual".to_owned()],
        comment: None,
    }
}

fn service_at(
    now: DateTime<Utc>,
    trip_store: MockTripStore,
    review_store: MockReviewStore,
    relationships: MockRelationshipRefresh,
    profiles: MockProfileRefresh,
) -> ReviewService<MockTripStore, MockReviewStore, MockRelationshipRefresh, MockProfileRefresh> {
    ReviewService::new(
        Arc::new(trip_store),
        Arc::new(review_store),
        Arc::new(relationships),
        Arc::new(profiles),
        Arc::new(FixtureClock { utc_now: now }),
    )
}

fn after_trip() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 4, 13, 12, 0, 0).single().expect("valid")
}

fn neutral_profile(user_id: Uuid) -> TrustProfile {
    TrustProfile {
        user_id,
        aura_tone: AuraTone::Neutral,
        aura_intensity: 0.48,
        aura_score: 65.0,
        constellation_score: 0.0,
    }
}

#[tokio::test]
async fn stores_the_review_and_refreshes_the_target() {
    let trip = met_trip();

    let mut trip_store = MockTripStore::new();
    trip_store
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(trip)));

    let mut review_store = MockReviewStore::new();
    review_store
        .expect_upsert()
        .withf(|review| {
            review.reviewer_id() == REVIEWER
                && review.target_id() == TARGET
                && review.emotion() == Emotion::Positive
        })
        .times(1)
        .return_once(|_| Ok(()));

    let mut relationships = MockRelationshipRefresh::new();
    relationships
        .expect_refresh_pair()
        .withf(|user_id, partner_id| *user_id == TARGET && *partner_id == REVIEWER)
        .times(1)
        .return_once(|_, _| Ok(()));

    let mut profiles = MockProfileRefresh::new();
    profiles
        .expect_refresh_profile()
        .withf(|user_id| *user_id == TARGET)
        .times(1)
        .return_once(|user_id| Ok(neutral_profile(user_id)));

    service_at(after_trip(), trip_store, review_store, relationships, profiles)
        .submit_review(request())
        .await
        .expect("review accepted");
}

#[tokio::test]
async fn unknown_trips_read_as_not_found() {
    let mut trip_store = MockTripStore::new();
    trip_store.expect_find_by_id().times(1).return_once(|_| Ok(None));

    let error = service_at(
        after_trip(),
        trip_store,
        MockReviewStore::new(),
        MockRelationshipRefresh::new(),
        MockProfileRefresh::new(),
    )
    .submit_review(request())
    .await
    .expect_err("submission fails");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn strangers_cannot_review() {
    let trip = met_trip();

    let mut trip_store = MockTripStore::new();
    trip_store
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(trip)));

    let mut input = request();
    input.reviewer_id = Uuid::from_u128(0x99);

    let error = service_at(
        after_trip(),
        trip_store,
        MockReviewStore::new(),
        MockRelationshipRefresh::new(),
        MockProfileRefresh::new(),
    )
    .submit_review(input)
    .await
    .expect_err("submission fails");

    assert_eq!(error.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn the_target_must_be_the_other_participant() {
    let trip = met_trip();

    let mut trip_store = MockTripStore::new();
    trip_store
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(trip)));

    let mut input = request();
    input.target_id = Uuid::from_u128(0x99);

    let error = service_at(
        after_trip(),
        trip_store,
        MockReviewStore::new(),
        MockRelationshipRefresh::new(),
        MockProfileRefresh::new(),
    )
    .submit_review(input)
    .await
    .expect_err("submission fails");

    assert_eq!(error.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn unmet_trips_cannot_be_reviewed() {
    let trip = Trip::new(TripDraft {
        id: TRIP_ID,
        user_a: REVIEWER,
        user_b: TARGET,
        start_date: NaiveDate::from_ymd_opt(2026, 4, 9).expect("valid date"),
        end_date: NaiveDate::from_ymd_opt(2026, 4, 12).expect("valid date"),
        status: TripStatus::Ready,
        countdown: None,
        met_at: None,
        meet_method: MeetMethod::None,
    })
    .expect("valid trip");

    let mut trip_store = MockTripStore::new();
    trip_store
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(trip)));

    let error = service_at(
        after_trip(),
        trip_store,
        MockReviewStore::new(),
        MockRelationshipRefresh::new(),
        MockProfileRefresh::new(),
    )
    .submit_review(request())
    .await
    .expect_err("submission fails");

    assert_eq!(error.code(), ErrorCode::InvalidState);
}

#[tokio::test]
async fn trips_cannot_be_reviewed_before_they_finish() {
    let trip = met_trip();

    let mut trip_store = MockTripStore::new();
    trip_store
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(trip)));

    // Still the trip's last day: reviews open the day after.
    let error = service_at(
        Utc.with_ymd_and_hms(2026, 4, 12, 23, 0, 0).single().expect("valid"),
        trip_store,
        MockReviewStore::new(),
        MockRelationshipRefresh::new(),
        MockProfileRefresh::new(),
    )
    .submit_review(request())
    .await
    .expect_err("submission fails");

    assert_eq!(error.code(), ErrorCode::InvalidState);
}

#[tokio::test]
async fn a_late_meeting_extends_the_review_embargo() {
    // Met two days after the scheduled end; the meeting date wins.
    let trip = Trip::new(TripDraft {
        id: TRIP_ID,
        user_a: REVIEWER,
        user_b: TARGET,
        start_date: NaiveDate::from_ymd_opt(2026, 4, 9).expect("valid date"),
        end_date: NaiveDate::from_ymd_opt(2026, 4, 12).expect("valid date"),
        status: TripStatus::Met,
        countdown: None,
        met_at: Utc.with_ymd_and_hms(2026, 4, 14, 18, 0, 0).single(),
        meet_method: MeetMethod::Button,
    })
    .expect("valid trip");

    let mut trip_store = MockTripStore::new();
    trip_store
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(trip)));

    let error = service_at(
        Utc.with_ymd_and_hms(2026, 4, 14, 23, 0, 0).single().expect("valid"),
        trip_store,
        MockReviewStore::new(),
        MockRelationshipRefresh::new(),
        MockProfileRefresh::new(),
    )
    .submit_review(request())
    .await
    .expect_err("submission fails");

    assert_eq!(error.code(), ErrorCode::InvalidState);
}

#[tokio::test]
async fn malformed_payloads_are_rejected_before_the_store() {
    let trip = met_trip();

    let mut trip_store = MockTripStore::new();
    trip_store
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(trip)));

    let mut review_store = MockReviewStore::new();
    review_store.expect_upsert().times(0);

    let mut input = request();
    input.tags = vec!["a".into(), "b".into(), "c".into(), "d".into()];

    let error = service_at(
        after_trip(),
        trip_store,
        review_store,
        MockRelationshipRefresh::new(),
        MockProfileRefresh::new(),
    )
    .submit_review(input)
    .await
    .expect_err("submission fails");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn store_outages_surface_as_service_unavailable() {
    let trip = met_trip();

    let mut trip_store = MockTripStore::new();
    trip_store
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(trip)));

    let mut review_store = MockReviewStore::new();
    review_store
        .expect_upsert()
        .times(1)
        .return_once(|_| Err(ReviewStoreError::connection("pool exhausted")));

    let error = service_at(
        after_trip(),
        trip_store,
        review_store,
        MockRelationshipRefresh::new(),
        MockProfileRefresh::new(),
    )
    .submit_review(request())
    .await
    .expect_err("submission fails");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}
