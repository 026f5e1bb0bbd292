//! Shared fixtures for integration tests: a steppable clock and a fully
//! wired adapter state over the in-memory stores.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local, NaiveDate, TimeDelta, TimeZone, Utc};
use mockable::Clock;
use uuid::Uuid;

use trust_engine::domain::rendezvous::RendezvousPolicy;
use trust_engine::domain::scoring::ScoringPolicy;
use trust_engine::domain::trip::{MeetMethod, Trip, TripDraft, TripStatus};
use trust_engine::domain::{
    RelationshipAggregator, RendezvousService, ReviewService, TrustService,
};
use trust_engine::inbound::http::state::HttpState;
use trust_engine::outbound::persistence::MemoryStore;

/// Test clock that starts at a fixed instant and only moves when told to.
pub struct SteppingClock {
    now: Mutex<DateTime<Utc>>,
}

impl SteppingClock {
    pub fn at(now: DateTime<Utc>) -> Arc<Self> {
        Arc::new(Self {
            now: Mutex::new(now),
        })
    }

    pub fn advance(&self, delta: TimeDelta) {
        let mut guard = self.now.lock().expect("clock poisoned");
        *guard = *guard + delta;
    }

    pub fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock poisoned")
    }
}

impl Clock for SteppingClock {
    fn local(&self) -> DateTime<Local> {
        self.now().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.now()
    }
}

/// Everything a scenario needs: the wired adapter state plus handles on the
/// backing store and clock for seeding and time travel.
pub struct Harness {
    pub state: HttpState,
    pub store: Arc<MemoryStore>,
    pub clock: Arc<SteppingClock>,
}

/// Wire the real services over one in-memory store, exactly as the server
/// does when no database is configured.
pub fn harness(start: DateTime<Utc>) -> Harness {
    let store = Arc::new(MemoryStore::new());
    let clock = SteppingClock::at(start);

    let aggregator = Arc::new(RelationshipAggregator::new(
        Arc::clone(&store),
        Arc::clone(&store),
        Arc::clone(&store),
    ));
    let trust = Arc::new(TrustService::new(
        Arc::clone(&store),
        Arc::clone(&store),
        Arc::clone(&store),
        ScoringPolicy::default(),
    ));
    let rendezvous = Arc::new(RendezvousService::new(
        Arc::clone(&store),
        Arc::clone(&aggregator),
        Arc::clone(&trust),
        clock.clone(),
        RendezvousPolicy::default(),
    ));
    let reviews = Arc::new(ReviewService::new(
        Arc::clone(&store),
        Arc::clone(&store),
        aggregator,
        Arc::clone(&trust),
        clock.clone(),
    ));

    let state = HttpState {
        rendezvous: rendezvous.clone(),
        rendezvous_query: rendezvous,
        reviews,
        trust: trust.clone(),
        trust_query: trust,
    };

    Harness {
        state,
        store,
        clock,
    }
}

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 4, 10, 9, 0, 0)
        .single()
        .expect("valid instant")
}

/// A confirmable trip between the two users, running 2026-04-09 to
/// 2026-04-12.
pub fn ready_trip(trip_id: Uuid, user_a: Uuid, user_b: Uuid) -> Trip {
    Trip::new(TripDraft {
        id: trip_id,
        user_a,
        user_b,
        start_date: NaiveDate::from_ymd_opt(2026, 4, 9).expect("valid date"),
        end_date: NaiveDate::from_ymd_opt(2026, 4, 12).expect("valid date"),
        status: TripStatus::Ready,
        countdown: None,
        met_at: None,
        meet_method: MeetMethod::None,
    })
    .expect("valid trip")
}
