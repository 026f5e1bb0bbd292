//! Pairwise relationship records: a directed cache of one user's history
//! with one specific partner.
//!
//! Records are always recomputed in full from the trip and review history,
//! never patched incrementally, so edited reviews and backfilled trips
//! self-heal on the next trigger.

use chrono::NaiveDate;
use uuid::Uuid;

use super::review::{Emotion, Review};
use super::trip::Trip;

/// Joint-trip count after which relation strength is visibly saturating.
const TRIPS_SATURATION_SCALE: f64 = 3.0;

/// A directed summary of `user_id`'s history with `partner_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct Relationship {
    pub user_id: Uuid,
    pub partner_id: Uuid,
    /// Number of jointly confirmed trips.
    pub trips_count: u32,
    /// Latest planned end date across those trips.
    pub last_trip_date: Option<NaiveDate>,
    /// Fraction of the partner's reviews about this user that are positive.
    pub pos_ratio: f64,
    /// Derived scalar in `[0, 1]`; see [`relation_strength`].
    pub relation_strength: f64,
}

/// Saturating strength of a pairing: grows with joint trips (diminishing
/// returns past roughly three) and is scaled down, never to zero, by review
/// positivity. A single joint trip with no negative signal still counts.
pub fn relation_strength(trips_count: u32, pos_ratio: f64) -> f64 {
    let trips = f64::from(trips_count);
    (1.0 - (-trips / TRIPS_SATURATION_SCALE).exp()) * (0.5 + 0.5 * pos_ratio)
}

/// Recompute the directed relationship record for `(user_id, partner_id)`
/// from scratch.
///
/// `trips` may contain any of the pair's trips; only confirmed ones (those
/// with a met timestamp) involving exactly this pair are counted. `reviews`
/// contributes only entries written by `partner_id` about `user_id`.
pub fn summarise(
    user_id: Uuid,
    partner_id: Uuid,
    trips: &[Trip],
    reviews: &[Review],
) -> Relationship {
    let met: Vec<&Trip> = trips
        .iter()
        .filter(|trip| {
            trip.met_at().is_some()
                && trip.is_participant(user_id)
                && trip.counterpart(user_id) == Some(partner_id)
        })
        .collect();

    let trips_count = u32::try_from(met.len()).unwrap_or(u32::MAX);
    let last_trip_date = met.iter().map(|trip| trip.end_date()).max();

    let from_partner: Vec<&Review> = reviews
        .iter()
        .filter(|review| review.reviewer_id() == partner_id && review.target_id() == user_id)
        .collect();
    let pos_ratio = if from_partner.is_empty() {
        0.0
    } else {
        let positive = from_partner
            .iter()
            .filter(|review| review.emotion() == Emotion::Positive)
            .count();
        positive as f64 / from_partner.len() as f64
    };

    Relationship {
        user_id,
        partner_id,
        trips_count,
        last_trip_date,
        pos_ratio,
        relation_strength: relation_strength(trips_count, pos_ratio),
    }
}
