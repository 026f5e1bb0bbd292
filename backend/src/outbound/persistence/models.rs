//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions into domain types go through
//! the domain constructors so the stored data is revalidated on the way out.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::relationship::Relationship;
use crate::domain::review::{Review, ReviewDraft};
use crate::domain::scoring::TrustProfile;
use crate::domain::trip::{Countdown, Trip, TripDraft};

use super::schema::{relationships, reviews, trips, trust_profiles};

/// Error produced when a stored row no longer satisfies a domain invariant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("corrupt {table} row {id}: {message}")]
pub(crate) struct CorruptRow {
    pub table: &'static str,
    pub id: Uuid,
    pub message: String,
}

impl CorruptRow {
    fn new(table: &'static str, id: Uuid, message: impl Into<String>) -> Self {
        Self {
            table,
            id,
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Trip models
// ---------------------------------------------------------------------------

/// Row struct for reading from the trips table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = trips)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TripRow {
    pub id: Uuid,
    pub user_a: Uuid,
    pub user_b: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: String,
    pub countdown_started_by: Option<Uuid>,
    pub countdown_expires_at: Option<DateTime<Utc>>,
    pub met_at: Option<DateTime<Utc>>,
    pub meet_method: String,
    #[expect(dead_code, reason = "schema field kept for audit queries")]
    pub created_at: DateTime<Utc>,
    #[expect(dead_code, reason = "schema field kept for audit queries")]
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating new trip records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = trips)]
pub(crate) struct NewTripRow {
    pub id: Uuid,
    pub user_a: Uuid,
    pub user_b: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: String,
    pub countdown_started_by: Option<Uuid>,
    pub countdown_expires_at: Option<DateTime<Utc>>,
    pub met_at: Option<DateTime<Utc>>,
    pub meet_method: String,
}

impl From<&Trip> for NewTripRow {
    fn from(trip: &Trip) -> Self {
        Self {
            id: trip.id(),
            user_a: trip.user_a(),
            user_b: trip.user_b(),
            start_date: trip.start_date(),
            end_date: trip.end_date(),
            status: trip.status().to_string(),
            countdown_started_by: trip.countdown().map(|countdown| countdown.started_by),
            countdown_expires_at: trip.countdown().map(|countdown| countdown.expires_at),
            met_at: trip.met_at(),
            meet_method: trip.meet_method().to_string(),
        }
    }
}

impl TryFrom<TripRow> for Trip {
    type Error = CorruptRow;

    fn try_from(row: TripRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse()
            .map_err(|_| CorruptRow::new("trips", row.id, format!("status {:?}", row.status)))?;
        let meet_method = row.meet_method.parse().map_err(|_| {
            CorruptRow::new("trips", row.id, format!("meet_method {:?}", row.meet_method))
        })?;

        let countdown = match (row.countdown_started_by, row.countdown_expires_at) {
            (Some(started_by), Some(expires_at)) => Some(Countdown {
                started_by,
                expires_at,
            }),
            (None, None) => None,
            _ => {
                return Err(CorruptRow::new(
                    "trips",
                    row.id,
                    "countdown columns set independently",
                ));
            }
        };

        Trip::new(TripDraft {
            id: row.id,
            user_a: row.user_a,
            user_b: row.user_b,
            start_date: row.start_date,
            end_date: row.end_date,
            status,
            countdown,
            met_at: row.met_at,
            meet_method,
        })
        .map_err(|err| CorruptRow::new("trips", row.id, err.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Review models
// ---------------------------------------------------------------------------

/// Row struct for reading from the reviews table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = reviews)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ReviewRow {
    pub id: Uuid,
    pub reviewer_id: Uuid,
    pub target_id: Uuid,
    pub trip_id: Uuid,
    pub emotion: String,
    pub tags: Vec<String>,
    pub comment: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

/// Insertable struct for creating new review records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = reviews)]
pub(crate) struct NewReviewRow<'a> {
    pub id: Uuid,
    pub reviewer_id: Uuid,
    pub target_id: Uuid,
    pub trip_id: Uuid,
    pub emotion: String,
    pub tags: &'a [String],
    pub comment: Option<&'a str>,
    pub submitted_at: DateTime<Utc>,
}

impl TryFrom<ReviewRow> for Review {
    type Error = CorruptRow;

    fn try_from(row: ReviewRow) -> Result<Self, Self::Error> {
        let emotion = row
            .emotion
            .parse()
            .map_err(|_| CorruptRow::new("reviews", row.id, format!("emotion {:?}", row.emotion)))?;

        Review::new(ReviewDraft {
            reviewer_id: row.reviewer_id,
            target_id: row.target_id,
            trip_id: row.trip_id,
            emotion,
            tags: row.tags,
            comment: row.comment,
            submitted_at: row.submitted_at,
        })
        .map_err(|err| CorruptRow::new("reviews", row.id, err.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Relationship models
// ---------------------------------------------------------------------------

/// Row struct for reading from the relationships table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = relationships)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RelationshipRow {
    pub user_id: Uuid,
    pub partner_id: Uuid,
    pub trips_count: i32,
    pub last_trip_date: Option<NaiveDate>,
    pub pos_ratio: f64,
    pub relation_strength: f64,
    #[expect(dead_code, reason = "schema field kept for audit queries")]
    pub updated_at: DateTime<Utc>,
}

/// Insertable and changeset struct for relationship upserts.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = relationships)]
pub(crate) struct RelationshipUpsert {
    pub user_id: Uuid,
    pub partner_id: Uuid,
    pub trips_count: i32,
    pub last_trip_date: Option<NaiveDate>,
    pub pos_ratio: f64,
    pub relation_strength: f64,
}

impl From<&Relationship> for RelationshipUpsert {
    fn from(relationship: &Relationship) -> Self {
        Self {
            user_id: relationship.user_id,
            partner_id: relationship.partner_id,
            trips_count: i32::try_from(relationship.trips_count).unwrap_or(i32::MAX),
            last_trip_date: relationship.last_trip_date,
            pos_ratio: relationship.pos_ratio,
            relation_strength: relationship.relation_strength,
        }
    }
}

impl From<RelationshipRow> for Relationship {
    fn from(row: RelationshipRow) -> Self {
        Self {
            user_id: row.user_id,
            partner_id: row.partner_id,
            trips_count: u32::try_from(row.trips_count).unwrap_or(0),
            last_trip_date: row.last_trip_date,
            pos_ratio: row.pos_ratio,
            relation_strength: row.relation_strength,
        }
    }
}

// ---------------------------------------------------------------------------
// Trust profile models
// ---------------------------------------------------------------------------

/// Row struct for reading from the trust_profiles table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = trust_profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TrustProfileRow {
    pub user_id: Uuid,
    pub aura_tone: String,
    pub aura_intensity: f64,
    pub aura_score: f64,
    pub constellation_score: f64,
    #[expect(dead_code, reason = "schema field kept for audit queries")]
    pub updated_at: DateTime<Utc>,
}

/// Insertable and changeset struct for trust profile upserts.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = trust_profiles)]
pub(crate) struct TrustProfileUpsert {
    pub user_id: Uuid,
    pub aura_tone: String,
    pub aura_intensity: f64,
    pub aura_score: f64,
    pub constellation_score: f64,
}

impl From<&TrustProfile> for TrustProfileUpsert {
    fn from(profile: &TrustProfile) -> Self {
        Self {
            user_id: profile.user_id,
            aura_tone: profile.aura_tone.to_string(),
            aura_intensity: profile.aura_intensity,
            aura_score: profile.aura_score,
            constellation_score: profile.constellation_score,
        }
    }
}

impl TryFrom<TrustProfileRow> for TrustProfile {
    type Error = CorruptRow;

    fn try_from(row: TrustProfileRow) -> Result<Self, Self::Error> {
        let aura_tone = row.aura_tone.parse().map_err(|_| {
            CorruptRow::new(
                "trust_profiles",
                row.user_id,
                format!("aura_tone {:?}", row.aura_tone),
            )
        })?;

        Ok(Self {
            user_id: row.user_id,
            aura_tone,
            aura_intensity: row.aura_intensity,
            aura_score: row.aura_score,
            constellation_score: row.constellation_score,
        })
    }
}
