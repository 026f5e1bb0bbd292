//! PostgreSQL-backed `TripStore` implementation using Diesel ORM.
//!
//! The interesting part is `apply_transition`: each rendezvous transition is
//! a single conditional UPDATE whose WHERE clause re-checks the countdown
//! columns the caller read (`IS NOT DISTINCT FROM`, so null expectations
//! match null columns) and the trip status. Zero rows updated means a
//! concurrent writer got there first; the row is the linearisation point, no
//! row locks are held across awaits.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{TransitionOutcome, TripStore, TripStoreError, TripTransition};
use crate::domain::trip::{Countdown, MeetMethod, Trip, TripStatus};

use super::models::{NewTripRow, TripRow};
use super::pool::{DbPool, PoolError};
use super::schema::trips;

/// Diesel-backed implementation of the `TripStore` port.
#[derive(Clone)]
pub struct DieselTripStore {
    pool: DbPool,
}

impl DieselTripStore {
    /// Create a new store with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> TripStoreError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            TripStoreError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> TripStoreError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            TripStoreError::connection("database connection error")
        }
        _ => TripStoreError::query("database error"),
    }
}

#[async_trait]
impl TripStore for DieselTripStore {
    async fn insert(&self, trip: &Trip) -> Result<(), TripStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(trips::table)
            .values(NewTripRow::from(trip))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, trip_id: Uuid) -> Result<Option<Trip>, TripStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<TripRow> = trips::table
            .find(trip_id)
            .select(TripRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(|row| Trip::try_from(row).map_err(|err| TripStoreError::query(err.to_string())))
            .transpose()
    }

    async fn apply_transition(
        &self,
        trip_id: Uuid,
        expected: Option<Countdown>,
        transition: TripTransition,
    ) -> Result<TransitionOutcome, TripStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let expected_starter = expected.map(|countdown| countdown.started_by);
        let expected_expiry = expected.map(|countdown| countdown.expires_at);
        let guarded = trips::table.filter(
            trips::id
                .eq(trip_id)
                .and(trips::countdown_started_by.is_not_distinct_from(expected_starter))
                .and(trips::countdown_expires_at.is_not_distinct_from(expected_expiry)),
        );

        let updated = match transition {
            TripTransition::BeginCountdown(countdown) => {
                diesel::update(guarded.filter(trips::status.eq(TripStatus::Ready.to_string())))
                    .set((
                        trips::countdown_started_by.eq(Some(countdown.started_by)),
                        trips::countdown_expires_at.eq(Some(countdown.expires_at)),
                    ))
                    .execute(&mut conn)
                    .await
                    .map_err(map_diesel_error)?
            }
            TripTransition::ConfirmMeet { met_at } => {
                diesel::update(guarded.filter(trips::status.eq(TripStatus::Ready.to_string())))
                    .set((
                        trips::status.eq(TripStatus::Met.to_string()),
                        trips::met_at.eq(Some(met_at)),
                        trips::meet_method.eq(MeetMethod::Button.to_string()),
                        trips::countdown_started_by.eq(None::<Uuid>),
                        trips::countdown_expires_at
                            .eq(None::<chrono::DateTime<chrono::Utc>>),
                    ))
                    .execute(&mut conn)
                    .await
                    .map_err(map_diesel_error)?
            }
            // Cancel lands on any non-terminal trip regardless of the
            // countdown expectation.
            TripTransition::Cancel => diesel::update(
                trips::table.filter(trips::id.eq(trip_id).and(trips::status.eq_any([
                    TripStatus::Pending.to_string(),
                    TripStatus::Ready.to_string(),
                ]))),
            )
            .set((
                trips::status.eq(TripStatus::Cancelled.to_string()),
                trips::countdown_started_by.eq(None::<Uuid>),
                trips::countdown_expires_at.eq(None::<chrono::DateTime<chrono::Utc>>),
            ))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?,
        };

        Ok(if updated == 0 {
            TransitionOutcome::Lost
        } else {
            TransitionOutcome::Applied
        })
    }

    async fn list_between(
        &self,
        user_id: Uuid,
        partner_id: Uuid,
    ) -> Result<Vec<Trip>, TripStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<TripRow> = trips::table
            .filter(
                trips::user_a
                    .eq(user_id)
                    .and(trips::user_b.eq(partner_id))
                    .or(trips::user_a.eq(partner_id).and(trips::user_b.eq(user_id))),
            )
            .select(TripRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter()
            .map(|row| Trip::try_from(row).map_err(|err| TripStoreError::query(err.to_string())))
            .collect()
    }
}
