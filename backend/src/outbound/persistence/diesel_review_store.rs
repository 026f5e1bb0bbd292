//! PostgreSQL-backed `ReviewStore` implementation using Diesel ORM.
//!
//! Resubmissions land on the unique `(reviewer_id, target_id, trip_id)`
//! index and overwrite the previous review in place.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::AsyncConnection;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{ReviewStore, ReviewStoreError};
use crate::domain::review::{Emotion, Review};
use crate::domain::scoring::ReviewTally;

use super::models::{NewReviewRow, ReviewRow};
use super::pool::{DbPool, PoolError};
use super::schema::reviews;

/// Diesel-backed implementation of the `ReviewStore` port.
#[derive(Clone)]
pub struct DieselReviewStore {
    pool: DbPool,
}

impl DieselReviewStore {
    /// Create a new store with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ReviewStoreError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            ReviewStoreError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> ReviewStoreError {
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
            ReviewStoreError::connection("database connection error")
        }
        _ => ReviewStoreError::query("database error"),
    }
}

fn count_to_tally(count: i64) -> u64 {
    u64::try_from(count).unwrap_or(0)
}

#[async_trait]
impl ReviewStore for DieselReviewStore {
    async fn upsert(&self, review: &Review) -> Result<(), ReviewStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewReviewRow {
            id: Uuid::new_v4(),
            reviewer_id: review.reviewer_id(),
            target_id: review.target_id(),
            trip_id: review.trip_id(),
            emotion: review.emotion().to_string(),
            tags: review.tags(),
            comment: review.comment(),
            submitted_at: review.submitted_at(),
        };

        diesel::insert_into(reviews::table)
            .values(&new_row)
            .on_conflict((reviews::reviewer_id, reviews::target_id, reviews::trip_id))
            .do_update()
            .set((
                reviews::emotion.eq(excluded(reviews::emotion)),
                reviews::tags.eq(excluded(reviews::tags)),
                reviews::comment.eq(excluded(reviews::comment)),
                reviews::submitted_at.eq(excluded(reviews::submitted_at)),
            ))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn list_authored_about(
        &self,
        reviewer_id: Uuid,
        target_id: Uuid,
    ) -> Result<Vec<Review>, ReviewStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ReviewRow> = reviews::table
            .filter(
                reviews::reviewer_id
                    .eq(reviewer_id)
                    .and(reviews::target_id.eq(target_id)),
            )
            .select(ReviewRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter()
            .map(|row| {
                Review::try_from(row).map_err(|err| ReviewStoreError::query(err.to_string()))
            })
            .collect()
    }

    async fn tally_received(&self, target_id: Uuid) -> Result<ReviewTally, ReviewStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // Both counts in one transaction so the tally is internally
        // consistent under concurrent submissions.
        let (total, positive) = conn
            .transaction(|conn| {
                async move {
                    let total: i64 = reviews::table
                        .filter(reviews::target_id.eq(target_id))
                        .count()
                        .get_result(conn)
                        .await?;
                    let positive: i64 = reviews::table
                        .filter(
                            reviews::target_id
                                .eq(target_id)
                                .and(reviews::emotion.eq(Emotion::Positive.to_string())),
                        )
                        .count()
                        .get_result(conn)
                        .await?;
                    Ok::<_, diesel::result::Error>((total, positive))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        Ok(ReviewTally {
            total: count_to_tally(total),
            positive: count_to_tally(positive),
        })
    }
}
