//! PostgreSQL-backed `TrustProfileStore` implementation using Diesel ORM.
//!
//! The warning penalty is a read-modify-write under `FOR UPDATE` so two
//! warnings applied concurrently both deduct, instead of one clobbering the
//! other.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::AsyncConnection;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{TrustProfileStore, TrustProfileStoreError};
use crate::domain::scoring::{TrustProfile, WarningPenalty};

use super::models::{TrustProfileRow, TrustProfileUpsert};
use super::pool::{DbPool, PoolError};
use super::schema::trust_profiles;

/// Diesel-backed implementation of the `TrustProfileStore` port.
#[derive(Clone)]
pub struct DieselTrustProfileStore {
    pool: DbPool,
}

impl DieselTrustProfileStore {
    /// Create a new store with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> TrustProfileStoreError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            TrustProfileStoreError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> TrustProfileStoreError {
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
            TrustProfileStoreError::connection("database connection error")
        }
        _ => TrustProfileStoreError::query("database error"),
    }
}

fn row_to_profile(row: TrustProfileRow) -> Result<TrustProfile, TrustProfileStoreError> {
    TrustProfile::try_from(row).map_err(|err| TrustProfileStoreError::query(err.to_string()))
}

#[async_trait]
impl TrustProfileStore for DieselTrustProfileStore {
    async fn find(&self, user_id: Uuid) -> Result<Option<TrustProfile>, TrustProfileStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<TrustProfileRow> = trust_profiles::table
            .find(user_id)
            .select(TrustProfileRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_profile).transpose()
    }

    async fn put(&self, profile: &TrustProfile) -> Result<(), TrustProfileStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = TrustProfileUpsert::from(profile);

        diesel::insert_into(trust_profiles::table)
            .values(&row)
            .on_conflict(trust_profiles::user_id)
            .do_update()
            .set(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn apply_penalty(
        &self,
        user_id: Uuid,
        penalty: WarningPenalty,
    ) -> Result<Option<TrustProfile>, TrustProfileStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = conn
            .transaction(|conn| {
                async move {
                    let current: Option<TrustProfileRow> = trust_profiles::table
                        .find(user_id)
                        .for_update()
                        .select(TrustProfileRow::as_select())
                        .first(conn)
                        .await
                        .optional()?;

                    let Some(current) = current else {
                        return Ok(None);
                    };

                    let aura_score = (current.aura_score - penalty.aura).max(0.0);
                    let constellation_score =
                        (current.constellation_score - penalty.constellation).max(0.0);

                    diesel::update(trust_profiles::table.find(user_id))
                        .set((
                            trust_profiles::aura_score.eq(aura_score),
                            trust_profiles::constellation_score.eq(constellation_score),
                        ))
                        .execute(conn)
                        .await?;

                    trust_profiles::table
                        .find(user_id)
                        .select(TrustProfileRow::as_select())
                        .first(conn)
                        .await
                        .map(Some)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        row.map(row_to_profile).transpose()
    }
}
