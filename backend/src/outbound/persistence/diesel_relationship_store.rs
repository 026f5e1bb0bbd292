//! PostgreSQL-backed `RelationshipStore` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{RelationshipStore, RelationshipStoreError};
use crate::domain::relationship::Relationship;

use super::models::{RelationshipRow, RelationshipUpsert};
use super::pool::{DbPool, PoolError};
use super::schema::relationships;

/// Diesel-backed implementation of the `RelationshipStore` port.
#[derive(Clone)]
pub struct DieselRelationshipStore {
    pool: DbPool,
}

impl DieselRelationshipStore {
    /// Create a new store with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> RelationshipStoreError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            RelationshipStoreError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> RelationshipStoreError {
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
            RelationshipStoreError::connection("database connection error")
        }
        _ => RelationshipStoreError::query("database error"),
    }
}

#[async_trait]
impl RelationshipStore for DieselRelationshipStore {
    async fn upsert(&self, relationship: &Relationship) -> Result<(), RelationshipStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = RelationshipUpsert::from(relationship);

        diesel::insert_into(relationships::table)
            .values(&row)
            .on_conflict((relationships::user_id, relationships::partner_id))
            .do_update()
            .set(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<Relationship>, RelationshipStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<RelationshipRow> = relationships::table
            .filter(relationships::user_id.eq(user_id))
            .select(RelationshipRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(Relationship::from).collect())
    }
}
