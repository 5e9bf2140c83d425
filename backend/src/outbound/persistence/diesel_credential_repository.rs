//! Diesel-backed `CredentialRepository` adapter.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CredentialPersistenceError, CredentialRepository};
use crate::domain::{StoredPasswordHash, UserId};

use super::models::CredentialRow;
use super::pool::DbPool;
use super::schema::credentials;

/// PostgreSQL credential repository over the shared pool.
#[derive(Clone)]
pub struct DieselCredentialRepository {
    pool: DbPool,
}

impl DieselCredentialRepository {
    /// Create a repository over the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialRepository for DieselCredentialRepository {
    async fn upsert(
        &self,
        user_id: &UserId,
        hash: &StoredPasswordHash,
    ) -> Result<(), CredentialPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| CredentialPersistenceError::connection(err.to_string()))?;

        let now = Utc::now();
        diesel::insert_into(credentials::table)
            .values((
                credentials::user_id.eq(user_id.as_uuid()),
                credentials::password_hash.eq(hash.as_phc()),
                credentials::created_at.eq(now),
                credentials::updated_at.eq(now),
            ))
            .on_conflict(credentials::user_id)
            .do_update()
            .set((
                credentials::password_hash.eq(hash.as_phc()),
                credentials::updated_at.eq(now),
            ))
            .execute(&mut conn)
            .await
            .map_err(|err| CredentialPersistenceError::query(err.to_string()))?;
        Ok(())
    }

    async fn find_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<StoredPasswordHash>, CredentialPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| CredentialPersistenceError::connection(err.to_string()))?;

        let row: Option<CredentialRow> = credentials::table
            .find(user_id.as_uuid())
            .select(CredentialRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| CredentialPersistenceError::query(err.to_string()))?;

        Ok(row.map(CredentialRow::into_domain))
    }
}
