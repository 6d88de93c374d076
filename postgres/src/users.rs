//! `UserDirectory` implementation.
//!
//! The platform consumes the directory read-only; [`PostgresStore::put_user`]
//! exists so the sync job mirroring the auth service's records (and test
//! setups) can populate the table.

use crate::{db_err, PostgresStore};
use async_trait::async_trait;
use villagestay_core::error::StoreError;
use villagestay_core::store::UserDirectory;
use villagestay_core::types::{UserId, UserProfile};

impl PostgresStore {
    /// Insert or refresh a mirrored user profile.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the write fails.
    pub async fn put_user(&self, user: &UserProfile) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO users (id, username, email) VALUES ($1, $2, $3) \
             ON CONFLICT (id) DO UPDATE SET username = $2, email = $3",
        )
        .bind(user.id.as_uuid())
        .bind(&user.username)
        .bind(&user.email)
        .execute(self.pool.as_ref())
        .await
        .map_err(db_err)?;
        Ok(())
    }
}

#[async_trait]
impl UserDirectory for PostgresStore {
    #[tracing::instrument(skip(self), fields(user_id = %id))]
    async fn get(&self, id: UserId) -> Result<Option<UserProfile>, StoreError> {
        let row: Option<(uuid::Uuid, String, String)> =
            sqlx::query_as("SELECT id, username, email FROM users WHERE id = $1")
                .bind(id.as_uuid())
                .fetch_optional(self.pool.as_ref())
                .await
                .map_err(db_err)?;

        Ok(row.map(|(id, username, email)| UserProfile {
            id: UserId::from_uuid(id),
            username,
            email,
        }))
    }
}
