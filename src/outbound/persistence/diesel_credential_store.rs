//! PostgreSQL-backed [`CredentialStore`] using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CredentialStore, StoreError};
use crate::domain::{EmailAddress, User, UserId};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::UserRow;
use super::pool::DbPool;
use super::schema::users;

/// Diesel-backed implementation of the [`CredentialStore`] port.
///
/// Email uniqueness is enforced by the database; a unique violation on
/// insert surfaces as [`StoreError::Duplicate`].
#[derive(Clone)]
pub struct DieselCredentialStore {
    pool: DbPool,
}

impl DieselCredentialStore {
    /// Create a new store backed by the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_user(row: UserRow) -> Result<User, StoreError> {
    let email = EmailAddress::new(&row.email)
        .map_err(|_| StoreError::query("stored email failed validation"))?;
    Ok(User {
        id: UserId::from_uuid(row.id),
        email,
        password_hash: row.password_hash,
        created_at: row.created_at,
    })
}

#[async_trait]
impl CredentialStore for DieselCredentialStore {
    async fn insert(&self, user: &User) -> Result<(), StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(users::table)
            .values(UserRow::from(user))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .filter(users::email.eq(email.as_str()))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_user).transpose()
    }
}
