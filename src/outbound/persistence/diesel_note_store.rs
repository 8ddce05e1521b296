//! PostgreSQL-backed [`NoteStore`] using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{NoteStore, StoreError};
use crate::domain::{Note, NoteId, NotePatch, UserId};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NoteChangeset, NoteRow};
use super::pool::DbPool;
use super::schema::notes;

/// Diesel-backed implementation of the [`NoteStore`] port.
///
/// Single-record statements filter by record id AND owner in one predicate,
/// so a note belonging to another user is never touched.
#[derive(Clone)]
pub struct DieselNoteStore {
    pool: DbPool,
}

impl DieselNoteStore {
    /// Create a new store backed by the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NoteStore for DieselNoteStore {
    async fn list(&self, owner: &UserId) -> Result<Vec<Note>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = notes::table
            .filter(notes::user_id.eq(*owner.as_uuid()))
            .order(notes::created_at.desc())
            .select(NoteRow::as_select())
            .load::<NoteRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Note::from).collect())
    }

    async fn insert(&self, note: &Note) -> Result<(), StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(notes::table)
            .values(NoteRow::from(note))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn update(
        &self,
        owner: &UserId,
        id: &NoteId,
        patch: &NotePatch,
    ) -> Result<Option<Note>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let scope = notes::id
            .eq(*id.as_uuid())
            .and(notes::user_id.eq(*owner.as_uuid()));

        // Diesel rejects an all-default changeset, so an empty patch becomes
        // a plain ownership-scoped read.
        if patch.is_empty() {
            let row = notes::table
                .filter(scope)
                .select(NoteRow::as_select())
                .first::<NoteRow>(&mut conn)
                .await
                .optional()
                .map_err(map_diesel_error)?;
            return Ok(row.map(Note::from));
        }

        let changeset = NoteChangeset {
            title: patch.title.as_deref(),
            content: patch.content.as_deref(),
        };
        let row = diesel::update(notes::table.filter(scope))
            .set(&changeset)
            .returning(NoteRow::as_returning())
            .get_result::<NoteRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Note::from))
    }

    async fn delete(&self, owner: &UserId, id: &NoteId) -> Result<bool, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(
            notes::table.filter(
                notes::id
                    .eq(*id.as_uuid())
                    .and(notes::user_id.eq(*owner.as_uuid())),
            ),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
