//! PostgreSQL-backed [`TodoStore`] using Diesel.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{StoreError, TodoStore};
use crate::domain::{Todo, TodoId, TodoPatch, UserId};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{TodoChangeset, TodoRow};
use super::pool::DbPool;
use super::schema::todos;

/// Diesel-backed implementation of the [`TodoStore`] port.
///
/// Single-record statements filter by record id AND owner in one predicate.
/// Updates bump `updated_at`; empty patches read instead.
#[derive(Clone)]
pub struct DieselTodoStore {
    pool: DbPool,
}

impl DieselTodoStore {
    /// Create a new store backed by the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TodoStore for DieselTodoStore {
    async fn list(&self, owner: &UserId) -> Result<Vec<Todo>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = todos::table
            .filter(todos::user_id.eq(*owner.as_uuid()))
            .order(todos::created_at.desc())
            .select(TodoRow::as_select())
            .load::<TodoRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Todo::from).collect())
    }

    async fn insert(&self, todo: &Todo) -> Result<(), StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(todos::table)
            .values(TodoRow::from(todo))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn update(
        &self,
        owner: &UserId,
        id: &TodoId,
        patch: &TodoPatch,
    ) -> Result<Option<Todo>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let scope = todos::id
            .eq(*id.as_uuid())
            .and(todos::user_id.eq(*owner.as_uuid()));

        // An empty patch must not bump `updated_at`, so it becomes a plain
        // ownership-scoped read.
        if patch.is_empty() {
            let row = todos::table
                .filter(scope)
                .select(TodoRow::as_select())
                .first::<TodoRow>(&mut conn)
                .await
                .optional()
                .map_err(map_diesel_error)?;
            return Ok(row.map(Todo::from));
        }

        let changeset = TodoChangeset {
            text: patch.text.as_deref(),
            completed: patch.completed,
            updated_at: Utc::now(),
        };
        let row = diesel::update(todos::table.filter(scope))
            .set(&changeset)
            .returning(TodoRow::as_returning())
            .get_result::<TodoRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Todo::from))
    }

    async fn delete(&self, owner: &UserId, id: &TodoId) -> Result<bool, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(
            todos::table.filter(
                todos::id
                    .eq(*id.as_uuid())
                    .and(todos::user_id.eq(*owner.as_uuid())),
            ),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
