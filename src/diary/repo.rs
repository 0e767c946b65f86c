use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{DiaryEntry, NewDiaryEntry};
use crate::{clock::Clock, db::RepoError};

#[async_trait]
pub trait DiaryEntryRepository: Send + Sync {
    async fn create(&self, user_id: Uuid, entry: &NewDiaryEntry) -> Result<DiaryEntry, RepoError>;

    async fn find_by_id(&self, id: Uuid, user_id: Uuid) -> Result<DiaryEntry, RepoError>;

    async fn find_by_user(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<DiaryEntry>, RepoError>;

    async fn count_by_user(&self, user_id: Uuid) -> Result<i64, RepoError>;

    /// Replaces the writable fields and bumps `updated_at`; `created_at` is
    /// left alone.
    async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        entry: &NewDiaryEntry,
    ) -> Result<DiaryEntry, RepoError>;

    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<(), RepoError>;
}

#[derive(Clone)]
pub struct PgDiaryEntryRepository {
    db: PgPool,
    clock: Arc<dyn Clock>,
}

impl PgDiaryEntryRepository {
    pub fn new(db: PgPool, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }
}

#[async_trait]
impl DiaryEntryRepository for PgDiaryEntryRepository {
    async fn create(&self, user_id: Uuid, entry: &NewDiaryEntry) -> Result<DiaryEntry, RepoError> {
        let now = self.clock.now();
        let row = sqlx::query_as::<_, DiaryEntry>(
            r#"
            INSERT INTO diary_entries
                (id, user_id, title, content, entry_date, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING id, user_id, title, content, entry_date, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(&entry.title)
        .bind(&entry.content)
        .bind(entry.entry_date)
        .bind(now)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn find_by_id(&self, id: Uuid, user_id: Uuid) -> Result<DiaryEntry, RepoError> {
        let row = sqlx::query_as::<_, DiaryEntry>(
            r#"
            SELECT id, user_id, title, content, entry_date, created_at, updated_at
              FROM diary_entries
             WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn find_by_user(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<DiaryEntry>, RepoError> {
        let rows = sqlx::query_as::<_, DiaryEntry>(
            r#"
            SELECT id, user_id, title, content, entry_date, created_at, updated_at
              FROM diary_entries
             WHERE user_id = $1
             ORDER BY entry_date DESC, created_at DESC, id
             LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn count_by_user(&self, user_id: Uuid) -> Result<i64, RepoError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM diary_entries WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&self.db)
                .await?;
        Ok(count)
    }

    async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        entry: &NewDiaryEntry,
    ) -> Result<DiaryEntry, RepoError> {
        let now = self.clock.now();
        let row = sqlx::query_as::<_, DiaryEntry>(
            r#"
            UPDATE diary_entries
               SET title = $3, content = $4, entry_date = $5, updated_at = $6
             WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, title, content, entry_date, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(&entry.title)
        .bind(&entry.content)
        .bind(entry.entry_date)
        .bind(now)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM diary_entries WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.db)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}
