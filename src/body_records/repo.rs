use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use time::Date;
use uuid::Uuid;

use super::repo_types::{BodyRecord, NewBodyRecord};
use crate::{clock::Clock, db::RepoError};

#[async_trait]
pub trait BodyRecordRepository: Send + Sync {
    /// Upserts on `(user_id, date)`: the first save inserts, later saves for
    /// the same day replace the measurements and bump `updated_at`.
    async fn save(&self, user_id: Uuid, record: &NewBodyRecord) -> Result<BodyRecord, RepoError>;

    async fn find_by_id(&self, id: Uuid, user_id: Uuid) -> Result<BodyRecord, RepoError>;

    async fn find_by_user(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<BodyRecord>, RepoError>;

    async fn count_by_user(&self, user_id: Uuid) -> Result<i64, RepoError>;

    /// Inclusive on both ends, oldest first.
    async fn find_by_user_and_date_range(
        &self,
        user_id: Uuid,
        start: Date,
        end: Date,
    ) -> Result<Vec<BodyRecord>, RepoError>;
}

#[derive(Clone)]
pub struct PgBodyRecordRepository {
    db: PgPool,
    clock: Arc<dyn Clock>,
}

impl PgBodyRecordRepository {
    pub fn new(db: PgPool, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }
}

#[async_trait]
impl BodyRecordRepository for PgBodyRecordRepository {
    async fn save(&self, user_id: Uuid, record: &NewBodyRecord) -> Result<BodyRecord, RepoError> {
        let now = self.clock.now();
        let row = sqlx::query_as::<_, BodyRecord>(
            r#"
            INSERT INTO body_records
                (id, user_id, date, weight_kg, body_fat_percentage, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            ON CONFLICT (user_id, date) DO UPDATE
               SET weight_kg = EXCLUDED.weight_kg,
                   body_fat_percentage = EXCLUDED.body_fat_percentage,
                   updated_at = EXCLUDED.updated_at
            RETURNING id, user_id, date, weight_kg, body_fat_percentage, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(record.date)
        .bind(record.weight_kg)
        .bind(record.body_fat_percentage)
        .bind(now)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn find_by_id(&self, id: Uuid, user_id: Uuid) -> Result<BodyRecord, RepoError> {
        let row = sqlx::query_as::<_, BodyRecord>(
            r#"
            SELECT id, user_id, date, weight_kg, body_fat_percentage, created_at, updated_at
              FROM body_records
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
    ) -> Result<Vec<BodyRecord>, RepoError> {
        let rows = sqlx::query_as::<_, BodyRecord>(
            r#"
            SELECT id, user_id, date, weight_kg, body_fat_percentage, created_at, updated_at
              FROM body_records
             WHERE user_id = $1
             ORDER BY date DESC, id
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
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM body_records WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.db)
            .await?;
        Ok(count)
    }

    async fn find_by_user_and_date_range(
        &self,
        user_id: Uuid,
        start: Date,
        end: Date,
    ) -> Result<Vec<BodyRecord>, RepoError> {
        let rows = sqlx::query_as::<_, BodyRecord>(
            r#"
            SELECT id, user_id, date, weight_kg, body_fat_percentage, created_at, updated_at
              FROM body_records
             WHERE user_id = $1 AND date BETWEEN $2 AND $3
             ORDER BY date ASC, id
            "#,
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }
}
