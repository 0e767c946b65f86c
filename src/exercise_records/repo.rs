use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{ExerciseRecord, NewExerciseRecord};
use crate::{clock::Clock, db::RepoError};

#[async_trait]
pub trait ExerciseRecordRepository: Send + Sync {
    async fn create(
        &self,
        user_id: Uuid,
        record: &NewExerciseRecord,
    ) -> Result<ExerciseRecord, RepoError>;

    async fn find_by_id(&self, id: Uuid, user_id: Uuid) -> Result<ExerciseRecord, RepoError>;

    async fn find_by_user(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ExerciseRecord>, RepoError>;

    async fn count_by_user(&self, user_id: Uuid) -> Result<i64, RepoError>;

    /// `RepoError::NotFound` when nothing owned by `user_id` matched.
    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<(), RepoError>;
}

#[derive(Clone)]
pub struct PgExerciseRecordRepository {
    db: PgPool,
    clock: Arc<dyn Clock>,
}

impl PgExerciseRecordRepository {
    pub fn new(db: PgPool, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }
}

#[async_trait]
impl ExerciseRecordRepository for PgExerciseRecordRepository {
    async fn create(
        &self,
        user_id: Uuid,
        record: &NewExerciseRecord,
    ) -> Result<ExerciseRecord, RepoError> {
        let now = self.clock.now();
        let row = sqlx::query_as::<_, ExerciseRecord>(
            r#"
            INSERT INTO exercise_records
                (id, user_id, exercise_name, duration_minutes, calories_burned,
                 recorded_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            RETURNING id, user_id, exercise_name, duration_minutes, calories_burned,
                      recorded_at, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(&record.exercise_name)
        .bind(record.duration_minutes)
        .bind(record.calories_burned)
        .bind(record.recorded_at)
        .bind(now)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn find_by_id(&self, id: Uuid, user_id: Uuid) -> Result<ExerciseRecord, RepoError> {
        let row = sqlx::query_as::<_, ExerciseRecord>(
            r#"
            SELECT id, user_id, exercise_name, duration_minutes, calories_burned,
                   recorded_at, created_at, updated_at
              FROM exercise_records
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
    ) -> Result<Vec<ExerciseRecord>, RepoError> {
        let rows = sqlx::query_as::<_, ExerciseRecord>(
            r#"
            SELECT id, user_id, exercise_name, duration_minutes, calories_burned,
                   recorded_at, created_at, updated_at
              FROM exercise_records
             WHERE user_id = $1
             ORDER BY recorded_at DESC, id
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
            sqlx::query_scalar("SELECT COUNT(*) FROM exercise_records WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&self.db)
                .await?;
        Ok(count)
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM exercise_records WHERE id = $1 AND user_id = $2")
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
