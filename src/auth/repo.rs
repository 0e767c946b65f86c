use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{auth::repo_types::User, db::RepoError};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_subject(&self, subject_id: &str) -> Result<Option<User>, RepoError>;

    /// Inserts a new user. A duplicate subject is `RepoError::Conflict`.
    async fn create(&self, subject_id: &str) -> Result<User, RepoError>;
}

#[derive(Debug, Clone)]
pub struct PgUserRepository {
    db: PgPool,
}

impl PgUserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_subject(&self, subject_id: &str) -> Result<Option<User>, RepoError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, subject_id
            FROM users
            WHERE subject_id = $1
            "#,
        )
        .bind(subject_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn create(&self, subject_id: &str) -> Result<User, RepoError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, subject_id)
            VALUES ($1, $2)
            RETURNING id, subject_id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(subject_id)
        .fetch_one(&self.db)
        .await?;
        Ok(user)
    }
}
