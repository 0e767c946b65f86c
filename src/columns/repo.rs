use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{Column, NewColumn};
use crate::{clock::Clock, db::RepoError};

/// Read side only sees published columns; "now" comes from the clock.
#[async_trait]
pub trait ColumnRepository: Send + Sync {
    async fn create(&self, column: &NewColumn) -> Result<Column, RepoError>;

    /// Any column with this title, published or not.
    async fn exists_with_title(&self, title: &str) -> Result<bool, RepoError>;

    async fn find_published(&self, limit: i64, offset: i64) -> Result<Vec<Column>, RepoError>;

    async fn count_published(&self) -> Result<i64, RepoError>;

    /// Unpublished or scheduled columns are `RepoError::NotFound`.
    async fn find_published_by_id(&self, id: Uuid) -> Result<Column, RepoError>;

    async fn find_published_by_category(
        &self,
        category: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Column>, RepoError>;

    async fn count_published_by_category(&self, category: &str) -> Result<i64, RepoError>;

    async fn find_published_by_tag(
        &self,
        tag: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Column>, RepoError>;

    async fn count_published_by_tag(&self, tag: &str) -> Result<i64, RepoError>;
}

#[derive(Clone)]
pub struct PgColumnRepository {
    db: PgPool,
    clock: Arc<dyn Clock>,
}

impl PgColumnRepository {
    pub fn new(db: PgPool, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }
}

const COLUMNS: &str =
    "id, title, content, category, tags, published_at, created_at, updated_at";

#[async_trait]
impl ColumnRepository for PgColumnRepository {
    async fn create(&self, column: &NewColumn) -> Result<Column, RepoError> {
        let now = self.clock.now();
        let sql = format!(
            r#"
            INSERT INTO columns
                (id, title, content, category, tags, published_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            RETURNING {COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, Column>(&sql)
            .bind(Uuid::new_v4())
            .bind(&column.title)
            .bind(&column.content)
            .bind(&column.category)
            .bind(column.normalized_tags())
            .bind(column.published_at)
            .bind(now)
            .fetch_one(&self.db)
            .await?;
        Ok(row)
    }

    async fn exists_with_title(&self, title: &str) -> Result<bool, RepoError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM columns WHERE title = $1)")
                .bind(title)
                .fetch_one(&self.db)
                .await?;
        Ok(exists)
    }

    async fn find_published(&self, limit: i64, offset: i64) -> Result<Vec<Column>, RepoError> {
        let sql = format!(
            r#"
            SELECT {COLUMNS}
              FROM columns
             WHERE published_at IS NOT NULL AND published_at <= $1
             ORDER BY published_at DESC, id
             LIMIT $2 OFFSET $3
            "#
        );
        let rows = sqlx::query_as::<_, Column>(&sql)
            .bind(self.clock.now())
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.db)
            .await?;
        Ok(rows)
    }

    async fn count_published(&self) -> Result<i64, RepoError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM columns WHERE published_at IS NOT NULL AND published_at <= $1",
        )
        .bind(self.clock.now())
        .fetch_one(&self.db)
        .await?;
        Ok(count)
    }

    async fn find_published_by_id(&self, id: Uuid) -> Result<Column, RepoError> {
        let sql = format!(
            r#"
            SELECT {COLUMNS}
              FROM columns
             WHERE id = $1 AND published_at IS NOT NULL AND published_at <= $2
            "#
        );
        let row = sqlx::query_as::<_, Column>(&sql)
            .bind(id)
            .bind(self.clock.now())
            .fetch_one(&self.db)
            .await?;
        Ok(row)
    }

    async fn find_published_by_category(
        &self,
        category: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Column>, RepoError> {
        let sql = format!(
            r#"
            SELECT {COLUMNS}
              FROM columns
             WHERE category = $1 AND published_at IS NOT NULL AND published_at <= $2
             ORDER BY published_at DESC, id
             LIMIT $3 OFFSET $4
            "#
        );
        let rows = sqlx::query_as::<_, Column>(&sql)
            .bind(category)
            .bind(self.clock.now())
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.db)
            .await?;
        Ok(rows)
    }

    async fn count_published_by_category(&self, category: &str) -> Result<i64, RepoError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
              FROM columns
             WHERE category = $1 AND published_at IS NOT NULL AND published_at <= $2
            "#,
        )
        .bind(category)
        .bind(self.clock.now())
        .fetch_one(&self.db)
        .await?;
        Ok(count)
    }

    async fn find_published_by_tag(
        &self,
        tag: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Column>, RepoError> {
        let sql = format!(
            r#"
            SELECT {COLUMNS}
              FROM columns
             WHERE $1 = ANY(tags) AND published_at IS NOT NULL AND published_at <= $2
             ORDER BY published_at DESC, id
             LIMIT $3 OFFSET $4
            "#
        );
        let rows = sqlx::query_as::<_, Column>(&sql)
            .bind(tag)
            .bind(self.clock.now())
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.db)
            .await?;
        Ok(rows)
    }

    async fn count_published_by_tag(&self, tag: &str) -> Result<i64, RepoError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
              FROM columns
             WHERE $1 = ANY(tags) AND published_at IS NOT NULL AND published_at <= $2
            "#,
        )
        .bind(tag)
        .bind(self.clock.now())
        .fetch_one(&self.db)
        .await?;
        Ok(count)
    }
}
