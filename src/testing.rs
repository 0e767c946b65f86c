//! In-memory repositories for handler and service tests.
//!
//! They mirror the PostgreSQL implementations: owner scoping, the
//! `(user_id, date)` upsert, unique subjects, ordering, and timestamps from
//! the injected clock.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use time::Date;
use uuid::Uuid;

use crate::{
    auth::{repo::UserRepository, repo_types::User},
    body_records::{
        repo::BodyRecordRepository,
        repo_types::{BodyRecord, NewBodyRecord},
    },
    clock::Clock,
    columns::{
        repo::ColumnRepository,
        repo_types::{Column, NewColumn},
    },
    db::RepoError,
    diary::{
        repo::DiaryEntryRepository,
        repo_types::{DiaryEntry, NewDiaryEntry},
    },
    exercise_records::{
        repo::ExerciseRecordRepository,
        repo_types::{ExerciseRecord, NewExerciseRecord},
    },
};

type Rows<T> = Arc<Mutex<Vec<T>>>;

fn lock<T>(rows: &Rows<T>) -> MutexGuard<'_, Vec<T>> {
    rows.lock().unwrap()
}

fn page<T: Clone>(rows: Vec<T>, limit: i64, offset: i64) -> Vec<T> {
    rows.into_iter()
        .skip(offset.max(0) as usize)
        .take(limit.max(0) as usize)
        .collect()
}

// ===== users =====

#[derive(Clone, Default)]
pub struct InMemoryUsers {
    rows: Rows<User>,
}

impl InMemoryUsers {
    pub fn len(&self) -> usize {
        lock(&self.rows).len()
    }
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn find_by_subject(&self, subject_id: &str) -> Result<Option<User>, RepoError> {
        Ok(lock(&self.rows)
            .iter()
            .find(|u| u.subject_id == subject_id)
            .cloned())
    }

    async fn create(&self, subject_id: &str) -> Result<User, RepoError> {
        let mut rows = lock(&self.rows);
        if rows.iter().any(|u| u.subject_id == subject_id) {
            return Err(RepoError::Conflict("users_subject_id_key".into()));
        }
        let user = User {
            id: Uuid::new_v4(),
            subject_id: subject_id.to_string(),
        };
        rows.push(user.clone());
        Ok(user)
    }
}

// ===== body records =====

#[derive(Clone)]
pub struct InMemoryBodyRecords {
    rows: Rows<BodyRecord>,
    clock: Arc<dyn Clock>,
}

impl InMemoryBodyRecords {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            rows: Rows::default(),
            clock,
        }
    }
}

#[async_trait]
impl BodyRecordRepository for InMemoryBodyRecords {
    async fn save(&self, user_id: Uuid, record: &NewBodyRecord) -> Result<BodyRecord, RepoError> {
        let now = self.clock.now();
        let mut rows = lock(&self.rows);
        if let Some(existing) = rows
            .iter_mut()
            .find(|r| r.user_id == user_id && r.date == record.date)
        {
            existing.weight_kg = record.weight_kg;
            existing.body_fat_percentage = record.body_fat_percentage;
            existing.updated_at = now;
            return Ok(existing.clone());
        }
        let row = BodyRecord {
            id: Uuid::new_v4(),
            user_id,
            date: record.date,
            weight_kg: record.weight_kg,
            body_fat_percentage: record.body_fat_percentage,
            created_at: now,
            updated_at: now,
        };
        rows.push(row.clone());
        Ok(row)
    }

    async fn find_by_id(&self, id: Uuid, user_id: Uuid) -> Result<BodyRecord, RepoError> {
        lock(&self.rows)
            .iter()
            .find(|r| r.id == id && r.user_id == user_id)
            .cloned()
            .ok_or(RepoError::NotFound)
    }

    async fn find_by_user(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<BodyRecord>, RepoError> {
        let mut rows: Vec<_> = lock(&self.rows)
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.date.cmp(&a.date).then(a.id.cmp(&b.id)));
        Ok(page(rows, limit, offset))
    }

    async fn count_by_user(&self, user_id: Uuid) -> Result<i64, RepoError> {
        Ok(lock(&self.rows).iter().filter(|r| r.user_id == user_id).count() as i64)
    }

    async fn find_by_user_and_date_range(
        &self,
        user_id: Uuid,
        start: Date,
        end: Date,
    ) -> Result<Vec<BodyRecord>, RepoError> {
        let mut rows: Vec<_> = lock(&self.rows)
            .iter()
            .filter(|r| r.user_id == user_id && r.date >= start && r.date <= end)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));
        Ok(rows)
    }
}

// ===== exercise records =====

#[derive(Clone)]
pub struct InMemoryExerciseRecords {
    rows: Rows<ExerciseRecord>,
    clock: Arc<dyn Clock>,
}

impl InMemoryExerciseRecords {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            rows: Rows::default(),
            clock,
        }
    }
}

#[async_trait]
impl ExerciseRecordRepository for InMemoryExerciseRecords {
    async fn create(
        &self,
        user_id: Uuid,
        record: &NewExerciseRecord,
    ) -> Result<ExerciseRecord, RepoError> {
        let now = self.clock.now();
        let row = ExerciseRecord {
            id: Uuid::new_v4(),
            user_id,
            exercise_name: record.exercise_name.clone(),
            duration_minutes: record.duration_minutes,
            calories_burned: record.calories_burned,
            recorded_at: record.recorded_at,
            created_at: now,
            updated_at: now,
        };
        lock(&self.rows).push(row.clone());
        Ok(row)
    }

    async fn find_by_id(&self, id: Uuid, user_id: Uuid) -> Result<ExerciseRecord, RepoError> {
        lock(&self.rows)
            .iter()
            .find(|r| r.id == id && r.user_id == user_id)
            .cloned()
            .ok_or(RepoError::NotFound)
    }

    async fn find_by_user(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ExerciseRecord>, RepoError> {
        let mut rows: Vec<_> = lock(&self.rows)
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at).then(a.id.cmp(&b.id)));
        Ok(page(rows, limit, offset))
    }

    async fn count_by_user(&self, user_id: Uuid) -> Result<i64, RepoError> {
        Ok(lock(&self.rows).iter().filter(|r| r.user_id == user_id).count() as i64)
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<(), RepoError> {
        let mut rows = lock(&self.rows);
        let before = rows.len();
        rows.retain(|r| !(r.id == id && r.user_id == user_id));
        if rows.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

// ===== diary entries =====

#[derive(Clone)]
pub struct InMemoryDiaryEntries {
    rows: Rows<DiaryEntry>,
    clock: Arc<dyn Clock>,
}

impl InMemoryDiaryEntries {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            rows: Rows::default(),
            clock,
        }
    }
}

#[async_trait]
impl DiaryEntryRepository for InMemoryDiaryEntries {
    async fn create(&self, user_id: Uuid, entry: &NewDiaryEntry) -> Result<DiaryEntry, RepoError> {
        let now = self.clock.now();
        let row = DiaryEntry {
            id: Uuid::new_v4(),
            user_id,
            title: entry.title.clone(),
            content: entry.content.clone(),
            entry_date: entry.entry_date,
            created_at: now,
            updated_at: now,
        };
        lock(&self.rows).push(row.clone());
        Ok(row)
    }

    async fn find_by_id(&self, id: Uuid, user_id: Uuid) -> Result<DiaryEntry, RepoError> {
        lock(&self.rows)
            .iter()
            .find(|r| r.id == id && r.user_id == user_id)
            .cloned()
            .ok_or(RepoError::NotFound)
    }

    async fn find_by_user(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<DiaryEntry>, RepoError> {
        let mut rows: Vec<_> = lock(&self.rows)
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            b.entry_date
                .cmp(&a.entry_date)
                .then(b.created_at.cmp(&a.created_at))
                .then(a.id.cmp(&b.id))
        });
        Ok(page(rows, limit, offset))
    }

    async fn count_by_user(&self, user_id: Uuid) -> Result<i64, RepoError> {
        Ok(lock(&self.rows).iter().filter(|r| r.user_id == user_id).count() as i64)
    }

    async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        entry: &NewDiaryEntry,
    ) -> Result<DiaryEntry, RepoError> {
        let now = self.clock.now();
        let mut rows = lock(&self.rows);
        let row = rows
            .iter_mut()
            .find(|r| r.id == id && r.user_id == user_id)
            .ok_or(RepoError::NotFound)?;
        row.title = entry.title.clone();
        row.content = entry.content.clone();
        row.entry_date = entry.entry_date;
        row.updated_at = now;
        Ok(row.clone())
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<(), RepoError> {
        let mut rows = lock(&self.rows);
        let before = rows.len();
        rows.retain(|r| !(r.id == id && r.user_id == user_id));
        if rows.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

// ===== columns =====

#[derive(Clone)]
pub struct InMemoryColumns {
    rows: Rows<Column>,
    clock: Arc<dyn Clock>,
}

impl InMemoryColumns {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            rows: Rows::default(),
            clock,
        }
    }

    fn published_where(&self, keep: impl Fn(&Column) -> bool) -> Vec<Column> {
        let now = self.clock.now();
        let mut rows: Vec<_> = lock(&self.rows)
            .iter()
            .filter(|c| c.is_published_at(now) && keep(c))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.published_at.cmp(&a.published_at).then(a.id.cmp(&b.id)));
        rows
    }
}

#[async_trait]
impl ColumnRepository for InMemoryColumns {
    async fn create(&self, column: &NewColumn) -> Result<Column, RepoError> {
        let now = self.clock.now();
        let row = Column {
            id: Uuid::new_v4(),
            title: column.title.clone(),
            content: column.content.clone(),
            category: column.category.clone(),
            tags: column.normalized_tags(),
            published_at: column.published_at,
            created_at: now,
            updated_at: now,
        };
        lock(&self.rows).push(row.clone());
        Ok(row)
    }

    async fn exists_with_title(&self, title: &str) -> Result<bool, RepoError> {
        Ok(lock(&self.rows).iter().any(|c| c.title == title))
    }

    async fn find_published(&self, limit: i64, offset: i64) -> Result<Vec<Column>, RepoError> {
        Ok(page(self.published_where(|_| true), limit, offset))
    }

    async fn count_published(&self) -> Result<i64, RepoError> {
        Ok(self.published_where(|_| true).len() as i64)
    }

    async fn find_published_by_id(&self, id: Uuid) -> Result<Column, RepoError> {
        self.published_where(|c| c.id == id)
            .into_iter()
            .next()
            .ok_or(RepoError::NotFound)
    }

    async fn find_published_by_category(
        &self,
        category: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Column>, RepoError> {
        let rows = self.published_where(|c| c.category.as_deref() == Some(category));
        Ok(page(rows, limit, offset))
    }

    async fn count_published_by_category(&self, category: &str) -> Result<i64, RepoError> {
        Ok(self
            .published_where(|c| c.category.as_deref() == Some(category))
            .len() as i64)
    }

    async fn find_published_by_tag(
        &self,
        tag: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Column>, RepoError> {
        let rows = self.published_where(|c| c.tags.iter().any(|t| t == tag));
        Ok(page(rows, limit, offset))
    }

    async fn count_published_by_tag(&self, tag: &str) -> Result<i64, RepoError> {
        Ok(self.published_where(|c| c.tags.iter().any(|t| t == tag)).len() as i64)
    }
}

// ===== request harness =====

/// A router over in-memory state, driven one request at a time.
pub struct TestApp {
    pub state: crate::state::AppState,
    pub clock: Arc<crate::clock::FixedClock>,
}

impl TestApp {
    pub fn new() -> Self {
        let clock = Arc::new(crate::clock::FixedClock::new(
            time::macros::datetime!(2024-06-15 12:00 UTC),
        ));
        Self {
            state: crate::state::AppState::fake(clock.clone()),
            clock,
        }
    }

    pub fn token(&self, subject: &str) -> String {
        self.state
            .jwt
            .sign(subject, std::time::Duration::from_secs(600))
            .unwrap()
    }

    /// POSTs `body` to `/healthlog.v1.<service>/<method>` and returns the
    /// status with the decoded JSON body (`Null` when empty).
    pub async fn call(
        &self,
        service: &str,
        method: &str,
        token: Option<&str>,
        body: serde_json::Value,
    ) -> (axum::http::StatusCode, serde_json::Value) {
        use axum::{body::Body, http::Request};
        use tower::ServiceExt;

        let mut req = Request::builder()
            .method("POST")
            .uri(crate::rpc::method_path(service, method))
            .header("content-type", "application/json");
        if let Some(token) = token {
            req = req.header("authorization", format!("Bearer {token}"));
        }
        let res = crate::app::build_app(self.state.clone())
            .oneshot(req.body(Body::from(body.to_string())).unwrap())
            .await
            .unwrap();

        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }
}
