use std::sync::Arc;

use sqlx::PgPool;

use crate::{
    auth::{
        jwt::JwtKeys,
        repo::{PgUserRepository, UserRepository},
    },
    body_records::repo::{BodyRecordRepository, PgBodyRecordRepository},
    clock::{Clock, SystemClock},
    columns::repo::{ColumnRepository, PgColumnRepository},
    config::AppConfig,
    diary::repo::{DiaryEntryRepository, PgDiaryEntryRepository},
    exercise_records::repo::{ExerciseRecordRepository, PgExerciseRecordRepository},
};

/// Everything a handler may touch, built once at start-up.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub clock: Arc<dyn Clock>,
    pub jwt: JwtKeys,
    pub users: Arc<dyn UserRepository>,
    pub body_records: Arc<dyn BodyRecordRepository>,
    pub exercise_records: Arc<dyn ExerciseRecordRepository>,
    pub diary_entries: Arc<dyn DiaryEntryRepository>,
    pub columns: Arc<dyn ColumnRepository>,
}

impl AppState {
    /// PostgreSQL-backed state using the wall clock.
    pub fn from_pool(db: PgPool, config: Arc<AppConfig>) -> Self {
        Self::from_pool_with_clock(db, config, Arc::new(SystemClock))
    }

    pub fn from_pool_with_clock(db: PgPool, config: Arc<AppConfig>, clock: Arc<dyn Clock>) -> Self {
        Self {
            jwt: JwtKeys::from_config(&config.jwt),
            config,
            users: Arc::new(PgUserRepository::new(db.clone())),
            body_records: Arc::new(PgBodyRecordRepository::new(db.clone(), clock.clone())),
            exercise_records: Arc::new(PgExerciseRecordRepository::new(db.clone(), clock.clone())),
            diary_entries: Arc::new(PgDiaryEntryRepository::new(db.clone(), clock.clone())),
            columns: Arc::new(PgColumnRepository::new(db, clock.clone())),
            clock,
        }
    }

    /// In-memory repositories and a frozen clock, for handler tests.
    #[cfg(test)]
    pub fn fake(clock: Arc<crate::clock::FixedClock>) -> Self {
        use crate::testing::{
            InMemoryBodyRecords, InMemoryColumns, InMemoryDiaryEntries, InMemoryExerciseRecords,
            InMemoryUsers,
        };

        let config = Arc::new(AppConfig::for_tests());
        let dyn_clock: Arc<dyn Clock> = clock;
        Self {
            jwt: JwtKeys::from_config(&config.jwt),
            config,
            users: Arc::new(InMemoryUsers::default()),
            body_records: Arc::new(InMemoryBodyRecords::new(dyn_clock.clone())),
            exercise_records: Arc::new(InMemoryExerciseRecords::new(dyn_clock.clone())),
            diary_entries: Arc::new(InMemoryDiaryEntries::new(dyn_clock.clone())),
            columns: Arc::new(InMemoryColumns::new(dyn_clock.clone())),
            clock: dyn_clock,
        }
    }
}
