use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::ExerciseRecord;
use crate::pagination::{PageParams, PaginationInfo};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExerciseRecordRequest {
    #[serde(default)]
    pub exercise_name: String,
    #[serde(default)]
    pub duration_minutes: Option<i32>,
    #[serde(default)]
    pub calories_burned: Option<i32>,
    /// Defaults to now when omitted.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub recorded_at: Option<OffsetDateTime>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseRecordIdRequest {
    #[serde(default)]
    pub id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListExerciseRecordsRequest {
    #[serde(flatten)]
    pub page: PageParams,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseRecordMessage {
    pub id: Uuid,
    pub exercise_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories_burned: Option<i32>,
    #[serde(with = "time::serde::rfc3339")]
    pub recorded_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<ExerciseRecord> for ExerciseRecordMessage {
    fn from(r: ExerciseRecord) -> Self {
        Self {
            id: r.id,
            exercise_name: r.exercise_name,
            duration_minutes: r.duration_minutes,
            calories_burned: r.calories_burned,
            recorded_at: r.recorded_at,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseRecordResponse {
    pub exercise_record: ExerciseRecordMessage,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListExerciseRecordsResponse {
    pub exercise_records: Vec<ExerciseRecordMessage>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Serialize)]
pub struct DeleteExerciseRecordResponse {}
