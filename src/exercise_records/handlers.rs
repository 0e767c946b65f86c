use axum::{extract::State, routing::post, Json, Router};
use tracing::{info, instrument};

use super::{
    dto::{
        CreateExerciseRecordRequest, DeleteExerciseRecordResponse, ExerciseRecordIdRequest,
        ExerciseRecordMessage, ExerciseRecordResponse, ListExerciseRecordsRequest,
        ListExerciseRecordsResponse,
    },
    repo_types::NewExerciseRecord,
};
use crate::{
    auth::AuthUser,
    error::RpcError,
    pagination::PaginationInfo,
    rpc::{method_path, Rpc},
    state::AppState,
    wire::parse_id,
};

const SERVICE: &str = "ExerciseRecordService";
const ENTITY: &str = "exercise record";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(&method_path(SERVICE, "CreateExerciseRecord"), post(create_exercise_record))
        .route(&method_path(SERVICE, "GetExerciseRecord"), post(get_exercise_record))
        .route(&method_path(SERVICE, "ListExerciseRecords"), post(list_exercise_records))
        .route(&method_path(SERVICE, "DeleteExerciseRecord"), post(delete_exercise_record))
}

#[instrument(skip(state, req))]
pub async fn create_exercise_record(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Rpc(req): Rpc<CreateExerciseRecordRequest>,
) -> Result<Json<ExerciseRecordResponse>, RpcError> {
    let now = state.clock.now();
    let record = NewExerciseRecord {
        exercise_name: req.exercise_name,
        duration_minutes: req.duration_minutes,
        calories_burned: req.calories_burned,
        recorded_at: req.recorded_at.unwrap_or(now),
    };
    record.validate(now)?;

    let created = state
        .exercise_records
        .create(user_id, &record)
        .await
        .map_err(|e| RpcError::from_repo("create exercise record", ENTITY, e))?;

    info!(record_id = %created.id, "exercise record created");
    Ok(Json(ExerciseRecordResponse {
        exercise_record: created.into(),
    }))
}

#[instrument(skip(state, req))]
pub async fn get_exercise_record(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Rpc(req): Rpc<ExerciseRecordIdRequest>,
) -> Result<Json<ExerciseRecordResponse>, RpcError> {
    let id = parse_id("id", &req.id)?;
    let record = state
        .exercise_records
        .find_by_id(id, user_id)
        .await
        .map_err(|e| RpcError::from_repo("get exercise record", ENTITY, e))?;
    Ok(Json(ExerciseRecordResponse {
        exercise_record: record.into(),
    }))
}

#[instrument(skip(state, req))]
pub async fn list_exercise_records(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Rpc(req): Rpc<ListExerciseRecordsRequest>,
) -> Result<Json<ListExerciseRecordsResponse>, RpcError> {
    let page = req.page.page();
    let records = state
        .exercise_records
        .find_by_user(user_id, page.limit(), page.offset())
        .await
        .map_err(|e| RpcError::from_repo("list exercise records", ENTITY, e))?;
    let total = state
        .exercise_records
        .count_by_user(user_id)
        .await
        .map_err(|e| RpcError::from_repo("count exercise records", ENTITY, e))?;

    Ok(Json(ListExerciseRecordsResponse {
        exercise_records: records.into_iter().map(ExerciseRecordMessage::from).collect(),
        pagination: PaginationInfo::new(total, page),
    }))
}

#[instrument(skip(state, req))]
pub async fn delete_exercise_record(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Rpc(req): Rpc<ExerciseRecordIdRequest>,
) -> Result<Json<DeleteExerciseRecordResponse>, RpcError> {
    let id = parse_id("id", &req.id)?;
    state
        .exercise_records
        .delete(id, user_id)
        .await
        .map_err(|e| RpcError::from_repo("delete exercise record", ENTITY, e))?;

    info!(record_id = %id, "exercise record deleted");
    Ok(Json(DeleteExerciseRecordResponse {}))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::testing::TestApp;

    const SVC: &str = "ExerciseRecordService";

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let app = TestApp::new();
        let token = app.token("alice");

        let (status, created) = app
            .call(
                SVC,
                "CreateExerciseRecord",
                Some(&token),
                json!({
                    "exerciseName": "Running",
                    "durationMinutes": 30,
                    "caloriesBurned": 250,
                    "recordedAt": "2024-06-15T07:30:00Z"
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        let record = &created["exerciseRecord"];
        assert_eq!(record["exerciseName"], "Running");
        assert_eq!(record["recordedAt"], "2024-06-15T07:30:00Z");

        let (status, fetched) = app
            .call(SVC, "GetExerciseRecord", Some(&token), json!({"id": record["id"]}))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(&fetched["exerciseRecord"], record);
    }

    #[tokio::test]
    async fn recorded_at_defaults_to_now() {
        let app = TestApp::new();
        let token = app.token("alice");
        let (_, created) = app
            .call(SVC, "CreateExerciseRecord", Some(&token), json!({"exerciseName": "Yoga"}))
            .await;
        assert_eq!(created["exerciseRecord"]["recordedAt"], "2024-06-15T12:00:00Z");
        assert!(created["exerciseRecord"].get("durationMinutes").is_none());
    }

    #[tokio::test]
    async fn future_or_invalid_values_are_rejected() {
        let app = TestApp::new();
        let token = app.token("alice");
        for body in [
            json!({"exerciseName": "Run", "recordedAt": "2024-06-15T12:00:01Z"}),
            json!({"exerciseName": "   "}),
            json!({"exerciseName": "Run", "durationMinutes": 0}),
            json!({"exerciseName": "Run", "caloriesBurned": 10001}),
        ] {
            let (status, res) = app
                .call(SVC, "CreateExerciseRecord", Some(&token), body)
                .await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{res}");
        }
    }

    #[tokio::test]
    async fn delete_is_owner_scoped_and_not_repeatable() {
        let app = TestApp::new();
        let alice = app.token("alice");
        let bob = app.token("bob");

        let (_, created) = app
            .call(SVC, "CreateExerciseRecord", Some(&alice), json!({"exerciseName": "Swim"}))
            .await;
        let id = created["exerciseRecord"]["id"].clone();

        let (status, _) = app
            .call(SVC, "DeleteExerciseRecord", Some(&bob), json!({"id": id}))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = app
            .call(SVC, "DeleteExerciseRecord", Some(&alice), json!({"id": id}))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({}));

        let (status, _) = app
            .call(SVC, "DeleteExerciseRecord", Some(&alice), json!({"id": id}))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn malformed_id_is_invalid_argument() {
        let app = TestApp::new();
        let token = app.token("alice");
        let (status, _) = app
            .call(SVC, "GetExerciseRecord", Some(&token), json!({"id": "abc"}))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn page_past_the_end_is_empty() {
        let app = TestApp::new();
        let token = app.token("alice");
        for name in ["a", "b", "c"] {
            app.call(SVC, "CreateExerciseRecord", Some(&token), json!({"exerciseName": name}))
                .await;
        }

        let (status, body) = app
            .call(SVC, "ListExerciseRecords", Some(&token), json!({"pageSize": 2, "pageNumber": 5}))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["exerciseRecords"].as_array().unwrap().is_empty());
        assert_eq!(
            body["pagination"],
            json!({"totalItems": 3, "totalPages": 2, "currentPage": 5})
        );
    }
}
