use axum::{extract::State, routing::post, Json, Router};
use tracing::{info, instrument};

use super::{
    dto::{
        BodyRecordMessage, BodyRecordResponse, CreateBodyRecordRequest, GetBodyRecordRequest,
        GetBodyRecordsByDateRangeRequest, GetBodyRecordsByDateRangeResponse,
        ListBodyRecordsRequest, ListBodyRecordsResponse,
    },
    repo_types::NewBodyRecord,
};
use crate::{
    auth::AuthUser,
    error::RpcError,
    pagination::PaginationInfo,
    rpc::{method_path, Rpc},
    state::AppState,
    validation::ValidationError,
    wire::{parse_date, parse_id},
};

const SERVICE: &str = "BodyRecordService";
const ENTITY: &str = "body record";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(&method_path(SERVICE, "CreateBodyRecord"), post(create_body_record))
        .route(&method_path(SERVICE, "GetBodyRecord"), post(get_body_record))
        .route(&method_path(SERVICE, "ListBodyRecords"), post(list_body_records))
        .route(
            &method_path(SERVICE, "GetBodyRecordsByDateRange"),
            post(get_body_records_by_date_range),
        )
}

#[instrument(skip(state, req))]
pub async fn create_body_record(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Rpc(req): Rpc<CreateBodyRecordRequest>,
) -> Result<Json<BodyRecordResponse>, RpcError> {
    let record = NewBodyRecord {
        date: parse_date("date", &req.date)?,
        weight_kg: req.weight_kg,
        body_fat_percentage: req.body_fat_percentage,
    };
    record.validate()?;

    let saved = state
        .body_records
        .save(user_id, &record)
        .await
        .map_err(|e| RpcError::from_repo("save body record", ENTITY, e))?;

    info!(record_id = %saved.id, date = %saved.date, "body record saved");
    Ok(Json(BodyRecordResponse {
        body_record: saved.into(),
    }))
}

#[instrument(skip(state, req))]
pub async fn get_body_record(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Rpc(req): Rpc<GetBodyRecordRequest>,
) -> Result<Json<BodyRecordResponse>, RpcError> {
    let id = parse_id("id", &req.id)?;
    let record = state
        .body_records
        .find_by_id(id, user_id)
        .await
        .map_err(|e| RpcError::from_repo("get body record", ENTITY, e))?;
    Ok(Json(BodyRecordResponse {
        body_record: record.into(),
    }))
}

#[instrument(skip(state, req))]
pub async fn list_body_records(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Rpc(req): Rpc<ListBodyRecordsRequest>,
) -> Result<Json<ListBodyRecordsResponse>, RpcError> {
    let page = req.page.page();
    let records = state
        .body_records
        .find_by_user(user_id, page.limit(), page.offset())
        .await
        .map_err(|e| RpcError::from_repo("list body records", ENTITY, e))?;
    let total = state
        .body_records
        .count_by_user(user_id)
        .await
        .map_err(|e| RpcError::from_repo("count body records", ENTITY, e))?;

    Ok(Json(ListBodyRecordsResponse {
        body_records: records.into_iter().map(BodyRecordMessage::from).collect(),
        pagination: PaginationInfo::new(total, page),
    }))
}

#[instrument(skip(state, req))]
pub async fn get_body_records_by_date_range(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Rpc(req): Rpc<GetBodyRecordsByDateRangeRequest>,
) -> Result<Json<GetBodyRecordsByDateRangeResponse>, RpcError> {
    let start = parse_date("start_date", &req.start_date)?;
    let end = parse_date("end_date", &req.end_date)?;
    if start > end {
        return Err(ValidationError::new("end_date", "must not be before start_date").into());
    }

    let records = state
        .body_records
        .find_by_user_and_date_range(user_id, start, end)
        .await
        .map_err(|e| RpcError::from_repo("body records by date range", ENTITY, e))?;

    Ok(Json(GetBodyRecordsByDateRangeResponse {
        body_records: records.into_iter().map(BodyRecordMessage::from).collect(),
    }))
}
