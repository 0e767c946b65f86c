use axum::{extract::State, routing::post, Json, Router};
use tracing::{info, instrument};

use super::{
    dto::{
        CreateDiaryEntryRequest, DeleteDiaryEntryResponse, DiaryEntryIdRequest, DiaryEntryMessage,
        DiaryEntryResponse, ListDiaryEntriesRequest, ListDiaryEntriesResponse,
        UpdateDiaryEntryRequest,
    },
    repo_types::{DiaryEntryPatch, NewDiaryEntry},
};
use crate::{
    auth::AuthUser,
    error::RpcError,
    pagination::PaginationInfo,
    rpc::{method_path, Rpc},
    state::AppState,
    wire::{parse_date, parse_id},
};

const SERVICE: &str = "DiaryService";
const ENTITY: &str = "diary entry";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(&method_path(SERVICE, "CreateDiaryEntry"), post(create_diary_entry))
        .route(&method_path(SERVICE, "UpdateDiaryEntry"), post(update_diary_entry))
        .route(&method_path(SERVICE, "GetDiaryEntry"), post(get_diary_entry))
        .route(&method_path(SERVICE, "ListDiaryEntries"), post(list_diary_entries))
        .route(&method_path(SERVICE, "DeleteDiaryEntry"), post(delete_diary_entry))
}

#[instrument(skip(state, req))]
pub async fn create_diary_entry(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Rpc(req): Rpc<CreateDiaryEntryRequest>,
) -> Result<Json<DiaryEntryResponse>, RpcError> {
    let entry = NewDiaryEntry {
        title: req.title,
        content: req.content,
        entry_date: parse_date("entry_date", &req.entry_date)?,
    };
    entry.validate(state.clock.today())?;

    let created = state
        .diary_entries
        .create(user_id, &entry)
        .await
        .map_err(|e| RpcError::from_repo("create diary entry", ENTITY, e))?;

    info!(entry_id = %created.id, "diary entry created");
    Ok(Json(DiaryEntryResponse {
        diary_entry: created.into(),
    }))
}

#[instrument(skip(state, req))]
pub async fn update_diary_entry(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Rpc(req): Rpc<UpdateDiaryEntryRequest>,
) -> Result<Json<DiaryEntryResponse>, RpcError> {
    let id = parse_id("id", &req.id)?;
    let patch = DiaryEntryPatch {
        title: req.title,
        content: req.content,
        entry_date: req
            .entry_date
            .as_deref()
            .map(|d| parse_date("entry_date", d))
            .transpose()?,
    };
    let today = state.clock.today();
    patch.validate(today)?;

    let stored: NewDiaryEntry = state
        .diary_entries
        .find_by_id(id, user_id)
        .await
        .map_err(|e| RpcError::from_repo("load diary entry", ENTITY, e))?
        .into();
    let entry = patch.apply(stored);
    entry.validate(today)?;

    let updated = state
        .diary_entries
        .update(id, user_id, &entry)
        .await
        .map_err(|e| RpcError::from_repo("update diary entry", ENTITY, e))?;

    info!(entry_id = %updated.id, "diary entry updated");
    Ok(Json(DiaryEntryResponse {
        diary_entry: updated.into(),
    }))
}

#[instrument(skip(state, req))]
pub async fn get_diary_entry(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Rpc(req): Rpc<DiaryEntryIdRequest>,
) -> Result<Json<DiaryEntryResponse>, RpcError> {
    let id = parse_id("id", &req.id)?;
    let entry = state
        .diary_entries
        .find_by_id(id, user_id)
        .await
        .map_err(|e| RpcError::from_repo("get diary entry", ENTITY, e))?;
    Ok(Json(DiaryEntryResponse {
        diary_entry: entry.into(),
    }))
}

#[instrument(skip(state, req))]
pub async fn list_diary_entries(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Rpc(req): Rpc<ListDiaryEntriesRequest>,
) -> Result<Json<ListDiaryEntriesResponse>, RpcError> {
    let page = req.page.page();
    let entries = state
        .diary_entries
        .find_by_user(user_id, page.limit(), page.offset())
        .await
        .map_err(|e| RpcError::from_repo("list diary entries", ENTITY, e))?;
    let total = state
        .diary_entries
        .count_by_user(user_id)
        .await
        .map_err(|e| RpcError::from_repo("count diary entries", ENTITY, e))?;

    Ok(Json(ListDiaryEntriesResponse {
        diary_entries: entries.into_iter().map(DiaryEntryMessage::from).collect(),
        pagination: PaginationInfo::new(total, page),
    }))
}

#[instrument(skip(state, req))]
pub async fn delete_diary_entry(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Rpc(req): Rpc<DiaryEntryIdRequest>,
) -> Result<Json<DeleteDiaryEntryResponse>, RpcError> {
    let id = parse_id("id", &req.id)?;
    state
        .diary_entries
        .delete(id, user_id)
        .await
        .map_err(|e| RpcError::from_repo("delete diary entry", ENTITY, e))?;

    info!(entry_id = %id, "diary entry deleted");
    Ok(Json(DeleteDiaryEntryResponse {}))
}
