//! Public read endpoints; no token required.

use axum::{extract::State, routing::post, Json, Router};
use tracing::instrument;

use super::dto::{
    ColumnMessage, ColumnResponse, GetColumnRequest, ListColumnsByCategoryRequest,
    ListColumnsByTagRequest, ListColumnsResponse, ListPublishedColumnsRequest,
};
use crate::{
    error::RpcError,
    pagination::PaginationInfo,
    rpc::{method_path, Rpc},
    state::AppState,
    validation::not_blank,
    wire::parse_id,
};

const SERVICE: &str = "ColumnService";
const ENTITY: &str = "column";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(&method_path(SERVICE, "ListPublishedColumns"), post(list_published_columns))
        .route(&method_path(SERVICE, "GetColumn"), post(get_column))
        .route(&method_path(SERVICE, "ListColumnsByCategory"), post(list_columns_by_category))
        .route(&method_path(SERVICE, "ListColumnsByTag"), post(list_columns_by_tag))
}

#[instrument(skip(state, req))]
pub async fn list_published_columns(
    State(state): State<AppState>,
    Rpc(req): Rpc<ListPublishedColumnsRequest>,
) -> Result<Json<ListColumnsResponse>, RpcError> {
    let page = req.page.page();
    let columns = state
        .columns
        .find_published(page.limit(), page.offset())
        .await
        .map_err(|e| RpcError::from_repo("list published columns", ENTITY, e))?;
    let total = state
        .columns
        .count_published()
        .await
        .map_err(|e| RpcError::from_repo("count published columns", ENTITY, e))?;

    Ok(Json(ListColumnsResponse {
        columns: columns.into_iter().map(ColumnMessage::from).collect(),
        pagination: PaginationInfo::new(total, page),
    }))
}

#[instrument(skip(state, req))]
pub async fn get_column(
    State(state): State<AppState>,
    Rpc(req): Rpc<GetColumnRequest>,
) -> Result<Json<ColumnResponse>, RpcError> {
    let id = parse_id("id", &req.id)?;
    let column = state
        .columns
        .find_published_by_id(id)
        .await
        .map_err(|e| RpcError::from_repo("get column", ENTITY, e))?;
    Ok(Json(ColumnResponse {
        column: column.into(),
    }))
}

#[instrument(skip(state, req))]
pub async fn list_columns_by_category(
    State(state): State<AppState>,
    Rpc(req): Rpc<ListColumnsByCategoryRequest>,
) -> Result<Json<ListColumnsResponse>, RpcError> {
    not_blank("category", &req.category)?;
    let category = req.category.trim();
    let page = req.page.page();

    let columns = state
        .columns
        .find_published_by_category(category, page.limit(), page.offset())
        .await
        .map_err(|e| RpcError::from_repo("list columns by category", ENTITY, e))?;
    let total = state
        .columns
        .count_published_by_category(category)
        .await
        .map_err(|e| RpcError::from_repo("count columns by category", ENTITY, e))?;

    Ok(Json(ListColumnsResponse {
        columns: columns.into_iter().map(ColumnMessage::from).collect(),
        pagination: PaginationInfo::new(total, page),
    }))
}

#[instrument(skip(state, req))]
pub async fn list_columns_by_tag(
    State(state): State<AppState>,
    Rpc(req): Rpc<ListColumnsByTagRequest>,
) -> Result<Json<ListColumnsResponse>, RpcError> {
    not_blank("tag", &req.tag)?;
    let tag = req.tag.trim();
    let page = req.page.page();

    let columns = state
        .columns
        .find_published_by_tag(tag, page.limit(), page.offset())
        .await
        .map_err(|e| RpcError::from_repo("list columns by tag", ENTITY, e))?;
    let total = state
        .columns
        .count_published_by_tag(tag)
        .await
        .map_err(|e| RpcError::from_repo("count columns by tag", ENTITY, e))?;

    Ok(Json(ListColumnsResponse {
        columns: columns.into_iter().map(ColumnMessage::from).collect(),
        pagination: PaginationInfo::new(total, page),
    }))
}
