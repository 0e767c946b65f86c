use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::Column;
use crate::pagination::{PageParams, PaginationInfo};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPublishedColumnsRequest {
    #[serde(flatten)]
    pub page: PageParams,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetColumnRequest {
    #[serde(default)]
    pub id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListColumnsByCategoryRequest {
    #[serde(default)]
    pub category: String,
    #[serde(flatten)]
    pub page: PageParams,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListColumnsByTagRequest {
    #[serde(default)]
    pub tag: String,
    #[serde(flatten)]
    pub page: PageParams,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnMessage {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub tags: Vec<String>,
    #[serde(
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub published_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<Column> for ColumnMessage {
    fn from(c: Column) -> Self {
        Self {
            id: c.id,
            title: c.title,
            content: c.content,
            category: c.category,
            tags: c.tags,
            published_at: c.published_at,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnResponse {
    pub column: ColumnMessage,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListColumnsResponse {
    pub columns: Vec<ColumnMessage>,
    pub pagination: PaginationInfo,
}
