use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::DiaryEntry;
use crate::{
    pagination::{PageParams, PaginationInfo},
    wire::format_date,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDiaryEntryRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub entry_date: String,
}

/// Omitted or null fields keep their stored value; `"title": ""` clears the
/// title.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDiaryEntryRequest {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub entry_date: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiaryEntryIdRequest {
    #[serde(default)]
    pub id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDiaryEntriesRequest {
    #[serde(flatten)]
    pub page: PageParams,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiaryEntryMessage {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub content: String,
    pub entry_date: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<DiaryEntry> for DiaryEntryMessage {
    fn from(e: DiaryEntry) -> Self {
        Self {
            id: e.id,
            title: e.title,
            content: e.content,
            entry_date: format_date(e.entry_date),
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiaryEntryResponse {
    pub diary_entry: DiaryEntryMessage,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDiaryEntriesResponse {
    pub diary_entries: Vec<DiaryEntryMessage>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Serialize)]
pub struct DeleteDiaryEntryResponse {}
