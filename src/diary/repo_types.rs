use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::validation::{max_chars, not_after_today, not_blank, ValidationError};

pub const MAX_TITLE_CHARS: usize = 200;
pub const MAX_CONTENT_CHARS: usize = 10_000;

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct DiaryEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: Option<String>,
    pub content: String,
    pub entry_date: Date,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// The writable part of a diary entry, used for both create and update.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDiaryEntry {
    pub title: Option<String>,
    pub content: String,
    pub entry_date: Date,
}

impl NewDiaryEntry {
    pub fn validate(&self, today: Date) -> Result<(), ValidationError> {
        not_blank("content", &self.content)?;
        max_chars("content", &self.content, MAX_CONTENT_CHARS)?;
        if let Some(title) = &self.title {
            max_chars("title", title, MAX_TITLE_CHARS)?;
        }
        not_after_today("entry_date", self.entry_date, today)
    }
}

impl From<DiaryEntry> for NewDiaryEntry {
    fn from(e: DiaryEntry) -> Self {
        Self {
            title: e.title,
            content: e.content,
            entry_date: e.entry_date,
        }
    }
}

/// Fields sent with an update. `None` keeps the stored value and an empty
/// title clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiaryEntryPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub entry_date: Option<Date>,
}

impl DiaryEntryPatch {
    /// Checks only what was sent, so it can run before the row is loaded.
    pub fn validate(&self, today: Date) -> Result<(), ValidationError> {
        if let Some(content) = &self.content {
            not_blank("content", content)?;
            max_chars("content", content, MAX_CONTENT_CHARS)?;
        }
        if let Some(title) = &self.title {
            max_chars("title", title, MAX_TITLE_CHARS)?;
        }
        if let Some(entry_date) = self.entry_date {
            not_after_today("entry_date", entry_date, today)?;
        }
        Ok(())
    }

    pub fn apply(self, mut entry: NewDiaryEntry) -> NewDiaryEntry {
        if let Some(title) = self.title {
            entry.title = (!title.is_empty()).then_some(title);
        }
        if let Some(content) = self.content {
            entry.content = content;
        }
        if let Some(entry_date) = self.entry_date {
            entry.entry_date = entry_date;
        }
        entry
    }
}
