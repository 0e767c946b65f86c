use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Column {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub published_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Column {
    /// Visible to readers once the publish time has passed.
    pub fn is_published_at(&self, now: OffsetDateTime) -> bool {
        matches!(self.published_at, Some(p) if p <= now)
    }
}

/// Editorial input; only the seeding command writes columns.
#[derive(Debug, Clone, PartialEq)]
pub struct NewColumn {
    pub title: String,
    pub content: String,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub published_at: Option<OffsetDateTime>,
}

impl NewColumn {
    /// Tags are a set: blanks dropped, duplicates removed, order kept.
    pub fn normalized_tags(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::with_capacity(self.tags.len());
        for tag in &self.tags {
            let tag = tag.trim();
            if !tag.is_empty() && !out.iter().any(|t| t == tag) {
                out.push(tag.to_string());
            }
        }
        out
    }
}
