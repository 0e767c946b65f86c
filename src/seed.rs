//! Sample editorial content for local development.

use time::{Duration, OffsetDateTime};

use crate::{
    columns::{repo::ColumnRepository, repo_types::NewColumn},
    db::RepoError,
};

fn column(
    title: &str,
    content: &str,
    category: Option<&str>,
    tags: &[&str],
    published_at: Option<OffsetDateTime>,
) -> NewColumn {
    NewColumn {
        title: title.into(),
        content: content.into(),
        category: category.map(Into::into),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        published_at,
    }
}

/// Published, draft, and scheduled columns relative to `now`.
pub fn sample_set(now: OffsetDateTime) -> Vec<NewColumn> {
    vec![
        column(
            "Why breakfast still matters",
            "A short look at morning meals and energy through the day.",
            Some("nutrition"),
            &["diet", "breakfast"],
            Some(now - Duration::days(7)),
        ),
        column(
            "Sleep before you lift",
            "Recovery starts the night before a workout.",
            Some("fitness"),
            &["sleep", "training"],
            Some(now - Duration::days(2)),
        ),
        column(
            "Five-minute stretches",
            "Desk-friendly movement for long work days.",
            Some("fitness"),
            &["stretching"],
            Some(now - Duration::hours(3)),
        ),
        column(
            "Hydration myths",
            "Draft: still collecting sources.",
            Some("nutrition"),
            &["diet", "water"],
            None,
        ),
        column(
            "Winter running guide",
            "Layers, light, and pacing for cold mornings.",
            None,
            &["running", "training"],
            Some(now + Duration::days(30)),
        ),
    ]
}

/// Inserts the [`sample_set`] columns whose titles are not stored yet and
/// returns how many rows were written.
pub async fn sample_columns(
    columns: &dyn ColumnRepository,
    now: OffsetDateTime,
) -> Result<usize, RepoError> {
    let mut inserted = 0;
    for new in sample_set(now) {
        if columns.exists_with_title(&new.title).await? {
            tracing::debug!(title = %new.title, "column already seeded");
            continue;
        }
        let created = columns.create(&new).await?;
        tracing::debug!(column_id = %created.id, title = %created.title, "column seeded");
        inserted += 1;
    }
    Ok(inserted)
}
