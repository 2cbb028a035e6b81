use chrono::{DateTime, Utc};
use tokio_postgres::Row;

/// Column list selected for every note query, in `Note::from_row` order.
pub const NOTE_COLUMNS: &str = "id, title, content, created_at, updated_at";

/// Storage-managed creation and modification times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamps {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub timestamps: Timestamps,
}

impl Note {
    pub fn from_row(row: &Row) -> Self {
        Self {
            id: row.get("id"),
            title: row.get("title"),
            content: row.get("content"),
            timestamps: Timestamps {
                created_at: row.get("created_at"),
                updated_at: row.get("updated_at"),
            },
        }
    }
}
