use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Journal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub prompt: Option<String>,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

const PREVIEW_CHARS: usize = 30;

impl Journal {
    /// Short preview for activity feeds, cut on a char boundary.
    pub fn preview(&self) -> String {
        let content = self.content.trim();
        if content.is_empty() {
            return "Untitled".to_string();
        }
        if content.chars().count() > PREVIEW_CHARS {
            let head: String = content.chars().take(PREVIEW_CHARS).collect();
            format!("{head}...")
        } else {
            content.to_string()
        }
    }
}
