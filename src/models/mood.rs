use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Mood {
    pub id: Uuid,
    pub user_id: Uuid,
    pub score: i32,
    pub tags: Vec<String>,
    pub note: Option<String>,
    pub sleep: Option<f64>,
    pub activity: Option<String>,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Mood {
    /// Display label for the dashboard feed: the 1-10 score folded onto
    /// five levels.
    pub fn label(&self) -> &'static str {
        match (self.score + 1) / 2 {
            1 => "Very Low",
            2 => "Low",
            3 => "Neutral",
            4 => "Good",
            5 => "Great",
            _ => "Neutral",
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn mood_at(score: i32, date: DateTime<Utc>, tags: &[&str]) -> Mood {
        Mood {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            score,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            note: None,
            sleep: None,
            activity: None,
            date,
            created_at: date,
            updated_at: date,
        }
    }
}
