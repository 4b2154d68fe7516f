use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub category: Option<String>,
    pub icon_name: Option<String>,
    pub goal: i32,
    /// Day markers, one per completed day. May hold duplicates and
    /// legacy label formats; read them through `DayCalendar`.
    pub completed_dates: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub const DEFAULT_ICON: &str = "heart";

/// Icon for a habit category. An explicit icon name always wins; unknown or
/// missing categories fall back to [`DEFAULT_ICON`].
pub fn icon_for_category(category: Option<&str>, icon_name: Option<&str>) -> String {
    if let Some(icon) = icon_name.filter(|i| !i.is_empty()) {
        return icon.to_string();
    }
    let Some(category) = category else {
        return DEFAULT_ICON.to_string();
    };

    let icon = match category.to_lowercase().as_str() {
        "meditation" => "brain",
        "health" => "drop",
        "reading" => "book-open",
        "sleep" => "moon",
        "exercise" | "fitness" => "barbell",
        "productivity" => "lightbulb",
        "creativity" => "camera",
        "learning" => "graduation",
        "social" => "phone",
        _ => DEFAULT_ICON,
    };
    icon.to_string()
}

impl Habit {
    pub fn resolved_icon(&self) -> String {
        icon_for_category(self.category.as_deref(), self.icon_name.as_deref())
    }
}
