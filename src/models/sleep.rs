use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Sleep {
    pub id: Uuid,
    pub user_id: Uuid,
    pub bedtime: DateTime<Utc>,
    pub wake_time: DateTime<Utc>,
    /// Hours, 0-24.
    pub duration: Option<f64>,
    /// 1-10.
    pub quality: Option<i32>,
    pub notes: Option<String>,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Hours between bedtime and wake time, rounded to two decimals. `None`
/// when the interval is empty, negative, or longer than a day.
pub fn hours_between(bedtime: DateTime<Utc>, wake_time: DateTime<Utc>) -> Option<f64> {
    let minutes = (wake_time - bedtime).num_minutes();
    if minutes <= 0 || minutes > 24 * 60 {
        return None;
    }
    Some((minutes as f64 / 60.0 * 100.0).round() / 100.0)
}
