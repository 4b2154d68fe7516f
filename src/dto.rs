//! # AuraTrack: Request/Response DTOs
//!
//! API contract types shared by the handlers.
//!
//! Conventions:
//! - `*Request`  → deserialized from client JSON body
//! - `*Query`    → deserialized from query params
//! - `*Response` → serialized to client JSON
//! - Field names are camelCase on the wire
//! - Field-level validation is expressed via `validator` derive macros

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::services::day_key::DayCalendar;

// ============================================================================
// Common
// ============================================================================

/// Paged or unpaged list envelope
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub total: i64,
}

/// `from`/`to` day filter, both inclusive
#[derive(Debug, Default, Deserialize)]
pub struct DateRangeQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRangeQuery {
    /// Translate the inclusive day range into a half-open instant range
    /// `[start, end)` under the service calendar.
    pub fn bounds(&self, calendar: &DayCalendar) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
        use crate::services::day_key::DayKey;

        let start = self.from.map(|d| calendar.start_of_day(DayKey::from_date(d)));
        let end = self
            .to
            .and_then(|d| DayKey::from_date(d).succ())
            .map(|d| calendar.start_of_day(d));
        (start, end)
    }
}

/// `days` window for aggregate endpoints
#[derive(Debug, Default, Deserialize)]
pub struct WindowQuery {
    pub days: Option<u32>,
}

impl WindowQuery {
    pub const MAX_DAYS: u32 = 90;

    /// Requested window clamped to `1..=MAX_DAYS`.
    pub fn days_or(&self, default: u32) -> u32 {
        self.days.unwrap_or(default).clamp(1, Self::MAX_DAYS)
    }
}

// ============================================================================
// Moods
// ============================================================================

/// POST /api/moods
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMoodRequest {
    #[validate(range(min = 1, max = 10, message = "Score must be 1-10"))]
    pub score: i32,

    #[validate(length(max = 20, message = "At most 20 tags"))]
    #[serde(default)]
    pub tags: Vec<String>,

    #[validate(length(max = 5000, message = "Note must be under 5000 characters"))]
    pub note: Option<String>,

    /// Hours slept the night before
    #[validate(range(min = 0.0, max = 24.0, message = "Sleep must be 0-24 hours"))]
    pub sleep: Option<f64>,

    #[validate(length(max = 200))]
    pub activity: Option<String>,

    /// Default: now
    pub date: Option<DateTime<Utc>>,
}

/// PATCH /api/moods/{id}
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateMoodRequest {
    #[validate(range(min = 1, max = 10, message = "Score must be 1-10"))]
    pub score: Option<i32>,

    #[validate(length(max = 20, message = "At most 20 tags"))]
    pub tags: Option<Vec<String>>,

    #[validate(length(max = 5000, message = "Note must be under 5000 characters"))]
    pub note: Option<String>,
}

// ============================================================================
// Habits
// ============================================================================

/// POST /api/habits
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateHabitRequest {
    #[validate(
        length(min = 1, max = 200, message = "Name must be 1-200 characters"),
        custom = "not_blank"
    )]
    pub name: String,

    #[validate(length(max = 50))]
    pub category: Option<String>,

    /// Icon key (e.g., "brain"). Default: derived from category
    #[validate(length(max = 50))]
    pub icon_name: Option<String>,

    /// Completions per day. Default: 1
    #[validate(range(min = 1, max = 100, message = "Goal must be 1-100"))]
    pub goal: Option<i32>,
}

/// PATCH /api/habits/{id}: partial update, all fields optional
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateHabitRequest {
    #[validate(
        length(min = 1, max = 200, message = "Name must be 1-200 characters"),
        custom = "not_blank"
    )]
    pub name: Option<String>,

    #[validate(length(max = 50))]
    pub category: Option<String>,

    #[validate(length(max = 50))]
    pub icon_name: Option<String>,

    #[validate(range(min = 1, max = 100, message = "Goal must be 1-100"))]
    pub goal: Option<i32>,
}

/// POST /api/habits/{id}/toggle
#[derive(Debug, Default, Deserialize)]
pub struct ToggleHabitRequest {
    /// Any date-like marker; default: today
    pub date: Option<String>,
}

/// GET /api/habits query params
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListHabitsQuery {
    #[serde(default)]
    pub include_streak: bool,
    #[serde(default)]
    pub include_completed: bool,
}

// ============================================================================
// Journals
// ============================================================================

/// POST /api/journals
#[derive(Debug, Deserialize, Validate)]
pub struct CreateJournalRequest {
    #[validate(length(min = 1, max = 20000, message = "Content must be 1-20000 characters"))]
    pub content: String,

    #[validate(length(max = 500))]
    pub prompt: Option<String>,

    /// Default: now
    pub date: Option<DateTime<Utc>>,
}

/// PATCH /api/journals/{id}
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateJournalRequest {
    #[validate(length(min = 1, max = 20000, message = "Content must be 1-20000 characters"))]
    pub content: Option<String>,

    #[validate(length(max = 500))]
    pub prompt: Option<String>,
}

/// GET /api/journals query params
#[derive(Debug, Default, Deserialize)]
pub struct JournalListQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub limit: Option<i64>,
}

// ============================================================================
// Sleep
// ============================================================================

/// POST /api/sleeps
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSleepRequest {
    pub bedtime: DateTime<Utc>,
    pub wake_time: DateTime<Utc>,

    /// Hours; derived from bedtime/wakeTime when absent
    #[validate(range(min = 0.0, max = 24.0, message = "Duration must be 0-24 hours"))]
    pub duration: Option<f64>,

    #[validate(range(min = 1, max = 10, message = "Quality must be 1-10"))]
    pub quality: Option<i32>,

    #[validate(length(max = 1000, message = "Notes must be under 1000 characters"))]
    pub notes: Option<String>,

    /// Default: now
    pub date: Option<DateTime<Utc>>,
}

/// PATCH /api/sleeps/{id}
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSleepRequest {
    pub bedtime: Option<DateTime<Utc>>,
    pub wake_time: Option<DateTime<Utc>>,

    #[validate(range(min = 0.0, max = 24.0, message = "Duration must be 0-24 hours"))]
    pub duration: Option<f64>,

    #[validate(range(min = 1, max = 10, message = "Quality must be 1-10"))]
    pub quality: Option<i32>,

    #[validate(length(max = 1000, message = "Notes must be under 1000 characters"))]
    pub notes: Option<String>,
}

/// GET /api/sleeps query params
#[derive(Debug, Default, Deserialize)]
pub struct SleepListQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub limit: Option<i64>,
    pub page: Option<i64>,
}

/// GET /api/sleeps/fact query params
#[derive(Debug, Default, Deserialize)]
pub struct SleepFactQuery {
    pub category: Option<String>,
}

// ============================================================================
// Validation helpers
// ============================================================================

/// Rejects names that are empty once trimmed
fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Must not be blank".into());
        return Err(err);
    }
    Ok(())
}

impl ToggleHabitRequest {
    /// An empty body toggles today; anything else must parse.
    pub fn from_body(body: &[u8]) -> Result<Self, serde_json::Error> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body)
    }
}

impl CreateSleepRequest {
    /// Wake time must come after bedtime
    pub fn validate_interval(&self) -> Result<(), String> {
        if self.wake_time <= self.bedtime {
            return Err("wakeTime must be after bedtime".into());
        }
        Ok(())
    }
}

impl CreateMoodRequest {
    /// Trimmed, non-empty tags in submission order
    pub fn clean_tags(&self) -> Vec<String> {
        self.tags
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Clamp `limit`/`page` into a sane `(limit, offset)` pair.
pub fn paging(limit: Option<i64>, page: Option<i64>, default_limit: i64) -> (i64, i64) {
    let limit = limit.unwrap_or(default_limit).clamp(1, 100);
    let page = page.unwrap_or(1).max(1);
    (limit, (page - 1) * limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_mood_score_range_validated() {
        let ok: CreateMoodRequest = serde_json::from_str(r#"{"score":10}"#).unwrap();
        assert!(ok.validate().is_ok());
        assert!(ok.tags.is_empty());

        let bad: CreateMoodRequest = serde_json::from_str(r#"{"score":11}"#).unwrap();
        assert!(bad.validate().is_err());
        let zero: CreateMoodRequest = serde_json::from_str(r#"{"score":0}"#).unwrap();
        assert!(zero.validate().is_err());
    }

    #[test]
    fn test_mood_missing_score_fails() {
        assert!(serde_json::from_str::<CreateMoodRequest>(r#"{"tags":["a"]}"#).is_err());
    }

    #[test]
    fn test_clean_tags() {
        let req: CreateMoodRequest =
            serde_json::from_str(r#"{"score":5,"tags":[" work ","","family"]}"#).unwrap();
        assert_eq!(req.clean_tags(), vec!["work", "family"]);
    }

    #[test]
    fn test_habit_request_camel_case() {
        let req: CreateHabitRequest =
            serde_json::from_str(r#"{"name":"Read","iconName":"book-open","goal":2}"#).unwrap();
        assert_eq!(req.icon_name.as_deref(), Some("book-open"));
        assert!(req.validate().is_ok());

        let empty: CreateHabitRequest = serde_json::from_str(r#"{"name":""}"#).unwrap();
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_sleep_interval() {
        let json = r#"{"bedtime":"2026-10-18T23:00:00Z","wakeTime":"2026-10-19T07:00:00Z","quality":8}"#;
        let req: CreateSleepRequest = serde_json::from_str(json).unwrap();
        assert!(req.validate().is_ok());
        assert!(req.validate_interval().is_ok());

        let inverted = r#"{"bedtime":"2026-10-19T07:00:00Z","wakeTime":"2026-10-18T23:00:00Z"}"#;
        let req: CreateSleepRequest = serde_json::from_str(inverted).unwrap();
        assert!(req.validate_interval().is_err());
    }

    #[test]
    fn test_sleep_quality_range() {
        let json = r#"{"bedtime":"2026-10-18T23:00:00Z","wakeTime":"2026-10-19T07:00:00Z","quality":11}"#;
        let req: CreateSleepRequest = serde_json::from_str(json).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_window_clamped() {
        assert_eq!(WindowQuery { days: None }.days_or(7), 7);
        assert_eq!(WindowQuery { days: Some(0) }.days_or(7), 1);
        assert_eq!(WindowQuery { days: Some(365) }.days_or(7), WindowQuery::MAX_DAYS);
    }

    #[test]
    fn test_paging() {
        assert_eq!(paging(None, None, 30), (30, 0));
        assert_eq!(paging(Some(10), Some(3), 30), (10, 20));
        assert_eq!(paging(Some(0), Some(-2), 30), (1, 0));
        assert_eq!(paging(Some(1000), None, 30), (100, 0));
    }

    #[test]
    fn test_date_range_bounds_are_half_open() {
        let cal = DayCalendar::from_offset_str("+02:00").unwrap();
        let q = DateRangeQuery {
            from: NaiveDate::from_ymd_opt(2026, 10, 1),
            to: NaiveDate::from_ymd_opt(2026, 10, 19),
        };
        let (start, end) = q.bounds(&cal);
        assert_eq!(start, Some(Utc.with_ymd_and_hms(2026, 9, 30, 22, 0, 0).unwrap()));
        assert_eq!(end, Some(Utc.with_ymd_and_hms(2026, 10, 19, 22, 0, 0).unwrap()));
        assert_eq!(DateRangeQuery::default().bounds(&cal), (None, None));
    }

    #[test]
    fn test_list_habits_query_defaults() {
        let q: ListHabitsQuery = serde_json::from_str("{}").unwrap();
        assert!(!q.include_streak);
        assert!(!q.include_completed);
    }

    #[test]
    fn test_blank_habit_name_rejected() {
        let create: CreateHabitRequest = serde_json::from_str(r#"{"name":"   "}"#).unwrap();
        assert!(create.validate().is_err());

        let update: UpdateHabitRequest = serde_json::from_str(r#"{"name":" \t "}"#).unwrap();
        assert!(update.validate().is_err());

        let untouched: UpdateHabitRequest = serde_json::from_str(r#"{"goal":3}"#).unwrap();
        assert!(untouched.validate().is_ok());
    }

    #[test]
    fn test_toggle_body_parsing() {
        assert!(ToggleHabitRequest::from_body(b"").unwrap().date.is_none());
        assert!(ToggleHabitRequest::from_body(b" \n").unwrap().date.is_none());
        assert!(ToggleHabitRequest::from_body(b"{}").unwrap().date.is_none());
        assert_eq!(
            ToggleHabitRequest::from_body(br#"{"date":"2026-10-19"}"#)
                .unwrap()
                .date
                .as_deref(),
            Some("2026-10-19")
        );
        assert!(ToggleHabitRequest::from_body(br#"{"date":20261019}"#).is_err());
        assert!(ToggleHabitRequest::from_body(b"{not json").is_err());
    }
}
