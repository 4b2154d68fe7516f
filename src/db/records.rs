//! Read queries shared by several handlers.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::habit::Habit;
use crate::models::journal::Journal;
use crate::models::mood::Mood;
use crate::models::sleep::Sleep;

/// All of a user's moods, newest first.
pub async fn fetch_moods(db: &PgPool, user_id: Uuid) -> Result<Vec<Mood>, sqlx::Error> {
    sqlx::query_as::<_, Mood>("SELECT * FROM moods WHERE user_id = $1 ORDER BY date DESC")
        .bind(user_id)
        .fetch_all(db)
        .await
}

/// Moods in `[start, end)`, newest first. Open bounds are unbounded.
pub async fn fetch_moods_between(
    db: &PgPool,
    user_id: Uuid,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> Result<Vec<Mood>, sqlx::Error> {
    sqlx::query_as::<_, Mood>(
        r#"
        SELECT * FROM moods
        WHERE user_id = $1
          AND ($2::timestamptz IS NULL OR date >= $2)
          AND ($3::timestamptz IS NULL OR date < $3)
        ORDER BY date DESC
        "#,
    )
    .bind(user_id)
    .bind(start)
    .bind(end)
    .fetch_all(db)
    .await
}

/// The user's most recently created journals.
pub async fn fetch_recent_journals(
    db: &PgPool,
    user_id: Uuid,
    limit: i64,
) -> Result<Vec<Journal>, sqlx::Error> {
    sqlx::query_as::<_, Journal>(
        "SELECT * FROM journals WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2",
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(db)
    .await
}

/// All of a user's habits, by name.
pub async fn fetch_habits(db: &PgPool, user_id: Uuid) -> Result<Vec<Habit>, sqlx::Error> {
    sqlx::query_as::<_, Habit>(
        "SELECT * FROM habits WHERE user_id = $1 ORDER BY name ASC, created_at ASC",
    )
    .bind(user_id)
    .fetch_all(db)
    .await
}

pub async fn fetch_habit(
    db: &PgPool,
    user_id: Uuid,
    habit_id: Uuid,
) -> Result<Option<Habit>, sqlx::Error> {
    sqlx::query_as::<_, Habit>("SELECT * FROM habits WHERE id = $1 AND user_id = $2")
        .bind(habit_id)
        .bind(user_id)
        .fetch_optional(db)
        .await
}

/// Sleeps dated at or after `since`, newest first.
pub async fn fetch_sleeps_since(
    db: &PgPool,
    user_id: Uuid,
    since: DateTime<Utc>,
) -> Result<Vec<Sleep>, sqlx::Error> {
    sqlx::query_as::<_, Sleep>(
        "SELECT * FROM sleeps WHERE user_id = $1 AND date >= $2 ORDER BY date DESC",
    )
    .bind(user_id)
    .bind(since)
    .fetch_all(db)
    .await
}
