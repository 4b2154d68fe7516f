use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::auth::middleware::AuthUser;
use crate::db::records;
use crate::dto::{CreateMoodRequest, DateRangeQuery, UpdateMoodRequest, WindowQuery};
use crate::error::{AppError, AppResult};
use crate::models::mood::Mood;
use crate::services::mood_stats::{
    insights, summarize, trend, MoodInsights, MoodStatsSummary, MoodTrendPoint,
};
use crate::AppState;

const DEFAULT_STATS_DAYS: u32 = 7;
const DEFAULT_TREND_DAYS: u32 = 7;
const DEFAULT_INSIGHT_DAYS: u32 = 30;

pub async fn create_mood(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<CreateMoodRequest>,
) -> AppResult<(StatusCode, Json<Mood>)> {
    body.validate()?;

    let mood = sqlx::query_as::<_, Mood>(
        r#"
        INSERT INTO moods (id, user_id, score, tags, note, sleep, activity, date)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(auth_user.id)
    .bind(body.score)
    .bind(body.clean_tags())
    .bind(&body.note)
    .bind(body.sleep)
    .bind(&body.activity)
    .bind(body.date.unwrap_or_else(Utc::now))
    .fetch_one(&state.db)
    .await?;

    tracing::info!(user_id = %auth_user.id, mood_id = %mood.id, "Mood logged");
    Ok((StatusCode::CREATED, Json(mood)))
}

pub async fn list_moods(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<DateRangeQuery>,
) -> AppResult<Json<Vec<Mood>>> {
    let (start, end) = query.bounds(&state.config.calendar);
    let moods = records::fetch_moods_between(&state.db, auth_user.id, start, end).await?;
    Ok(Json(moods))
}

pub async fn get_mood(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(mood_id): Path<Uuid>,
) -> AppResult<Json<Mood>> {
    let mood = sqlx::query_as::<_, Mood>("SELECT * FROM moods WHERE id = $1 AND user_id = $2")
        .bind(mood_id)
        .bind(auth_user.id)
        .fetch_optional(&state.db)
        .await?
        .ok_or(AppError::NotFound("Mood not found".into()))?;

    Ok(Json(mood))
}

pub async fn update_mood(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(mood_id): Path<Uuid>,
    Json(body): Json<UpdateMoodRequest>,
) -> AppResult<Json<Mood>> {
    body.validate()?;

    let mood = sqlx::query_as::<_, Mood>(
        r#"
        UPDATE moods SET
            score = COALESCE($3, score),
            tags = COALESCE($4, tags),
            note = COALESCE($5, note),
            updated_at = NOW()
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(mood_id)
    .bind(auth_user.id)
    .bind(body.score)
    .bind(&body.tags)
    .bind(&body.note)
    .fetch_optional(&state.db)
    .await?
    .ok_or(AppError::NotFound("Mood not found".into()))?;

    Ok(Json(mood))
}

pub async fn delete_mood(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(mood_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let result = sqlx::query("DELETE FROM moods WHERE id = $1 AND user_id = $2")
        .bind(mood_id)
        .bind(auth_user.id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Mood not found".into()));
    }

    Ok(Json(serde_json::json!({ "deleted": true })))
}

/// Moods from the last `days` days under the service calendar.
async fn moods_in_window(state: &AppState, user_id: Uuid, days: u32) -> AppResult<Vec<Mood>> {
    let calendar = state.config.calendar;
    let today = calendar.today(Utc::now());
    let first_day = today.days_before(days - 1).unwrap_or(today);
    let moods =
        records::fetch_moods_between(&state.db, user_id, Some(calendar.start_of_day(first_day)), None)
            .await?;
    Ok(moods)
}

pub async fn get_mood_stats(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<WindowQuery>,
) -> AppResult<Json<MoodStatsSummary>> {
    let moods = moods_in_window(&state, auth_user.id, query.days_or(DEFAULT_STATS_DAYS)).await?;
    Ok(Json(summarize(&moods)))
}

pub async fn get_mood_trend(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<WindowQuery>,
) -> AppResult<Json<Vec<MoodTrendPoint>>> {
    let days = query.days_or(DEFAULT_TREND_DAYS);
    let moods = moods_in_window(&state, auth_user.id, days).await?;
    let calendar = state.config.calendar;
    Ok(Json(trend(&calendar, &moods, days, calendar.today(Utc::now()))))
}

pub async fn get_mood_insights(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<WindowQuery>,
) -> AppResult<Json<MoodInsights>> {
    let days = query.days_or(DEFAULT_INSIGHT_DAYS);
    let moods = moods_in_window(&state, auth_user.id, days).await?;
    let calendar = state.config.calendar;
    Ok(Json(insights(&calendar, &moods, days, calendar.today(Utc::now()))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_windows() {
        let query: WindowQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.days_or(DEFAULT_STATS_DAYS), 7);
        assert_eq!(query.days_or(DEFAULT_TREND_DAYS), 7);
        assert_eq!(query.days_or(DEFAULT_INSIGHT_DAYS), 30);
    }
}
