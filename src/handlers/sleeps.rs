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
use crate::dto::{
    paging, CreateSleepRequest, DateRangeQuery, ListResponse, SleepFactQuery, SleepListQuery,
    UpdateSleepRequest, WindowQuery,
};
use crate::error::{AppError, AppResult};
use crate::models::sleep::{hours_between, Sleep};
use crate::services::sleep_facts::{random_fact, SleepFact};
use crate::services::sleep_stats::{summarize_sleep, SleepSummary};
use crate::AppState;

const DEFAULT_PAGE_SIZE: i64 = 30;
const DEFAULT_STATS_DAYS: u32 = 7;

pub async fn create_sleep(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<CreateSleepRequest>,
) -> AppResult<(StatusCode, Json<Sleep>)> {
    body.validate()?;
    body.validate_interval().map_err(AppError::Validation)?;

    let duration = body
        .duration
        .or_else(|| hours_between(body.bedtime, body.wake_time));

    let sleep = sqlx::query_as::<_, Sleep>(
        r#"
        INSERT INTO sleeps (id, user_id, bedtime, wake_time, duration, quality, notes, date)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(auth_user.id)
    .bind(body.bedtime)
    .bind(body.wake_time)
    .bind(duration)
    .bind(body.quality)
    .bind(&body.notes)
    .bind(body.date.unwrap_or(body.wake_time))
    .fetch_one(&state.db)
    .await?;

    tracing::info!(user_id = %auth_user.id, sleep_id = %sleep.id, "Sleep logged");
    Ok((StatusCode::CREATED, Json(sleep)))
}

pub async fn list_sleeps(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<SleepListQuery>,
) -> AppResult<Json<ListResponse<Sleep>>> {
    let (start, end) = DateRangeQuery {
        from: query.from,
        to: query.to,
    }
    .bounds(&state.config.calendar);
    let (limit, offset) = paging(query.limit, query.page, DEFAULT_PAGE_SIZE);

    let items = sqlx::query_as::<_, Sleep>(
        r#"
        SELECT * FROM sleeps
        WHERE user_id = $1
          AND ($2::timestamptz IS NULL OR date >= $2)
          AND ($3::timestamptz IS NULL OR date < $3)
        ORDER BY date DESC
        LIMIT $4 OFFSET $5
        "#,
    )
    .bind(auth_user.id)
    .bind(start)
    .bind(end)
    .bind(limit)
    .bind(offset)
    .fetch_all(&state.db)
    .await?;

    let total = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM sleeps
        WHERE user_id = $1
          AND ($2::timestamptz IS NULL OR date >= $2)
          AND ($3::timestamptz IS NULL OR date < $3)
        "#,
    )
    .bind(auth_user.id)
    .bind(start)
    .bind(end)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(ListResponse { items, total }))
}

pub async fn get_sleep(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(sleep_id): Path<Uuid>,
) -> AppResult<Json<Sleep>> {
    let sleep = sqlx::query_as::<_, Sleep>("SELECT * FROM sleeps WHERE id = $1 AND user_id = $2")
        .bind(sleep_id)
        .bind(auth_user.id)
        .fetch_optional(&state.db)
        .await?
        .ok_or(AppError::NotFound("Sleep entry not found".into()))?;

    Ok(Json(sleep))
}

pub async fn update_sleep(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(sleep_id): Path<Uuid>,
    Json(body): Json<UpdateSleepRequest>,
) -> AppResult<Json<Sleep>> {
    body.validate()?;

    let existing =
        sqlx::query_as::<_, Sleep>("SELECT * FROM sleeps WHERE id = $1 AND user_id = $2")
            .bind(sleep_id)
            .bind(auth_user.id)
            .fetch_optional(&state.db)
            .await?
            .ok_or(AppError::NotFound("Sleep entry not found".into()))?;

    let bedtime = body.bedtime.unwrap_or(existing.bedtime);
    let wake_time = body.wake_time.unwrap_or(existing.wake_time);
    if wake_time <= bedtime {
        return Err(AppError::Validation("wakeTime must be after bedtime".into()));
    }

    // Re-derive the duration when the interval moved and none was supplied.
    let interval_changed = body.bedtime.is_some() || body.wake_time.is_some();
    let duration = match body.duration {
        Some(d) => Some(d),
        None if interval_changed => hours_between(bedtime, wake_time),
        None => existing.duration,
    };

    let sleep = sqlx::query_as::<_, Sleep>(
        r#"
        UPDATE sleeps SET
            bedtime = $3,
            wake_time = $4,
            duration = $5,
            quality = COALESCE($6, quality),
            notes = COALESCE($7, notes),
            updated_at = NOW()
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(sleep_id)
    .bind(auth_user.id)
    .bind(bedtime)
    .bind(wake_time)
    .bind(duration)
    .bind(body.quality)
    .bind(&body.notes)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(sleep))
}

pub async fn delete_sleep(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(sleep_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let result = sqlx::query("DELETE FROM sleeps WHERE id = $1 AND user_id = $2")
        .bind(sleep_id)
        .bind(auth_user.id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Sleep entry not found".into()));
    }

    Ok(Json(serde_json::json!({ "deleted": true })))
}

pub async fn get_sleep_stats(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<WindowQuery>,
) -> AppResult<Json<SleepSummary>> {
    let calendar = state.config.calendar;
    let today = calendar.today(Utc::now());
    let days = query.days_or(DEFAULT_STATS_DAYS);
    let first_day = today.days_before(days - 1).unwrap_or(today);

    let sleeps =
        records::fetch_sleeps_since(&state.db, auth_user.id, calendar.start_of_day(first_day))
            .await?;

    Ok(Json(summarize_sleep(&calendar, &sleeps, today)))
}

pub async fn get_sleep_fact(
    Query(query): Query<SleepFactQuery>,
) -> AppResult<Json<&'static SleepFact>> {
    let fact = random_fact(query.category.as_deref(), &mut rand::thread_rng())
        .ok_or(AppError::NotFound("No sleep facts available".into()))?;
    Ok(Json(fact))
}
