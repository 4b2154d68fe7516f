use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use crate::auth::middleware::AuthUser;
use crate::db::records;
use crate::dto::{
    CreateHabitRequest, ListHabitsQuery, ListResponse, ToggleHabitRequest, UpdateHabitRequest,
};
use crate::error::{AppError, AppResult};
use crate::models::habit::{icon_for_category, Habit};
use crate::services::completion::{any_habit_days, is_completed_on, toggle_day};
use crate::services::overview::HabitSummary;
use crate::services::streak::{current_streak, habit_streak, longest_streak};
use crate::AppState;

/// A habit with the annotations the caller asked for.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitListItem {
    #[serde(flatten)]
    pub habit: Habit,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub streak: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longest_streak: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitStatsResponse {
    pub total: usize,
    pub completed_today: usize,
    /// Consecutive days on which at least one habit was completed
    pub streak: u32,
    pub habits: Vec<HabitSummary>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleHabitResponse {
    pub completed: bool,
    pub day: String,
    pub habit: HabitSummary,
}

pub async fn list_habits(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<ListHabitsQuery>,
) -> AppResult<Json<ListResponse<HabitListItem>>> {
    let calendar = state.config.calendar;
    let today = calendar.today(Utc::now());
    let habits = records::fetch_habits(&state.db, auth_user.id).await?;

    let items: Vec<HabitListItem> = habits
        .into_iter()
        .map(|mut habit| {
            habit.icon_name = Some(habit.resolved_icon());
            let markers = &habit.completed_dates;
            HabitListItem {
                streak: query
                    .include_streak
                    .then(|| habit_streak(&calendar, markers, today)),
                longest_streak: query
                    .include_streak
                    .then(|| longest_streak(&calendar.collect_day_keys(markers))),
                completed: query
                    .include_completed
                    .then(|| is_completed_on(&calendar, markers, today)),
                habit,
            }
        })
        .collect();

    Ok(Json(ListResponse {
        total: items.len() as i64,
        items,
    }))
}

pub async fn get_habit_stats(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<HabitStatsResponse>> {
    let calendar = state.config.calendar;
    let today = calendar.today(Utc::now());
    let habits = records::fetch_habits(&state.db, auth_user.id).await?;

    let completed_today = habits
        .iter()
        .filter(|h| is_completed_on(&calendar, &h.completed_dates, today))
        .count();
    let streak = current_streak(&any_habit_days(&calendar, &habits), today);

    Ok(Json(HabitStatsResponse {
        total: habits.len(),
        completed_today,
        streak,
        habits: habits
            .into_iter()
            .map(|h| HabitSummary::build(&calendar, h, today))
            .collect(),
    }))
}

pub async fn get_habit(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(habit_id): Path<Uuid>,
) -> AppResult<Json<HabitSummary>> {
    let calendar = state.config.calendar;
    let habit = records::fetch_habit(&state.db, auth_user.id, habit_id)
        .await?
        .ok_or(AppError::NotFound("Habit not found".into()))?;

    Ok(Json(HabitSummary::build(
        &calendar,
        habit,
        calendar.today(Utc::now()),
    )))
}

pub async fn create_habit(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<CreateHabitRequest>,
) -> AppResult<(StatusCode, Json<Habit>)> {
    body.validate()?;

    let habit = sqlx::query_as::<_, Habit>(
        r#"
        INSERT INTO habits (id, user_id, name, category, icon_name, goal, completed_dates)
        VALUES ($1, $2, $3, $4, $5, $6, '{}')
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(auth_user.id)
    .bind(body.name.trim())
    .bind(&body.category)
    .bind(icon_for_category(
        body.category.as_deref(),
        body.icon_name.as_deref(),
    ))
    .bind(body.goal.unwrap_or(1))
    .fetch_one(&state.db)
    .await?;

    tracing::info!(user_id = %auth_user.id, habit_id = %habit.id, "Habit created");
    Ok((StatusCode::CREATED, Json(habit)))
}

pub async fn update_habit(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(habit_id): Path<Uuid>,
    Json(body): Json<UpdateHabitRequest>,
) -> AppResult<Json<Habit>> {
    body.validate()?;

    let habit = sqlx::query_as::<_, Habit>(
        r#"
        UPDATE habits SET
            name = COALESCE($3, name),
            category = COALESCE($4, category),
            icon_name = COALESCE($5, icon_name),
            goal = COALESCE($6, goal),
            updated_at = NOW()
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(habit_id)
    .bind(auth_user.id)
    .bind(body.name.as_deref().map(str::trim))
    .bind(&body.category)
    .bind(&body.icon_name)
    .bind(body.goal)
    .fetch_optional(&state.db)
    .await?
    .ok_or(AppError::NotFound("Habit not found".into()))?;

    Ok(Json(habit))
}

pub async fn delete_habit(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(habit_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let result = sqlx::query("DELETE FROM habits WHERE id = $1 AND user_id = $2")
        .bind(habit_id)
        .bind(auth_user.id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Habit not found".into()));
    }

    Ok(Json(serde_json::json!({ "deleted": true })))
}

/// Add or remove one day from a habit's completion markers.
///
/// The read-modify-write runs in a transaction holding the row lock, so two
/// toggles for the same habit cannot interleave.
pub async fn toggle_habit(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(habit_id): Path<Uuid>,
    body: Bytes,
) -> AppResult<Json<ToggleHabitResponse>> {
    let calendar = state.config.calendar;
    let today = calendar.today(Utc::now());
    let body = ToggleHabitRequest::from_body(&body)
        .map_err(|e| AppError::Validation(format!("Invalid toggle request: {e}")))?;
    let day = match body.date.as_deref() {
        Some(raw) => calendar.parse_day_key(raw)?,
        None => today,
    };

    let mut tx = state.db.begin().await?;

    let mut habit = sqlx::query_as::<_, Habit>(
        "SELECT * FROM habits WHERE id = $1 AND user_id = $2 FOR UPDATE",
    )
    .bind(habit_id)
    .bind(auth_user.id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(AppError::NotFound("Habit not found".into()))?;

    let completed = toggle_day(&calendar, &mut habit.completed_dates, day);

    let habit = sqlx::query_as::<_, Habit>(
        r#"
        UPDATE habits SET completed_dates = $2, updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(habit.id)
    .bind(&habit.completed_dates)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(
        user_id = %auth_user.id,
        habit_id = %habit_id,
        day = %day,
        completed,
        "Habit toggled"
    );

    Ok(Json(ToggleHabitResponse {
        completed,
        day: day.to_string(),
        habit: HabitSummary::build(&calendar, habit, today),
    }))
}
