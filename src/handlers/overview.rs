use axum::{extract::State, Extension, Json};
use chrono::Utc;

use crate::auth::middleware::AuthUser;
use crate::db::records;
use crate::error::AppResult;
use crate::services::overview::{
    compose, lookback_start, Overview, OverviewSnapshot, MAX_ACTIVITIES,
};
use crate::AppState;

pub async fn get_overview(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<Overview>> {
    let calendar = state.config.calendar;
    let window_days = state.config.overview_window_days;
    let today = calendar.today(Utc::now());
    let window_start = lookback_start(today, window_days);

    // Independent reads; the streak needs every mood, not just the window.
    let (moods, journals, habits, sleeps) = tokio::try_join!(
        records::fetch_moods(&state.db, auth_user.id),
        records::fetch_recent_journals(&state.db, auth_user.id, MAX_ACTIVITIES as i64),
        records::fetch_habits(&state.db, auth_user.id),
        records::fetch_sleeps_since(&state.db, auth_user.id, calendar.start_of_day(window_start)),
    )?;

    tracing::debug!(
        user_id = %auth_user.id,
        moods = moods.len(),
        journals = journals.len(),
        habits = habits.len(),
        sleeps = sleeps.len(),
        "Composing overview"
    );

    let snapshot = OverviewSnapshot {
        moods,
        journals,
        habits,
        sleeps,
    };

    Ok(Json(compose(&calendar, &snapshot, today, window_days)))
}
