use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::auth::middleware::AuthUser;
use crate::dto::{
    CreateJournalRequest, DateRangeQuery, JournalListQuery, ListResponse, UpdateJournalRequest,
};
use crate::error::{AppError, AppResult};
use crate::models::journal::Journal;
use crate::AppState;

const DEFAULT_LIMIT: i64 = 20;

pub async fn create_journal(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<CreateJournalRequest>,
) -> AppResult<(StatusCode, Json<Journal>)> {
    body.validate()?;

    let journal = sqlx::query_as::<_, Journal>(
        r#"
        INSERT INTO journals (id, user_id, content, prompt, date)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(auth_user.id)
    .bind(&body.content)
    .bind(&body.prompt)
    .bind(body.date.unwrap_or_else(Utc::now))
    .fetch_one(&state.db)
    .await?;

    tracing::info!(user_id = %auth_user.id, journal_id = %journal.id, "Journal entry created");
    Ok((StatusCode::CREATED, Json(journal)))
}

pub async fn list_journals(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<JournalListQuery>,
) -> AppResult<Json<ListResponse<Journal>>> {
    let (start, end) = DateRangeQuery {
        from: query.from,
        to: query.to,
    }
    .bounds(&state.config.calendar);
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, 100);

    let items = sqlx::query_as::<_, Journal>(
        r#"
        SELECT * FROM journals
        WHERE user_id = $1
          AND ($2::timestamptz IS NULL OR date >= $2)
          AND ($3::timestamptz IS NULL OR date < $3)
        ORDER BY date DESC
        LIMIT $4
        "#,
    )
    .bind(auth_user.id)
    .bind(start)
    .bind(end)
    .bind(limit)
    .fetch_all(&state.db)
    .await?;

    let total = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM journals
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

pub async fn get_journal(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(journal_id): Path<Uuid>,
) -> AppResult<Json<Journal>> {
    let journal =
        sqlx::query_as::<_, Journal>("SELECT * FROM journals WHERE id = $1 AND user_id = $2")
            .bind(journal_id)
            .bind(auth_user.id)
            .fetch_optional(&state.db)
            .await?
            .ok_or(AppError::NotFound("Journal entry not found".into()))?;

    Ok(Json(journal))
}

pub async fn update_journal(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(journal_id): Path<Uuid>,
    Json(body): Json<UpdateJournalRequest>,
) -> AppResult<Json<Journal>> {
    body.validate()?;

    let journal = sqlx::query_as::<_, Journal>(
        r#"
        UPDATE journals SET
            content = COALESCE($3, content),
            prompt = COALESCE($4, prompt),
            updated_at = NOW()
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(journal_id)
    .bind(auth_user.id)
    .bind(&body.content)
    .bind(&body.prompt)
    .fetch_optional(&state.db)
    .await?
    .ok_or(AppError::NotFound("Journal entry not found".into()))?;

    Ok(Json(journal))
}

pub async fn delete_journal(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(journal_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let result = sqlx::query("DELETE FROM journals WHERE id = $1 AND user_id = $2")
        .bind(journal_id)
        .bind(auth_user.id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Journal entry not found".into()));
    }

    Ok(Json(serde_json::json!({ "deleted": true })))
}
