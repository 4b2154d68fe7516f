use anyhow::Context;
use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod auth;
mod config;
mod db;
mod dto;
mod error;
mod handlers;
mod models;
mod services;

use config::Config;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<Config>,
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = std::iter::once(&config.frontend_url)
        .chain(config.cors_extra_origins.iter())
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(hv) => Some(hv),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring unparsable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}

pub fn build_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/readyz", get(handlers::health::readyz));

    let protected_routes = Router::new()
        // Dashboard
        .route("/api/overview", get(handlers::overview::get_overview))
        // Moods
        .route(
            "/api/moods",
            get(handlers::moods::list_moods).post(handlers::moods::create_mood),
        )
        .route("/api/moods/stats", get(handlers::moods::get_mood_stats))
        .route("/api/moods/trend", get(handlers::moods::get_mood_trend))
        .route("/api/moods/insights", get(handlers::moods::get_mood_insights))
        .route(
            "/api/moods/:id",
            get(handlers::moods::get_mood)
                .patch(handlers::moods::update_mood)
                .delete(handlers::moods::delete_mood),
        )
        // Habits
        .route(
            "/api/habits",
            get(handlers::habits::list_habits).post(handlers::habits::create_habit),
        )
        .route("/api/habits/stats", get(handlers::habits::get_habit_stats))
        .route(
            "/api/habits/:id",
            get(handlers::habits::get_habit)
                .patch(handlers::habits::update_habit)
                .delete(handlers::habits::delete_habit),
        )
        .route("/api/habits/:id/toggle", post(handlers::habits::toggle_habit))
        // Journals
        .route(
            "/api/journals",
            get(handlers::journals::list_journals).post(handlers::journals::create_journal),
        )
        .route(
            "/api/journals/:id",
            get(handlers::journals::get_journal)
                .patch(handlers::journals::update_journal)
                .delete(handlers::journals::delete_journal),
        )
        // Sleep
        .route(
            "/api/sleeps",
            get(handlers::sleeps::list_sleeps).post(handlers::sleeps::create_sleep),
        )
        .route("/api/sleeps/stats", get(handlers::sleeps::get_sleep_stats))
        .route("/api/sleeps/fact", get(handlers::sleeps::get_sleep_fact))
        .route(
            "/api/sleeps/:id",
            get(handlers::sleeps::get_sleep)
                .patch(handlers::sleeps::update_sleep)
                .delete(handlers::sleeps::delete_sleep),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::middleware::require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(cors_layer(&state.config))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "auratrack_api=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    let config = Arc::new(Config::from_env()?);

    let db = db::create_pool(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    sqlx::migrate!("./migrations")
        .run(&db)
        .await
        .context("Failed to run database migrations")?;

    tracing::info!("Database migrations applied");

    let state = AppState {
        db,
        config: config.clone(),
    };
    let app = build_router(state);

    let addr = config.listen_addr();
    tracing::info!(
        %addr,
        day_boundary = %config.calendar.offset(),
        "Starting server"
    );

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::test_tokens::sign;
    use crate::auth::jwt::TokenType;
    use crate::services::day_key::DayCalendar;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;
    use uuid::Uuid;

    const SECRET: &str = "router-test-secret";

    fn test_state() -> AppState {
        let config = Config {
            database_url: "postgres://localhost:1/unreachable".into(),
            host: "127.0.0.1".into(),
            port: 0,
            frontend_url: "http://localhost:3000".into(),
            cors_extra_origins: vec![],
            jwt_secret: SECRET.into(),
            calendar: DayCalendar::utc(),
            overview_window_days: 7,
        };
        let db = PgPoolOptions::new()
            .connect_lazy(&config.database_url)
            .unwrap();
        AppState {
            db,
            config: Arc::new(config),
        }
    }

    fn bearer(token_type: TokenType) -> String {
        format!("Bearer {}", sign(Uuid::new_v4(), token_type, 3600, SECRET))
    }

    async fn send(req: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = build_router(test_state()).oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_health() {
        let (status, json) = send(
            Request::get("/health").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["service"], "auratrack-api");
    }

    #[tokio::test]
    async fn test_overview_requires_token() {
        let (status, json) = send(
            Request::get("/api/overview").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["error"]["code"], 401);
    }

    #[tokio::test]
    async fn test_garbage_token_rejected() {
        let (status, _) = send(
            Request::get("/api/overview")
                .header("Authorization", "Bearer not-a-jwt")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_refresh_token_rejected() {
        let (status, _) = send(
            Request::get("/api/overview")
                .header("Authorization", bearer(TokenType::Refresh))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_out_of_range_mood_rejected_before_storage() {
        let (status, json) = send(
            Request::post("/api/moods")
                .header("Authorization", bearer(TokenType::Access))
                .header("Content-Type", "application/json")
                .body(Body::from(r#"{"score":11}"#))
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["error"]["code"], 422);
    }

    #[tokio::test]
    async fn test_toggle_with_bad_date_rejected() {
        let path = format!("/api/habits/{}/toggle", Uuid::new_v4());
        let (status, _) = send(
            Request::post(path.as_str())
                .header("Authorization", bearer(TokenType::Access))
                .header("Content-Type", "application/json")
                .body(Body::from(r#"{"date":"someday"}"#))
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_toggle_with_mistyped_date_rejected() {
        let path = format!("/api/habits/{}/toggle", Uuid::new_v4());
        let (status, json) = send(
            Request::post(path.as_str())
                .header("Authorization", bearer(TokenType::Access))
                .header("Content-Type", "application/json")
                .body(Body::from(r#"{"date":20261019}"#))
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["error"]["code"], 422);
    }

    #[tokio::test]
    async fn test_toggle_with_malformed_body_rejected() {
        let path = format!("/api/habits/{}/toggle", Uuid::new_v4());
        let (status, _) = send(
            Request::post(path.as_str())
                .header("Authorization", bearer(TokenType::Access))
                .header("Content-Type", "application/json")
                .body(Body::from("{\"date\":"))
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_blank_habit_name_rejected_before_storage() {
        let (status, _) = send(
            Request::post("/api/habits")
                .header("Authorization", bearer(TokenType::Access))
                .header("Content-Type", "application/json")
                .body(Body::from(r#"{"name":"   "}"#))
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_sleep_fact_by_category() {
        let (status, json) = send(
            Request::get("/api/sleeps/fact?category=tips")
                .header("Authorization", bearer(TokenType::Access))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["category"], "tips");
        assert!(json["fact"].as_str().is_some_and(|f| !f.is_empty()));
    }
}
