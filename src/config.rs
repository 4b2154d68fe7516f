use std::env;

use anyhow::Context;

use crate::services::day_key::DayCalendar;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub frontend_url: String,
    pub cors_extra_origins: Vec<String>,

    pub jwt_secret: String,

    /// Day boundary shared by every streak and trend computation
    pub calendar: DayCalendar,
    pub overview_window_days: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let calendar_raw = get("DAY_BOUNDARY_OFFSET").unwrap_or_else(|| "+00:00".into());

        Ok(Self {
            database_url: get("DATABASE_URL").context("DATABASE_URL must be set")?,
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: get("PORT")
                .unwrap_or_else(|| "8080".into())
                .parse()
                .context("PORT must be a number")?,
            frontend_url: get("FRONTEND_URL")
                .unwrap_or_else(|| "http://localhost:3000".into()),
            cors_extra_origins: get("CORS_EXTRA_ORIGINS")
                .map(|raw| {
                    raw.split(',')
                        .map(|o| o.trim().to_string())
                        .filter(|o| !o.is_empty())
                        .collect()
                })
                .unwrap_or_default(),

            jwt_secret: get("JWT_SECRET").context("JWT_SECRET must be set")?,

            calendar: DayCalendar::from_offset_str(&calendar_raw)
                .context("DAY_BOUNDARY_OFFSET is invalid")?,
            overview_window_days: get("OVERVIEW_WINDOW_DAYS")
                .unwrap_or_else(|| "7".into())
                .parse::<u32>()
                .context("OVERVIEW_WINDOW_DAYS must be a number")?
                .clamp(1, 90),
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
