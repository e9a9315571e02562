use anyhow::{bail, Context, Result};
use std::str::FromStr;

/// Token lifetimes are limited to one hour up to a year.
const JWT_TTL_HOURS_RANGE: std::ops::RangeInclusive<i64> = 1..=8760;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
    pub http_host: String,
    pub http_port: u16,
    pub cors_allowed_origins: String,
}

impl AppConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        let jwt_ttl_hours = parsed("JWT_TTL_HOURS", 24)?;
        if !JWT_TTL_HOURS_RANGE.contains(&jwt_ttl_hours) {
            bail!(
                "JWT_TTL_HOURS must be between {} and {}, got {}",
                JWT_TTL_HOURS_RANGE.start(),
                JWT_TTL_HOURS_RANGE.end(),
                jwt_ttl_hours
            );
        }

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            database_max_connections: parsed("DATABASE_MAX_CONNECTIONS", 5)?,
            jwt_secret: required("JWT_SECRET")?,
            jwt_ttl_hours,
            http_host: std::env::var("HTTP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            http_port: parsed("HTTP_PORT", 8000)?,
            cors_allowed_origins: std::env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| {
                "http://localhost:3000,http://127.0.0.1:3000".to_string()
            }),
        })
    }

    pub fn http_addr(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }
}

fn required(name: &str) -> Result<String> {
    std::env::var(name).with_context(|| format!("{} must be set", name))
}

fn parsed<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {:?}", name, value)),
        Err(_) => Ok(default),
    }
}
