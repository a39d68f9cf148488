use std::env;

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://trips.db".to_string());
        let max_connections = parse_max_connections(env::var("DB_MAX_CONNECTIONS").ok())?;

        Ok(Self {
            database_url,
            max_connections,
        })
    }
}

fn parse_max_connections(raw: Option<String>) -> Result<u32, AppError> {
    match raw {
        None => Ok(10),
        Some(value) => match value.trim().parse::<u32>() {
            Ok(0) => Err(AppError::Config(
                "DB_MAX_CONNECTIONS must be at least 1".to_string(),
            )),
            Ok(n) => Ok(n),
            Err(err) => Err(AppError::Config(format!(
                "invalid DB_MAX_CONNECTIONS: {err}"
            ))),
        },
    }
}
