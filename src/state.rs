use crate::{
    config::AppConfig,
    db::{self, DbPool},
    error::AppError,
};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub db: DbPool,
}

impl AppState {
    pub fn new(config: AppConfig, db: DbPool) -> Self {
        Self { config, db }
    }

    /// Opens the pool described by `config` and brings the schema up to date.
    pub async fn connect(config: AppConfig) -> Result<Self, AppError> {
        let db = db::init_pool(&config.database_url, config.max_connections).await?;
        db::run_migrations(&db).await?;
        Ok(Self::new(config, db))
    }
}
