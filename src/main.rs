use trip_planner::config::AppConfig;
use trip_planner::error::AppError;
use trip_planner::state::AppState;
use tracing::{error, info};

const TABLES: [&str; 5] = [
    "users",
    "trips",
    "activities",
    "categories",
    "activities_meetings",
];

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_logging();

    let config = AppConfig::from_env()?;
    let state = match AppState::connect(config).await {
        Ok(state) => state,
        Err(err) => {
            error!("database setup failed: {err:?}");
            return Err(err);
        }
    };
    info!("schema ready at {}", state.config.database_url);

    for table in TABLES {
        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&state.db)
            .await?;
        info!("{table}: {count} rows");
    }

    state.db.close().await;
    Ok(())
}

fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);
    let filter_layer = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,trip_planner=debug".into());

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
