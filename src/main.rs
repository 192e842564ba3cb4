use std::net::SocketAddr;
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;

use sproutvest_backend::app;
use sproutvest_backend::auth::AuthConfig;
use sproutvest_backend::external::price_provider::PriceProvider;
use sproutvest_backend::external::simulated::SimulatedProvider;
use sproutvest_backend::logging::{init_logging, LoggingConfig};
use sproutvest_backend::services::job_scheduler_service::JobSchedulerService;
use sproutvest_backend::state::{AppState, TradingConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    init_logging(LoggingConfig::from_env())?;

    let database_url = std::env::var("DATABASE_URL")?;
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let provider_name =
        std::env::var("PRICE_PROVIDER").unwrap_or_else(|_| "simulated".to_string());
    let provider: Arc<dyn PriceProvider> = match provider_name.to_lowercase().as_str() {
        "simulated" => {
            tracing::info!("📊 Using price provider: simulated random walk");
            Arc::new(SimulatedProvider::new())
        }
        other => {
            return Err(format!("Invalid PRICE_PROVIDER: {}. Must be 'simulated'", other).into());
        }
    };

    let auth = AuthConfig::from_env()?;
    let trading = TradingConfig::from_env()?;

    let mut scheduler = JobSchedulerService::new(Arc::new(pool.clone())).await?;
    scheduler.start().await?;

    let state = AppState {
        pool,
        price_provider: provider,
        auth,
        trading,
    };
    let app = app::create_app(state);

    let port: u16 = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse()?;
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🚀 Sproutvest backend running at http://{}/", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
