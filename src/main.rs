use tokio::net::TcpListener;
use tracing::info;

use allocation_engine::api::{AppState, create_router};
use allocation_engine::config::ConfigLoader;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let config_dir = std::env::var("ALLOCATION_ENGINE_CONFIG")
        .unwrap_or_else(|_| "./config/default".into());
    let config = ConfigLoader::load(&config_dir)?;
    let bind = config.bind_address().to_string();

    info!("loaded planner '{}' from {config_dir}", config.metadata().name);
    info!("  developers: {}", config.seed().developers.len());
    info!("  allocations: {}", config.seed().allocations.len());
    info!("  max_apply_attempts: {}", config.max_apply_attempts());

    let router = create_router(AppState::new(config));
    let listener = TcpListener::bind(&bind).await?;
    info!("allocation-engine listening on {bind}");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down");
        })
        .await?;
    Ok(())
}
