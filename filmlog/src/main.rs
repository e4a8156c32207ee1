//! filmlog - movie-collection chat service
//!
//! Startup order: tracing, configuration, database pool, conversation
//! engine, HTTP chat gateway.

use anyhow::Result;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use filmlog::config::Config;
use filmlog::engine::ConversationEngine;
use filmlog::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting filmlog chat service");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = Config::load();
    info!("Database: {}", config.db_path.display());

    let db_pool = filmlog::db::init_database_pool(&config.db_path).await?;
    info!("Database connection established");

    let engine = ConversationEngine::new(db_pool, config.tmdb_api_key.clone());
    let state = AppState::new(engine);
    let app = filmlog::build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("Listening on http://{}", config.bind_addr);
    info!("Health check: http://{}/health", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
