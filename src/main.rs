use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use minibase::config::AppConfig;
use minibase::database::init_db;
use minibase::seed::seed_reference_data;
use minibase::state::AppState;
use minibase::storage::ImageStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load()?;

    let db = init_db(&config.database.url).await?;
    seed_reference_data(&db).await?;

    let images = Arc::new(ImageStore::new(PathBuf::from(&config.images.root)).await?);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState { db, images, config };
    let app = minibase::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server running at http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
