use anyhow::Result;
use geopulse_api::{build_app, ApiConfig};
use geopulse_observability::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("geopulse_api");

    let config = ApiConfig::from_env();
    let app = build_app(&config).await?;

    let listener = tokio::net::TcpListener::bind(&config.bind).await?;
    tracing::info!(
        bind = %config.bind,
        sqlite = config.database_url.is_some(),
        seeded = config.seed_on_start,
        "geopulse api started"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
