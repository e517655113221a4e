use anyhow::Context;

use ewaste_api::app::{self, services::AppServices};
use ewaste_infra::{AppConfig, load_assets};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    ewaste_observability::init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    let assets = load_assets(&config).context("failed to load disposal data")?;
    tracing::info!(
        records = assets.kb.len(),
        labels = assets.labels.len(),
        classifier = assets.classifier.name(),
        "assets loaded"
    );

    let app = app::build_app(AppServices::new(&assets, &config));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
