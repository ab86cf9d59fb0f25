use media_toolkit_api::{app, ApiConfig};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "media_toolkit_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ApiConfig::from_env();
    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;

    info!(
        "media-toolkit API listening on http://{}",
        config.bind_addr()
    );

    axum::serve(listener, app(&config)).await?;
    Ok(())
}
