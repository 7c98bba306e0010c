use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tubecast_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("tubecast_api=info,tower_http=info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize the application (database, storage, media tooling, routes)
    let (_state, router) = tubecast_api::setup::initialize_app(config.clone()).await?;

    // Start the server
    tubecast_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
