use dotenvy::dotenv;
use jlearn_backend::{
    config::AppConfig,
    store::DocumentStore,
    web_server::{run_server, AppState},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // --- Setup ---
    dotenv().ok();

    // 1. Initialize structured logging; RUST_LOG overrides the default filter.
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("jlearn_backend=info,tower_http=info")),
        )
        .init();

    // 2. Load configuration and open the document store once for the process lifetime.
    let app_config = AppConfig::from_env()?;
    let store = DocumentStore::connect(&app_config.database).await?;
    store.ping().await?;
    tracing::info!("Pinged the document store. Successfully connected!");

    let app_state = AppState {
        store: store.clone(),
        app_config,
    };

    // --- Run Server ---
    tracing::info!("Initializing server...");
    let served = run_server(app_state).await;

    store.close().await;
    tracing::info!("Document store closed.");

    served?;
    Ok(())
}
