//! DeepSearch-RS server entry point

use anyhow::Result;
use deepsearch_rs::{
    config::Settings,
    model::OpenAiChatModel,
    web::{create_router, AppState},
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    info!("Starting DeepSearch-RS v{}", deepsearch_rs::VERSION);

    let settings = load_settings()?;
    info!(
        provider = %settings.search.provider,
        default_provider = %settings.search.default_provider,
        "Loaded configuration"
    );

    // Fail now, not on the first request, when the model key is absent
    let model = Arc::new(OpenAiChatModel::new(
        &settings.model.base_url,
        &settings.model.api_key,
    )?);
    info!(base_url = %settings.model.base_url, "Model client initialized");

    let addr = SocketAddr::new(settings.server.bind_address.parse()?, settings.server.port);
    let state = AppState::new(settings, model);
    let app = create_router(state);

    info!("Listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Load settings from file or use defaults
fn load_settings() -> Result<Settings> {
    // Explicit path wins
    if let Ok(path) = std::env::var("DEEPSEARCH_SETTINGS_PATH") {
        let path = PathBuf::from(path);
        if path.exists() {
            info!("Loading settings from: {}", path.display());
            let mut settings = Settings::from_file(&path)?;
            settings.merge_env();
            return Ok(settings);
        }
    }

    let paths = [
        PathBuf::from("settings.yml"),
        PathBuf::from("config/settings.yml"),
        PathBuf::from("/etc/deepsearch/settings.yml"),
    ];
    for path in paths.iter() {
        if path.exists() {
            info!("Loading settings from: {}", path.display());
            let mut settings = Settings::from_file(path)?;
            settings.merge_env();
            return Ok(settings);
        }
    }

    info!("No settings file found, using defaults");
    let mut settings = Settings::default();
    settings.merge_env();
    Ok(settings)
}
