use anyhow::Context;
use kanban_core::{
    config::{self, ServerConfig},
    server, AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match config::config_path(std::env::args().nth(1)) {
        Some(path) => config::load_config(&path),
        None => ServerConfig::default(),
    }
    .with_overrides(|key| std::env::var(key).ok());

    log::info!("Using {:?} storage", config.storage);
    let storage = config::open_storage(&config.storage)
        .await
        .context("Failed to open storage")?;

    server::serve(&config.bind_address, config.port, AppState::new(storage))
        .await
        .with_context(|| format!("Server on {}:{} failed", config.bind_address, config.port))?;
    Ok(())
}
