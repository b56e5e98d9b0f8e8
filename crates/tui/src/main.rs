mod app;
mod debounce;
mod form;

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    sync::Mutex,
};

use tokio::sync::mpsc;
use tracing_subscriber::{prelude::*, EnvFilter};
use vjuega_core::{
    config::{self, AppConfig, CatalogSource},
    resource::{CatalogLoader, FileSource, HttpSource},
    CatalogBrowser,
};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;

    config::ensure_default_config()?;
    let config = AppConfig::load()?;
    let source = config.source()?;

    let (load_tx, load_rx) = mpsc::channel(1);
    let label = match source {
        CatalogSource::Remote(url) => {
            let label = url.clone();
            let loader = CatalogLoader::with_strategy(HttpSource::new(url), config.header_strategy);
            tokio::spawn(loader.run(load_tx));
            label
        }
        CatalogSource::File(path) => {
            let label = path.display().to_string();
            let loader = CatalogLoader::with_strategy(FileSource::new(path), config.header_strategy);
            tokio::spawn(loader.run(load_tx));
            label
        }
    };

    let mut app = app::VjuegaApp::new(CatalogBrowser::default(), label, config.debounce());
    app.attach_loader(load_rx);
    app.run().await
}

fn init_logging() -> Result<()> {
    let log_dir = std::env::current_dir()?.join("logs");
    fs::create_dir_all(&log_dir)?;
    let log_path = log_dir.join("vjuega.log");
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("failed to open {}", log_path.display()))?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // The terminal belongs to the UI, so logs only go to the file.
    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .compact()
        .with_writer(Mutex::new(log_file));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    Ok(())
}
