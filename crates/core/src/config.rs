//! Application configuration.
//!
//! Values are layered: built-in defaults, then `config.toml` in the user
//! configuration directory, then `VJUEGA_*` environment variables.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{anyhow, Context, Result};
use reqwest::Url;
use serde::Deserialize;
use tracing::info;

use crate::resource::HeaderStrategy;

const APP_DIR: &str = "vjuega";
const CONFIG_FILE: &str = "config.toml";
const ENV_PREFIX: &str = "VJUEGA";
const DEFAULT_SHEET_NAME: &str = "Juegos";
const DEFAULT_DEBOUNCE_MS: u64 = 300;

const DEFAULT_CONFIG: &str = r#"# vjuega configuration
#
# Where the catalog CSV comes from. The first one set wins:
#   csv_path        local CSV export
#   csv_url         any URL serving the CSV export
#   spreadsheet_id  published Google Sheet, exported through gviz
#
# csv_path = "/path/to/juegos.csv"
# csv_url = "https://example.com/juegos.csv"
# spreadsheet_id = ""
sheet_name = "Juegos"

# "discovered" reads column names from the sheet's header row.
# "legacy" assumes the original fixed column order.
header_strategy = "discovered"

# Delay before a typed search is applied, in milliseconds.
search_debounce_ms = 300
"#;

/// Where the catalog CSV is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// Download from this URL.
    Remote(String),
    /// Read this local file.
    File(PathBuf),
}

/// Runtime settings.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    /// Published Google Sheet id.
    pub spreadsheet_id: Option<String>,
    /// Sheet name used with `spreadsheet_id`.
    pub sheet_name: String,
    /// Explicit CSV URL.
    pub csv_url: Option<String>,
    /// Local CSV file.
    pub csv_path: Option<PathBuf>,
    /// How header names are matched to cells.
    pub header_strategy: HeaderStrategy,
    /// Search debounce in milliseconds.
    pub search_debounce_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: None,
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            csv_url: None,
            csv_path: None,
            header_strategy: HeaderStrategy::default(),
            search_debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

impl AppConfig {
    /// Load from the user configuration file and the environment.
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path()?)
    }

    /// Load from `path` (which may be missing) and the environment.
    pub fn load_from(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .set_default("sheet_name", DEFAULT_SHEET_NAME)?
            .set_default("header_strategy", "discovered")?
            .set_default("search_debounce_ms", DEFAULT_DEBOUNCE_MS)?
            .add_source(config::File::from(path.to_path_buf()).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()
            .with_context(|| format!("failed to read configuration from {}", path.display()))?;

        let config: Self = settings
            .try_deserialize()
            .context("invalid configuration")?;
        info!(path = %path.display(), strategy = ?config.header_strategy, "Configuration loaded");
        Ok(config)
    }

    /// Resolve the configured catalog location.
    pub fn source(&self) -> Result<CatalogSource> {
        if let Some(path) = &self.csv_path {
            return Ok(CatalogSource::File(path.clone()));
        }
        if let Some(url) = non_empty(self.csv_url.as_deref()) {
            return Ok(CatalogSource::Remote(url.to_string()));
        }
        if let Some(id) = non_empty(self.spreadsheet_id.as_deref()) {
            return Ok(CatalogSource::Remote(gviz_csv_url(id, &self.sheet_name)?));
        }
        Err(anyhow!(
            "no catalog source configured; set csv_path, csv_url or spreadsheet_id in {}",
            config_path()
                .map(|path| path.display().to_string())
                .unwrap_or_else(|_| CONFIG_FILE.to_string())
        ))
    }

    /// Search debounce as a duration.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// CSV export URL of a published Google Sheet.
pub fn gviz_csv_url(spreadsheet_id: &str, sheet_name: &str) -> Result<String> {
    let mut url = Url::parse(&format!(
        "https://docs.google.com/spreadsheets/d/{}/gviz/tq?tqx=out:csv",
        spreadsheet_id.trim()
    ))
    .with_context(|| format!("invalid spreadsheet id {spreadsheet_id:?}"))?;
    url.query_pairs_mut().append_pair("sheet", sheet_name);
    Ok(url.to_string())
}

/// Path of the user configuration file.
pub fn config_path() -> Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| anyhow!("no configuration directory"))?;
    Ok(base.join(APP_DIR).join(CONFIG_FILE))
}

/// Write the commented template if no configuration file exists yet.
pub fn ensure_default_config() -> Result<PathBuf> {
    let path = config_path()?;
    ensure_default_config_at(&path)?;
    Ok(path)
}

/// Write the commented template at `path` unless the file exists.
pub fn ensure_default_config_at(path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), "Wrote default configuration");
    Ok(())
}
