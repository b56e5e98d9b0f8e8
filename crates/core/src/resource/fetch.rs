use std::{future::Future, path::PathBuf};

use tracing::info;

use crate::error::CatalogError;

/// Anything that can produce the raw catalog CSV text.
pub trait CsvSource: Send + Sync {
    /// Human-readable location, used in logs and load reports.
    fn describe(&self) -> String;

    /// Retrieve the full CSV text. Called once per load; never retried.
    fn fetch(&self) -> impl Future<Output = Result<String, CatalogError>> + Send;
}

/// Downloads the published spreadsheet export over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSource {
    /// Source for the given export URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

impl CsvSource for HttpSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    async fn fetch(&self) -> Result<String, CatalogError> {
        info!(url = %self.url, "Downloading catalog CSV");
        let response = self.client.get(&self.url).send().await?;
        let body = response.error_for_status()?.text().await?;
        Ok(body)
    }
}

/// Reads the CSV export from a local file.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Source for the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CsvSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<String, CatalogError> {
        info!(path = %self.path.display(), "Reading catalog CSV");
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| CatalogError::Io {
                path: self.path.clone(),
                source,
            })
    }
}

/// CSV text already held in memory.
#[derive(Debug, Clone)]
pub struct InlineSource {
    label: String,
    text: String,
}

impl InlineSource {
    /// Wrap `text`, reported as `label`.
    pub fn new(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
        }
    }
}

impl CsvSource for InlineSource {
    fn describe(&self) -> String {
        self.label.clone()
    }

    async fn fetch(&self) -> Result<String, CatalogError> {
        Ok(self.text.clone())
    }
}
