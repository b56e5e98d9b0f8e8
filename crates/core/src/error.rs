//! Failure classes surfaced by a catalog load.

use std::path::PathBuf;

use thiserror::Error;

/// Terminal load failures. Everything else is absorbed during normalisation.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The remote CSV export could not be retrieved.
    #[error("failed to download catalog CSV: {0}")]
    Http(#[from] reqwest::Error),
    /// A local CSV file could not be read.
    #[error("failed to read catalog CSV {}: {source}", path.display())]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// No row starts with the anchor column name.
    #[error("no header row starting with \"{anchor}\" found in catalog CSV")]
    HeaderNotFound {
        /// Anchor text that was searched for.
        anchor: &'static str,
    },
}

impl CatalogError {
    /// Whether the failure happened while retrieving the raw text.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Io { .. })
    }
}
