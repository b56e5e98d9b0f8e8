//! Catalog retrieval and ingestion.

/// Column names and per-row lookups.
pub mod columns;
/// Raw CSV sources.
pub mod fetch;
/// Table parsing, header discovery and the ingestion pass.
pub mod loader;
/// Per-row field extraction.
pub mod normalize;

pub use columns::{ColumnLookup, HeaderStrategy};
pub use fetch::{CsvSource, FileSource, HttpSource, InlineSource};
pub use loader::{ingest, locate_header, parse_table, CatalogLoader, Ingested, LoadEvent};
pub use normalize::normalize_row;
