#![warn(clippy::all, missing_docs)]

//! Core domain logic for the Venezuelan video game catalog.
//!
//! This crate hosts the data models, configuration handling, CSV
//! ingestion and the catalog query model used by the terminal UI and
//! any future frontends.

pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod report;
pub mod resource;
pub mod slug;

pub use catalog::{Catalog, CatalogBrowser, CatalogQuery, FilterCategory, YearRange};
pub use config::{AppConfig, CatalogSource};
pub use error::CatalogError;
pub use models::{GameDraft, GameOrigin, GameRecord, GameStatus, NamedUrl};
pub use report::LoadReport;
pub use resource::{CatalogLoader, LoadEvent};
