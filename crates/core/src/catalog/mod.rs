//! In-memory catalog, derived indexes and queries.

/// Shared browsing state over a catalog.
pub mod browser;
/// Release calendar built from parseable release dates.
pub mod calendar;
/// Search and filter predicates.
pub mod query;
/// Counts for statistics views.
pub mod stats;

use chrono::{Datelike, Local};
use serde::Serialize;
use tracing::info;

pub use browser::CatalogBrowser;
pub use query::{extract_year, filter_catalog, CatalogQuery, FilterCategory, Initial, YearRange};

use crate::{
    models::{GameDraft, GameOrigin, GameRecord},
    slug::SlugRegistry,
};

/// Distinct values present across the catalog, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Facets {
    /// Every genre.
    pub genres: Vec<String>,
    /// Every platform.
    pub platforms: Vec<String>,
    /// Every store name.
    pub stores: Vec<String>,
}

impl Facets {
    /// Collect facets from `records`.
    pub fn collect(records: &[GameRecord]) -> Self {
        let mut facets = Self::default();
        for record in records {
            push_distinct(&mut facets.genres, &record.game.genre);
            push_distinct(&mut facets.platforms, &record.game.platform);
            for store in &record.game.stores {
                push_distinct(&mut facets.stores, std::slice::from_ref(&store.name));
            }
        }
        facets
    }

    /// Values offered for a filter category. Status values are the fixed labels.
    pub fn values(&self, category: FilterCategory) -> Vec<String> {
        match category {
            FilterCategory::Status => crate::models::GameStatus::ALL
                .iter()
                .map(|status| status.label().to_string())
                .collect(),
            FilterCategory::Genre => self.genres.clone(),
            FilterCategory::Platform => self.platforms.clone(),
            FilterCategory::Store => self.stores.clone(),
        }
    }
}

fn push_distinct(target: &mut Vec<String>, values: &[String]) {
    for value in values {
        if !target.contains(value) {
            target.push(value.clone());
        }
    }
}

/// The full ordered record set plus indexes derived from it.
#[derive(Debug, Clone)]
pub struct Catalog {
    records: Vec<GameRecord>,
    facets: Facets,
    year_bounds: YearRange,
    current_year: i32,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::from_records(Vec::new())
    }
}

impl Catalog {
    /// Wrap ingested records and derive indexes.
    pub fn from_records(records: Vec<GameRecord>) -> Self {
        Self::with_current_year(records, Local::now().year())
    }

    /// Like [`Catalog::from_records`] with a fixed "now" for the year fallback.
    pub fn with_current_year(records: Vec<GameRecord>, current_year: i32) -> Self {
        let mut catalog = Self {
            records,
            facets: Facets::default(),
            year_bounds: YearRange::new(current_year, current_year),
            current_year,
        };
        catalog.reindex();
        catalog
    }

    fn reindex(&mut self) {
        self.facets = Facets::collect(&self.records);
        self.year_bounds = YearRange::infer(&self.records, self.current_year);
    }

    /// All records, newest additions first, then sheet order.
    pub fn records(&self) -> &[GameRecord] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the catalog has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct genres, platforms and stores.
    pub fn facets(&self) -> &Facets {
        &self.facets
    }

    /// Default year-filter bounds inferred from release dates.
    pub fn year_bounds(&self) -> YearRange {
        self.year_bounds
    }

    /// Records satisfying `query`.
    pub fn filter(&self, query: &CatalogQuery) -> Vec<&GameRecord> {
        filter_catalog(&self.records, query)
    }

    /// Record routed to by `slug`, compared case-insensitively.
    pub fn find_by_slug(&self, slug: &str) -> Option<&GameRecord> {
        let wanted = slug.to_lowercase();
        self.records
            .iter()
            .find(|record| record.slug.to_lowercase() == wanted)
    }

    /// Featured records.
    pub fn highlighted(&self) -> Vec<&GameRecord> {
        self.records
            .iter()
            .filter(|record| record.game.is_highlighted)
            .collect()
    }

    /// Records with the given origin.
    pub fn by_origin(&self, origin: GameOrigin) -> Vec<&GameRecord> {
        self.records
            .iter()
            .filter(|record| record.game.origin == Some(origin))
            .collect()
    }

    /// Add a manually entered game at the front of the catalog.
    ///
    /// The slug is made unique against every existing slug and the id is one
    /// past the current maximum.
    pub fn add_game(&mut self, game: GameDraft) -> &GameRecord {
        let mut slugs =
            SlugRegistry::seeded(self.records.iter().map(|record| record.slug.clone()));
        let slug = slugs.assign(&game.title);
        let id = self
            .records
            .iter()
            .map(|record| record.id)
            .max()
            .map_or(1, |max| max + 1);

        info!(id, slug = %slug, title = %game.title, "Game added");
        self.records.insert(0, GameRecord::new(id, slug, game));
        self.reindex();
        &self.records[0]
    }
}
