use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use super::{
    calendar::{release_calendar, ReleaseEvent},
    query::{CatalogQuery, FilterCategory, Initial, YearRange},
    stats::CatalogStats,
    Catalog, Facets,
};
use crate::{
    models::{GameDraft, GameOrigin, GameRecord},
    report::LoadReport,
};

/// Thread-safe handle over the loaded catalog and the active query.
///
/// Clones share state, so a background task and the UI can hold one each.
#[derive(Clone, Default)]
pub struct CatalogBrowser {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Default)]
struct Inner {
    catalog: Catalog,
    query: CatalogQuery,
    report: Option<LoadReport>,
}

impl CatalogBrowser {
    /// Browser over `catalog` with an empty query.
    pub fn new(catalog: Catalog) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                catalog,
                query: CatalogQuery::default(),
                report: None,
            })),
        }
    }

    /// Swap in a freshly loaded catalog. The query is kept.
    pub fn replace(&self, catalog: Catalog, report: LoadReport) {
        let mut inner = self.inner.write();
        inner.catalog = catalog;
        inner.report = Some(report);
    }

    /// Report of the last load, if any.
    pub fn report(&self) -> Option<LoadReport> {
        self.inner.read().report.clone()
    }

    /// Every record in catalog order.
    pub fn records(&self) -> Vec<GameRecord> {
        self.inner.read().catalog.records().to_vec()
    }

    /// Number of records, ignoring the query.
    pub fn total(&self) -> usize {
        self.inner.read().catalog.len()
    }

    /// Records matching the active query.
    pub fn filtered(&self) -> Vec<GameRecord> {
        let inner = self.inner.read();
        inner
            .catalog
            .filter(&inner.query)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Distinct facet values.
    pub fn facets(&self) -> Facets {
        self.inner.read().catalog.facets().clone()
    }

    /// Snapshot of the active query.
    pub fn query(&self) -> CatalogQuery {
        self.inner.read().query.clone()
    }

    /// Default bounds for the year filter.
    pub fn year_bounds(&self) -> YearRange {
        self.inner.read().catalog.year_bounds()
    }

    /// Year range in effect: the explicit filter or the inferred bounds.
    pub fn effective_year_range(&self) -> YearRange {
        let inner = self.inner.read();
        inner
            .query
            .year_range
            .unwrap_or_else(|| inner.catalog.year_bounds())
    }

    /// Replace the search term.
    pub fn set_search(&self, term: impl Into<String>) {
        let term = term.into();
        debug!(term = %term, "Search updated");
        self.inner.write().query.search = term;
    }

    /// Toggle one filter value.
    pub fn toggle_filter(&self, category: FilterCategory, value: &str) {
        self.inner.write().query.toggle(category, value);
    }

    /// Clear one category.
    pub fn clear_category(&self, category: FilterCategory) {
        self.inner.write().query.clear_category(category);
    }

    /// Clear every category, the year filter and the initial. The search is kept.
    pub fn clear_filters(&self) {
        let mut inner = self.inner.write();
        inner.query.filters.clear();
        inner.query.year_range = None;
        inner.query.initial = None;
    }

    /// Set or remove the year filter.
    pub fn set_year_range(&self, range: Option<YearRange>) {
        self.inner.write().query.year_range = range;
    }

    /// Set or remove the alphabetical bucket.
    pub fn set_initial(&self, initial: Option<Initial>) {
        self.inner.write().query.initial = initial;
    }

    /// Record by slug, case-insensitively.
    pub fn find_by_slug(&self, slug: &str) -> Option<GameRecord> {
        self.inner.read().catalog.find_by_slug(slug).cloned()
    }

    /// Highlighted records in catalog order, ignoring the active query.
    pub fn highlighted(&self) -> Vec<GameRecord> {
        self.inner
            .read()
            .catalog
            .highlighted()
            .into_iter()
            .cloned()
            .collect()
    }

    /// Gallery of records with `origin`, ignoring the active query.
    pub fn by_origin(&self, origin: GameOrigin) -> Vec<GameRecord> {
        self.inner
            .read()
            .catalog
            .by_origin(origin)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Add a manually entered game; returns the stored record.
    pub fn add_game(&self, game: GameDraft) -> GameRecord {
        self.inner.write().catalog.add_game(game).clone()
    }

    /// Counts over the records matching the active query.
    pub fn stats(&self) -> CatalogStats {
        let inner = self.inner.read();
        CatalogStats::collect(inner.catalog.filter(&inner.query))
    }

    /// Release calendar over the whole catalog.
    pub fn calendar(&self) -> Vec<ReleaseEvent> {
        release_calendar(self.inner.read().catalog.records())
    }
}
