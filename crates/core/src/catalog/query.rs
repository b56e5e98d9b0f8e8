use std::collections::{BTreeMap, BTreeSet};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{models::GameRecord, slug::fold_accent};

static YEAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?-u:\b)[0-9]{4}(?-u:\b)").expect("invalid year regex"));

/// First standalone four-digit number in a free-text date.
pub fn extract_year(release_date: &str) -> Option<i32> {
    YEAR_RE
        .find(release_date)
        .and_then(|m| m.as_str().parse().ok())
}

/// Filterable record dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterCategory {
    /// Status label, see [`crate::models::GameStatus::label`].
    Status,
    /// Genre name.
    Genre,
    /// Platform name.
    Platform,
    /// Store name.
    Store,
}

impl FilterCategory {
    /// Every category in panel order.
    pub const ALL: [FilterCategory; 4] = [
        FilterCategory::Status,
        FilterCategory::Genre,
        FilterCategory::Platform,
        FilterCategory::Store,
    ];

    /// Label for filter panels.
    pub fn label(self) -> &'static str {
        match self {
            FilterCategory::Status => "Estado",
            FilterCategory::Genre => "Género",
            FilterCategory::Platform => "Plataforma",
            FilterCategory::Store => "Tienda",
        }
    }

    fn matches(self, record: &GameRecord, allowed: &BTreeSet<String>) -> bool {
        let game = &record.game;
        match self {
            FilterCategory::Status => allowed.contains(game.status.label()),
            FilterCategory::Genre => game.genre.iter().any(|value| allowed.contains(value)),
            FilterCategory::Platform => game.platform.iter().any(|value| allowed.contains(value)),
            FilterCategory::Store => game.stores.iter().any(|store| allowed.contains(&store.name)),
        }
    }
}

/// Inclusive range of release years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    /// First year included.
    pub min: i32,
    /// Last year included.
    pub max: i32,
}

impl YearRange {
    /// Years looked back when no record carries a year.
    pub const DEFAULT_SPAN: i32 = 40;

    /// Range with the bounds ordered.
    pub fn new(min: i32, max: i32) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Whether `year` falls inside the range.
    pub fn contains(&self, year: i32) -> bool {
        (self.min..=self.max).contains(&year)
    }

    /// Smallest range covering every extractable release year, or
    /// `current_year - 40 ..= current_year` when there is none.
    pub fn infer<'a, I>(records: I, current_year: i32) -> Self
    where
        I: IntoIterator<Item = &'a GameRecord>,
    {
        let bounds = records
            .into_iter()
            .filter_map(|record| extract_year(&record.game.release_date))
            .fold(None, |acc: Option<(i32, i32)>, year| match acc {
                Some((min, max)) => Some((min.min(year), max.max(year))),
                None => Some((year, year)),
            });
        match bounds {
            Some((min, max)) => Self { min, max },
            None => Self {
                min: current_year - Self::DEFAULT_SPAN,
                max: current_year,
            },
        }
    }
}

/// First-letter bucket used by the alphabetical index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Initial {
    /// Titles starting with this ASCII letter (uppercase), accents folded.
    Letter(char),
    /// Titles starting with anything else (`#`).
    Other,
}

impl Initial {
    /// Bucket a title falls in.
    pub fn of(title: &str) -> Self {
        let first = title
            .trim_start()
            .chars()
            .next()
            .and_then(|ch| ch.to_lowercase().next())
            .map(fold_accent);
        match first {
            Some(ch) if ch.is_ascii_lowercase() => Initial::Letter(ch.to_ascii_uppercase()),
            _ => Initial::Other,
        }
    }

    /// Key shown in the index bar.
    pub fn key(self) -> char {
        match self {
            Initial::Letter(ch) => ch,
            Initial::Other => '#',
        }
    }
}

/// Active search and filter selections.
///
/// Categories with an empty (or missing) value set do not constrain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogQuery {
    /// Case-insensitive substring searched in title, developers and description.
    pub search: String,
    /// Allowed values per category. OR within a category, AND across categories.
    pub filters: BTreeMap<FilterCategory, BTreeSet<String>>,
    /// Year filter; `Some` only when set explicitly by the user.
    pub year_range: Option<YearRange>,
    /// Alphabetical index bucket.
    pub initial: Option<Initial>,
}

impl CatalogQuery {
    /// Query that matches every record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style search term.
    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search = term.into();
        self
    }

    /// Builder-style filter value.
    pub fn with_filter(mut self, category: FilterCategory, value: impl Into<String>) -> Self {
        self.filters.entry(category).or_default().insert(value.into());
        self
    }

    /// Builder-style year filter.
    pub fn with_year_range(mut self, range: YearRange) -> Self {
        self.year_range = Some(range);
        self
    }

    /// Add `value` to a category, or remove it if already selected.
    pub fn toggle(&mut self, category: FilterCategory, value: &str) {
        let values = self.filters.entry(category).or_default();
        if !values.remove(value) {
            values.insert(value.to_string());
        }
    }

    /// Selected values of a category.
    pub fn selected(&self, category: FilterCategory) -> impl Iterator<Item = &str> {
        self.filters
            .get(&category)
            .into_iter()
            .flat_map(|values| values.iter().map(String::as_str))
    }

    /// Whether a value is selected.
    pub fn is_selected(&self, category: FilterCategory, value: &str) -> bool {
        self.filters
            .get(&category)
            .map(|values| values.contains(value))
            .unwrap_or(false)
    }

    /// Drop every selection of one category.
    pub fn clear_category(&mut self, category: FilterCategory) {
        self.filters.remove(&category);
    }

    /// Whether any category has a selection.
    pub fn has_category_filters(&self) -> bool {
        self.filters.values().any(|values| !values.is_empty())
    }

    /// Whether `record` satisfies every active predicate.
    pub fn matches(&self, record: &GameRecord) -> bool {
        self.matches_search(record)
            && self.matches_categories(record)
            && self.matches_year(record)
            && self.matches_initial(record)
    }

    fn matches_search(&self, record: &GameRecord) -> bool {
        let needle = self.search.to_lowercase();
        if needle.is_empty() {
            return true;
        }
        let game = &record.game;
        game.title.to_lowercase().contains(&needle)
            || game
                .developers
                .iter()
                .any(|dev| dev.to_lowercase().contains(&needle))
            || game.description.to_lowercase().contains(&needle)
    }

    fn matches_categories(&self, record: &GameRecord) -> bool {
        self.filters
            .iter()
            .filter(|(_, allowed)| !allowed.is_empty())
            .all(|(category, allowed)| category.matches(record, allowed))
    }

    fn matches_year(&self, record: &GameRecord) -> bool {
        match self.year_range {
            None => true,
            Some(range) => extract_year(&record.game.release_date)
                .map(|year| range.contains(year))
                .unwrap_or(false),
        }
    }

    fn matches_initial(&self, record: &GameRecord) -> bool {
        match self.initial {
            None => true,
            Some(initial) => Initial::of(&record.game.title) == initial,
        }
    }
}

/// Records satisfying `query`, in catalog order.
pub fn filter_catalog<'a>(records: &'a [GameRecord], query: &CatalogQuery) -> Vec<&'a GameRecord> {
    records.iter().filter(|record| query.matches(record)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GameDraft, GameStatus, NamedUrl};

    fn record(
        id: u32,
        title: &str,
        status: GameStatus,
        genre: &[&str],
        platform: &[&str],
        release_date: &str,
    ) -> GameRecord {
        let mut game = GameDraft::titled(title);
        game.status = status;
        game.genre = genre.iter().map(|g| g.to_string()).collect();
        game.platform = platform.iter().map(|p| p.to_string()).collect();
        game.release_date = release_date.to_string();
        GameRecord::new(id, crate::slug::slugify(title), game)
    }

    fn fixture() -> Vec<GameRecord> {
        let mut records = vec![
            record(1, "Alpha", GameStatus::Released, &["RPG"], &["PC"], "21 de Junio, 2016"),
            record(2, "Beta", GameStatus::Released, &["Puzzle"], &["Switch"], "2019"),
            record(3, "Gamma", GameStatus::InDevelopment, &["RPG", "Puzzle"], &["PC", "Switch"], "TBA"),
            record(4, "Delta", GameStatus::Canceled, &["Shooter"], &["PS4"], "03/15/2021"),
            record(5, "Épsilon", GameStatus::OnHold, &["RPG"], &["PS4", "PC"], "No especificada"),
        ];
        records[0].game.developers = vec!["Sukeban Games".to_string()];
        records[1].game.description = "Un juego de lógica".to_string();
        records[3].game.stores = vec![NamedUrl {
            name: "Steam".to_string(),
            url: "https://steam.example".to_string(),
        }];
        records
    }

    fn ids(records: &[&GameRecord]) -> Vec<u32> {
        records.iter().map(|record| record.id).collect()
    }

    #[test]
    fn extracts_first_standalone_year() {
        assert_eq!(extract_year("21 de Junio, 2016"), Some(2016));
        assert_eq!(extract_year("03/15/2021"), Some(2021));
        assert_eq!(extract_year("TBA"), None);
        assert_eq!(extract_year("12345"), None);
        assert_eq!(extract_year("Q3 2024 o 2025"), Some(2024));
    }

    #[test]
    fn empty_query_matches_everything() {
        let records = fixture();
        assert_eq!(filter_catalog(&records, &CatalogQuery::new()).len(), 5);
    }

    #[test]
    fn categories_or_within_and_across() {
        let records = fixture();

        let query = CatalogQuery::new()
            .with_filter(FilterCategory::Genre, "RPG")
            .with_filter(FilterCategory::Genre, "Puzzle");
        assert_eq!(ids(&filter_catalog(&records, &query)), vec![1, 2, 3, 5]);

        let query = query.with_filter(FilterCategory::Platform, "PC");
        assert_eq!(ids(&filter_catalog(&records, &query)), vec![1, 3, 5]);

        let query = query.with_filter(FilterCategory::Status, GameStatus::Released.label());
        assert_eq!(ids(&filter_catalog(&records, &query)), vec![1]);
    }

    #[test]
    fn combined_filters_equal_intersection_of_each() {
        let records = fixture();
        let genre = CatalogQuery::new().with_filter(FilterCategory::Genre, "RPG");
        let platform = CatalogQuery::new().with_filter(FilterCategory::Platform, "PS4");
        let combined = CatalogQuery::new()
            .with_filter(FilterCategory::Genre, "RPG")
            .with_filter(FilterCategory::Platform, "PS4");

        let expected: Vec<u32> = records
            .iter()
            .filter(|r| genre.matches(r) && platform.matches(r))
            .map(|r| r.id)
            .collect();
        assert_eq!(ids(&filter_catalog(&records, &combined)), expected);
        assert_eq!(expected, vec![5]);

        let searched = combined.clone().with_search("zzz");
        assert!(filter_catalog(&records, &searched).is_empty());
        let searched = combined.with_search("ÉPSI");
        assert_eq!(ids(&filter_catalog(&records, &searched)), vec![5]);
    }

    #[test]
    fn empty_category_set_does_not_constrain() {
        let records = fixture();
        let mut query = CatalogQuery::new().with_filter(FilterCategory::Genre, "RPG");
        query.toggle(FilterCategory::Genre, "RPG");
        assert!(!query.has_category_filters());
        assert_eq!(filter_catalog(&records, &query).len(), 5);
    }

    #[test]
    fn search_covers_title_developers_and_description() {
        let records = fixture();
        let by_dev = CatalogQuery::new().with_search("sukeban");
        assert_eq!(ids(&filter_catalog(&records, &by_dev)), vec![1]);
        let by_description = CatalogQuery::new().with_search("LÓGICA");
        assert_eq!(ids(&filter_catalog(&records, &by_description)), vec![2]);
        let by_title = CatalogQuery::new().with_search("mm");
        assert_eq!(ids(&filter_catalog(&records, &by_title)), vec![3]);
    }

    #[test]
    fn store_filter_uses_store_names() {
        let records = fixture();
        let query = CatalogQuery::new().with_filter(FilterCategory::Store, "Steam");
        assert_eq!(ids(&filter_catalog(&records, &query)), vec![4]);
    }

    #[test]
    fn year_filter_excludes_undated_records() {
        let records = fixture();
        let query = CatalogQuery::new().with_year_range(YearRange::new(2000, 2030));
        assert_eq!(ids(&filter_catalog(&records, &query)), vec![1, 2, 4]);

        let query = CatalogQuery::new().with_year_range(YearRange::new(2019, 2016));
        assert_eq!(ids(&filter_catalog(&records, &query)), vec![1, 2]);
    }

    #[test]
    fn infers_year_bounds() {
        let records = fixture();
        assert_eq!(YearRange::infer(&records, 2026), YearRange::new(2016, 2021));
        let undated = vec![record(1, "X", GameStatus::Unknown, &[], &[], "TBA")];
        assert_eq!(YearRange::infer(&undated, 2026), YearRange::new(1986, 2026));
    }

    #[test]
    fn initials_fold_accents() {
        assert_eq!(Initial::of("Épsilon"), Initial::Letter('E'));
        assert_eq!(Initial::of("alpha"), Initial::Letter('A'));
        assert_eq!(Initial::of("8-bit"), Initial::Other);
        assert_eq!(Initial::of(""), Initial::Other);

        let records = fixture();
        let query = CatalogQuery {
            initial: Some(Initial::Letter('E')),
            ..CatalogQuery::default()
        };
        assert_eq!(ids(&filter_catalog(&records, &query)), vec![5]);
    }
}
