#![allow(missing_docs)]

//! Column names of the community spreadsheet and per-row lookups.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Anchor column: the header row is the first row whose first cell equals this.
pub const TITLE_COLUMN: &str = "Título del videojuego";
pub const PLATFORM_COLUMN: &str = "Plataforma(s)";
pub const GENRE_COLUMN: &str = "Género(s)";
pub const DEVELOPERS_COLUMN: &str = "Desarrollador(es)";
pub const PUBLISHERS_COLUMN: &str = "Distribuidor";
pub const RELEASE_DATE_COLUMN: &str = "Fecha de lanzamiento";
pub const LAST_UPDATE_COLUMN: &str = "Última actualización";
pub const STATUS_COLUMN: &str = "Estado actual";
pub const PRESS_KIT_COLUMN: &str = "Presskit";
pub const PITCH_COLUMN: &str = "Pitch";
pub const FUNDING_COLUMN: &str = "Financiamiento";
pub const ENGINE_COLUMN: &str = "Motor";
pub const ORIGIN_COLUMN: &str = "Origen inicial";
pub const LANGUAGES_COLUMN: &str = "Idioma(s) disponible(s)";
pub const HIGHLIGHTED_COLUMN: &str = "Destacado";
pub const HIGHLIGHT_REASON_COLUMN: &str = "Descripción del Destacado";
pub const HERO_COLUMN: &str = "Hero";
pub const COVER_COLUMN: &str = "Portada";
pub const MINI_IMAGE_COLUMN: &str = "Mini Image";
pub const TRAILER_COLUMN: &str = "Trailer";
pub const SCREENSHOTS_COLUMN: &str = "Screenshots";
pub const DESCRIPTION_COLUMN: &str = "Descripción";

/// Store columns, in the order stores are listed on a record.
pub const STORE_COLUMNS: [&str; 10] = [
    "Steam",
    "Itch",
    "Nintendo Shop",
    "PlayStation Store",
    "Microsoft Store",
    "Play Store",
    "App Store",
    "Meta",
    "GOG",
    "Tienda externa",
];

/// Column order of the first published sheet, used by [`HeaderStrategy::Legacy`].
pub const LEGACY_HEADERS: [&str; 37] = [
    TITLE_COLUMN,
    PLATFORM_COLUMN,
    GENRE_COLUMN,
    DEVELOPERS_COLUMN,
    PUBLISHERS_COLUMN,
    RELEASE_DATE_COLUMN,
    LAST_UPDATE_COLUMN,
    STATUS_COLUMN,
    "Tiendas",
    "Enlace(s)",
    PRESS_KIT_COLUMN,
    PITCH_COLUMN,
    FUNDING_COLUMN,
    ENGINE_COLUMN,
    ORIGIN_COLUMN,
    LANGUAGES_COLUMN,
    HIGHLIGHTED_COLUMN,
    HIGHLIGHT_REASON_COLUMN,
    "steam_appid",
    "google_appid",
    "Enlace directo",
    "Steam",
    "GOG",
    "Itch",
    "Nintendo Shop",
    "PlayStation Store",
    "Microsoft Store",
    "Play Store",
    "App Store",
    "Meta",
    "Tienda externa",
    HERO_COLUMN,
    COVER_COLUMN,
    MINI_IMAGE_COLUMN,
    TRAILER_COLUMN,
    SCREENSHOTS_COLUMN,
    DESCRIPTION_COLUMN,
];

const LINK_PREFIX: &str = "Link";
const LINK_NAME_SUFFIX: &str = "Name";
const LINK_URL_SUFFIX: &str = "URL";

/// How data cells are matched to column names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderStrategy {
    /// Use the cells of the discovered header row. Tolerates reordered or inserted columns.
    #[default]
    Discovered,
    /// Assume the fixed [`LEGACY_HEADERS`] order regardless of the header row.
    Legacy,
}

/// Column-name to cell lookup for one data row.
///
/// Keeps column order so link pairs come out in sheet order.
#[derive(Debug, Clone, Default)]
pub struct ColumnLookup {
    cells: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl ColumnLookup {
    /// Pair header names with row cells. Empty header names are skipped; a
    /// repeated name keeps its first position but takes the later cell.
    pub fn from_headers<H: AsRef<str>>(headers: &[H], row: &[String]) -> Self {
        let mut lookup = Self::default();
        for (header, cell) in headers.iter().zip(row) {
            let header = header.as_ref();
            if header.is_empty() {
                continue;
            }
            match lookup.index.get(header) {
                Some(&position) => lookup.cells[position].1 = cell.clone(),
                None => {
                    lookup.index.insert(header.to_string(), lookup.cells.len());
                    lookup.cells.push((header.to_string(), cell.clone()));
                }
            }
        }
        lookup
    }

    /// Build the lookup according to `strategy`.
    pub fn build(strategy: HeaderStrategy, header_row: &[String], row: &[String]) -> Self {
        match strategy {
            HeaderStrategy::Discovered => Self::from_headers(header_row, row),
            HeaderStrategy::Legacy => Self::from_headers(&LEGACY_HEADERS, row),
        }
    }

    /// Raw cell value, untrimmed.
    pub fn raw(&self, column: &str) -> Option<&str> {
        self.index
            .get(column)
            .map(|&position| self.cells[position].1.as_str())
    }

    /// Trimmed cell value; `None` when absent or blank.
    pub fn text(&self, column: &str) -> Option<String> {
        self.raw(column)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    }

    /// Comma-separated list cell.
    pub fn list(&self, column: &str) -> Vec<String> {
        split_list(self.raw(column).unwrap_or_default())
    }

    /// `(name, url)` column pairs following the `Link*Name` / `Link*URL` convention.
    pub fn link_columns(&self) -> Vec<(&str, String)> {
        self.cells
            .iter()
            .map(|(name, _)| name.as_str())
            .filter(|name| name.starts_with(LINK_PREFIX) && name.ends_with(LINK_NAME_SUFFIX))
            .map(|name| (name, name.replacen(LINK_NAME_SUFFIX, LINK_URL_SUFFIX, 1)))
            .collect()
    }

    #[cfg(test)]
    fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }
}

/// Split on commas, trim each segment and drop empty ones. Order and
/// duplicates are preserved.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}
