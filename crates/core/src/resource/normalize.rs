//! Typed extraction of one spreadsheet row.

use serde_json::Value;
use tracing::debug;

use super::columns::{self, split_list, ColumnLookup};
use crate::models::{
    GameDraft, GameOrigin, GameStatus, NamedUrl, UNSPECIFIED_ENGINE, UNSPECIFIED_RELEASE_DATE,
};

/// Turn a row lookup into a draft, or `None` when the row has no title.
pub fn normalize_row(row: &ColumnLookup) -> Option<GameDraft> {
    let Some(title) = row.text(columns::TITLE_COLUMN) else {
        debug!("Skipping row without a title");
        return None;
    };

    Some(GameDraft {
        platform: row.list(columns::PLATFORM_COLUMN),
        genre: row.list(columns::GENRE_COLUMN),
        developers: row.list(columns::DEVELOPERS_COLUMN),
        publishers: row.list(columns::PUBLISHERS_COLUMN),
        release_date: row
            .text(columns::RELEASE_DATE_COLUMN)
            .unwrap_or_else(|| UNSPECIFIED_RELEASE_DATE.to_string()),
        last_update_date: row.text(columns::LAST_UPDATE_COLUMN),
        status: GameStatus::classify(row.raw(columns::STATUS_COLUMN)),
        origin: GameOrigin::classify(row.raw(columns::ORIGIN_COLUMN)),
        stores: parse_stores(row),
        links: parse_links(row),
        press_kit_url: row.text(columns::PRESS_KIT_COLUMN),
        pitch: row.text(columns::PITCH_COLUMN),
        funding: row.text(columns::FUNDING_COLUMN),
        engine: row
            .text(columns::ENGINE_COLUMN)
            .unwrap_or_else(|| UNSPECIFIED_ENGINE.to_string()),
        languages: row.list(columns::LANGUAGES_COLUMN),
        image_url: row.text(columns::MINI_IMAGE_COLUMN),
        image_cover: row.text(columns::COVER_COLUMN),
        image_hero: row.text(columns::HERO_COLUMN),
        trailer_url: row.text(columns::TRAILER_COLUMN),
        description: row.text(columns::DESCRIPTION_COLUMN).unwrap_or_default(),
        is_highlighted: parse_flag(row.raw(columns::HIGHLIGHTED_COLUMN)),
        highlight_reason: row.text(columns::HIGHLIGHT_REASON_COLUMN),
        screenshots: parse_screenshots(row.raw(columns::SCREENSHOTS_COLUMN).unwrap_or_default()),
        title,
    })
}

/// `true` only for a cell that uppercases to exactly `TRUE`.
pub fn parse_flag(raw: Option<&str>) -> bool {
    raw.map(|value| value.to_uppercase() == "TRUE")
        .unwrap_or(false)
}

/// Screenshot cell: a JSON array of strings or a comma-separated list.
///
/// Bracketed input that is not a JSON array falls back to comma splitting
/// of the whole cell.
pub fn parse_screenshots(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    if trimmed.starts_with('[') && trimmed.ends_with(']') {
        if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(trimmed) {
            return items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .map(str::to_string)
                .collect();
        }
    }

    split_list(trimmed)
}

fn parse_stores(row: &ColumnLookup) -> Vec<NamedUrl> {
    columns::STORE_COLUMNS
        .iter()
        .filter_map(|name| {
            row.text(name).map(|url| NamedUrl {
                name: name.to_string(),
                url,
            })
        })
        .collect()
}

fn parse_links(row: &ColumnLookup) -> Vec<NamedUrl> {
    row.link_columns()
        .into_iter()
        .filter_map(|(name_column, url_column)| {
            let name = row.text(name_column)?;
            let url = row.text(&url_column)?;
            Some(NamedUrl { name, url })
        })
        .collect()
}
