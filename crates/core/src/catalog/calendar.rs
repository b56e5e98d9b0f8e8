use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::models::GameRecord;

static NUMERIC_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{4})$").expect("invalid release date regex")
});

/// A game placed on the release calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseEvent {
    /// Release day.
    pub date: NaiveDate,
    /// Slug of the released game.
    pub slug: String,
    /// Title of the released game.
    pub title: String,
}

/// Parse a `month/day/year` release date. Anything else, including
/// impossible dates, yields `None`.
pub fn parse_release_date(raw: &str) -> Option<NaiveDate> {
    let caps = NUMERIC_DATE_RE.captures(raw.trim())?;
    let month = caps[1].parse().ok()?;
    let day = caps[2].parse().ok()?;
    let year = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Every record with a parseable release date, ordered by date then title.
pub fn release_calendar<'a, I>(records: I) -> Vec<ReleaseEvent>
where
    I: IntoIterator<Item = &'a GameRecord>,
{
    let mut events: Vec<ReleaseEvent> = records
        .into_iter()
        .filter_map(|record| {
            parse_release_date(&record.game.release_date).map(|date| ReleaseEvent {
                date,
                slug: record.slug.clone(),
                title: record.game.title.clone(),
            })
        })
        .collect();
    events.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.title.cmp(&b.title)));
    events
}

/// Events falling in the given month.
pub fn events_in_month(events: &[ReleaseEvent], year: i32, month: u32) -> Vec<&ReleaseEvent> {
    events
        .iter()
        .filter(|event| event.date.year() == year && event.date.month() == month)
        .collect()
}

/// Up to `limit` events on or after `today`.
pub fn upcoming(events: &[ReleaseEvent], today: NaiveDate, limit: usize) -> Vec<&ReleaseEvent> {
    events
        .iter()
        .filter(|event| event.date >= today)
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GameDraft;

    fn record(id: u32, title: &str, release_date: &str) -> GameRecord {
        let mut game = GameDraft::titled(title);
        game.release_date = release_date.to_string();
        GameRecord::new(id, crate::slug::slugify(title), game)
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
    }

    #[test]
    fn parses_month_first_dates_only() {
        assert_eq!(parse_release_date("3/15/2021"), Some(date(2021, 3, 15)));
        assert_eq!(parse_release_date(" 12/01/2024 "), Some(date(2024, 12, 1)));
        assert_eq!(parse_release_date("15/03/2021"), None);
        assert_eq!(parse_release_date("2/30/2021"), None);
        assert_eq!(parse_release_date("21 de Junio, 2016"), None);
        assert_eq!(parse_release_date("TBA"), None);
    }

    #[test]
    fn calendar_orders_by_date_then_title() {
        let records = vec![
            record(1, "Zeta", "5/1/2024"),
            record(2, "Alpha", "5/1/2024"),
            record(3, "Beta", "1/20/2024"),
            record(4, "Gamma", "No especificada"),
        ];
        let events = release_calendar(&records);
        let titles: Vec<&str> = events.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Beta", "Alpha", "Zeta"]);
        assert_eq!(events[1].slug, "alpha");
    }

    #[test]
    fn month_and_upcoming_views() {
        let records = vec![
            record(1, "Alpha", "1/20/2024"),
            record(2, "Beta", "5/1/2024"),
            record(3, "Gamma", "5/30/2024"),
            record(4, "Delta", "8/2/2025"),
        ];
        let events = release_calendar(&records);

        let may: Vec<&str> = events_in_month(&events, 2024, 5)
            .iter()
            .map(|e| e.title.as_str())
            .collect();
        assert_eq!(may, vec!["Beta", "Gamma"]);

        let next: Vec<&str> = upcoming(&events, date(2024, 5, 1), 2)
            .iter()
            .map(|e| e.title.as_str())
            .collect();
        assert_eq!(next, vec!["Beta", "Gamma"]);
        assert!(upcoming(&events, date(2026, 1, 1), 5).is_empty());
    }
}
