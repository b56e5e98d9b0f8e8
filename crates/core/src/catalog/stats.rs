use serde::Serialize;

use crate::models::{GameRecord, GameStatus};

/// Record counts per platform, genre and status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    /// Games per platform, platforms in first-seen order.
    pub platforms: Vec<(String, usize)>,
    /// Games per genre, genres in first-seen order.
    pub genres: Vec<(String, usize)>,
    /// Games per status, in status order. Absent statuses are omitted.
    pub statuses: Vec<(GameStatus, usize)>,
    /// Total games counted.
    pub total: usize,
}

impl CatalogStats {
    /// Count over `records`.
    pub fn collect<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a GameRecord>,
    {
        let mut stats = Self::default();
        let mut statuses = [0usize; GameStatus::ALL.len()];

        for record in records {
            stats.total += 1;
            for platform in &record.game.platform {
                bump(&mut stats.platforms, platform);
            }
            for genre in &record.game.genre {
                bump(&mut stats.genres, genre);
            }
            if let Some(slot) = GameStatus::ALL
                .iter()
                .position(|status| *status == record.game.status)
            {
                statuses[slot] += 1;
            }
        }

        stats.statuses = GameStatus::ALL
            .iter()
            .zip(statuses)
            .filter(|(_, count)| *count > 0)
            .map(|(status, count)| (*status, count))
            .collect();
        stats
    }

    /// Platforms sorted by descending count, ties kept in first-seen order.
    pub fn top_platforms(&self, limit: usize) -> Vec<(String, usize)> {
        top(&self.platforms, limit)
    }

    /// Genres sorted by descending count, ties kept in first-seen order.
    pub fn top_genres(&self, limit: usize) -> Vec<(String, usize)> {
        top(&self.genres, limit)
    }
}

fn bump(counts: &mut Vec<(String, usize)>, key: &str) {
    match counts.iter_mut().find(|(name, _)| name == key) {
        Some((_, count)) => *count += 1,
        None => counts.push((key.to_string(), 1)),
    }
}

fn top(counts: &[(String, usize)], limit: usize) -> Vec<(String, usize)> {
    let mut sorted = counts.to_vec();
    sorted.sort_by(|a, b| b.1.cmp(&a.1));
    sorted.truncate(limit);
    sorted
}
