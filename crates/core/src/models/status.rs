use std::fmt;

use serde::{Deserialize, Serialize};

/// Development lifecycle stage of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GameStatus {
    /// Published and available.
    #[serde(rename = "Lanzado")]
    Released,
    /// Only a demo has been published.
    #[serde(rename = "Demo")]
    ReleasedDemo,
    /// Playable prototype.
    #[serde(rename = "Prototipo")]
    Prototype,
    /// Actively being developed.
    #[serde(rename = "En desarrollo")]
    InDevelopment,
    /// Development paused.
    #[serde(rename = "Pausado")]
    OnHold,
    /// Cancelled or discontinued.
    #[serde(rename = "Cancelado")]
    Canceled,
    /// No known surviving copy.
    #[serde(rename = "Perdido")]
    LostMedia,
    /// Sold while still in development.
    #[serde(rename = "Acceso anticipado")]
    EarlyAccess,
    /// Previously lost, since recovered.
    #[serde(rename = "Recuperado")]
    Recovered,
    /// Status is explicitly unknown.
    #[serde(rename = "Desconocido")]
    Unknown,
}

/// Spreadsheet spellings, compared after trimming and lowercasing.
const STATUS_TABLE: &[(&str, GameStatus)] = &[
    ("publicado", GameStatus::Released),
    ("publicado (demo)", GameStatus::ReleasedDemo),
    ("prototipo", GameStatus::Prototype),
    ("en desarrollo", GameStatus::InDevelopment),
    ("pausado", GameStatus::OnHold),
    ("cancelado", GameStatus::Canceled),
    ("descontinuado", GameStatus::Canceled),
    ("lost media", GameStatus::LostMedia),
    ("acceso anticipado", GameStatus::EarlyAccess),
    ("recuperado", GameStatus::Recovered),
    ("desconocido", GameStatus::Unknown),
];

impl GameStatus {
    /// Status assigned to blank or unrecognised spreadsheet values.
    pub const FALLBACK: GameStatus = GameStatus::InDevelopment;

    /// Every status in display order.
    pub const ALL: [GameStatus; 10] = [
        GameStatus::Released,
        GameStatus::ReleasedDemo,
        GameStatus::Prototype,
        GameStatus::InDevelopment,
        GameStatus::OnHold,
        GameStatus::Canceled,
        GameStatus::LostMedia,
        GameStatus::EarlyAccess,
        GameStatus::Recovered,
        GameStatus::Unknown,
    ];

    /// Classify a free-text status cell.
    pub fn classify(raw: Option<&str>) -> Self {
        let key = raw.map(|value| value.trim().to_lowercase()).unwrap_or_default();
        STATUS_TABLE
            .iter()
            .find(|(spelling, _)| *spelling == key)
            .map(|(_, status)| *status)
            .unwrap_or(Self::FALLBACK)
    }

    /// Label shown to users and used as the status filter value.
    pub fn label(self) -> &'static str {
        match self {
            GameStatus::Released => "Lanzado",
            GameStatus::ReleasedDemo => "Demo",
            GameStatus::Prototype => "Prototipo",
            GameStatus::InDevelopment => "En desarrollo",
            GameStatus::OnHold => "Pausado",
            GameStatus::Canceled => "Cancelado",
            GameStatus::LostMedia => "Perdido",
            GameStatus::EarlyAccess => "Acceso anticipado",
            GameStatus::Recovered => "Recuperado",
            GameStatus::Unknown => "Desconocido",
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_spellings_are_case_insensitive() {
        assert_eq!(GameStatus::classify(Some("Publicado")), GameStatus::Released);
        assert_eq!(GameStatus::classify(Some("PUBLICADO (DEMO)")), GameStatus::ReleasedDemo);
        assert_eq!(GameStatus::classify(Some(" Lost Media ")), GameStatus::LostMedia);
        assert_eq!(GameStatus::classify(Some("descontinuado")), GameStatus::Canceled);
        assert_eq!(GameStatus::classify(Some("Desconocido")), GameStatus::Unknown);
    }

    #[test]
    fn missing_or_garbage_defaults_to_in_development() {
        assert_eq!(GameStatus::classify(None), GameStatus::InDevelopment);
        assert_eq!(GameStatus::classify(Some("")), GameStatus::InDevelopment);
        assert_eq!(
            GameStatus::classify(Some("unrecognized-garbage")),
            GameStatus::InDevelopment
        );
    }

    #[test]
    fn labels_are_distinct() {
        let labels: std::collections::HashSet<&str> =
            GameStatus::ALL.iter().map(|status| status.label()).collect();
        assert_eq!(labels.len(), GameStatus::ALL.len());
    }
}
