use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// How a game project came to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOrigin {
    /// Independent project started at home.
    #[serde(rename = "Desde casa")]
    FromHome,
    /// Made during a game jam.
    #[serde(rename = "Game Jam")]
    GameJam,
    /// University thesis or degree project.
    #[serde(rename = "Proyecto de grado")]
    DegreeProject,
    /// Commissioned work.
    #[serde(rename = "Por encargo")]
    Contract,
    /// Mod of an existing game.
    #[serde(rename = "Modding")]
    Modding,
    /// Entry of the Venezuelan GameJam+ 25/26 edition.
    #[serde(rename = "GameJam+ 25/26")]
    GameJamPlus2526,
}

const ORIGIN_TABLE: &[(&str, GameOrigin)] = &[
    ("desde casa", GameOrigin::FromHome),
    ("game jam", GameOrigin::GameJam),
    ("proyecto de grado", GameOrigin::DegreeProject),
    ("por encargo", GameOrigin::Contract),
    ("contrato", GameOrigin::Contract),
    ("modding", GameOrigin::Modding),
    ("gamejam+ 25/26", GameOrigin::GameJamPlus2526),
];

impl GameOrigin {
    /// Every origin in display order.
    pub const ALL: [GameOrigin; 6] = [
        GameOrigin::FromHome,
        GameOrigin::GameJam,
        GameOrigin::DegreeProject,
        GameOrigin::Contract,
        GameOrigin::Modding,
        GameOrigin::GameJamPlus2526,
    ];

    /// Classify a free-text origin cell.
    ///
    /// Blank input yields `None`. Unrecognised text also yields `None` and
    /// emits a warning; it never defaults to a member.
    pub fn classify(raw: Option<&str>) -> Option<Self> {
        let trimmed = raw.map(str::trim).filter(|value| !value.is_empty())?;
        let key = trimmed.to_lowercase();
        let found = ORIGIN_TABLE
            .iter()
            .find(|(spelling, _)| *spelling == key)
            .map(|(_, origin)| *origin);
        if found.is_none() {
            warn!(origin = %trimmed, "Unrecognised origin value; leaving origin empty");
        }
        found
    }

    /// Label shown to users.
    pub fn label(self) -> &'static str {
        match self {
            GameOrigin::FromHome => "Desde casa",
            GameOrigin::GameJam => "Game Jam",
            GameOrigin::DegreeProject => "Proyecto de grado",
            GameOrigin::Contract => "Por encargo",
            GameOrigin::Modding => "Modding",
            GameOrigin::GameJamPlus2526 => "GameJam+ 25/26",
        }
    }
}

impl fmt::Display for GameOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognised_origins() {
        assert_eq!(GameOrigin::classify(Some("Desde casa")), Some(GameOrigin::FromHome));
        assert_eq!(GameOrigin::classify(Some("GAME JAM")), Some(GameOrigin::GameJam));
        assert_eq!(GameOrigin::classify(Some("contrato")), Some(GameOrigin::Contract));
        assert_eq!(
            GameOrigin::classify(Some(" GameJam+ 25/26 ")),
            Some(GameOrigin::GameJamPlus2526)
        );
    }

    #[test]
    fn missing_or_garbage_is_absent() {
        assert_eq!(GameOrigin::classify(None), None);
        assert_eq!(GameOrigin::classify(Some("   ")), None);
        assert_eq!(GameOrigin::classify(Some("unrecognized-garbage")), None);
    }
}
