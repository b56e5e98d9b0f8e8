//! Shared domain models.

mod origin;
mod status;

use serde::{Deserialize, Serialize};

pub use origin::GameOrigin;
pub use status::GameStatus;

/// Placeholder stored when the sheet has no release date.
pub const UNSPECIFIED_RELEASE_DATE: &str = "No especificada";
/// Placeholder stored when the sheet has no engine.
pub const UNSPECIFIED_ENGINE: &str = "No especificado";

/// A labelled external URL (store page or related link).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedUrl {
    /// Store or link label.
    pub name: String,
    /// Target URL, never empty.
    pub url: String,
}

/// Normalised game fields before an identity is assigned.
///
/// Produced by the row normaliser and by the add-game flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameDraft {
    /// Game title, never empty.
    pub title: String,
    /// Platforms in sheet order.
    pub platform: Vec<String>,
    /// Genres in sheet order.
    pub genre: Vec<String>,
    /// Developer studios or people.
    pub developers: Vec<String>,
    /// Publishers.
    pub publishers: Vec<String>,
    /// Free-text release date; may be a date, `TBA` or the placeholder.
    pub release_date: String,
    /// Free-text date of the last update.
    pub last_update_date: Option<String>,
    /// Lifecycle stage.
    pub status: GameStatus,
    /// How the project started, when known.
    pub origin: Option<GameOrigin>,
    /// Store pages, in the fixed store order.
    pub stores: Vec<NamedUrl>,
    /// Other links from `Link*Name` / `Link*URL` column pairs.
    pub links: Vec<NamedUrl>,
    /// Press kit URL.
    pub press_kit_url: Option<String>,
    /// One-line pitch.
    pub pitch: Option<String>,
    /// Funding notes.
    pub funding: Option<String>,
    /// Engine name.
    pub engine: String,
    /// Available languages.
    pub languages: Vec<String>,
    /// Small thumbnail image.
    pub image_url: Option<String>,
    /// Cover art.
    pub image_cover: Option<String>,
    /// Wide hero banner.
    pub image_hero: Option<String>,
    /// Trailer URL.
    pub trailer_url: Option<String>,
    /// Long description, empty when missing.
    pub description: String,
    /// Whether the game is featured.
    pub is_highlighted: bool,
    /// Why the game is featured.
    pub highlight_reason: Option<String>,
    /// Screenshot URLs.
    pub screenshots: Vec<String>,
}

impl GameDraft {
    /// Draft carrying only a title, with every other field at its default.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            platform: Vec::new(),
            genre: Vec::new(),
            developers: Vec::new(),
            publishers: Vec::new(),
            release_date: UNSPECIFIED_RELEASE_DATE.to_string(),
            last_update_date: None,
            status: GameStatus::FALLBACK,
            origin: None,
            stores: Vec::new(),
            links: Vec::new(),
            press_kit_url: None,
            pitch: None,
            funding: None,
            engine: UNSPECIFIED_ENGINE.to_string(),
            languages: Vec::new(),
            image_url: None,
            image_cover: None,
            image_hero: None,
            trailer_url: None,
            description: String::new(),
            is_highlighted: false,
            highlight_reason: None,
            screenshots: Vec::new(),
        }
    }
}

/// A catalog entry with its session identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    /// Session-local sequential id. Never put in a shareable URL.
    pub id: u32,
    /// Dataset-unique URL-safe identifier.
    pub slug: String,
    /// Normalised fields.
    #[serde(flatten)]
    pub game: GameDraft,
}

impl GameRecord {
    /// Attach an identity to a draft.
    pub fn new(id: u32, slug: String, game: GameDraft) -> Self {
        Self { id, slug, game }
    }

    /// Title shortcut.
    pub fn title(&self) -> &str {
        &self.game.title
    }

    /// Image to show for this game: cover, then hero, then thumbnail.
    pub fn display_image(&self) -> Option<&str> {
        self.game
            .image_cover
            .as_deref()
            .or(self.game.image_hero.as_deref())
            .or(self.game.image_url.as_deref())
    }

    /// Reason for featuring the game, only when it is featured.
    pub fn highlight_reason(&self) -> Option<&str> {
        if self.game.is_highlighted {
            self.game.highlight_reason.as_deref()
        } else {
            None
        }
    }

    /// Developers joined for single-line display.
    pub fn developer_line(&self) -> String {
        self.game.developers.join(", ")
    }
}
