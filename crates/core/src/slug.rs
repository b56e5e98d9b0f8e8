//! URL-safe identifiers derived from game titles.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("invalid whitespace regex"));
static HYPHEN_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"-+").expect("invalid hyphen regex"));

/// Map accented Latin vowels, `ñ` and `ç` to their base letter.
pub(crate) fn fold_accent(ch: char) -> char {
    match ch {
        'á' | 'à' | 'â' | 'ä' | 'ã' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ñ' => 'n',
        'ç' => 'c',
        other => other,
    }
}

/// Derive the base slug for a title.
///
/// Lowercases, folds accents, drops anything outside `[a-z0-9\s-]`, turns
/// whitespace runs into single hyphens and trims hyphens from both ends.
/// The result may be empty for titles made only of symbols.
pub fn slugify(title: &str) -> String {
    let folded: String = title
        .to_lowercase()
        .chars()
        .map(fold_accent)
        .filter(|ch| {
            ch.is_ascii_lowercase() || ch.is_ascii_digit() || *ch == '-' || ch.is_whitespace()
        })
        .collect();
    let hyphenated = WHITESPACE_RE.replace_all(&folded, "-");
    let collapsed = HYPHEN_RUN_RE.replace_all(&hyphenated, "-");
    collapsed.trim_matches('-').to_string()
}

/// Slugs handed out during one ingestion pass or one add-game operation.
#[derive(Debug, Clone, Default)]
pub struct SlugRegistry {
    seen: HashSet<String>,
}

impl SlugRegistry {
    /// Empty registry for a fresh ingestion pass.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with slugs that are already taken.
    pub fn seeded<I, S>(existing: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            seen: existing.into_iter().map(Into::into).collect(),
        }
    }

    /// Slugify `title` and reserve a unique variant of it.
    pub fn assign(&mut self, title: &str) -> String {
        self.claim(&slugify(title))
    }

    /// Reserve `base`, or the first free `base-N` for N = 1, 2, ...
    ///
    /// An empty base is never handed out as-is, so symbol-only titles
    /// become `-1`, `-2`, ...
    pub fn claim(&mut self, base: &str) -> String {
        let mut slug = base.to_string();
        let mut counter = 1u32;
        while slug.is_empty() || self.seen.contains(&slug) {
            slug = format!("{base}-{counter}");
            counter += 1;
        }
        self.seen.insert(slug.clone());
        slug
    }

    #[cfg(test)]
    fn contains(&self, slug: &str) -> bool {
        self.seen.contains(slug)
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.seen.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_is_deterministic() {
        let title = "VA-11 Hall-A: Cyberpunk Bartender Action";
        assert_eq!(slugify(title), "va-11-hall-a-cyberpunk-bartender-action");
        assert_eq!(slugify(title), slugify(title));
    }

    #[test]
    fn slugify_folds_accents_and_symbols() {
        assert_eq!(slugify("Juego con Acentos áéíóú"), "juego-con-acentos-aeiou");
        assert_eq!(slugify("  ¡Año Niño!  "), "ano-nino");
        assert_eq!(slugify("Ça  --  va"), "ca-va");
        assert_eq!(slugify("ÁRBOL"), "arbol");
        assert_eq!(slugify("★★★"), "");
    }

    #[test]
    fn duplicate_titles_get_suffixes() {
        let mut registry = SlugRegistry::new();
        assert_eq!(registry.assign("Night Reverie"), "night-reverie");
        assert_eq!(registry.assign("Night Reverie"), "night-reverie-1");
        assert_eq!(registry.assign("night   reverie!"), "night-reverie-2");
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn empty_base_is_suffixed() {
        let mut registry = SlugRegistry::new();
        assert_eq!(registry.assign("???"), "-1");
        assert_eq!(registry.assign("!!!"), "-2");
    }

    #[test]
    fn all_assigned_slugs_are_distinct() {
        let titles = [
            "Game",
            "Game",
            "game-1",
            "Game 1",
            "GAME",
            "Gáme",
            "",
            "%%",
            "game-1-1",
        ];
        let mut registry = SlugRegistry::new();
        let slugs: Vec<String> = titles.iter().map(|t| registry.assign(t)).collect();
        let unique: HashSet<&String> = slugs.iter().collect();
        assert_eq!(unique.len(), slugs.len(), "{slugs:?}");
        assert!(slugs.iter().all(|slug| !slug.is_empty()));
    }

    #[test]
    fn seeded_registry_avoids_existing_slugs() {
        let mut registry = SlugRegistry::seeded(["game-1", "game-2"]);
        assert_eq!(registry.claim("new-game"), "new-game");
        assert_eq!(registry.claim("game-1"), "game-1-1");
        assert!(registry.contains("game-2"));
    }
}
