use anyhow::{bail, Result};
use vjuega_core::{
    models::{GameDraft, GameOrigin, GameStatus},
    resource::columns::split_list,
};

const MAX_INPUT_LEN: usize = 256;

/// Single-line text input with a character-based cursor.
#[derive(Debug, Clone, Default)]
pub struct TextInput {
    value: String,
    cursor: usize,
}

impl TextInput {
    fn byte_index(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map(|(idx, _)| idx)
            .unwrap_or(self.value.len())
    }

    fn len(&self) -> usize {
        self.value.chars().count()
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn insert(&mut self, ch: char) {
        if ch.is_control() || self.len() >= MAX_INPUT_LEN {
            return;
        }
        let at = self.byte_index(self.cursor);
        self.value.insert(at, ch);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_index(self.cursor);
        self.value.remove(at);
    }

    pub fn delete(&mut self) {
        if self.cursor < self.len() {
            let at = self.byte_index(self.cursor);
            self.value.remove(at);
        }
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let next = self.cursor as isize + delta;
        self.cursor = next.clamp(0, self.len() as isize) as usize;
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.len();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Platforms,
    Genres,
    Developers,
    ReleaseDate,
    Status,
    Origin,
    Engine,
    Description,
}

impl Field {
    pub const ALL: [Field; 9] = [
        Field::Title,
        Field::Platforms,
        Field::Genres,
        Field::Developers,
        Field::ReleaseDate,
        Field::Status,
        Field::Origin,
        Field::Engine,
        Field::Description,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Field::Title => "Título",
            Field::Platforms => "Plataformas",
            Field::Genres => "Géneros",
            Field::Developers => "Desarrolladores",
            Field::ReleaseDate => "Lanzamiento",
            Field::Status => "Estado",
            Field::Origin => "Origen",
            Field::Engine => "Motor",
            Field::Description => "Descripción",
        }
    }

    pub fn is_choice(self) -> bool {
        matches!(self, Field::Status | Field::Origin)
    }

    fn index(self) -> usize {
        Field::ALL
            .iter()
            .position(|field| *field == self)
            .unwrap_or_default()
    }
}

/// State of the add-game modal.
#[derive(Debug, Clone)]
pub struct AddGameForm {
    inputs: [TextInput; Field::ALL.len()],
    status: GameStatus,
    origin: Option<GameOrigin>,
    focus: usize,
}

impl Default for AddGameForm {
    fn default() -> Self {
        Self {
            inputs: Default::default(),
            status: GameStatus::FALLBACK,
            origin: None,
            focus: 0,
        }
    }
}

impl AddGameForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focused(&self) -> Field {
        Field::ALL[self.focus]
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % Field::ALL.len();
    }

    pub fn focus_prev(&mut self) {
        self.focus = (self.focus + Field::ALL.len() - 1) % Field::ALL.len();
    }

    /// Text input of the focused field, `None` for choice fields.
    pub fn input_mut(&mut self) -> Option<&mut TextInput> {
        let field = self.focused();
        if field.is_choice() {
            None
        } else {
            Some(&mut self.inputs[field.index()])
        }
    }

    pub fn input(&self, field: Field) -> &TextInput {
        &self.inputs[field.index()]
    }

    /// Step the focused choice field through its options, wrapping around.
    pub fn cycle_choice(&mut self, delta: isize) {
        match self.focused() {
            Field::Status => {
                let options = GameStatus::ALL;
                let current = options
                    .iter()
                    .position(|status| *status == self.status)
                    .unwrap_or_default();
                self.status = options[wrap(current, delta, options.len())];
            }
            Field::Origin => {
                // Slot 0 is "no origin".
                let current = self
                    .origin
                    .and_then(|origin| GameOrigin::ALL.iter().position(|o| *o == origin))
                    .map_or(0, |idx| idx + 1);
                let next = wrap(current, delta, GameOrigin::ALL.len() + 1);
                self.origin = next.checked_sub(1).map(|idx| GameOrigin::ALL[idx]);
            }
            _ => {}
        }
    }

    /// Display text of a field.
    pub fn display(&self, field: Field) -> String {
        match field {
            Field::Status => self.status.label().to_string(),
            Field::Origin => self
                .origin
                .map(|origin| origin.label().to_string())
                .unwrap_or_else(|| "-".to_string()),
            _ => self.input(field).value().to_string(),
        }
    }

    /// Build the draft to insert.
    pub fn to_draft(&self) -> Result<GameDraft> {
        let title = self.input(Field::Title).value().trim();
        if title.is_empty() {
            bail!("El título es obligatorio");
        }

        let mut draft = GameDraft::titled(title);
        draft.platform = split_list(self.input(Field::Platforms).value());
        draft.genre = split_list(self.input(Field::Genres).value());
        draft.developers = split_list(self.input(Field::Developers).value());
        if let Some(date) = non_blank(self.input(Field::ReleaseDate).value()) {
            draft.release_date = date;
        }
        if let Some(engine) = non_blank(self.input(Field::Engine).value()) {
            draft.engine = engine;
        }
        draft.description = self.input(Field::Description).value().trim().to_string();
        draft.status = self.status;
        draft.origin = self.origin;
        Ok(draft)
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Step `current` by `delta` within `0..len`, wrapping at both ends.
pub(crate) fn wrap(current: usize, delta: isize, len: usize) -> usize {
    (current as isize + delta).rem_euclid(len as isize) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use vjuega_core::models::{UNSPECIFIED_ENGINE, UNSPECIFIED_RELEASE_DATE};

    fn type_into(form: &mut AddGameForm, text: &str) {
        if let Some(input) = form.input_mut() {
            for ch in text.chars() {
                input.insert(ch);
            }
        }
    }

    #[test]
    fn text_input_edits_multibyte_text() {
        let mut input = TextInput::default();
        for ch in "Año".chars() {
            input.insert(ch);
        }
        input.move_cursor(-1);
        input.backspace();
        assert_eq!(input.value(), "Ao");
        input.insert('ñ');
        input.move_end();
        input.insert('s');
        assert_eq!(input.value(), "Años");
        input.move_home();
        input.delete();
        assert_eq!((input.value(), input.cursor()), ("ños", 0));
    }

    #[test]
    fn draft_splits_lists_and_keeps_placeholders() -> Result<()> {
        let mut form = AddGameForm::new();
        type_into(&mut form, "  Cuentos de Ávila ");
        form.focus_next();
        type_into(&mut form, "PC, Switch,");
        form.focus_next();
        type_into(&mut form, "Aventura");

        let draft = form.to_draft()?;
        assert_eq!(draft.title, "Cuentos de Ávila");
        assert_eq!(draft.platform, vec!["PC", "Switch"]);
        assert_eq!(draft.genre, vec!["Aventura"]);
        assert_eq!(draft.release_date, UNSPECIFIED_RELEASE_DATE);
        assert_eq!(draft.engine, UNSPECIFIED_ENGINE);
        assert_eq!(draft.status, GameStatus::FALLBACK);
        assert_eq!(draft.origin, None);
        Ok(())
    }

    #[test]
    fn blank_title_is_rejected() {
        let mut form = AddGameForm::new();
        type_into(&mut form, "   ");
        assert!(form.to_draft().is_err());
    }

    #[test]
    fn choices_cycle_and_wrap() -> Result<()> {
        let mut form = AddGameForm::new();
        type_into(&mut form, "Sample");
        while form.focused() != Field::Status {
            form.focus_next();
        }
        assert!(form.input_mut().is_none());
        form.cycle_choice(1);
        assert_eq!(form.display(Field::Status), GameStatus::OnHold.label());

        form.focus_next();
        form.cycle_choice(-1);
        assert_eq!(form.display(Field::Origin), GameOrigin::GameJamPlus2526.label());
        form.cycle_choice(1);
        assert_eq!(form.display(Field::Origin), "-");
        form.cycle_choice(1);

        let draft = form.to_draft()?;
        assert_eq!(draft.status, GameStatus::OnHold);
        assert_eq!(draft.origin, Some(GameOrigin::FromHome));
        Ok(())
    }

    #[test]
    fn focus_wraps_both_ways() {
        let mut form = AddGameForm::new();
        form.focus_prev();
        assert_eq!(form.focused(), Field::Description);
        form.focus_next();
        assert_eq!(form.focused(), Field::Title);
    }
}
