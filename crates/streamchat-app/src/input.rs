//! Terminal-agnostic keyboard input.
//!
//! [`InputState`] owns the name and message line editors of the join and
//! chat screens. It enforces the per-screen length limit, turns edits into
//! typing keystrokes, and maps Enter/Esc/Tab onto [`App`] intents.

use std::time::Instant;

use streamchat_proto::MAX_MESSAGE_CHARS;

use crate::{App, AppAction, MAX_IDENTITY_CHARS, Screen};

/// Keyboard input abstraction.
///
/// Decouples application logic from terminal libraries (crossterm, termion,
/// etc.) enabling deterministic simulation testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// Printable character.
    Char(char),
    /// Enter/Return key (join or send).
    Enter,
    /// Backspace key (delete character before cursor).
    Backspace,
    /// Delete key (delete character at cursor).
    Delete,
    /// Tab key (next conversation).
    Tab,
    /// Escape key (sign out, or quit from the join screen).
    Esc,
    /// Left arrow key.
    Left,
    /// Right arrow key.
    Right,
    /// Up arrow key (previous conversation).
    Up,
    /// Down arrow key (next conversation).
    Down,
    /// Home key (cursor to start).
    Home,
    /// End key (cursor to end).
    End,
}

/// One editable line.
///
/// The cursor counts characters, not bytes.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LineField {
    text: String,
    cursor: usize,
}

impl LineField {
    fn with_text(text: String) -> Self {
        let cursor = text.chars().count();
        Self { text, cursor }
    }

    /// Current text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Cursor position, in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Length of the text, in characters.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    fn insert(&mut self, c: char, limit: usize) -> bool {
        if c.is_control() || self.char_count() >= limit {
            return false;
        }
        let at = self.byte_index(self.cursor);
        self.text.insert(at, c);
        self.cursor = self.cursor.saturating_add(1);
        true
    }

    fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor = self.cursor.saturating_sub(1);
        let at = self.byte_index(self.cursor);
        self.text.remove(at);
        true
    }

    fn delete(&mut self) -> bool {
        if self.cursor >= self.char_count() {
            return false;
        }
        let at = self.byte_index(self.cursor);
        self.text.remove(at);
        true
    }

    fn move_to(&mut self, cursor: usize) {
        self.cursor = cursor.min(self.char_count());
    }

    fn byte_index(&self, cursor: usize) -> usize {
        self.text.char_indices().nth(cursor).map_or(self.text.len(), |(index, _)| index)
    }

    fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.text)
    }
}

/// Line editor state for both screens.
///
/// The join screen edits the name and the chat screen edits the message
/// draft. The name survives a session so a failed or closed connection
/// returns to a filled-in join field.
#[derive(Debug, Default, Clone)]
pub struct InputState {
    name: LineField,
    message: LineField,
}

impl InputState {
    /// Create a new empty input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Input with the name prefilled, cut to the identity limit.
    pub fn with_identity(text: &str) -> Self {
        let name = LineField::with_text(text.chars().take(MAX_IDENTITY_CHARS).collect());
        Self { name, message: LineField::default() }
    }

    /// The field edited on `screen`.
    pub fn field(&self, screen: Screen) -> &LineField {
        match screen {
            Screen::Join => &self.name,
            Screen::Chat => &self.message,
        }
    }

    fn field_mut(&mut self, screen: Screen) -> &mut LineField {
        match screen {
            Screen::Join => &mut self.name,
            Screen::Chat => &mut self.message,
        }
    }

    /// Character limit for the screen `app` is on.
    pub fn limit(app: &App) -> usize {
        match app.screen() {
            Screen::Join => MAX_IDENTITY_CHARS,
            Screen::Chat => MAX_MESSAGE_CHARS,
        }
    }

    /// Handle a key input event at `now`.
    ///
    /// Returns actions to process (render for edits, plus any intents the
    /// key triggered).
    pub fn handle_key(&mut self, key: KeyInput, app: &mut App, now: Instant) -> Vec<AppAction> {
        let screen = app.screen();
        let limit = Self::limit(app);
        let field = self.field_mut(screen);

        let edited = match key {
            KeyInput::Char(c) => field.insert(c, limit),
            KeyInput::Backspace => field.backspace(),
            KeyInput::Delete => field.delete(),
            KeyInput::Left => {
                field.move_to(field.cursor.saturating_sub(1));
                false
            },
            KeyInput::Right => {
                field.move_to(field.cursor.saturating_add(1));
                false
            },
            KeyInput::Home => {
                field.move_to(0);
                false
            },
            KeyInput::End => {
                field.move_to(usize::MAX);
                false
            },
            KeyInput::Enter => return self.handle_enter(app),
            KeyInput::Esc => return self.handle_esc(app),
            KeyInput::Tab | KeyInput::Down => return Self::cycle_context(app, true),
            KeyInput::Up => return Self::cycle_context(app, false),
        };

        let mut actions = if edited && screen == Screen::Chat {
            app.keystroke(now)
        } else {
            vec![]
        };
        actions.push(AppAction::Render);
        actions
    }

    /// Enter on the join screen opens a session; in chat it sends.
    fn handle_enter(&mut self, app: &mut App) -> Vec<AppAction> {
        match app.screen() {
            Screen::Join => {
                if self.name.text.trim().is_empty() {
                    app.set_status("Enter a name to join");
                    return vec![AppAction::Render];
                }
                if app.connection_state().is_active() {
                    return vec![];
                }
                app.open(self.name.text.clone())
            },
            Screen::Chat => {
                if self.message.text.trim().is_empty() {
                    return vec![];
                }
                let text = self.message.take();
                app.send_message(&text)
            },
        }
    }

    fn handle_esc(&mut self, app: &mut App) -> Vec<AppAction> {
        match app.screen() {
            Screen::Join => app.quit(),
            Screen::Chat => {
                let _ = self.message.take();
                app.close()
            },
        }
    }

    /// Move to the next (or previous) conversation, wrapping around.
    fn cycle_context(app: &mut App, forward: bool) -> Vec<AppAction> {
        if app.screen() != Screen::Chat {
            return vec![];
        }

        let contexts = app.contexts();
        let len = contexts.len();
        let current = contexts.iter().position(|c| c == app.active_context()).unwrap_or(0);
        let next = if forward {
            current.saturating_add(1) % len.max(1)
        } else {
            current.checked_sub(1).unwrap_or(len.saturating_sub(1))
        };

        match contexts.into_iter().nth(next) {
            Some(context) => app.set_active_context(context),
            None => vec![],
        }
    }
}
