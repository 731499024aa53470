//! UI rendering
//!
//! Rendering functions that convert App state into terminal output using
//! ratatui widgets. All functions are pure (no I/O), taking state and
//! returning widget trees.

mod chat;
mod input;
mod join;
mod sidebar;
mod status;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Color,
};
use streamchat_app::{App, InputState, Screen};

/// Render the entire UI.
pub fn render(frame: &mut Frame, app: &App, input: &InputState) {
    match app.screen() {
        Screen::Join => join::render(frame, app, input, frame.area()),
        Screen::Chat => render_chat_screen(frame, app, input),
    }
}

fn render_chat_screen(frame: &mut Frame, app: &App, input: &InputState) {
    const MAIN_AREA_MIN_HEIGHT: u16 = 3;
    const INPUT_HEIGHT: u16 = 3;
    const STATUS_HEIGHT: u16 = 1;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(MAIN_AREA_MIN_HEIGHT),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .split(frame.area());

    let [main_area, input_area, status_area] = chunks.as_ref() else {
        return;
    };

    render_main_area(frame, app, *main_area);
    input::render(frame, app, input, *input_area);
    status::render(frame, app, *status_area);
}

/// Render the main area (sidebar + conversation).
fn render_main_area(frame: &mut Frame, app: &App, area: Rect) {
    const SIDEBAR_WIDTH: u16 = 26;
    const CHAT_AREA_MIN_WIDTH: u16 = 20;

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(CHAT_AREA_MIN_WIDTH)])
        .split(area);

    let [sidebar_area, chat_area] = chunks.as_ref() else {
        return;
    };

    sidebar::render(frame, app, *sidebar_area);
    chat::render(frame, app, *chat_area);
}

/// Color for an author: the message's color hint when it names a terminal
/// color, otherwise a stable pick from a small palette.
pub(crate) fn author_color(hint: Option<&str>, author: &str) -> Color {
    const PALETTE: [Color; 6] =
        [Color::Cyan, Color::Green, Color::Yellow, Color::Magenta, Color::Blue, Color::LightRed];

    let named = hint.and_then(|name| match name.to_ascii_lowercase().as_str() {
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" | "purple" | "indigo" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        _ => None,
    });

    named.unwrap_or_else(|| {
        let hash = author.bytes().fold(0usize, |acc, b| acc.wrapping_mul(31).wrapping_add(usize::from(b)));
        PALETTE[hash % PALETTE.len()]
    })
}
