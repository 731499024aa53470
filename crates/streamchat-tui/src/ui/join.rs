//! Join screen
//!
//! Asks for a display name before the session starts.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use streamchat_app::{App, ConnectionState, InputState, Screen};

const BOX_WIDTH: u16 = 52;
const BOX_HEIGHT: u16 = 9;
const PROMPT: &str = "> ";
const INPUT_ROW: u16 = 3;

/// Render the join screen centered in `area`.
pub fn render(frame: &mut Frame, app: &App, input: &InputState, area: Rect) {
    let width = BOX_WIDTH.min(area.width);
    let height = BOX_HEIGHT.min(area.height);
    let dialog = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    };

    let name = input.field(Screen::Join);

    let status = if app.connection_state() == ConnectionState::Connecting {
        Line::from(Span::styled("Connecting...", Style::default().fg(Color::Yellow)))
    } else if let Some(message) = app.status_message() {
        Line::from(Span::styled(message, Style::default().fg(Color::Red)))
    } else {
        Line::default()
    };

    let lines = vec![
        Line::from(Span::styled(
            "StreamChat",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from("Enter your name"),
        Line::from(vec![Span::raw(PROMPT), Span::raw(name.text())]),
        Line::default(),
        status,
        Line::from(Span::styled("Enter: join  Esc: quit", Style::default().fg(Color::DarkGray))),
    ];

    let block = Block::default().borders(Borders::ALL).title(" Join ");
    frame.render_widget(Paragraph::new(lines).block(block), dialog);

    let prompt_width = u16::try_from(PROMPT.len()).unwrap_or(0);
    let cursor = u16::try_from(name.cursor()).unwrap_or(u16::MAX);
    let cursor_x = dialog.x.saturating_add(1 + prompt_width).saturating_add(cursor);
    let max_x = dialog.x.saturating_add(dialog.width).saturating_sub(2);
    frame.set_cursor_position((cursor_x.min(max_x), dialog.y.saturating_add(1 + INPUT_ROW)));
}
