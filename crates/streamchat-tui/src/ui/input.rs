//! Input line
//!
//! Displays the compose buffer with cursor and the remaining character count.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use streamchat_app::{App, Context, InputState, Screen};

const PROMPT: &str = "> ";
const PROMPT_WIDTH: u16 = 3; // border + "> "
const INPUT_LINE_OFFSET_Y: u16 = 1; // inside top border
const RIGHT_PADDING: u16 = 1; // inside right border

/// Render the input line.
pub fn render(frame: &mut Frame, app: &App, input: &InputState, area: Rect) {
    let field = input.field(Screen::Chat);
    let limit = InputState::limit(app);
    let remaining = limit.saturating_sub(field.char_count());
    let counter_style = if remaining == 0 {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(Line::from(Span::styled(format!(" {remaining}/{limit} "), counter_style)).right_aligned());

    let line = if field.text().is_empty() {
        let hint = match app.active_context() {
            Context::Shared => format!("Message #{}", app.active_context()),
            Context::Direct(peer) => format!("Message @{peer}"),
        };
        Line::from(vec![Span::raw(PROMPT), Span::styled(hint, Style::default().fg(Color::DarkGray))])
    } else {
        Line::from(vec![Span::raw(PROMPT), Span::raw(field.text())])
    };

    frame.render_widget(Paragraph::new(line).style(Style::default().fg(Color::White)).block(block), area);

    let available_width = area.width.saturating_sub(PROMPT_WIDTH + RIGHT_PADDING);
    let cursor_offset = u16::try_from(field.cursor()).unwrap_or(u16::MAX).min(available_width);

    let cursor_x = area.x.saturating_add(PROMPT_WIDTH).saturating_add(cursor_offset);
    let cursor_y = area.y.saturating_add(INPUT_LINE_OFFSET_Y);
    let max_x = area.x.saturating_add(area.width).saturating_sub(RIGHT_PADDING);

    frame.set_cursor_position((cursor_x.min(max_x), cursor_y));
}
