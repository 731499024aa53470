//! Conversation area
//!
//! Displays the messages of the active context with date separators, sender
//! headers, and who is typing in the shared channel.

use chrono::Local;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};
use streamchat_app::{App, Context, grouping};
use streamchat_proto::{Message, MessageKind};

use super::author_color;

const BORDER_SIZE: u16 = 2;
const BODY_INDENT: &str = "  ";

/// Render the conversation area.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let title = match app.active_context() {
        Context::Shared => {
            format!(" # {} | {} members online ", app.active_context(), app.roster().len())
        },
        Context::Direct(peer) => format!(" @{peer} | Private Conversation "),
    };
    let block = Block::default().borders(Borders::ALL).title(title);

    let visible = app.visible_messages();
    let mut items: Vec<ListItem> = if visible.is_empty() {
        vec![placeholder(app.active_context())]
    } else {
        message_lines(&visible)
    };

    let typers = if app.active_context().is_shared() { app.active_typers() } else { vec![] };
    let typing_line = (!typers.is_empty()).then(|| {
        ListItem::new(Line::from(Span::styled(
            format!("{} typing...", typers.join(", ")),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )))
    });

    let reserved = usize::from(typing_line.is_some());
    let visible_height = usize::from(area.height.saturating_sub(BORDER_SIZE)).saturating_sub(reserved);
    let skip = items.len().saturating_sub(visible_height);
    items.drain(..skip);
    items.extend(typing_line);

    frame.render_widget(List::new(items).block(block), area);
}

fn placeholder(context: &Context) -> ListItem<'static> {
    let text = match context {
        Context::Shared => "No messages yet. Say hello!".to_owned(),
        Context::Direct(peer) => format!("This is the start of your conversation with {peer}"),
    };
    ListItem::new(Line::from(Span::styled(text, Style::default().fg(Color::DarkGray))))
}

/// One list item per rendered line, oldest first.
fn message_lines<'a>(messages: &[&'a Message]) -> Vec<ListItem<'a>> {
    let tz = Local;
    let today = Local::now().date_naive();
    let groupings = grouping::groupings(messages.iter().copied(), &tz);

    let mut items = Vec::with_capacity(messages.len() * 2);
    for (message, layout) in messages.iter().zip(groupings) {
        if layout.date_boundary {
            let label = grouping::date_label(message.timestamp, today, &tz);
            items.push(ListItem::new(Line::from(Span::styled(
                format!("── {label} ──"),
                Style::default().fg(Color::DarkGray),
            ))));
        }

        if message.kind == MessageKind::System {
            items.push(ListItem::new(Line::from(Span::styled(
                format!("* {}", message.text),
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
            ))));
            continue;
        }

        if layout.header_boundary {
            let color = author_color(message.color.as_deref(), &message.author);
            items.push(ListItem::new(Line::from(vec![
                Span::styled(
                    message.author.as_str(),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::raw(" "),
                Span::styled(
                    grouping::time_label(message.timestamp, &tz),
                    Style::default().fg(Color::DarkGray),
                ),
            ])));
        }

        items.push(ListItem::new(Line::from(vec![
            Span::raw(BODY_INDENT),
            Span::raw(message.text.as_str()),
        ])));
    }

    items
}
