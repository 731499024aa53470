//! Conversations sidebar
//!
//! Lists the shared channel and one entry per peer with unread badges.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};
use streamchat_app::{App, SHARED_CHANNEL_NAME};

const ACTIVE_PREFIX: &str = ">";
const INACTIVE_PREFIX: &str = " ";

/// Render the sidebar.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let active = app.active_context();

    let mut items = vec![entry(format!("# {SHARED_CHANNEL_NAME}"), 0, active.is_shared())];

    let peers = app.peers();
    if peers.is_empty() {
        items.push(ListItem::new(Line::from(Span::styled(
            " No one else is here...",
            Style::default().fg(Color::DarkGray),
        ))));
    } else {
        items.extend(peers.into_iter().map(|peer| {
            let is_active = active.peer() == Some(peer);
            entry(format!("@{peer}"), app.unread().get(peer), is_active)
        }));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Conversations ")
        .title_bottom(Line::from(format!(" {} ", app.identity())).centered());

    frame.render_widget(List::new(items).block(block), area);
}

fn entry(label: String, unread: u32, is_active: bool) -> ListItem<'static> {
    let (prefix, style) = if is_active {
        (ACTIVE_PREFIX, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
    } else if unread > 0 {
        (INACTIVE_PREFIX, Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
    } else {
        (INACTIVE_PREFIX, Style::default())
    };

    let mut spans = vec![Span::raw(prefix), Span::styled(label, style)];
    if unread > 0 {
        spans.push(Span::styled(format!(" ({unread})"), Style::default().fg(Color::Red)));
    }

    ListItem::new(Line::from(spans))
}

#[cfg(test)]
mod tests {
    use streamchat_app::{AppEvent, Context, InputState, SessionConfig};
    use streamchat_proto::Inbound;

    use super::*;
    use crate::ui::tests::rendered;

    #[test]
    fn active_entry_is_marked() {
        let mut app = App::new(SessionConfig::default());
        let _ = app.open("You");
        let _ = app.handle(AppEvent::Connected);
        let _ = app.dispatch(Inbound::Users(["You", "Mike"].map(String::from).to_vec()));

        let screen = rendered(&app, &InputState::new(), 80, 20);
        assert!(screen.contains("># general"));
        assert!(screen.contains(" @Mike"));

        let _ = app.set_active_context(Context::direct("Mike"));
        let screen = rendered(&app, &InputState::new(), 80, 20);
        assert!(screen.contains(">@Mike"));
        assert!(screen.contains(" # general"));
    }
}
