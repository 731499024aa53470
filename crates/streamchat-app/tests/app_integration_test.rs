//! Integration tests for App and Bridge behavior.
//!
//! Frames travel the same path as in production: JSON text in, decoded by the
//! Bridge, applied by the App, intents encoded back to JSON.
//!
//! # Oracle Pattern
//!
//! Tests end with oracle checks that verify:
//! - App state reflects expected state
//! - Messages land in the correct conversation
//! - Outgoing frames carry the expected wire shape

use std::time::{Duration, Instant};

use streamchat_app::{App, AppAction, AppEvent, Bridge, Context, Screen, SessionConfig};
use streamchat_client::TransportEvent;

/// Run actions through the Bridge, returning encoded frames.
fn process_actions(bridge: &mut Bridge, actions: &[AppAction]) -> Vec<String> {
    for action in actions {
        bridge.process_app_action(action);
    }
    bridge.take_outgoing()
}

/// Deliver one raw server frame.
fn receive(app: &mut App, bridge: &mut Bridge, frame: &str) -> Vec<String> {
    let mut frames = Vec::new();
    for event in bridge.handle_frame(frame) {
        let actions = app.handle(event);
        frames.extend(process_actions(bridge, &actions));
    }
    frames
}

/// Open a session as `identity` and return the join frame.
fn joined(identity: &str) -> (App, Bridge, Vec<String>) {
    let mut app = App::new(SessionConfig::default());
    let mut bridge = Bridge::new();

    let _ = app.open(identity);
    let mut frames = Vec::new();
    for event in bridge.handle_transport(TransportEvent::Opened) {
        let actions = app.handle(event);
        frames.extend(process_actions(&mut bridge, &actions));
    }
    (app, bridge, frames)
}

#[test]
fn join_frame_is_sent_on_open() {
    let (app, _, frames) = joined("Alex");

    assert_eq!(frames, [r#"{"type":"join","payload":"Alex"}"#]);
    assert_eq!(app.screen(), Screen::Chat);
}

#[test]
fn sarah_scenario() {
    let (mut app, mut bridge, _) = joined("Alex");

    receive(
        &mut app,
        &mut bridge,
        r#"{"type":"history","payload":[
            {"id":"m1","text":"Welcome","type":"system","timestamp":1},
            {"id":"m2","text":"Morning","type":"chat","user":"Mike","timestamp":2}
        ]}"#,
    );
    receive(
        &mut app,
        &mut bridge,
        r#"{"type":"message","payload":{"id":3,"text":"hi","type":"chat","user":"Sarah","timestamp":3}}"#,
    );

    assert_eq!(app.visible_messages().len(), 3);
    assert!(app.unread().is_empty());

    receive(
        &mut app,
        &mut bridge,
        r#"{"type":"message","payload":{"id":4,"text":"psst","type":"direct_message","from":"Sarah","to":"Alex","timestamp":4}}"#,
    );
    assert_eq!(app.unread().get("Sarah"), 1);
    assert_eq!(app.visible_messages().len(), 3);

    let _ = app.set_active_context(Context::direct("Sarah"));

    // Oracle: unread cleared, thread holds exactly the direct message.
    assert_eq!(app.unread().get("Sarah"), 0);
    let thread = app.visible_messages();
    assert_eq!(thread.len(), 1);
    assert_eq!(thread[0].text, "psst");
}

#[test]
fn own_direct_echo_is_not_unread() {
    let (mut app, mut bridge, _) = joined("Alex");
    let _ = app.set_active_context(Context::direct("Sarah"));

    let frames = process_actions(&mut bridge, &app.send_message("on my way"));
    assert_eq!(frames.len(), 1);
    assert!(frames[0].contains(r#""to":"Sarah""#));

    let _ = app.set_active_context(Context::Shared);
    receive(
        &mut app,
        &mut bridge,
        r#"{"type":"message","payload":{"id":9,"text":"on my way","type":"direct_message","from":"Alex","to":"Sarah","timestamp":9}}"#,
    );

    assert!(app.unread().is_empty());
    let _ = app.set_active_context(Context::direct("Sarah"));
    assert_eq!(app.visible_messages().len(), 1);
}

#[test]
fn malformed_frames_leave_state_untouched() {
    let (mut app, mut bridge, _) = joined("Alex");
    receive(&mut app, &mut bridge, r#"{"type":"users","payload":["Alex","Sarah"]}"#);

    receive(&mut app, &mut bridge, "not json");
    receive(&mut app, &mut bridge, r#"{"type":"users","payload":"Sarah"}"#);
    receive(&mut app, &mut bridge, r#"{"type":"message","payload":{"id":1,"text":"x","type":"direct_message","from":"Sarah","timestamp":1}}"#);
    receive(&mut app, &mut bridge, r#"{"type":"poll","payload":{"question":"?"}}"#);

    assert_eq!(app.roster(), ["Alex", "Sarah"]);
    assert!(app.messages().is_empty());
}

#[test]
fn history_skips_malformed_entries() {
    let (mut app, mut bridge, _) = joined("Alex");

    receive(
        &mut app,
        &mut bridge,
        r#"{"type":"history","payload":[
            {"id":"m1","text":"ok","type":"chat","user":"Mike","timestamp":1},
            {"id":"m2","type":"chat","user":"Mike","timestamp":2},
            {"id":"m3","text":"also ok","type":"chat","user":"Mike","timestamp":3}
        ]}"#,
    );

    let texts: Vec<_> = app.messages().iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, ["ok", "also ok"]);
}

#[test]
fn typing_burst_round_trip() {
    let (mut app, mut bridge, _) = joined("Alex");
    let start = Instant::now();

    let mut frames = Vec::new();
    for offset in [0u64, 200, 400, 900] {
        let actions = app.keystroke(start + Duration::from_millis(offset));
        frames.extend(process_actions(&mut bridge, &actions));
    }
    for offset in (1000..=3000).step_by(100) {
        let actions = app.handle(AppEvent::Tick { now: start + Duration::from_millis(offset) });
        frames.extend(process_actions(&mut bridge, &actions));
    }

    assert_eq!(frames, [
        r#"{"type":"typing","payload":{"user":"Alex","isTyping":true}}"#,
        r#"{"type":"typing","payload":{"user":"Alex","isTyping":false}}"#,
    ]);
}

#[test]
fn peer_typing_shows_until_stop_or_departure() {
    let (mut app, mut bridge, _) = joined("Alex");
    receive(&mut app, &mut bridge, r#"{"type":"users","payload":["Alex","Sarah","Mike"]}"#);
    receive(&mut app, &mut bridge, r#"{"type":"typing","payload":{"user":"Sarah","isTyping":true}}"#);
    receive(&mut app, &mut bridge, r#"{"type":"typing","payload":{"user":"Mike","isTyping":true}}"#);

    assert_eq!(app.active_typers(), ["Mike", "Sarah"]);

    receive(&mut app, &mut bridge, r#"{"type":"typing","payload":{"user":"Sarah","isTyping":false}}"#);
    receive(&mut app, &mut bridge, r#"{"type":"users","payload":["Alex","Sarah"]}"#);

    assert!(app.active_typers().is_empty());
}

#[test]
fn unexpected_close_reports_and_resets() {
    let (mut app, mut bridge, _) = joined("Alex");
    receive(&mut app, &mut bridge, r#"{"type":"users","payload":["Alex","Sarah"]}"#);

    let events = bridge.handle_transport(TransportEvent::Closed);
    let actions: Vec<_> = events.into_iter().flat_map(|e| app.handle(e)).collect();

    assert!(actions.contains(&AppAction::Disconnect));
    assert_eq!(app.screen(), Screen::Join);
    assert_eq!(app.status_message(), Some("Disconnected from server"));
    assert!(app.roster().is_empty());
}
