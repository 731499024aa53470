//! End-to-end tests of the generic Runtime under simulation.
//!
//! # Test Strategy
//!
//! Each test scripts what a user does in the terminal:
//! 1. Type a name and press Enter
//! 2. Let the Runtime open the (simulated) connection and send the join
//! 3. Inject server frames
//! 4. Verify App state and the frames that went out
//!
//! Invariants are checked on every render.

use std::time::Duration;

use streamchat_app::{
    ConnectionState, Context, Driver, KeyInput, Runtime, Screen, SessionConfig,
};
use streamchat_client::TransportEvent;
use streamchat_harness::{InvariantRegistry, SimDriver};

const JOIN_ALEX: &str = r#"{"type":"join","payload":"Alex"}"#;
const TYPING_STARTED: &str = r#"{"type":"typing","payload":{"user":"Alex","isTyping":true}}"#;
const TYPING_STOPPED: &str = r#"{"type":"typing","payload":{"user":"Alex","isTyping":false}}"#;

fn runtime_with(driver: SimDriver) -> Runtime<SimDriver> {
    let driver = driver.with_invariants(InvariantRegistry::standard());
    Runtime::new(driver, SessionConfig::new(Some("ws://chat.test".into())))
}

fn runtime() -> Runtime<SimDriver> {
    runtime_with(SimDriver::new())
}

/// Step until every injected input and frame has been processed.
///
/// Returns `true` if the App asked to quit.
async fn settle(runtime: &mut Runtime<SimDriver>) -> bool {
    for _ in 0..10_000 {
        if !runtime.driver().has_pending() {
            return false;
        }
        if runtime.step().await.unwrap() {
            return true;
        }
    }
    panic!("runtime did not settle");
}

async fn join(runtime: &mut Runtime<SimDriver>, name: &str) {
    runtime.driver().inject_text(name);
    runtime.driver().inject_key(KeyInput::Enter);
    settle(runtime).await;
}

#[tokio::test]
async fn join_sends_frame_and_enters_chat() {
    let mut runtime = runtime();
    join(&mut runtime, "Alex").await;

    assert_eq!(runtime.driver().connect_log(), [Some("ws://chat.test".to_string())]);
    assert_eq!(runtime.driver().take_outgoing(), [JOIN_ALEX]);
    assert_eq!(runtime.app().screen(), Screen::Chat);
    assert_eq!(runtime.app().connection_state(), ConnectionState::Open);
}

#[tokio::test]
async fn direct_message_badge_clears_on_navigation() {
    let mut runtime = runtime();
    join(&mut runtime, "Alex").await;

    let driver = runtime.driver();
    driver.inject_frame(
        r#"{"type":"history","payload":[{"id":"m1","text":"Welcome","type":"system","timestamp":1}]}"#,
    );
    driver.inject_frame(r#"{"type":"users","payload":["Alex","Mike","Sarah"]}"#);
    driver.inject_frame(
        r#"{"type":"message","payload":{"id":7,"text":"psst","type":"direct_message","from":"Sarah","to":"Alex","timestamp":7}}"#,
    );
    settle(&mut runtime).await;

    assert_eq!(runtime.app().unread().get("Sarah"), 1);

    runtime.driver().inject_key(KeyInput::Tab);
    runtime.driver().inject_key(KeyInput::Tab);
    settle(&mut runtime).await;

    // Oracle: thread is active, badge gone, one message visible.
    assert_eq!(runtime.app().active_context(), &Context::direct("Sarah"));
    assert!(runtime.app().unread().is_empty());
    assert_eq!(runtime.app().visible_messages().len(), 1);
}

#[tokio::test]
async fn typing_stops_after_quiet_period() {
    let mut runtime = runtime();
    join(&mut runtime, "Alex").await;
    let _ = runtime.driver().take_outgoing();

    runtime.driver().inject_text("hey");
    runtime.driver().advance(Duration::from_millis(1000));
    settle(&mut runtime).await;
    assert_eq!(runtime.driver().take_outgoing(), [TYPING_STARTED]);

    runtime.driver().advance(Duration::from_millis(600));
    settle(&mut runtime).await;
    assert_eq!(runtime.driver().take_outgoing(), [TYPING_STOPPED]);
}

#[tokio::test]
async fn send_emits_message_then_stop() {
    let mut runtime = runtime();
    join(&mut runtime, "Alex").await;
    let _ = runtime.driver().take_outgoing();

    runtime.driver().inject_text("hello");
    runtime.driver().inject_key(KeyInput::Enter);
    settle(&mut runtime).await;

    let frames = runtime.driver().take_outgoing();
    assert_eq!(frames.len(), 3);
    assert_eq!(frames[0], TYPING_STARTED);
    assert!(frames[1].starts_with(r#"{"type":"message","payload":{"text":"hello","user":"Alex""#));
    assert_eq!(frames[2], TYPING_STOPPED);
    assert!(runtime.driver().message_buffer().is_empty());
}

#[tokio::test]
async fn refused_connection_returns_to_join() {
    let mut runtime = runtime();
    runtime.driver().refuse_connections(true);
    join(&mut runtime, "Alex").await;

    assert_eq!(runtime.app().screen(), Screen::Join);
    assert_eq!(runtime.app().connection_state(), ConnectionState::Closed);
    assert_eq!(
        runtime.app().status_message(),
        Some("Connection failed. Is the server running?")
    );
    assert!(runtime.driver().take_outgoing().is_empty());
    assert_eq!(runtime.driver().name_buffer(), "Alex");
}

#[tokio::test]
async fn server_close_then_rejoin_starts_fresh() {
    let mut runtime = runtime();
    join(&mut runtime, "Alex").await;

    runtime.driver().inject_frame(r#"{"type":"users","payload":["Alex","Sarah"]}"#);
    runtime.driver().inject_transport(TransportEvent::Closed);
    settle(&mut runtime).await;

    assert_eq!(runtime.app().screen(), Screen::Join);
    assert_eq!(runtime.app().status_message(), Some("Disconnected from server"));
    assert!(!runtime.driver().is_connected());
    assert_eq!(runtime.driver().name_buffer(), "Alex");
    let _ = runtime.driver().take_outgoing();

    runtime.driver().inject_key(KeyInput::Enter);
    settle(&mut runtime).await;
    assert_eq!(runtime.driver().connect_log().len(), 2);
    assert_eq!(runtime.driver().take_outgoing(), [JOIN_ALEX]);
    assert!(runtime.app().roster().is_empty());
    assert_eq!(runtime.app().screen(), Screen::Chat);
}

#[tokio::test]
async fn frames_before_open_are_dropped() {
    let mut runtime = runtime_with(SimDriver::new().with_manual_open());
    join(&mut runtime, "Alex").await;
    assert_eq!(runtime.app().connection_state(), ConnectionState::Connecting);

    runtime.driver().inject_frame(r#"{"type":"users","payload":["Alex","Sarah"]}"#);
    runtime.driver().inject_transport(TransportEvent::Opened);
    settle(&mut runtime).await;

    assert_eq!(runtime.app().connection_state(), ConnectionState::Open);
    assert!(runtime.app().roster().is_empty());
    assert_eq!(runtime.driver().take_outgoing(), [JOIN_ALEX]);
}

#[tokio::test]
async fn escape_twice_quits() {
    let mut runtime = runtime();
    join(&mut runtime, "Alex").await;

    runtime.driver().inject_key(KeyInput::Esc);
    assert!(!settle(&mut runtime).await);
    assert_eq!(runtime.app().screen(), Screen::Join);
    assert!(!runtime.driver().is_connected());

    runtime.driver().inject_key(KeyInput::Esc);
    assert!(settle(&mut runtime).await);
}

#[tokio::test]
async fn run_completes_scripted_session() {
    let runtime = runtime();
    let driver = runtime.driver();
    driver.inject_text("Alex");
    driver.inject_key(KeyInput::Enter);
    driver.inject_text("hi all");
    driver.inject_key(KeyInput::Enter);
    driver.inject_key(KeyInput::Esc);
    driver.inject_key(KeyInput::Esc);

    assert!(runtime.run().await.is_ok());
}
