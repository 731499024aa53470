//! In-process simulated server.
//!
//! Stands in for a real server when no URL is configured. Frames flow through
//! mpsc channels exactly as they would over a WebSocket, so the application
//! cannot tell the difference. The simulation:
//!
//! - opens after a short delay,
//! - answers a join with a welcome history and a roster that includes the
//!   joining identity (a peer of the same name is retired),
//! - echoes chat and direct messages back with server-assigned id and
//!   timestamp,
//! - lets simulated peers chat (with typing signals) and occasionally send the
//!   local user a direct message.

use std::time::Duration;

use rand::{Rng, SeedableRng, rngs::StdRng};
use streamchat_proto::{Inbound, Message, Outbound, TypingSignal};
use tokio::sync::mpsc;

use crate::{ConnectedClient, TransportEvent};

const DAY_MS: i64 = 86_400_000;
const PEER_CHATTER: [&str; 5] = ["cool", "nice UI!", "working on the backend?", "lol", "Any updates?"];
const PEER_COLOR: &str = "cyan";

/// Simulated server behavior.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Delay before the connection reports open.
    pub open_delay: Duration,
    /// How often peers get a chance to speak.
    pub chatter_interval: Duration,
    /// Probability that a peer speaks on each interval.
    pub chatter_probability: f64,
    /// Probability that a spoken line is a direct message to the local user.
    pub direct_probability: f64,
    /// Simulated peer identities.
    pub peers: Vec<String>,
    /// RNG seed for reproducible sessions.
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            open_delay: Duration::from_millis(800),
            chatter_interval: Duration::from_secs(4),
            chatter_probability: 0.3,
            direct_probability: 0.2,
            peers: ["Alex", "Sarah", "DevBot", "Mike"].map(String::from).to_vec(),
            seed: 0,
        }
    }
}

/// Spawn an in-process simulated server.
///
/// Returns a handle with the same channel interface as a real connection. The
/// server runs as a tokio task until the handle is dropped or stopped.
pub fn spawn_server(config: SimulationConfig) -> ConnectedClient {
    let (client_tx, server_rx) = mpsc::channel::<String>(32);
    let (server_tx, client_rx) = mpsc::channel::<TransportEvent>(64);

    let handle = tokio::spawn(async move {
        tokio::time::sleep(config.open_delay).await;
        if server_tx.send(TransportEvent::Opened).await.is_err() {
            return;
        }
        SimServer::new(config, server_tx).run(server_rx).await;
    });

    ConnectedClient::new(client_tx, client_rx, handle.abort_handle())
}

struct SimServer {
    config: SimulationConfig,
    tx: mpsc::Sender<TransportEvent>,
    rng: StdRng,
    identity: Option<String>,
    next_id: u64,
}

impl SimServer {
    fn new(config: SimulationConfig, tx: mpsc::Sender<TransportEvent>) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self { config, tx, rng, identity: None, next_id: 1 }
    }

    async fn run(mut self, mut rx: mpsc::Receiver<String>) {
        let mut chatter = tokio::time::interval(self.config.chatter_interval);
        chatter.tick().await;

        loop {
            let delivered = tokio::select! {
                maybe_frame = rx.recv() => {
                    let Some(frame) = maybe_frame else { break };
                    self.handle_frame(&frame).await
                }
                _ = chatter.tick() => self.chatter().await,
            };

            if !delivered {
                break;
            }
        }

        tracing::debug!("simulated server stopped");
    }

    /// Process one client frame. Returns `false` once the client is gone.
    async fn handle_frame(&mut self, frame: &str) -> bool {
        let intent = match Outbound::decode(frame) {
            Ok(intent) => intent,
            Err(e) => {
                tracing::warn!(error = %e, "simulated server dropped malformed frame");
                return true;
            },
        };

        match intent {
            Outbound::Join(identity) => {
                let now = now_ms();
                let history = vec![
                    Message::system("m1", "Welcome to the chat!", now - 2 * DAY_MS),
                    Message::chat("m2", "Alex", "This was sent yesterday.", now - DAY_MS)
                        .with_color("blue"),
                    Message::chat("m3", "Alex", "Hey everyone!", now - 60_000)
                        .with_color("blue"),
                ];

                self.config.peers.retain(|peer| *peer != identity);
                let mut roster = vec![identity.clone()];
                roster.extend(self.config.peers.iter().cloned());
                self.identity = Some(identity);

                self.deliver(Inbound::History(history)).await
                    && self.deliver(Inbound::Users(roster)).await
            },
            Outbound::Message(chat) => {
                let id = self.next_id();
                let mut message = Message::chat(id, chat.user, chat.text, now_ms());
                message.color = chat.color;
                self.deliver(Inbound::Message(message)).await
            },
            Outbound::DirectMessage(direct) => {
                let Some(identity) = self.identity.clone() else {
                    tracing::warn!("direct message before join");
                    return true;
                };
                let id = self.next_id();
                let message = Message::direct(id, identity, direct.to, direct.text, now_ms());
                self.deliver(Inbound::Message(message)).await
            },
            // Single client: nobody to relay typing to.
            Outbound::Typing(_) => true,
        }
    }

    async fn chatter(&mut self) -> bool {
        let Some(identity) = self.identity.clone() else {
            return true;
        };
        if self.config.peers.is_empty() || !self.rng.random_bool(self.config.chatter_probability) {
            return true;
        }

        let peer = self.config.peers[self.rng.random_range(0..self.config.peers.len())].clone();
        let text = PEER_CHATTER[self.rng.random_range(0..PEER_CHATTER.len())];
        let id = self.next_id();

        if self.rng.random_bool(self.config.direct_probability) {
            let message = Message::direct(id, peer, identity, text, now_ms());
            return self.deliver(Inbound::Message(message)).await;
        }

        let typing = |is_typing| Inbound::Typing(TypingSignal { user: peer.clone(), is_typing });
        let message = Message::chat(id, peer.clone(), text, now_ms()).with_color(PEER_COLOR);

        self.deliver(typing(true)).await
            && self.deliver(Inbound::Message(message)).await
            && self.deliver(typing(false)).await
    }

    /// Send one event to the client. Returns `false` once the client is gone.
    async fn deliver(&self, event: Inbound) -> bool {
        match event.encode() {
            Ok(frame) => self.tx.send(TransportEvent::Frame(frame)).await.is_ok(),
            Err(e) => {
                tracing::warn!(error = %e, tag = event.tag(), "simulated server failed to encode");
                true
            },
        }
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id = self.next_id.saturating_add(1);
        id
    }
}

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
