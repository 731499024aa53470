//! Generic runtime for application orchestration.
//!
//! The Runtime drives the application event loop, coordinating between:
//! - [`App`]: session state machine
//! - [`Bridge`]: wire encoding and decoding
//! - [`Driver`]: Platform-specific I/O

use crate::{App, AppAction, AppEvent, Bridge, Driver, SessionConfig};

/// Generic runtime that orchestrates App, Bridge, and Driver.
///
/// Stimuli are processed strictly in arrival order on one task.
pub struct Runtime<D: Driver> {
    driver: D,
    app: App,
    bridge: Bridge,
}

impl<D: Driver> Runtime<D> {
    /// Create a new runtime with the given driver and session config.
    pub fn new(driver: D, config: SessionConfig) -> Self {
        Self::with_app(driver, App::new(config))
    }

    /// Create a runtime around an existing App.
    pub fn with_app(driver: D, app: App) -> Self {
        Self { driver, app, bridge: Bridge::new() }
    }

    /// Run the main event loop until the App asks to quit.
    ///
    /// Each cycle:
    /// 1. Polls the driver for input (keys, ticks, resizes)
    /// 2. Drains ready transport notifications through the Bridge
    /// 3. Executes resulting actions, sending encoded frames
    ///
    /// # Errors
    ///
    /// Returns an error if the driver fails to poll for input.
    pub async fn run(mut self) -> Result<(), D::Error> {
        self.render();

        loop {
            if self.step().await? {
                break;
            }
        }

        self.driver.stop();
        Ok(())
    }

    /// Process one cycle of the event loop.
    ///
    /// Returns `true` if the application should quit.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver fails to poll for input.
    pub async fn step(&mut self) -> Result<bool, D::Error> {
        let actions = self.driver.poll_event(&mut self.app).await?;
        if self.process_actions(actions).await {
            return Ok(true);
        }

        while let Some(event) = self.driver.recv_event() {
            let events = self.bridge.handle_transport(event);
            if self.process_app_events(events).await {
                return Ok(true);
            }
        }

        Ok(false)
    }

    /// Feed events to the App and execute what it asks for.
    ///
    /// Returns `true` if should quit.
    async fn process_app_events(&mut self, events: Vec<AppEvent>) -> bool {
        for event in events {
            let actions = self.app.handle(event);
            if self.process_actions(actions).await {
                return true;
            }
        }
        false
    }

    /// Process actions returned by the App.
    ///
    /// Returns `true` if should quit.
    async fn process_actions(&mut self, initial_actions: Vec<AppAction>) -> bool {
        let mut pending_actions = initial_actions;

        while !pending_actions.is_empty() {
            let actions = std::mem::take(&mut pending_actions);

            for action in actions {
                match action {
                    AppAction::Render => self.render(),
                    AppAction::Quit => return true,
                    AppAction::Connect { server_url } => {
                        self.driver.disconnect();
                        if let Err(e) = self.driver.connect(server_url.as_deref()).await {
                            tracing::warn!(error = %e, "failed to start connection");
                            let reason = e.to_string();
                            pending_actions.extend(self.app.handle(AppEvent::TransportFailed { reason }));
                        }
                    },
                    AppAction::Disconnect => self.driver.disconnect(),
                    AppAction::Send(_) => {
                        self.bridge.process_app_action(&action);
                        self.send_outgoing_frames().await;
                    },
                }
            }
        }
        false
    }

    /// Send all pending outgoing frames to the server.
    ///
    /// A failed send is only logged: the transport reports the broken
    /// connection on its own.
    async fn send_outgoing_frames(&mut self) {
        for frame in self.bridge.take_outgoing() {
            if let Err(e) = self.driver.send_frame(frame).await {
                tracing::warn!(error = %e, "failed to send frame");
            }
        }
    }

    fn render(&mut self) {
        if let Err(e) = self.driver.render(&self.app) {
            tracing::warn!(error = %e, "failed to render");
        }
    }

    /// Get a reference to the App
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Get a mutable reference to the App
    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }

    /// Get a reference to the Driver
    pub fn driver(&self) -> &D {
        &self.driver
    }
}
