//! Session driver - the cooperative event loop for one player instance
//!
//! A single task multiplexes three sources:
//! - Control inputs sent through a [`SessionHandle`]
//! - Engine events from the engine's channel
//! - Internal wake-ups (debounce timers, play settlements)
//!
//! Handlers run to completion one at a time, so the session never needs a lock.

use crate::{
    engine::{EngineEvent, PlaybackEngine},
    error::{ControlError, Result},
    session::{PlayerSession, Wake},
    surface::{ControlInput, ControlSurface},
};
use tokio::sync::mpsc;
use tracing::{debug, warn};

#[derive(Debug)]
enum DriverMessage {
    Input(ControlInput),
    Shutdown,
}

/// Sender side of a running session
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: mpsc::UnboundedSender<DriverMessage>,
}

impl SessionHandle {
    /// Deliver user input to the session
    pub fn send(&self, input: ControlInput) -> Result<()> {
        self.tx
            .send(DriverMessage::Input(input))
            .map_err(|_| ControlError::SessionClosed)
    }

    /// Ask the driver to tear the session down and stop
    pub fn shutdown(&self) {
        // Already stopped if the receiver is gone
        let _ = self.tx.send(DriverMessage::Shutdown);
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

enum Step {
    Message(Option<DriverMessage>),
    Event(Option<EngineEvent>),
    Wake(Wake),
}

/// Event loop owning one [`PlayerSession`]
pub struct SessionDriver<E, S> {
    session: PlayerSession<E, S>,
    inputs: mpsc::UnboundedReceiver<DriverMessage>,
    events: mpsc::UnboundedReceiver<EngineEvent>,
}

impl<E: PlaybackEngine, S: ControlSurface> SessionDriver<E, S> {
    pub fn new(
        session: PlayerSession<E, S>,
        events: mpsc::UnboundedReceiver<EngineEvent>,
    ) -> (Self, SessionHandle) {
        let (tx, inputs) = mpsc::unbounded_channel();
        (
            Self {
                session,
                inputs,
                events,
            },
            SessionHandle { tx },
        )
    }

    /// Run until shutdown or until every handle is dropped.
    ///
    /// The session is torn down before it is returned.
    pub async fn run(mut self) -> PlayerSession<E, S> {
        let mut events_open = true;

        loop {
            let step = tokio::select! {
                biased;
                message = self.inputs.recv() => Step::Message(message),
                event = self.events.recv(), if events_open => Step::Event(event),
                wake = self.session.next_wake() => Step::Wake(wake),
            };

            match step {
                Step::Message(Some(DriverMessage::Input(input))) => {
                    self.session.handle_input(input);
                }
                Step::Message(Some(DriverMessage::Shutdown)) => {
                    debug!("Session shutdown requested");
                    break;
                }
                Step::Message(None) => {
                    debug!("All session handles dropped");
                    break;
                }
                Step::Event(Some(event)) => self.session.handle_engine_event(event),
                Step::Event(None) => {
                    warn!("Engine event stream closed");
                    events_open = false;
                }
                Step::Wake(wake) => self.session.handle_wake(wake),
            }
        }

        self.session.teardown();
        self.session
    }
}
