//! Controller host - every player instance on one page
//!
//! Binds each discovered control surface to its engine, runs one
//! [`SessionDriver`] task per instance, and tears all of them down on unload.

use crate::{
    config::ControllerConfig,
    driver::{SessionDriver, SessionHandle},
    engine::{EngineEvent, PlaybackEngine},
    session::PlayerSession,
    surface::ControlSurface,
};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// A control surface found at startup, with whatever engine it references
pub struct PlayerBinding<E, S> {
    pub id: String,
    pub engine: Option<E>,
    pub events: mpsc::UnboundedReceiver<EngineEvent>,
    pub surface: S,
}

impl<E, S> PlayerBinding<E, S> {
    pub fn new(
        id: impl Into<String>,
        engine: E,
        events: mpsc::UnboundedReceiver<EngineEvent>,
        surface: S,
    ) -> Self {
        Self {
            id: id.into(),
            engine: Some(engine),
            events,
            surface,
        }
    }

    /// A surface whose engine handle could not be found
    pub fn without_engine(id: impl Into<String>, surface: S) -> Self {
        let (_tx, events) = mpsc::unbounded_channel();
        Self {
            id: id.into(),
            engine: None,
            events,
            surface,
        }
    }
}

struct BoundInstance<E, S> {
    id: String,
    handle: SessionHandle,
    task: JoinHandle<PlayerSession<E, S>>,
}

/// Running player sessions, keyed by instance id
pub struct ControllerHost<E, S> {
    instances: Vec<BoundInstance<E, S>>,
}

impl<E: PlaybackEngine, S: ControlSurface> ControllerHost<E, S> {
    /// Bind every instance and spawn its driver.
    ///
    /// Instances missing their engine or play/pause button are skipped
    /// entirely. Must be called from within a tokio runtime.
    pub fn bind_all(
        bindings: impl IntoIterator<Item = PlayerBinding<E, S>>,
        config: &ControllerConfig,
    ) -> Self {
        let mut instances = Vec::new();

        for binding in bindings {
            let session = match PlayerSession::bind(binding.engine, binding.surface, config.clone())
            {
                Ok(session) => session,
                Err(e) => {
                    warn!(id = %binding.id, "Skipping player: {}", e);
                    continue;
                }
            };

            let (driver, handle) = SessionDriver::new(session, binding.events);
            let task = tokio::spawn(driver.run());
            info!(id = %binding.id, "Player bound");

            instances.push(BoundInstance {
                id: binding.id,
                handle,
                task,
            });
        }

        Self { instances }
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Ids of the bound instances, in binding order
    pub fn ids(&self) -> Vec<&str> {
        self.instances.iter().map(|i| i.id.as_str()).collect()
    }

    pub fn handle(&self, id: &str) -> Option<&SessionHandle> {
        self.instances
            .iter()
            .find(|instance| instance.id == id)
            .map(|instance| &instance.handle)
    }

    /// Tear down every session, cancelling all pending timers.
    ///
    /// Returns the torn-down sessions in binding order; a driver task that
    /// panicked is logged and left out.
    pub async fn unload(self) -> Vec<PlayerSession<E, S>> {
        for instance in &self.instances {
            instance.handle.shutdown();
        }

        let mut sessions = Vec::with_capacity(self.instances.len());
        for instance in self.instances {
            match instance.task.await {
                Ok(session) => sessions.push(session),
                Err(e) => error!(id = %instance.id, "Player task failed: {}", e),
            }
        }

        info!(count = sessions.len(), "All players unloaded");
        sessions
    }
}
