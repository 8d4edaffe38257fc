//! Simulated engine and in-memory control surface
//!
//! `SimulatedEngine` behaves like a browser media element: `play()` flips the
//! paused flag synchronously and settles later, a `pause()` issued while a
//! play command is outstanding rejects that command as aborted, and every
//! property assignment emits the matching event. `SimHandle` shares the
//! engine's state so callers can inspect commands and drive playback after
//! the engine itself has been moved into a session.

use crate::engine::{EngineEvent, EngineSnapshot, MediaErrorKind, PlayError, PlayFuture, PlaybackEngine};
use crate::error::{ControlError, Result};
use crate::surface::{ControlSurface, SurfaceRoles, SurfaceState, SurfaceView};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{mpsc, oneshot};

/// How the simulated engine settles play commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayPolicy {
    /// Start playing and settle successfully right away
    Resolve,
    /// Stay paused and fail with the given error
    Reject(PlayError),
    /// Start playing; settle only through [`SimHandle::settle_play`]
    Manual,
}

/// Command received by the simulated engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimCommand {
    Play,
    Pause,
    Seek(f64),
    Volume(f64),
    Muted(bool),
    Rate(f64),
}

struct SimState {
    paused: bool,
    current_time: f64,
    duration: f64,
    volume: f64,
    muted: bool,
    playback_rate: f64,
    policy: PlayPolicy,
    pause_fails: bool,
    waiting: Vec<oneshot::Sender<std::result::Result<(), PlayError>>>,
    max_waiting: usize,
    commands: Vec<SimCommand>,
    events: mpsc::UnboundedSender<EngineEvent>,
}

impl SimState {
    fn emit(&self, event: EngineEvent) {
        // Receiver gone means nobody is listening anymore
        let _ = self.events.send(event);
    }

    fn start(&mut self) {
        if self.paused {
            self.paused = false;
            self.emit(EngineEvent::Play);
        }
    }

    fn stop(&mut self) {
        if !self.paused {
            self.paused = true;
            self.emit(EngineEvent::Pause);
        }
    }

    fn clamp_position(&self, seconds: f64) -> f64 {
        let seconds = seconds.max(0.0);
        if self.duration.is_finite() {
            seconds.min(self.duration)
        } else {
            seconds
        }
    }
}

fn lock(state: &Mutex<SimState>) -> MutexGuard<'_, SimState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-process engine with scriptable play completion
pub struct SimulatedEngine {
    state: Arc<Mutex<SimState>>,
}

/// Shared view of a [`SimulatedEngine`]
#[derive(Clone)]
pub struct SimHandle {
    state: Arc<Mutex<SimState>>,
}

impl SimulatedEngine {
    /// Create a paused engine with no track metadata loaded
    pub fn new() -> (Self, SimHandle, mpsc::UnboundedReceiver<EngineEvent>) {
        let (events, events_rx) = mpsc::unbounded_channel();
        let state = Arc::new(Mutex::new(SimState {
            paused: true,
            current_time: 0.0,
            duration: f64::NAN,
            volume: 1.0,
            muted: false,
            playback_rate: 1.0,
            policy: PlayPolicy::Resolve,
            pause_fails: false,
            waiting: Vec::new(),
            max_waiting: 0,
            commands: Vec::new(),
            events,
        }));

        (
            Self {
                state: Arc::clone(&state),
            },
            SimHandle { state },
            events_rx,
        )
    }

    /// Create an engine with a track of `duration` seconds already loaded
    pub fn with_track(duration: f64) -> (Self, SimHandle, mpsc::UnboundedReceiver<EngineEvent>) {
        let (engine, handle, events) = Self::new();
        handle.load(duration);
        (engine, handle, events)
    }
}

impl PlaybackEngine for SimulatedEngine {
    fn paused(&self) -> bool {
        lock(&self.state).paused
    }

    fn current_time(&self) -> f64 {
        lock(&self.state).current_time
    }

    fn set_current_time(&mut self, seconds: f64) {
        let mut state = lock(&self.state);
        state.commands.push(SimCommand::Seek(seconds));
        state.current_time = state.clamp_position(seconds);
        state.emit(EngineEvent::TimeUpdate);
    }

    fn duration(&self) -> f64 {
        lock(&self.state).duration
    }

    fn volume(&self) -> f64 {
        lock(&self.state).volume
    }

    fn set_volume(&mut self, volume: f64) {
        let mut state = lock(&self.state);
        state.commands.push(SimCommand::Volume(volume));
        state.volume = volume;
        state.emit(EngineEvent::VolumeChange);
    }

    fn muted(&self) -> bool {
        lock(&self.state).muted
    }

    fn set_muted(&mut self, muted: bool) {
        let mut state = lock(&self.state);
        state.commands.push(SimCommand::Muted(muted));
        state.muted = muted;
        state.emit(EngineEvent::VolumeChange);
    }

    fn playback_rate(&self) -> f64 {
        lock(&self.state).playback_rate
    }

    fn set_playback_rate(&mut self, rate: f64) {
        let mut state = lock(&self.state);
        state.commands.push(SimCommand::Rate(rate));
        state.playback_rate = rate;
    }

    fn play(&mut self) -> PlayFuture {
        let mut state = lock(&self.state);
        state.commands.push(SimCommand::Play);

        let (tx, rx) = oneshot::channel();
        match state.policy.clone() {
            PlayPolicy::Resolve => {
                state.start();
                let _ = tx.send(Ok(()));
            }
            PlayPolicy::Reject(error) => {
                let _ = tx.send(Err(error));
            }
            PlayPolicy::Manual => {
                state.start();
                state.waiting.push(tx);
                state.max_waiting = state.max_waiting.max(state.waiting.len());
            }
        }

        Box::pin(async move { rx.await.unwrap_or(Err(PlayError::Aborted)) })
    }

    fn pause(&mut self) -> Result<()> {
        let mut state = lock(&self.state);
        state.commands.push(SimCommand::Pause);

        if state.pause_fails {
            return Err(ControlError::Engine("pause rejected by device".to_string()));
        }

        for waiting in state.waiting.drain(..) {
            let _ = waiting.send(Err(PlayError::Aborted));
        }
        state.stop();
        Ok(())
    }
}

impl SimHandle {
    pub fn snapshot(&self) -> EngineSnapshot {
        let state = lock(&self.state);
        EngineSnapshot {
            paused: state.paused,
            current_time: state.current_time,
            duration: state.duration,
            volume: state.volume,
            muted: state.muted,
            playback_rate: state.playback_rate,
        }
    }

    /// Commands received so far, oldest first
    pub fn commands(&self) -> Vec<SimCommand> {
        lock(&self.state).commands.clone()
    }

    pub fn clear_commands(&self) {
        lock(&self.state).commands.clear();
    }

    pub fn play_count(&self) -> usize {
        self.count(|command| matches!(command, SimCommand::Play))
    }

    pub fn pause_count(&self) -> usize {
        self.count(|command| matches!(command, SimCommand::Pause))
    }

    /// Positions assigned by the controller, oldest first
    pub fn seeks(&self) -> Vec<f64> {
        lock(&self.state)
            .commands
            .iter()
            .filter_map(|command| match command {
                SimCommand::Seek(seconds) => Some(*seconds),
                _ => None,
            })
            .collect()
    }

    fn count(&self, predicate: impl Fn(&SimCommand) -> bool) -> usize {
        lock(&self.state)
            .commands
            .iter()
            .filter(|command| predicate(command))
            .count()
    }

    pub fn set_play_policy(&self, policy: PlayPolicy) {
        lock(&self.state).policy = policy;
    }

    pub fn set_pause_fails(&self, fails: bool) {
        lock(&self.state).pause_fails = fails;
    }

    /// Number of play commands awaiting [`settle_play`](Self::settle_play)
    pub fn waiting_plays(&self) -> usize {
        lock(&self.state).waiting.len()
    }

    /// Most play commands that were ever waiting at the same time
    pub fn max_waiting_plays(&self) -> usize {
        lock(&self.state).max_waiting
    }

    /// Settle the oldest waiting play command. A failure returns the engine
    /// to paused. Returns `false` if nothing was waiting.
    pub fn settle_play(&self, result: std::result::Result<(), PlayError>) -> bool {
        let mut state = lock(&self.state);
        if state.waiting.is_empty() {
            return false;
        }

        let waiting = state.waiting.remove(0);
        if result.is_err() {
            state.stop();
        }
        let _ = waiting.send(result);
        true
    }

    /// Load a track of `duration` seconds and rewind to the start
    pub fn load(&self, duration: f64) {
        let mut state = lock(&self.state);
        state.duration = duration;
        state.current_time = 0.0;
        state.emit(EngineEvent::LoadedMetadata);
    }

    /// Move the playhead as the engine itself would, without a controller command
    pub fn set_position(&self, seconds: f64) {
        let mut state = lock(&self.state);
        state.current_time = state.clamp_position(seconds);
        state.emit(EngineEvent::TimeUpdate);
    }

    /// Put the engine into a playing state without going through `play()`
    pub fn force_playing(&self) {
        lock(&self.state).start();
    }

    /// Progress playback by `seconds` of wall time if playing.
    ///
    /// Reaching a known duration stops playback and emits `Ended`.
    pub fn advance(&self, seconds: f64) {
        let mut state = lock(&self.state);
        if state.paused {
            return;
        }

        let next = state.current_time + seconds * state.playback_rate;
        if state.duration.is_finite() && next >= state.duration {
            state.current_time = state.duration;
            state.emit(EngineEvent::TimeUpdate);
            state.stop();
            state.emit(EngineEvent::Ended);
        } else {
            state.current_time = next;
            state.emit(EngineEvent::TimeUpdate);
        }
    }

    /// Report a runtime failure; playback stops
    pub fn fail(&self, kind: MediaErrorKind) {
        let mut state = lock(&self.state);
        state.paused = true;
        state.emit(EngineEvent::Error(kind));
    }
}

/// Control surface recording into a shared [`SurfaceState`]
pub struct MemorySurface {
    roles: SurfaceRoles,
    probe: SurfaceProbe,
}

/// Shared view of a [`MemorySurface`]
#[derive(Clone, Default)]
pub struct SurfaceProbe {
    inner: Arc<Mutex<ProbeState>>,
}

#[derive(Default)]
struct ProbeState {
    state: SurfaceState,
    renders: usize,
}

impl MemorySurface {
    pub fn new(roles: SurfaceRoles) -> (Self, SurfaceProbe) {
        let probe = SurfaceProbe::default();
        (
            Self {
                roles,
                probe: probe.clone(),
            },
            probe,
        )
    }
}

impl ControlSurface for MemorySurface {
    fn roles(&self) -> SurfaceRoles {
        self.roles
    }

    fn render(&mut self, view: &SurfaceView) {
        let mut inner = self.probe.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.state.apply(view);
        inner.renders += 1;
    }
}

impl SurfaceProbe {
    pub fn state(&self) -> SurfaceState {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .state
            .clone()
    }

    /// Number of render calls received
    pub fn renders(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .renders
    }
}
