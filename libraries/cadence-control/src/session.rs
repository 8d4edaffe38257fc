//! Player session - one bound control surface and engine
//!
//! The session owns every piece of time-sensitive state for its instance:
//! the play gate, the seek state, and the debounce slots for seek commits,
//! skips and post-interruption resumes. All coordinators are methods taking
//! the session by `&mut self`; nothing is shared between instances.

use crate::{
    config::ControllerConfig,
    debounce::Debounce,
    engine::{EngineEvent, PlaybackEngine},
    error::{ControlError, Result},
    gate::{PlayGate, PlayOutcome, PlayRequest, PlaySettlement},
    seek::SeekState,
    skip::SkipRequest,
    surface::{ControlInput, ControlSurface},
};
use tracing::{debug, info};

/// Internal wake-up produced by [`PlayerSession::next_wake`]
#[derive(Debug)]
pub enum Wake {
    /// Debounced intermediate seek came due
    SeekCommit(f64),
    /// Debounced skip came due
    Skip(SkipRequest),
    /// Grace delay after a seek or skip elapsed
    Resume,
    /// Outstanding play command settled
    PlaySettled(PlaySettlement),
}

/// Controller state for one control surface bound to one engine
pub struct PlayerSession<E, S> {
    pub(crate) engine: E,
    pub(crate) surface: S,
    pub(crate) config: ControllerConfig,
    pub(crate) gate: PlayGate,
    pub(crate) seek: SeekState,
    pub(crate) seek_commit: Debounce<f64>,
    pub(crate) skip: Debounce<SkipRequest>,
    pub(crate) resume: Debounce<()>,
}

impl<E: PlaybackEngine, S: ControlSurface> PlayerSession<E, S> {
    /// Bind a discovered control surface to its engine.
    ///
    /// Fails without side effects if the engine handle or the play/pause
    /// button is missing. On success the surface is synced immediately.
    pub fn bind(engine: Option<E>, surface: S, config: ControllerConfig) -> Result<Self> {
        let engine = engine.ok_or(ControlError::MissingEngine)?;
        if !surface.roles().is_bindable() {
            return Err(ControlError::MissingPlayButton);
        }
        config.validate()?;

        let mut session = Self {
            engine,
            surface,
            config,
            gate: PlayGate::new(),
            seek: SeekState::default(),
            seek_commit: Debounce::new(),
            skip: Debounce::new(),
            resume: Debounce::new(),
        };
        session.refresh();

        info!("Player session bound");
        Ok(session)
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn gate(&self) -> &PlayGate {
        &self.gate
    }

    /// Whether a resume is scheduled after a seek or skip
    pub fn resume_pending(&self) -> bool {
        self.resume.is_pending()
    }

    /// Request playback through the gate
    pub fn request_play(&mut self) -> PlayRequest {
        self.gate.request_play(&mut self.engine)
    }

    /// Pause immediately. Cancels a scheduled resume.
    pub fn request_pause(&mut self) -> bool {
        self.resume.cancel();
        self.gate.request_pause(&mut self.engine)
    }

    /// Play if paused, pause if playing
    pub fn toggle_play(&mut self) {
        if self.engine.paused() {
            self.request_play();
        } else {
            self.request_pause();
        }
    }

    /// Dispatch user input to the coordinator responsible for it
    pub fn handle_input(&mut self, input: ControlInput) {
        if !self.surface.roles().has(input.role()) {
            debug!(?input, "Ignoring input from an element the surface does not have");
            return;
        }

        match input {
            ControlInput::PlayPause => self.toggle_play(),
            ControlInput::SkipBack(seconds) => self.skip_back(seconds),
            ControlInput::SkipForward(seconds) => self.skip_forward(seconds),
            ControlInput::SeekGrab => self.seek_grab(),
            ControlInput::SeekInput(value) => self.seek_input(value),
            ControlInput::SeekRelease(value) => self.seek_release(value),
            ControlInput::SeekClick(value) => self.seek_click(value),
            ControlInput::Volume(volume) => self.set_volume(volume),
            ControlInput::Speed(rate) => self.set_speed(rate),
            ControlInput::MuteToggle => self.toggle_mute(),
        }
    }

    /// Reflect an engine event onto the surface
    pub fn handle_engine_event(&mut self, event: EngineEvent) {
        self.sync_event(event);
    }

    /// Wait for the next timer or play settlement
    pub async fn next_wake(&mut self) -> Wake {
        tokio::select! {
            settlement = self.gate.settled() => Wake::PlaySettled(settlement),
            value = self.seek_commit.fired() => Wake::SeekCommit(value),
            request = self.skip.fired() => Wake::Skip(request),
            () = self.resume.fired() => Wake::Resume,
        }
    }

    /// Act on a wake-up returned by [`next_wake`](Self::next_wake)
    pub fn handle_wake(&mut self, wake: Wake) {
        match wake {
            Wake::SeekCommit(value) => {
                self.commit_seek(value);
            }
            Wake::Skip(request) => self.fire_skip(request),
            Wake::Resume => {
                debug!("Resuming playback after interruption");
                self.request_play();
            }
            Wake::PlaySettled(settlement) => {
                if let PlayOutcome::Rejected(_) =
                    self.gate.complete(settlement, &mut self.engine)
                {
                    self.refresh();
                }
            }
        }
    }

    /// Cancel every pending timer and drop the outstanding play command
    pub fn teardown(&mut self) {
        let cancelled = [
            self.seek_commit.cancel().is_some(),
            self.skip.cancel().is_some(),
            self.resume.cancel().is_some(),
        ]
        .into_iter()
        .filter(|cancelled| *cancelled)
        .count();

        self.gate.abandon();
        self.seek = SeekState::default();

        info!(cancelled_timers = cancelled, "Player session torn down");
    }
}
