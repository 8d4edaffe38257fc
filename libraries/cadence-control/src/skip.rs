//! Skip coordinator
//!
//! Skip-back and skip-forward activations are debounced: a burst of clicks
//! inside the window collapses into one skip using the last requested
//! direction and amount.

use crate::{
    engine::{known_duration, PlaybackEngine},
    session::PlayerSession,
    surface::ControlSurface,
};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipDirection {
    Back,
    Forward,
}

/// A pending skip
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkipRequest {
    pub direction: SkipDirection,
    /// Distance in seconds
    pub seconds: f64,
}

impl SkipRequest {
    pub fn back(seconds: f64) -> Self {
        Self {
            direction: SkipDirection::Back,
            seconds,
        }
    }

    pub fn forward(seconds: f64) -> Self {
        Self {
            direction: SkipDirection::Forward,
            seconds,
        }
    }

    /// Position this skip lands on, starting from `current`.
    ///
    /// Never below zero. Never past `duration` when it is known; with an
    /// unknown duration a forward skip is applied as is.
    pub fn target(&self, current: f64, duration: f64) -> f64 {
        let raw = match self.direction {
            SkipDirection::Back => current - self.seconds,
            SkipDirection::Forward => current + self.seconds,
        };

        match known_duration(duration) {
            Some(duration) => raw.clamp(0.0, duration),
            None => raw.max(0.0),
        }
    }
}

impl<E: PlaybackEngine, S: ControlSurface> PlayerSession<E, S> {
    pub fn skip_back(&mut self, seconds: f64) {
        self.schedule_skip(SkipRequest::back(seconds));
    }

    pub fn skip_forward(&mut self, seconds: f64) {
        self.schedule_skip(SkipRequest::forward(seconds));
    }

    /// Request waiting for the skip debounce window to close
    pub fn pending_skip(&self) -> Option<&SkipRequest> {
        self.skip.pending()
    }

    fn schedule_skip(&mut self, request: SkipRequest) {
        if !request.seconds.is_finite() || request.seconds < 0.0 {
            debug!(?request, "Ignoring skip with invalid amount");
            return;
        }

        self.skip.schedule(self.config.skip_debounce(), request);
    }

    /// Apply a debounced skip
    pub(crate) fn fire_skip(&mut self, request: SkipRequest) {
        if self.seek.seeking {
            debug!(?request, "Dropping skip during seek drag");
            return;
        }

        let was_playing = !self.engine.paused();
        let current = self.engine.current_time();
        let target = request.target(current, self.engine.duration());
        if !target.is_finite() {
            debug!(current, "Skip suppressed, position not a number");
            return;
        }

        debug!(direction = ?request.direction, from = current, to = target, "Skip");
        self.engine.set_current_time(target);

        if was_playing {
            self.resume.schedule(self.config.skip_resume_delay(), ());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ControllerConfig;
    use crate::session::Wake;
    use crate::sim::{MemorySurface, SimulatedEngine};
    use crate::surface::{ControlInput, SurfaceRoles};

    #[test]
    fn back_never_goes_negative() {
        assert_eq!(SkipRequest::back(15.0).target(10.0, 100.0), 0.0);
        assert_eq!(SkipRequest::back(15.0).target(10.0, f64::NAN), 0.0);
    }

    #[test]
    fn forward_stops_at_duration() {
        assert_eq!(SkipRequest::forward(30.0).target(90.0, 100.0), 100.0);
        assert_eq!(SkipRequest::forward(5.0).target(90.0, 100.0), 95.0);
    }

    #[test]
    fn forward_with_unknown_duration_is_unbounded() {
        assert_eq!(SkipRequest::forward(30.0).target(90.0, f64::NAN), 120.0);
        assert_eq!(SkipRequest::forward(30.0).target(90.0, f64::INFINITY), 120.0);
    }

    #[tokio::test]
    async fn burst_collapses_into_last_request() {
        let (engine, sim, _events) = SimulatedEngine::with_track(100.0);
        let (surface, _probe) = MemorySurface::new(SurfaceRoles::all());
        let mut session =
            PlayerSession::bind(Some(engine), surface, ControllerConfig::default()).unwrap();
        sim.set_position(50.0);

        session.handle_input(ControlInput::SkipBack(10.0));
        session.handle_input(ControlInput::SkipBack(10.0));
        session.handle_input(ControlInput::SkipForward(20.0));

        assert_eq!(session.pending_skip(), Some(&SkipRequest::forward(20.0)));
        assert!(sim.seeks().is_empty());

        let request = *session.pending_skip().unwrap();
        session.handle_wake(Wake::Skip(request));
        assert_eq!(sim.seeks(), vec![70.0]);
    }

    #[tokio::test]
    async fn skip_while_playing_schedules_resume() {
        let (engine, sim, _events) = SimulatedEngine::with_track(100.0);
        let (surface, _probe) = MemorySurface::new(SurfaceRoles::all());
        let mut session =
            PlayerSession::bind(Some(engine), surface, ControllerConfig::default()).unwrap();
        sim.force_playing();

        session.handle_wake(Wake::Skip(SkipRequest::forward(10.0)));
        assert!(session.resume_pending());
    }

    #[tokio::test]
    async fn invalid_amount_is_ignored() {
        let (engine, _sim, _events) = SimulatedEngine::with_track(100.0);
        let (surface, _probe) = MemorySurface::new(SurfaceRoles::all());
        let mut session =
            PlayerSession::bind(Some(engine), surface, ControllerConfig::default()).unwrap();

        session.skip_forward(f64::NAN);
        session.skip_back(-5.0);
        assert!(session.pending_skip().is_none());
    }

    #[tokio::test]
    async fn skip_is_dropped_during_drag() {
        let (engine, sim, _events) = SimulatedEngine::with_track(100.0);
        let (surface, _probe) = MemorySurface::new(SurfaceRoles::all());
        let mut session =
            PlayerSession::bind(Some(engine), surface, ControllerConfig::default()).unwrap();

        session.seek_grab();
        session.handle_wake(Wake::Skip(SkipRequest::forward(10.0)));
        assert!(sim.seeks().is_empty());
    }
}
