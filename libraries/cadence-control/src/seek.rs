//! Seek coordinator
//!
//! `Idle -> Seeking -> Idle`. Grabbing the seek control pauses playback (if
//! it was playing) so the position stays still under the user's finger.
//! While grabbed, moves only update the display and reschedule a debounced
//! commit, and engine position reports are not reflected on the control.
//! Releasing commits the final value at once and resumes after a grace delay.
//! A plain click is a one-shot seek that never enters `Seeking`.

use crate::{
    engine::{known_duration, PlaybackEngine},
    format::format_time,
    session::PlayerSession,
    surface::{ControlSurface, SurfaceView},
};
use tracing::debug;

/// Drag state of the seek control
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct SeekState {
    /// True only between a grab and its matching release
    pub(crate) seeking: bool,
    /// Whether playback was active when the grab started
    pub(crate) was_playing: bool,
}

impl<E: PlaybackEngine, S: ControlSurface> PlayerSession<E, S> {
    pub fn is_seeking(&self) -> bool {
        self.seek.seeking
    }

    /// Drag or touch started on the seek control
    pub fn seek_grab(&mut self) {
        if self.seek.seeking {
            // Touch and mouse can both report the same grab
            return;
        }

        // A pending resume means the previous seek paused a playing engine
        let resume_cancelled = self.resume.cancel().is_some();
        self.seek.seeking = true;
        self.seek.was_playing = resume_cancelled || !self.engine.paused();
        if !self.engine.paused() {
            self.gate.request_pause(&mut self.engine);
        }

        debug!(was_playing = self.seek.was_playing, "Seek grab");
    }

    /// Seek control moved. Updates the display and debounces the commit.
    pub fn seek_input(&mut self, value: f64) {
        if !value.is_finite() {
            debug!(value, "Ignoring non-finite seek input");
            return;
        }

        let value = self.clamp_to_track(value);
        self.render(SurfaceView {
            elapsed: Some(format_time(value)),
            seek_value: Some(value),
            ..SurfaceView::default()
        });

        self.seek_commit.schedule(self.config.seek_debounce(), value);
    }

    /// Drag or touch ended with the control at `value`
    pub fn seek_release(&mut self, value: f64) {
        self.seek_commit.cancel();

        if !self.seek.seeking {
            debug!("Seek release without grab, committing directly");
            self.commit_seek(value);
            self.refresh();
            return;
        }

        self.seek.seeking = false;
        self.commit_seek(value);

        if std::mem::take(&mut self.seek.was_playing) {
            self.resume.schedule(self.config.seek_resume_delay(), ());
        }

        self.refresh();
    }

    /// One-shot click on the seek control at `value`
    pub fn seek_click(&mut self, value: f64) {
        if self.seek.seeking {
            // Part of the ongoing drag; the release commits
            return;
        }

        let resume_cancelled = self.resume.cancel().is_some();
        self.seek_commit.cancel();

        let was_playing = resume_cancelled || !self.engine.paused();
        if !self.engine.paused() {
            self.gate.request_pause(&mut self.engine);
        }

        self.commit_seek(value);

        if was_playing {
            self.resume.schedule(self.config.seek_resume_delay(), ());
        }

        self.refresh();
    }

    /// Assign `value` to the engine position. Suppressed while the duration
    /// is unknown or zero, or when `value` is not a number.
    pub(crate) fn commit_seek(&mut self, value: f64) -> bool {
        let Some(duration) = known_duration(self.engine.duration()) else {
            debug!(value, "Seek suppressed, duration unknown");
            return false;
        };

        if !value.is_finite() {
            debug!(value, "Seek suppressed, position not a number");
            return false;
        }

        self.engine.set_current_time(value.clamp(0.0, duration));
        true
    }

    fn clamp_to_track(&self, value: f64) -> f64 {
        match known_duration(self.engine.duration()) {
            Some(duration) => value.clamp(0.0, duration),
            None => value.max(0.0),
        }
    }
}
