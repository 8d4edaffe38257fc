//! Control panel binder - volume, speed and mute
//!
//! Plain property assignment with input validation. These are idempotent
//! scalar sets with no asynchronous completion, so nothing is debounced.

use crate::{engine::PlaybackEngine, session::PlayerSession, surface::ControlSurface, sync::volume_view};
use tracing::debug;

/// Whether `volume` is assignable to the engine
pub fn valid_volume(volume: f64) -> bool {
    volume.is_finite() && (0.0..=1.0).contains(&volume)
}

/// Whether `rate` is assignable to the engine
pub fn valid_rate(rate: f64) -> bool {
    rate.is_finite() && rate > 0.0
}

impl<E: PlaybackEngine, S: ControlSurface> PlayerSession<E, S> {
    /// Volume control moved
    pub fn set_volume(&mut self, volume: f64) {
        if !valid_volume(volume) {
            debug!(volume, "Ignoring out-of-range volume");
            return;
        }
        self.engine.set_volume(volume);
    }

    /// Speed selector changed
    pub fn set_speed(&mut self, rate: f64) {
        if !valid_rate(rate) {
            debug!(rate, "Ignoring invalid playback rate");
            return;
        }
        self.engine.set_playback_rate(rate);
    }

    /// Volume button clicked
    pub fn toggle_mute(&mut self) {
        let muted = !self.engine.muted();
        self.engine.set_muted(muted);

        let view = volume_view(&self.engine.snapshot());
        self.render(view);
    }
}
