//! Playback engine capability
//!
//! The engine performs decoding and output. The controller only drives it
//! through this narrow surface:
//! - Readable properties (paused, position, duration, volume, mute, rate)
//! - Property assignment (position, volume, mute, rate)
//! - `play()` returning a deferred completion, `pause()` acting immediately
//! - Events describing state changes, delivered over a channel

use crate::error::Result;
use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Deferred completion of an engine play command
pub type PlayFuture = BoxFuture<'static, std::result::Result<(), PlayError>>;

/// Reasons a play command can fail to complete
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlayError {
    /// Playback blocked by platform policy (e.g. autoplay restrictions)
    #[error("Playback not allowed: {0}")]
    NotAllowed(String),

    /// A later command interrupted this play request
    #[error("Play request was interrupted by a later command")]
    Aborted,

    /// The loaded source cannot be played
    #[error("Source not supported: {0}")]
    NotSupported(String),

    /// Any other engine failure
    #[error("Engine error: {0}")]
    Engine(String),
}

/// Classification of a runtime error reported by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaErrorKind {
    /// Fetching was aborted by the user agent
    Aborted,
    /// A network failure interrupted loading or playback
    Network,
    /// The media could not be decoded
    Decode,
    /// The source format or location is not supported
    SourceNotSupported,
    /// Code outside the known range
    Unknown(u16),
}

impl MediaErrorKind {
    /// Classify a numeric media error code (1 = aborted ... 4 = unsupported)
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => MediaErrorKind::Aborted,
            2 => MediaErrorKind::Network,
            3 => MediaErrorKind::Decode,
            4 => MediaErrorKind::SourceNotSupported,
            other => MediaErrorKind::Unknown(other),
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            MediaErrorKind::Aborted => "playback aborted",
            MediaErrorKind::Network => "network error while loading audio",
            MediaErrorKind::Decode => "audio could not be decoded",
            MediaErrorKind::SourceNotSupported => "audio source not supported",
            MediaErrorKind::Unknown(_) => "unknown playback error",
        }
    }
}

/// Events emitted by the engine, never by the controller
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EngineEvent {
    Play,
    Pause,
    TimeUpdate,
    LoadedMetadata,
    VolumeChange,
    Ended,
    Error(MediaErrorKind),
}

/// Point-in-time copy of the engine's readable state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub paused: bool,
    /// Current position in seconds
    pub current_time: f64,
    /// Track length in seconds; NaN or infinite while unknown
    pub duration: f64,
    /// Volume in `[0, 1]`
    pub volume: f64,
    pub muted: bool,
    pub playback_rate: f64,
}

impl EngineSnapshot {
    /// Duration if it is known and non-zero
    pub fn known_duration(&self) -> Option<f64> {
        known_duration(self.duration)
    }
}

/// Returns the duration if it is finite and positive
pub fn known_duration(duration: f64) -> Option<f64> {
    (duration.is_finite() && duration > 0.0).then_some(duration)
}

/// Audio engine driven by a player session
///
/// Implementations own decode/output. Assignments are synchronous; the only
/// asynchronous command is [`play`](PlaybackEngine::play).
pub trait PlaybackEngine: Send + 'static {
    fn paused(&self) -> bool;

    fn current_time(&self) -> f64;

    fn set_current_time(&mut self, seconds: f64);

    /// Track length in seconds (NaN while metadata is not loaded)
    fn duration(&self) -> f64;

    fn volume(&self) -> f64;

    fn set_volume(&mut self, volume: f64);

    fn muted(&self) -> bool;

    fn set_muted(&mut self, muted: bool);

    fn playback_rate(&self) -> f64;

    fn set_playback_rate(&mut self, rate: f64);

    /// Begin playback. The returned future settles once playback actually
    /// started or the request failed.
    fn play(&mut self) -> PlayFuture;

    /// Pause playback immediately
    fn pause(&mut self) -> Result<()>;

    /// Copy all readable properties
    fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            paused: self.paused(),
            current_time: self.current_time(),
            duration: self.duration(),
            volume: self.volume(),
            muted: self.muted(),
            playback_rate: self.playback_rate(),
        }
    }
}
