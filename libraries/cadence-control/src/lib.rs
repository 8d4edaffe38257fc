//! Cadence - Playback Control
//!
//! Binds a playback control surface (play/pause, skip, seek, volume, speed)
//! to an audio engine and keeps the two in sync.
//!
//! This crate provides:
//! - Play/pause gating (one outstanding play command, pause never blocked)
//! - Debounced seek dragging with pause/resume around the drag
//! - Debounced skip back/forward with clamping to the track
//! - Volume, speed and mute binding with input validation
//! - UI projection of engine state (icons, labels, seek and volume controls)
//!
//! # Architecture
//!
//! `cadence-control` knows nothing about the engine or the UI toolkit:
//! - The engine is driven through the [`PlaybackEngine`] trait
//! - The UI is reached through the [`ControlSurface`] trait
//! - Engine events arrive on a channel
//!
//! Each bound instance is a [`PlayerSession`] run by a [`SessionDriver`] on a
//! single task. The session owns its play gate and debounce timers; there is
//! no state shared between instances.
//!
//! # Example
//!
//! ```rust,no_run
//! use cadence_control::{
//!     sim::{MemorySurface, SimulatedEngine},
//!     ControlInput, ControllerConfig, PlayerSession, SessionDriver, SurfaceRoles,
//! };
//!
//! # async fn demo() -> cadence_control::Result<()> {
//! let (engine, _sim, events) = SimulatedEngine::with_track(180.0);
//! let (surface, probe) = MemorySurface::new(SurfaceRoles::all());
//!
//! let session = PlayerSession::bind(Some(engine), surface, ControllerConfig::default())?;
//! let (driver, handle) = SessionDriver::new(session, events);
//! let task = tokio::spawn(driver.run());
//!
//! handle.send(ControlInput::PlayPause)?;
//! handle.send(ControlInput::SkipForward(30.0))?;
//!
//! handle.shutdown();
//! let _session = task.await.expect("driver task");
//! println!("elapsed: {}", probe.state().elapsed);
//! # Ok(())
//! # }
//! ```

mod config;
mod debounce;
mod driver;
mod engine;
mod error;
mod format;
mod gate;
mod host;
mod panel;
mod seek;
mod session;
pub mod sim;
mod skip;
mod surface;
mod sync;

// Public exports
pub use config::ControllerConfig;
pub use debounce::Debounce;
pub use driver::{SessionDriver, SessionHandle};
pub use engine::{
    known_duration, EngineEvent, EngineSnapshot, MediaErrorKind, PlayError, PlayFuture,
    PlaybackEngine,
};
pub use error::{ControlError, Result};
pub use format::format_time;
pub use gate::{PlayGate, PlayOutcome, PlayRequest, PlaySettlement};
pub use host::{ControllerHost, PlayerBinding};
pub use panel::{valid_rate, valid_volume};
pub use session::{PlayerSession, Wake};
pub use skip::{SkipDirection, SkipRequest};
pub use surface::{
    ControlInput, ControlSurface, PlayIcon, Role, SurfaceRoles, SurfaceState, SurfaceView,
    VolumeIcon,
};
pub use sync::{project, project_ended, volume_view};
