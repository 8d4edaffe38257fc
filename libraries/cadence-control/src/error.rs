//! Error types for the playback controller

use thiserror::Error;

/// Controller errors
#[derive(Debug, Error)]
pub enum ControlError {
    /// The control surface was discovered without an engine handle
    #[error("No playback engine attached to the control surface")]
    MissingEngine,

    /// The control surface has no play/pause button
    #[error("Control surface has no play/pause button")]
    MissingPlayButton,

    /// An engine command failed synchronously
    #[error("Engine command failed: {0}")]
    Engine(String),

    /// The session driver has stopped
    #[error("Player session is closed")]
    SessionClosed,

    /// Configuration rejected by validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for controller operations
pub type Result<T> = std::result::Result<T, ControlError>;
