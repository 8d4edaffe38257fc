//! Control surface capability
//!
//! A control surface is the set of UI elements bound to one engine. Elements
//! are discovered by role; the controller never relies on layout.

use serde::{Deserialize, Serialize};

/// Roles an element on the control surface can fill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    PlayPause,
    SkipBack,
    SkipForward,
    Seek,
    Volume,
    Mute,
    Speed,
    ElapsedLabel,
    DurationLabel,
}

/// Which roles a discovered control surface provides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceRoles {
    pub play_pause: bool,
    pub skip_back: bool,
    pub skip_forward: bool,
    pub seek: bool,
    pub volume: bool,
    pub mute: bool,
    pub speed: bool,
    pub elapsed_label: bool,
    pub duration_label: bool,
}

impl SurfaceRoles {
    /// A surface with every role present
    pub fn all() -> Self {
        Self {
            play_pause: true,
            skip_back: true,
            skip_forward: true,
            seek: true,
            volume: true,
            mute: true,
            speed: true,
            elapsed_label: true,
            duration_label: true,
        }
    }

    /// A surface with no elements at all
    pub fn none() -> Self {
        Self {
            play_pause: false,
            skip_back: false,
            skip_forward: false,
            seek: false,
            volume: false,
            mute: false,
            speed: false,
            elapsed_label: false,
            duration_label: false,
        }
    }

    pub fn has(&self, role: Role) -> bool {
        match role {
            Role::PlayPause => self.play_pause,
            Role::SkipBack => self.skip_back,
            Role::SkipForward => self.skip_forward,
            Role::Seek => self.seek,
            Role::Volume => self.volume,
            Role::Mute => self.mute,
            Role::Speed => self.speed,
            Role::ElapsedLabel => self.elapsed_label,
            Role::DurationLabel => self.duration_label,
        }
    }

    /// Only surfaces with a play/pause button are bound
    pub fn is_bindable(&self) -> bool {
        self.play_pause
    }
}

/// Icon shown on the play/pause button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayIcon {
    /// Engine is paused, button offers "play"
    Play,
    /// Engine is playing, button offers "pause"
    Pause,
}

/// Volume button tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VolumeIcon {
    Muted,
    Low,
    High,
}

impl VolumeIcon {
    /// Threshold between the low and high tiers
    pub const HIGH_THRESHOLD: f64 = 0.5;

    pub fn for_level(volume: f64, muted: bool) -> Self {
        if muted || volume <= 0.0 {
            VolumeIcon::Muted
        } else if volume < Self::HIGH_THRESHOLD {
            VolumeIcon::Low
        } else {
            VolumeIcon::High
        }
    }
}

/// Partial update for a control surface
///
/// `None` leaves the corresponding element untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurfaceView {
    pub play_icon: Option<PlayIcon>,
    pub elapsed: Option<String>,
    pub duration: Option<String>,
    /// Upper bound of the seek control in seconds
    pub seek_max: Option<f64>,
    /// Seek control position in seconds
    pub seek_value: Option<f64>,
    pub volume_value: Option<f64>,
    pub volume_icon: Option<VolumeIcon>,
}

impl SurfaceView {
    pub fn is_empty(&self) -> bool {
        *self == SurfaceView::default()
    }

    /// Drop fields for elements the surface does not have
    pub fn restricted_to(mut self, roles: &SurfaceRoles) -> Self {
        if !roles.play_pause {
            self.play_icon = None;
        }
        if !roles.elapsed_label {
            self.elapsed = None;
        }
        if !roles.duration_label {
            self.duration = None;
        }
        if !roles.seek {
            self.seek_max = None;
            self.seek_value = None;
        }
        if !roles.volume {
            self.volume_value = None;
        }
        if !roles.mute {
            self.volume_icon = None;
        }
        self
    }
}

/// UI elements bound to one engine
pub trait ControlSurface: Send + 'static {
    /// Roles discovered on this surface
    fn roles(&self) -> SurfaceRoles;

    /// Reflect a (partial) view onto the elements
    fn render(&mut self, view: &SurfaceView);
}

/// Fully merged state of a control surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceState {
    pub play_icon: PlayIcon,
    pub elapsed: String,
    pub duration: String,
    pub seek_max: f64,
    pub seek_value: f64,
    pub volume_value: f64,
    pub volume_icon: VolumeIcon,
}

impl Default for SurfaceState {
    fn default() -> Self {
        Self {
            play_icon: PlayIcon::Play,
            elapsed: "0:00".to_string(),
            duration: "0:00".to_string(),
            seek_max: 0.0,
            seek_value: 0.0,
            volume_value: 1.0,
            volume_icon: VolumeIcon::High,
        }
    }
}

impl SurfaceState {
    /// Merge a partial view into this state
    pub fn apply(&mut self, view: &SurfaceView) {
        if let Some(icon) = view.play_icon {
            self.play_icon = icon;
        }
        if let Some(elapsed) = &view.elapsed {
            self.elapsed.clone_from(elapsed);
        }
        if let Some(duration) = &view.duration {
            self.duration.clone_from(duration);
        }
        if let Some(max) = view.seek_max {
            self.seek_max = max;
        }
        if let Some(value) = view.seek_value {
            self.seek_value = value;
        }
        if let Some(volume) = view.volume_value {
            self.volume_value = volume;
        }
        if let Some(icon) = view.volume_icon {
            self.volume_icon = icon;
        }
    }
}

/// User input delivered by a control surface
///
/// Mouse and touch gestures on the seek control collapse into the same
/// grab/release pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ControlInput {
    /// Play/pause button clicked
    PlayPause,
    /// Skip back by the given number of seconds
    SkipBack(f64),
    /// Skip forward by the given number of seconds
    SkipForward(f64),
    /// Drag or touch started on the seek control
    SeekGrab,
    /// Seek control moved while grabbed (seconds)
    SeekInput(f64),
    /// Drag or touch ended with the control at the given position
    SeekRelease(f64),
    /// Single click on the seek control at the given position
    SeekClick(f64),
    /// Volume control moved
    Volume(f64),
    /// Speed selector changed
    Speed(f64),
    /// Volume button clicked
    MuteToggle,
}

impl ControlInput {
    /// Role of the element that produces this input
    pub fn role(&self) -> Role {
        match self {
            ControlInput::PlayPause => Role::PlayPause,
            ControlInput::SkipBack(_) => Role::SkipBack,
            ControlInput::SkipForward(_) => Role::SkipForward,
            ControlInput::SeekGrab
            | ControlInput::SeekInput(_)
            | ControlInput::SeekRelease(_)
            | ControlInput::SeekClick(_) => Role::Seek,
            ControlInput::Volume(_) => Role::Volume,
            ControlInput::Speed(_) => Role::Speed,
            ControlInput::MuteToggle => Role::Mute,
        }
    }
}
