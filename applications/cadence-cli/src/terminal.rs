//! Text control surface
//!
//! Redraws a single status line whenever the controller renders.

use cadence_control::{
    ControlSurface, PlayIcon, SurfaceRoles, SurfaceState, SurfaceView, VolumeIcon,
};
use std::io::{self, Stdout, Write};
use tracing::debug;

const BAR_WIDTH: usize = 24;

/// Control surface drawing onto a terminal line
pub struct TerminalSurface<W> {
    state: SurfaceState,
    out: W,
}

impl TerminalSurface<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self {
            state: SurfaceState::default(),
            out,
        }
    }

    pub fn state(&self) -> &SurfaceState {
        &self.state
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn redraw(&mut self) -> io::Result<()> {
        // Clear the line and return the cursor before drawing
        write!(self.out, "\r\x1b[2K{}", status_line(&self.state))?;
        self.out.flush()
    }
}

impl<W: Write + Send + 'static> ControlSurface for TerminalSurface<W> {
    fn roles(&self) -> SurfaceRoles {
        SurfaceRoles::all()
    }

    fn render(&mut self, view: &SurfaceView) {
        self.state.apply(view);
        if let Err(e) = self.redraw() {
            debug!("Failed to draw status line: {}", e);
        }
    }
}

/// One-line rendering of a surface
pub fn status_line(state: &SurfaceState) -> String {
    let icon = match state.play_icon {
        PlayIcon::Play => "|>",
        PlayIcon::Pause => "||",
    };
    let volume = match state.volume_icon {
        VolumeIcon::Muted => "muted",
        VolumeIcon::Low => "low",
        VolumeIcon::High => "high",
    };

    format!(
        "[{}] {} [{}] {}  vol {:.0}% ({})",
        icon,
        state.elapsed,
        progress_bar(state.seek_value, state.seek_max),
        state.duration,
        state.volume_value * 100.0,
        volume
    )
}

fn progress_bar(value: f64, max: f64) -> String {
    let filled = if max > 0.0 && value.is_finite() {
        ((value / max).clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize
    } else {
        0
    };

    format!("{}{}", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_paused_state() {
        let line = status_line(&SurfaceState::default());
        assert_eq!(
            line,
            format!("[|>] 0:00 [{}] 0:00  vol 100% (high)", "-".repeat(BAR_WIDTH))
        );
    }

    #[test]
    fn progress_is_proportional() {
        assert_eq!(progress_bar(50.0, 100.0).matches('#').count(), BAR_WIDTH / 2);
        assert_eq!(progress_bar(500.0, 100.0).matches('#').count(), BAR_WIDTH);
        assert_eq!(progress_bar(10.0, 0.0).matches('#').count(), 0);
        assert_eq!(progress_bar(f64::NAN, 100.0).len(), BAR_WIDTH);
    }

    #[test]
    fn render_merges_partial_views() {
        let mut surface = TerminalSurface::new(Vec::new());

        surface.render(&SurfaceView {
            play_icon: Some(PlayIcon::Pause),
            elapsed: Some("1:05".to_string()),
            ..SurfaceView::default()
        });
        surface.render(&SurfaceView {
            volume_value: Some(0.3),
            volume_icon: Some(VolumeIcon::Low),
            ..SurfaceView::default()
        });

        assert_eq!(surface.state().play_icon, PlayIcon::Pause);
        assert_eq!(surface.state().elapsed, "1:05");

        let output = String::from_utf8(surface.into_inner()).unwrap();
        assert!(output.ends_with("vol 30% (low)"));
        assert_eq!(output.matches('\r').count(), 2);
    }
}
