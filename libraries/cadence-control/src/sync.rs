//! UI sync - projects engine state onto the control surface
//!
//! Projection is pure and idempotent: the same snapshot always yields the
//! same view. The seek control and elapsed label are left alone while the
//! user is dragging.

use crate::{
    engine::{EngineEvent, EngineSnapshot, PlaybackEngine},
    format::format_time,
    session::PlayerSession,
    surface::{ControlSurface, PlayIcon, SurfaceView, VolumeIcon},
};
use tracing::{debug, error};

/// Full view of the surface for `snapshot`
pub fn project(snapshot: &EngineSnapshot, seeking: bool) -> SurfaceView {
    let duration = snapshot.known_duration();

    let mut view = SurfaceView {
        play_icon: Some(play_icon(snapshot.paused)),
        duration: Some(format_time(snapshot.duration)),
        seek_max: Some(duration.unwrap_or(0.0)),
        ..volume_view(snapshot)
    };

    if !seeking {
        view.elapsed = Some(format_time(snapshot.current_time));
        view.seek_value = Some(snapshot.current_time.max(0.0));
    }

    view
}

/// View after the track played to its end: back at the start, showing play
pub fn project_ended(snapshot: &EngineSnapshot) -> SurfaceView {
    SurfaceView {
        play_icon: Some(PlayIcon::Play),
        elapsed: Some(format_time(0.0)),
        seek_value: Some(0.0),
        ..project(snapshot, false)
    }
}

/// Volume control and mute icon only
pub fn volume_view(snapshot: &EngineSnapshot) -> SurfaceView {
    SurfaceView {
        volume_value: Some(snapshot.volume),
        volume_icon: Some(VolumeIcon::for_level(snapshot.volume, snapshot.muted)),
        ..SurfaceView::default()
    }
}

fn play_icon(paused: bool) -> PlayIcon {
    if paused {
        PlayIcon::Play
    } else {
        PlayIcon::Pause
    }
}

impl<E: PlaybackEngine, S: ControlSurface> PlayerSession<E, S> {
    /// Render the parts of `view` this surface has elements for
    pub(crate) fn render(&mut self, view: SurfaceView) {
        let view = view.restricted_to(&self.surface.roles());
        if !view.is_empty() {
            self.surface.render(&view);
        }
    }

    /// Recompute the whole surface from engine state
    pub fn refresh(&mut self) {
        let view = project(&self.engine.snapshot(), self.seek.seeking);
        self.render(view);
    }

    pub(crate) fn sync_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::Ended => {
                debug!("Track ended");
                let view = project_ended(&self.engine.snapshot());
                self.render(view);
            }
            EngineEvent::Error(kind) => {
                error!(?kind, "Playback error: {}", kind.message());
                self.refresh();
            }
            EngineEvent::VolumeChange => {
                let view = volume_view(&self.engine.snapshot());
                self.render(view);
            }
            EngineEvent::Play
            | EngineEvent::Pause
            | EngineEvent::TimeUpdate
            | EngineEvent::LoadedMetadata => self.refresh(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ControllerConfig;
    use crate::engine::MediaErrorKind;
    use crate::sim::{MemorySurface, SimulatedEngine};
    use crate::surface::{ControlInput, SurfaceRoles};

    fn snapshot() -> EngineSnapshot {
        EngineSnapshot {
            paused: false,
            current_time: 65.4,
            duration: 180.0,
            volume: 0.3,
            muted: false,
            playback_rate: 1.0,
        }
    }

    #[test]
    fn projects_playing_state() {
        let view = project(&snapshot(), false);

        assert_eq!(view.play_icon, Some(PlayIcon::Pause));
        assert_eq!(view.elapsed.as_deref(), Some("1:05"));
        assert_eq!(view.duration.as_deref(), Some("3:00"));
        assert_eq!(view.seek_max, Some(180.0));
        assert_eq!(view.seek_value, Some(65.4));
        assert_eq!(view.volume_icon, Some(VolumeIcon::Low));
    }

    #[test]
    fn projection_is_idempotent() {
        assert_eq!(project(&snapshot(), false), project(&snapshot(), false));
    }

    #[test]
    fn seeking_leaves_position_alone() {
        let view = project(&snapshot(), true);
        assert_eq!(view.seek_value, None);
        assert_eq!(view.elapsed, None);
        assert_eq!(view.play_icon, Some(PlayIcon::Pause));
    }

    #[test]
    fn unknown_duration_renders_zero() {
        let mut snap = snapshot();
        snap.duration = f64::NAN;

        let view = project(&snap, false);
        assert_eq!(view.duration.as_deref(), Some("0:00"));
        assert_eq!(view.seek_max, Some(0.0));
    }

    #[test]
    fn ended_resets_to_start() {
        let mut snap = snapshot();
        snap.current_time = 180.0;
        snap.paused = true;

        let view = project_ended(&snap);
        assert_eq!(view.elapsed.as_deref(), Some("0:00"));
        assert_eq!(view.seek_value, Some(0.0));
        assert_eq!(view.play_icon, Some(PlayIcon::Play));
        assert_eq!(view.duration.as_deref(), Some("3:00"));
    }

    #[tokio::test]
    async fn time_updates_do_not_move_grabbed_control() {
        let (engine, sim, _events) = SimulatedEngine::with_track(100.0);
        let (surface, probe) = MemorySurface::new(SurfaceRoles::all());
        let mut session =
            PlayerSession::bind(Some(engine), surface, ControllerConfig::default()).unwrap();

        session.handle_input(ControlInput::SeekGrab);
        session.handle_input(ControlInput::SeekInput(40.0));

        sim.set_position(12.0);
        session.handle_engine_event(EngineEvent::TimeUpdate);

        let state = probe.state();
        assert_eq!(state.seek_value, 40.0);
        assert_eq!(state.elapsed, "0:40");
    }

    #[test]
    fn engine_error_refreshes_surface() {
        let (engine, sim, _events) = SimulatedEngine::with_track(100.0);
        let (surface, probe) = MemorySurface::new(SurfaceRoles::all());
        let mut session =
            PlayerSession::bind(Some(engine), surface, ControllerConfig::default()).unwrap();
        sim.force_playing();
        session.handle_engine_event(EngineEvent::Play);
        assert_eq!(probe.state().play_icon, PlayIcon::Pause);

        sim.fail(MediaErrorKind::Network);
        session.handle_engine_event(EngineEvent::Error(MediaErrorKind::Network));
        assert_eq!(probe.state().play_icon, PlayIcon::Play);
    }

    #[test]
    fn missing_labels_are_not_rendered() {
        let (engine, _sim, _events) = SimulatedEngine::with_track(100.0);
        let roles = SurfaceRoles {
            play_pause: true,
            ..SurfaceRoles::none()
        };
        let (surface, probe) = MemorySurface::new(roles);
        let mut session =
            PlayerSession::bind(Some(engine), surface, ControllerConfig::default()).unwrap();
        let renders = probe.renders();

        // Volume view has nothing to show on this surface
        session.handle_engine_event(EngineEvent::VolumeChange);
        assert_eq!(probe.renders(), renders);
        assert_eq!(probe.state().duration, "0:00");
    }
}
