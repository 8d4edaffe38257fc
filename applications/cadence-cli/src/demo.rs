//! Interactive demo session
//!
//! Binds the controller to a simulated engine, advances the engine on a
//! ticker, and feeds typed commands through the session handle.

use crate::{
    commands::{DemoCommand, HELP},
    config::AppConfig,
    error::Result,
};
use cadence_control::{
    format_time,
    sim::{PlayPolicy, SimHandle, SimulatedEngine},
    ControlSurface, EngineSnapshot, PlayError, PlayerSession, SessionDriver,
};
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{info, warn};

/// Run the demo until `quit` or end of input, returning the final engine state
pub async fn run<R, S>(config: AppConfig, input: R, surface: S) -> Result<EngineSnapshot>
where
    R: AsyncBufRead + Unpin,
    S: ControlSurface,
{
    let (engine, sim, events) = SimulatedEngine::with_track(config.demo.track_duration_secs);
    if config.demo.autoplay_blocked {
        sim.set_play_policy(PlayPolicy::Reject(PlayError::NotAllowed(
            "autoplay blocked by configuration".to_string(),
        )));
    }

    let session = PlayerSession::bind(Some(engine), surface, config.controller.clone())?;
    let (driver, handle) = SessionDriver::new(session, events);
    let driver_task = tokio::spawn(driver.run());
    let ticker = tokio::spawn(tick(
        sim.clone(),
        Duration::from_millis(config.demo.tick_ms),
    ));

    info!(
        duration = %format_time(config.demo.track_duration_secs),
        "Demo track loaded"
    );

    let mut lines = input.lines();
    let mut read_error = None;
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                read_error = Some(e);
                break;
            }
        };

        let command = match DemoCommand::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                warn!("{}", e);
                continue;
            }
        };

        match command {
            DemoCommand::Quit => break,
            DemoCommand::Help => println!("\n{}", HELP),
            DemoCommand::Status => println!("\n{}", describe(&sim.snapshot())),
            other => {
                for input in other.inputs(&config.controller, sim.snapshot().paused) {
                    if let Err(e) = handle.send(input) {
                        warn!("{}", e);
                    }
                }
            }
        }
    }

    ticker.abort();
    handle.shutdown();
    driver_task.await?;

    if let Some(e) = read_error {
        return Err(e.into());
    }

    let snapshot = sim.snapshot();
    info!(position = %format_time(snapshot.current_time), "Demo finished");
    Ok(snapshot)
}

async fn tick(sim: SimHandle, period: Duration) {
    let mut interval = tokio::time::interval(period);
    // The first tick completes immediately
    interval.tick().await;

    loop {
        interval.tick().await;
        sim.advance(period.as_secs_f64());
    }
}

fn describe(snapshot: &EngineSnapshot) -> String {
    format!(
        "{} at {} of {}, volume {:.2}{}, speed {}x",
        if snapshot.paused { "paused" } else { "playing" },
        format_time(snapshot.current_time),
        format_time(snapshot.duration),
        snapshot.volume,
        if snapshot.muted { " (muted)" } else { "" },
        snapshot.playback_rate
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_control::{sim::MemorySurface, PlayIcon, SurfaceRoles};

    #[tokio::test(start_paused = true)]
    async fn commands_reach_the_engine() {
        let (surface, probe) = MemorySurface::new(SurfaceRoles::all());
        let input: &[u8] = b"play\nvol 0.25\nspeed 1.5\nbogus\n\nquit\nvol 0.9\n";

        let snapshot = run(AppConfig::default(), input, surface).await.unwrap();

        assert!(!snapshot.paused);
        assert_eq!(snapshot.volume, 0.25);
        assert_eq!(snapshot.playback_rate, 1.5);
        assert_eq!(probe.state().duration, "4:05");
    }

    #[tokio::test(start_paused = true)]
    async fn blocked_autoplay_leaves_engine_paused() {
        let mut config = AppConfig::default();
        config.demo.autoplay_blocked = true;
        let (surface, probe) = MemorySurface::new(SurfaceRoles::all());

        let snapshot = run(config, &b"play\n"[..], surface).await.unwrap();

        assert!(snapshot.paused);
        assert_eq!(probe.state().play_icon, PlayIcon::Play);
    }

    /// Input that yields one command and then fails
    struct FailingInput {
        data: &'static [u8],
    }

    impl tokio::io::AsyncRead for FailingInput {
        fn poll_read(
            self: std::pin::Pin<&mut Self>,
            _cx: &mut std::task::Context<'_>,
            _buf: &mut tokio::io::ReadBuf<'_>,
        ) -> std::task::Poll<std::io::Result<()>> {
            std::task::Poll::Ready(Err(std::io::Error::other("terminal went away")))
        }
    }

    impl AsyncBufRead for FailingInput {
        fn poll_fill_buf(
            self: std::pin::Pin<&mut Self>,
            _cx: &mut std::task::Context<'_>,
        ) -> std::task::Poll<std::io::Result<&[u8]>> {
            let this = self.get_mut();
            if this.data.is_empty() {
                std::task::Poll::Ready(Err(std::io::Error::other("terminal went away")))
            } else {
                std::task::Poll::Ready(Ok(this.data))
            }
        }

        fn consume(self: std::pin::Pin<&mut Self>, amt: usize) {
            let this = self.get_mut();
            this.data = &this.data[amt..];
        }
    }

    #[tokio::test(start_paused = true)]
    async fn read_error_still_stops_the_session() {
        let (surface, probe) = MemorySurface::new(SurfaceRoles::all());
        let input = FailingInput { data: b"play\n" };

        let result = run(AppConfig::default(), input, surface).await;
        assert!(matches!(result, Err(crate::error::CliError::Io(_))));

        // The driver tore the session down, so the surface stops changing
        let renders = probe.renders();
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(probe.renders(), renders);
    }

    #[tokio::test(start_paused = true)]
    async fn ticker_advances_playing_engine() {
        let (_engine, sim, _events) = SimulatedEngine::with_track(10.0);
        sim.force_playing();

        let task = tokio::spawn(tick(sim.clone(), Duration::from_millis(250)));
        tokio::time::sleep(Duration::from_millis(1_100)).await;
        task.abort();

        assert_eq!(sim.snapshot().current_time, 1.0);
    }

    #[test]
    fn describes_engine_state() {
        let snapshot = EngineSnapshot {
            paused: false,
            current_time: 75.0,
            duration: 245.0,
            volume: 0.5,
            muted: true,
            playback_rate: 1.25,
        };
        assert_eq!(
            describe(&snapshot),
            "playing at 1:15 of 4:05, volume 0.50 (muted), speed 1.25x"
        );
    }
}
