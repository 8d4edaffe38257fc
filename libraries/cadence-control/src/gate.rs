//! Playback command gate
//!
//! Serializes play/pause intents against the engine's asynchronous play
//! command:
//! - At most one play command is outstanding per session
//! - A play request made while one is outstanding is queued and re-evaluated
//!   once the outstanding command settles
//! - Pause acts immediately and is never queued behind play
//!
//! Every new intent bumps a generation counter. A play completion that fails
//! after its generation has been superseded is stale and discarded quietly;
//! a failure of the current generation is a real rejection and is logged.

use crate::engine::{PlayError, PlayFuture, PlaybackEngine};
use std::future::pending;
use tracing::{debug, warn};

/// What a play request did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayRequest {
    /// A play command was sent to the engine
    Issued,
    /// A play command is outstanding; the request will be re-evaluated when it settles
    Queued,
    /// The engine is already playing
    AlreadyPlaying,
}

/// How an outstanding play command ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayOutcome {
    /// Playback started
    Started,
    /// Failed after a newer intent replaced it; discarded
    Superseded,
    /// Failed for the current intent; playback stays paused
    Rejected(PlayError),
}

/// Settled play command, tagged with the generation that issued it
#[derive(Debug)]
pub struct PlaySettlement {
    generation: u64,
    result: Result<(), PlayError>,
}

struct PendingPlay {
    generation: u64,
    completion: PlayFuture,
}

/// Gate in front of the engine's play/pause commands
#[derive(Default)]
pub struct PlayGate {
    pending: Option<PendingPlay>,
    generation: u64,
    queued: bool,
}

impl std::fmt::Debug for PlayGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayGate")
            .field("outstanding", &self.pending.as_ref().map(|p| p.generation))
            .field("generation", &self.generation)
            .field("queued", &self.queued)
            .finish()
    }
}

impl PlayGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an engine play command has not settled yet
    pub fn is_outstanding(&self) -> bool {
        self.pending.is_some()
    }

    /// Whether a play request is waiting for the outstanding one
    pub fn is_queued(&self) -> bool {
        self.queued
    }

    /// Ask the engine to play. Idempotent: no command is sent while playing.
    pub fn request_play<E: PlaybackEngine>(&mut self, engine: &mut E) -> PlayRequest {
        if self.pending.is_some() {
            self.generation += 1;
            self.queued = true;
            debug!("Play command outstanding, queueing request");
            return PlayRequest::Queued;
        }

        if !engine.paused() {
            return PlayRequest::AlreadyPlaying;
        }

        self.generation += 1;
        self.pending = Some(PendingPlay {
            generation: self.generation,
            completion: engine.play(),
        });
        debug!(generation = self.generation, "Play command issued");
        PlayRequest::Issued
    }

    /// Pause immediately. Returns whether a pause command was sent.
    ///
    /// Supersedes any outstanding play command and drops a queued play
    /// request, so the latest intent wins.
    pub fn request_pause<E: PlaybackEngine>(&mut self, engine: &mut E) -> bool {
        self.generation += 1;
        if self.queued {
            debug!("Queued play request dropped by pause");
            self.queued = false;
        }

        if engine.paused() {
            return false;
        }

        if let Err(e) = engine.pause() {
            warn!("Pause failed: {}", e);
            return false;
        }

        true
    }

    /// Wait for the outstanding play command to settle.
    ///
    /// Never resolves while nothing is outstanding. The outstanding marker is
    /// cleared as soon as the command settles.
    pub async fn settled(&mut self) -> PlaySettlement {
        let Some(outstanding) = self.pending.as_mut() else {
            return pending().await;
        };

        let generation = outstanding.generation;
        let result = outstanding.completion.as_mut().await;
        self.pending = None;

        PlaySettlement { generation, result }
    }

    /// Classify a settled play command and run any queued request
    pub fn complete<E: PlaybackEngine>(
        &mut self,
        settlement: PlaySettlement,
        engine: &mut E,
    ) -> PlayOutcome {
        let outcome = match settlement.result {
            Ok(()) => {
                debug!(generation = settlement.generation, "Play command completed");
                PlayOutcome::Started
            }
            Err(e) if settlement.generation != self.generation => {
                debug!(
                    generation = settlement.generation,
                    "Discarding superseded play failure: {}", e
                );
                PlayOutcome::Superseded
            }
            Err(e) => {
                warn!("Playback request rejected: {}", e);
                PlayOutcome::Rejected(e)
            }
        };

        if std::mem::take(&mut self.queued) {
            self.request_play(engine);
        }

        outcome
    }

    /// Forget the outstanding command and any queued request.
    ///
    /// The engine may still settle the dropped command; nobody observes it.
    pub fn abandon(&mut self) {
        self.generation += 1;
        self.queued = false;
        if self.pending.take().is_some() {
            debug!("Abandoned outstanding play command");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{PlayPolicy, SimCommand, SimulatedEngine};

    #[tokio::test]
    async fn play_is_idempotent_while_playing() {
        let (mut engine, sim, _events) = SimulatedEngine::new();
        let mut gate = PlayGate::new();

        assert_eq!(gate.request_play(&mut engine), PlayRequest::Issued);
        let settlement = gate.settled().await;
        assert_eq!(gate.complete(settlement, &mut engine), PlayOutcome::Started);

        assert_eq!(gate.request_play(&mut engine), PlayRequest::AlreadyPlaying);
        assert_eq!(sim.play_count(), 1);
    }

    #[tokio::test]
    async fn second_play_waits_for_first() {
        let (mut engine, sim, _events) = SimulatedEngine::new();
        sim.set_play_policy(PlayPolicy::Manual);
        let mut gate = PlayGate::new();

        assert_eq!(gate.request_play(&mut engine), PlayRequest::Issued);
        assert_eq!(gate.request_play(&mut engine), PlayRequest::Queued);
        assert_eq!(sim.play_count(), 1);

        assert!(sim.settle_play(Ok(())));
        let settlement = gate.settled().await;
        assert!(!gate.is_outstanding());
        assert_eq!(gate.complete(settlement, &mut engine), PlayOutcome::Started);

        // Queued request re-evaluated against a playing engine
        assert!(!gate.is_queued());
        assert_eq!(sim.play_count(), 1);
    }

    #[tokio::test]
    async fn queued_play_reissues_when_still_paused() {
        let (mut engine, sim, _events) = SimulatedEngine::new();
        sim.set_play_policy(PlayPolicy::Manual);
        let mut gate = PlayGate::new();

        gate.request_play(&mut engine);
        gate.request_play(&mut engine);

        // First command fails; it was superseded by the queued request
        assert!(sim.settle_play(Err(PlayError::NotAllowed("autoplay".into()))));
        let settlement = gate.settled().await;
        assert_eq!(
            gate.complete(settlement, &mut engine),
            PlayOutcome::Superseded
        );

        assert!(gate.is_outstanding());
        assert_eq!(sim.play_count(), 2);
    }

    #[tokio::test]
    async fn pause_supersedes_outstanding_play() {
        let (mut engine, sim, _events) = SimulatedEngine::new();
        sim.set_play_policy(PlayPolicy::Manual);
        let mut gate = PlayGate::new();

        gate.request_play(&mut engine);
        assert!(gate.request_pause(&mut engine));

        // Engine aborts the interrupted play command
        let settlement = gate.settled().await;
        assert_eq!(
            gate.complete(settlement, &mut engine),
            PlayOutcome::Superseded
        );
        assert!(sim.snapshot().paused);
        assert_eq!(sim.commands(), vec![SimCommand::Play, SimCommand::Pause]);
    }

    #[tokio::test]
    async fn pause_drops_queued_play() {
        let (mut engine, sim, _events) = SimulatedEngine::new();
        sim.set_play_policy(PlayPolicy::Manual);
        let mut gate = PlayGate::new();

        gate.request_play(&mut engine);
        gate.request_play(&mut engine);
        gate.request_pause(&mut engine);
        assert!(!gate.is_queued());

        let settlement = gate.settled().await;
        gate.complete(settlement, &mut engine);

        assert_eq!(sim.play_count(), 1);
        assert!(sim.snapshot().paused);
    }

    #[tokio::test]
    async fn current_rejection_is_reported() {
        let (mut engine, sim, _events) = SimulatedEngine::new();
        sim.set_play_policy(PlayPolicy::Reject(PlayError::NotAllowed(
            "user gesture required".into(),
        )));
        let mut gate = PlayGate::new();

        gate.request_play(&mut engine);
        let settlement = gate.settled().await;
        let outcome = gate.complete(settlement, &mut engine);

        assert!(matches!(outcome, PlayOutcome::Rejected(PlayError::NotAllowed(_))));
        assert!(sim.snapshot().paused);
        assert!(!gate.is_outstanding());
    }

    #[tokio::test]
    async fn pause_when_paused_sends_nothing() {
        let (mut engine, sim, _events) = SimulatedEngine::new();
        let mut gate = PlayGate::new();

        assert!(!gate.request_pause(&mut engine));
        assert!(sim.commands().is_empty());
    }

    #[tokio::test]
    async fn pause_failure_is_not_fatal() {
        let (mut engine, sim, _events) = SimulatedEngine::new();
        let mut gate = PlayGate::new();

        gate.request_play(&mut engine);
        let settlement = gate.settled().await;
        gate.complete(settlement, &mut engine);

        sim.set_pause_fails(true);
        assert!(!gate.request_pause(&mut engine));
        assert!(!sim.snapshot().paused);
    }

    #[tokio::test(start_paused = true)]
    async fn abandoned_play_never_settles() {
        let (mut engine, sim, _events) = SimulatedEngine::new();
        sim.set_play_policy(PlayPolicy::Manual);
        let mut gate = PlayGate::new();

        gate.request_play(&mut engine);
        gate.abandon();
        sim.settle_play(Ok(()));

        let settled =
            tokio::time::timeout(std::time::Duration::from_secs(1), gate.settled()).await;
        assert!(settled.is_err());
    }
}
