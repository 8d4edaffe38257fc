//! Single-slot debounce timer
//!
//! Scheduling a new value replaces whatever was pending and restarts the
//! countdown, so only the last value of a burst ever fires.

use std::future::pending;
use std::time::Duration;
use tokio::time::{sleep_until, Instant};

/// Replace-and-reschedule timer holding at most one pending value
#[derive(Debug)]
pub struct Debounce<T> {
    slot: Option<(Instant, T)>,
}

impl<T> Default for Debounce<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Debounce<T> {
    pub fn new() -> Self {
        Self { slot: None }
    }

    /// Schedule `value` to fire after `delay`, cancelling any pending value
    pub fn schedule(&mut self, delay: Duration, value: T) {
        self.slot = Some((Instant::now() + delay, value));
    }

    /// Drop the pending value, returning it
    pub fn cancel(&mut self) -> Option<T> {
        self.slot.take().map(|(_, value)| value)
    }

    pub fn is_pending(&self) -> bool {
        self.slot.is_some()
    }

    /// Value that will fire next, if any
    pub fn pending(&self) -> Option<&T> {
        self.slot.as_ref().map(|(_, value)| value)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.slot.as_ref().map(|(deadline, _)| *deadline)
    }

    /// Wait for the pending value to come due and take it.
    ///
    /// Never resolves while nothing is scheduled. Cancellation-safe: the
    /// slot is only emptied after the deadline has passed.
    pub async fn fired(&mut self) -> T {
        let Some(deadline) = self.deadline() else {
            return pending().await;
        };

        sleep_until(deadline).await;

        match self.slot.take() {
            Some((_, value)) => value,
            None => pending().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn fires_last_scheduled_value() {
        let mut debounce = Debounce::new();
        debounce.schedule(Duration::from_millis(100), 10);
        debounce.schedule(Duration::from_millis(100), 20);
        debounce.schedule(Duration::from_millis(100), 35);

        let start = Instant::now();
        assert_eq!(debounce.fired().await, 35);
        assert!(start.elapsed() >= Duration::from_millis(100));
        assert!(!debounce.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn rescheduling_restarts_the_window() {
        let mut debounce = Debounce::new();
        debounce.schedule(Duration::from_millis(100), 'a');

        tokio::time::advance(Duration::from_millis(80)).await;
        let restarted = Instant::now();
        debounce.schedule(Duration::from_millis(100), 'b');

        assert_eq!(debounce.fired().await, 'b');
        assert!(restarted.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test(start_paused = true)]
    async fn empty_slot_never_fires() {
        let mut debounce: Debounce<u8> = Debounce::new();
        let fired =
            tokio::time::timeout(Duration::from_secs(5), debounce.fired()).await;
        assert!(fired.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_drops_pending_value() {
        let mut debounce = Debounce::new();
        debounce.schedule(Duration::from_millis(50), "skip");
        assert_eq!(debounce.pending(), Some(&"skip"));

        assert_eq!(debounce.cancel(), Some("skip"));
        assert!(!debounce.is_pending());

        let fired =
            tokio::time::timeout(Duration::from_millis(500), debounce.fired()).await;
        assert!(fired.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn interrupted_wait_keeps_value() {
        let mut debounce = Debounce::new();
        debounce.schedule(Duration::from_millis(100), 7);

        let early = tokio::time::timeout(Duration::from_millis(20), debounce.fired()).await;
        assert!(early.is_err());
        assert_eq!(debounce.pending(), Some(&7));

        assert_eq!(debounce.fired().await, 7);
    }
}
