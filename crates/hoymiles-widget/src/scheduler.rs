//! Self-rescheduling refresh timer.
//!
//! Chained single-shot, not a fixed period: after the delay elapses a
//! refresh request is pushed to the host, then the timer re-arms with the
//! configured interval. Drift equals render time plus delay. A resolved
//! delay of zero stops the loop permanently.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Marker pushed to the host whenever the widget wants its DOM re-read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshRequest;

/// Arms at most one pending timer at a time for one widget instance.
pub struct UpdateScheduler {
    interval: Duration,
    updates: mpsc::UnboundedSender<RefreshRequest>,
    task: Option<JoinHandle<()>>,
}

impl UpdateScheduler {
    pub fn new(interval: Duration, updates: mpsc::UnboundedSender<RefreshRequest>) -> Self {
        Self {
            interval,
            updates,
            task: None,
        }
    }

    /// Arm the timer chain.
    ///
    /// The first delay is `delay_override` if given, else the configured
    /// interval; every later iteration uses the configured interval. A
    /// resolved first delay of zero means nothing is armed; a zero interval
    /// stops the chain after the overridden first fire. Calling this while
    /// a timer is already pending is a no-op.
    pub fn schedule(&mut self, delay_override: Option<Duration>) {
        let first_delay = delay_override.unwrap_or(self.interval);
        if first_delay.is_zero() {
            debug!("refresh interval is zero, not scheduling");
            return;
        }
        if self.is_pending() {
            debug!("refresh timer already pending, not re-arming");
            return;
        }

        let interval = self.interval;
        let updates = self.updates.clone();
        self.task = Some(tokio::spawn(async move {
            let mut delay = first_delay;
            loop {
                tokio::time::sleep(delay).await;
                if updates.send(RefreshRequest).is_err() {
                    // Host dropped its receiver; nothing left to refresh.
                    break;
                }
                delay = interval;
                if delay.is_zero() {
                    break;
                }
            }
        }));
    }

    /// Whether a timer is currently armed.
    pub fn is_pending(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for UpdateScheduler {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{advance, timeout};

    fn scheduler(interval_ms: u64) -> (UpdateScheduler, mpsc::UnboundedReceiver<RefreshRequest>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (UpdateScheduler::new(Duration::from_millis(interval_ms), tx), rx)
    }

    #[tokio::test(start_paused = true)]
    async fn fires_after_interval_and_rearms() {
        let (mut sched, mut rx) = scheduler(100);
        sched.schedule(None);

        advance(Duration::from_millis(100)).await;
        assert_eq!(rx.recv().await, Some(RefreshRequest));

        advance(Duration::from_millis(100)).await;
        assert_eq!(rx.recv().await, Some(RefreshRequest));
        assert!(sched.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn zero_interval_never_arms() {
        let (mut sched, mut rx) = scheduler(0);
        sched.schedule(None);

        assert!(!sched.is_pending());
        let result = timeout(Duration::from_secs(60), rx.recv()).await;
        assert!(result.is_err(), "no refresh should ever fire");
    }

    #[tokio::test(start_paused = true)]
    async fn override_controls_first_delay_only() {
        let (mut sched, mut rx) = scheduler(100);
        sched.schedule(Some(Duration::from_millis(10)));

        advance(Duration::from_millis(10)).await;
        assert_eq!(rx.recv().await, Some(RefreshRequest));

        // Second fire uses the configured interval, not the override.
        advance(Duration::from_millis(10)).await;
        assert!(rx.try_recv().is_err());
        advance(Duration::from_millis(90)).await;
        assert_eq!(rx.recv().await, Some(RefreshRequest));
    }

    #[tokio::test(start_paused = true)]
    async fn override_with_zero_interval_fires_once() {
        let (mut sched, mut rx) = scheduler(0);
        sched.schedule(Some(Duration::from_millis(10)));

        advance(Duration::from_millis(10)).await;
        assert_eq!(rx.recv().await, Some(RefreshRequest));

        let result = timeout(Duration::from_secs(60), rx.recv()).await;
        assert!(result.is_err(), "chain must stop after the overridden fire");
    }

    #[tokio::test(start_paused = true)]
    async fn double_schedule_arms_a_single_timer() {
        let (mut sched, mut rx) = scheduler(100);
        sched.schedule(None);
        sched.schedule(None);
        sched.schedule(None);

        advance(Duration::from_millis(100)).await;
        assert_eq!(rx.recv().await, Some(RefreshRequest));
        assert!(rx.try_recv().is_err(), "only one timer may be armed");
    }

    #[tokio::test(start_paused = true)]
    async fn chain_stops_when_host_drops_receiver() {
        let (mut sched, rx) = scheduler(100);
        sched.schedule(None);
        drop(rx);

        // Two advances cover the sleep deadline regardless of when the
        // spawned task first polled; the yields let it observe the closed
        // channel and finish.
        advance(Duration::from_millis(100)).await;
        advance(Duration::from_millis(100)).await;
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert!(!sched.is_pending());
    }
}
