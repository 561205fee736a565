//! Cancellable one-shot and recurring timers on the tokio runtime.

use std::{future::Future, time::Duration};

use tokio::{
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};

/// A scheduled callback that can be revoked before it fires.
///
/// Dropping the handle does not cancel the timer; call [`TimerHandle::cancel`].
#[derive(Debug)]
pub struct TimerHandle {
    task: JoinHandle<()>,
}

impl TimerHandle {
    pub fn cancel(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Runs `callback` once `deadline` is reached.
pub fn at<F>(deadline: Instant, callback: F) -> TimerHandle
where
    F: Future<Output = ()> + Send + 'static,
{
    TimerHandle {
        task: tokio::spawn(async move {
            time::sleep_until(deadline).await;
            callback.await;
        }),
    }
}

/// Runs `callback` once after `delay`.
pub fn after<F>(delay: Duration, callback: F) -> TimerHandle
where
    F: Future<Output = ()> + Send + 'static,
{
    at(Instant::now() + delay, callback)
}

/// Runs `callback` every `period`, first tick immediately, until cancelled or
/// until the callback returns `false`.
pub fn every<F, Fut>(period: Duration, mut callback: F) -> TimerHandle
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = bool> + Send + 'static,
{
    TimerHandle {
        task: tokio::spawn(async move {
            let mut ticker = time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                if !callback().await {
                    break;
                }
            }
        }),
    }
}

/// Every timer a single sequencer has armed.
#[derive(Debug, Default)]
pub struct TimerSet {
    handles: Vec<TimerHandle>,
}

impl TimerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, handle: TimerHandle) {
        self.handles.retain(|existing| !existing.is_finished());
        self.handles.push(handle);
    }

    /// Number of timers armed and not yet completed.
    pub fn pending(&self) -> usize {
        self.handles
            .iter()
            .filter(|handle| !handle.is_finished())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.pending() == 0
    }

    /// Revokes every tracked timer and forgets it. Returns how many were still pending.
    pub fn cancel_all(&mut self) -> usize {
        let pending = self.pending();
        for handle in self.handles.drain(..) {
            handle.cancel();
        }
        pending
    }
}

impl Drop for TimerSet {
    fn drop(&mut self) {
        for handle in &self.handles {
            handle.cancel();
        }
    }
}

#[cfg(test)]
#[path = "tests/timers_tests.rs"]
mod tests;
