//! Logical timers on top of Zellij's `set_timeout`.
//!
//! Zellij timers cannot be cancelled and carry no payload: each
//! `set_timeout` call yields one bare `Timer` event later. The shim records
//! what each timer was for in a [`TimerQueue`] and hands one
//! [`TimerToken`] per host tick to the core, which ignores tokens it no longer cares
//! about. That is how cancellation works.

use super::RequestId;

/// What a scheduled timer is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerToken {
    /// Delayed reset after the search input lost focus. The number is the
    /// blur generation that scheduled it.
    BlurReset(u64),
    /// Backoff elapsed for the attempt that failed with this request id.
    Retry(RequestId),
    /// Attempt with this request id ran out of time.
    RequestTimeout(RequestId),
}

#[derive(Debug, Clone, Copy)]
struct ScheduledTimer {
    due_ms: i64,
    token: TimerToken,
}

/// Pending timers ordered by due time.
#[derive(Debug, Default)]
pub struct TimerQueue {
    pending: Vec<ScheduledTimer>,
}

impl TimerQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a timer and returns the delay in seconds to pass to
    /// `set_timeout`.
    #[allow(clippy::cast_precision_loss)]
    pub fn schedule(&mut self, token: TimerToken, delay_ms: u64, now_ms: i64) -> f64 {
        let delay = i64::try_from(delay_ms).unwrap_or(i64::MAX);
        let due_ms = now_ms.saturating_add(delay);
        let at = self.pending.partition_point(|t| t.due_ms <= due_ms);
        self.pending.insert(at, ScheduledTimer { due_ms, token });

        delay_ms as f64 / 1000.0
    }

    /// Pops the earliest pending timer.
    ///
    /// Called once per host `Timer` event. Every `set_timeout` call yields
    /// exactly one host event and those arrive in due order, so each event
    /// answers the earliest timer still pending. Taking more than one would
    /// leave a later host event with nothing to answer but a timer that is
    /// not due yet.
    pub fn fire(&mut self) -> Option<TimerToken> {
        if self.pending.is_empty() {
            return None;
        }
        Some(self.pending.remove(0).token)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_reports_seconds() {
        let mut queue = TimerQueue::new();
        let secs = queue.schedule(TimerToken::BlurReset(1), 200, 0);
        assert!((secs - 0.2).abs() < f64::EPSILON);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn fires_in_due_order() {
        let mut queue = TimerQueue::new();
        queue.schedule(TimerToken::RequestTimeout(1), 10_000, 0);
        queue.schedule(TimerToken::BlurReset(1), 200, 0);
        queue.schedule(TimerToken::Retry(2), 300, 0);

        assert_eq!(queue.fire(), Some(TimerToken::BlurReset(1)));
        assert_eq!(queue.fire(), Some(TimerToken::Retry(2)));
        assert_eq!(queue.fire(), Some(TimerToken::RequestTimeout(1)));
        assert!(queue.is_empty());
    }

    #[test]
    fn one_host_tick_answers_one_timer() {
        let mut queue = TimerQueue::new();
        queue.schedule(TimerToken::RequestTimeout(1), 10_000, 0);
        queue.schedule(TimerToken::RequestTimeout(2), 10_000, 10);
        queue.schedule(TimerToken::RequestTimeout(3), 10_000, 5_000);

        // The tick for timeout 1 must not also consume timeout 2, otherwise
        // the tick for timeout 2 would fire timeout 3 five seconds early.
        assert_eq!(queue.fire(), Some(TimerToken::RequestTimeout(1)));
        assert_eq!(queue.fire(), Some(TimerToken::RequestTimeout(2)));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.fire(), Some(TimerToken::RequestTimeout(3)));
    }

    #[test]
    fn empty_queue_fires_nothing() {
        assert_eq!(TimerQueue::new().fire(), None);
    }
}
