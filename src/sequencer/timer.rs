// Deferred-callback timers for the self-rescheduling playback loop
//
// The scheduler arms exactly one deferred step at a time and recomputes the
// delay on every step, so a slow step never compounds into drift the way a
// fixed-interval timer would.

use std::time::{Duration, Instant};

/// Identifies one armed callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

/// Source of deferred callbacks
pub trait Timer {
    /// Arm a callback `delay` from now
    fn schedule(&mut self, delay: Duration) -> TimerHandle;

    /// Disarm a callback; cancelling a fired or unknown handle is a no-op
    fn cancel(&mut self, handle: TimerHandle);
}

/// Timer driven by hand, for tests and offline rendering
#[derive(Debug, Default)]
pub struct ManualTimer {
    next_id: u64,
    pending: Vec<(TimerHandle, Duration)>,
    scheduled: Vec<Duration>,
}

impl ManualTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire the oldest armed callback
    pub fn fire(&mut self) -> Option<TimerHandle> {
        if self.pending.is_empty() {
            return None;
        }
        Some(self.pending.remove(0).0)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Every delay ever requested, in order
    pub fn scheduled_delays(&self) -> &[Duration] {
        &self.scheduled
    }
}

impl Timer for ManualTimer {
    fn schedule(&mut self, delay: Duration) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle(self.next_id);
        self.pending.push((handle, delay));
        self.scheduled.push(delay);
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.pending.retain(|(armed, _)| *armed != handle);
    }
}

/// Wall-clock timer that blocks the calling thread until the deadline
#[derive(Debug, Default)]
pub struct SleepTimer {
    next_id: u64,
    armed: Option<(TimerHandle, Instant)>,
}

impl SleepTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep until the armed deadline and hand back its handle.
    /// None when nothing is armed.
    pub fn wait(&mut self) -> Option<TimerHandle> {
        let (handle, deadline) = self.armed.take()?;
        let now = Instant::now();
        if deadline > now {
            std::thread::sleep(deadline - now);
        }
        Some(handle)
    }
}

impl Timer for SleepTimer {
    fn schedule(&mut self, delay: Duration) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle(self.next_id);
        self.armed = Some((handle, Instant::now() + delay));
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if self.armed.is_some_and(|(armed, _)| armed == handle) {
            self.armed = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_timer_fire_and_cancel() {
        let mut timer = ManualTimer::new();
        let first = timer.schedule(Duration::from_millis(10));
        let second = timer.schedule(Duration::from_millis(20));
        timer.cancel(first);

        assert_eq!(timer.pending_count(), 1);
        assert_eq!(timer.fire(), Some(second));
        assert_eq!(timer.fire(), None);
        assert_eq!(timer.scheduled_delays().len(), 2);
    }

    #[test]
    fn test_sleep_timer_waits_for_deadline() {
        let mut timer = SleepTimer::new();
        let handle = timer.schedule(Duration::from_millis(5));
        let start = Instant::now();
        assert_eq!(timer.wait(), Some(handle));
        assert!(start.elapsed() >= Duration::from_millis(4));
        assert_eq!(timer.wait(), None);
    }

    #[test]
    fn test_sleep_timer_cancel() {
        let mut timer = SleepTimer::new();
        let handle = timer.schedule(Duration::from_secs(60));
        timer.cancel(handle);
        assert_eq!(timer.wait(), None);
    }
}
