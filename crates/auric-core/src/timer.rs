use std::time::Duration;

/// Single-slot deferred task. Scheduling replaces whatever was pending.
///
/// Time only advances through [`Deferred::tick`], which the owning unit calls
/// from its `update`.
#[derive(Debug)]
pub struct Deferred<T> {
    pending: Option<(Duration, T)>,
}

impl<T> Default for Deferred<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Deferred<T> {
    pub const fn new() -> Self {
        Self { pending: None }
    }

    /// Returns the payload that was replaced, if any.
    pub fn schedule(&mut self, delay: Duration, payload: T) -> Option<T> {
        self.pending.replace((delay, payload)).map(|(_, p)| p)
    }

    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(_, p)| p)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn remaining(&self) -> Option<Duration> {
        self.pending.as_ref().map(|(left, _)| *left)
    }

    pub fn payload(&self) -> Option<&T> {
        self.pending.as_ref().map(|(_, p)| p)
    }

    /// Advances the slot, yielding the payload once it is due.
    pub fn tick(&mut self, dt: Duration) -> Option<T> {
        let (left, _) = self.pending.as_mut()?;
        *left = left.saturating_sub(dt);
        if left.is_zero() { self.cancel() } else { None }
    }
}

/// Fixed-interval timer for held-key auto-repeat.
#[derive(Clone, Copy, Debug)]
pub struct Repeat {
    interval: Duration,
    elapsed: Duration,
}

impl Repeat {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            elapsed: Duration::ZERO,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Number of times the interval elapsed during `dt`.
    pub fn tick(&mut self, dt: Duration) -> u32 {
        if self.interval.is_zero() {
            return 0;
        }
        self.elapsed += dt;
        let mut fired = 0;
        while self.elapsed >= self.interval {
            self.elapsed -= self.interval;
            fired += 1;
        }
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: fn(u64) -> Duration = Duration::from_millis;

    #[test]
    fn test_deferred_fires_once_when_due() {
        let mut slot = Deferred::new();
        slot.schedule(MS(300), "open");
        assert_eq!(slot.tick(MS(200)), None);
        assert_eq!(slot.remaining(), Some(MS(100)));
        assert_eq!(slot.tick(MS(100)), Some("open"));
        assert!(!slot.is_pending());
        assert_eq!(slot.tick(MS(500)), None);
    }

    #[test]
    fn test_deferred_schedule_replaces_pending() {
        let mut slot = Deferred::new();
        slot.schedule(MS(600), 1);
        slot.tick(MS(500));
        assert_eq!(slot.schedule(MS(600), 2), Some(1));
        assert_eq!(slot.tick(MS(500)), None);
        assert_eq!(slot.tick(MS(100)), Some(2));
    }

    #[test]
    fn test_deferred_cancel() {
        let mut slot = Deferred::new();
        slot.schedule(MS(10), ());
        assert_eq!(slot.cancel(), Some(()));
        assert_eq!(slot.tick(MS(50)), None);
    }

    #[test]
    fn test_repeat_counts_elapsed_intervals() {
        let mut r = Repeat::new(MS(100));
        assert_eq!(r.tick(MS(50)), 0);
        assert_eq!(r.tick(MS(60)), 1);
        assert_eq!(r.tick(MS(290)), 3);
        assert_eq!(Repeat::new(Duration::ZERO).tick(MS(1000)), 0);
    }
}
