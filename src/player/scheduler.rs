//! Cooperative tick source for automatic playback
//!
//! The [`Scheduler`] never runs anything on its own. The event loop asks it
//! how long it may block ([`Scheduler::timeout`]) and then polls it for a
//! [`Tick`]. Every tick carries the [`TickToken`] of the run that produced
//! it; cancelling bumps the generation, so a tick minted before a cancel can
//! be recognised as stale and dropped by its receiver.

use std::cell::Cell;
use std::time::{Duration, Instant};
use tracing::debug;

/// Default interval between ticks
pub const DEFAULT_RESOLUTION: Duration = Duration::from_millis(30);

/// Source of the current time
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Cell<Instant>,
}

impl Default for ManualClock {
    fn default() -> Self {
        ManualClock::new()
    }
}

impl ManualClock {
    pub fn new() -> Self {
        ManualClock {
            now: Cell::new(Instant::now()),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

/// Identifies one scheduler run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickToken(u64);

/// Time that passed since the previous tick of the same run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub dt: Duration,
    pub token: TickToken,
}

#[derive(Debug)]
pub struct Scheduler {
    resolution: Duration,
    generation: u64,
    /// Time of the last tick while running
    last: Option<Instant>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Scheduler::new(DEFAULT_RESOLUTION)
    }
}

impl Scheduler {
    pub fn new(resolution: Duration) -> Self {
        Scheduler {
            resolution: resolution.max(Duration::from_millis(1)),
            generation: 0,
            last: None,
        }
    }

    /// Begin a new run, invalidating any previous one
    pub fn start(&mut self, now: Instant) -> TickToken {
        self.generation += 1;
        self.last = Some(now);
        debug!(generation = self.generation, "scheduler started");
        TickToken(self.generation)
    }

    /// Stop ticking; outstanding tokens become stale
    pub fn cancel(&mut self) {
        if self.last.take().is_some() {
            self.generation += 1;
            debug!(generation = self.generation, "scheduler cancelled");
        }
    }

    pub fn is_running(&self) -> bool {
        self.last.is_some()
    }

    /// Token of the current run, if any
    pub fn token(&self) -> Option<TickToken> {
        self.last.map(|_| TickToken(self.generation))
    }

    pub fn is_current(&self, token: TickToken) -> bool {
        self.token() == Some(token)
    }

    /// Yield a tick once at least one resolution has passed since the last
    pub fn poll(&mut self, now: Instant) -> Option<Tick> {
        let last = self.last?;
        let dt = now.saturating_duration_since(last);
        if dt < self.resolution {
            return None;
        }
        self.last = Some(now);
        Some(Tick {
            dt,
            token: TickToken(self.generation),
        })
    }

    /// How long the caller may wait before the next poll is due
    pub fn timeout(&self, now: Instant) -> Option<Duration> {
        let last = self.last?;
        Some(
            self.resolution
                .saturating_sub(now.saturating_duration_since(last)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_follow_the_resolution() {
        let clock = ManualClock::new();
        let mut scheduler = Scheduler::new(Duration::from_millis(30));
        let token = scheduler.start(clock.now());

        clock.advance(Duration::from_millis(20));
        assert_eq!(scheduler.poll(clock.now()), None);
        assert_eq!(
            scheduler.timeout(clock.now()),
            Some(Duration::from_millis(10))
        );

        clock.advance(Duration::from_millis(15));
        assert_eq!(
            scheduler.poll(clock.now()),
            Some(Tick {
                dt: Duration::from_millis(35),
                token
            })
        );
    }

    #[test]
    fn cancel_invalidates_tokens() {
        let clock = ManualClock::new();
        let mut scheduler = Scheduler::default();
        let old = scheduler.start(clock.now());
        scheduler.cancel();
        assert!(!scheduler.is_running());
        assert!(!scheduler.is_current(old));

        clock.advance(Duration::from_secs(1));
        assert_eq!(scheduler.poll(clock.now()), None);
        assert_eq!(scheduler.timeout(clock.now()), None);

        let new = scheduler.start(clock.now());
        assert_ne!(old, new);
        assert!(scheduler.is_current(new));
    }
}
