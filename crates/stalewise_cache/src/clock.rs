//! Time sources for cache entries.
//!
//! Entries never read the system clock directly; they ask a [`Clock`].
//! Production code uses [`SystemClock`], tests drive a [`ManualClock`].

use std::{
    sync::{Arc, Mutex},
    time::{Duration, SystemTime},
};

/// Anything that can report the current wall-clock time (UTC).
pub trait Clock {
    fn now(&self) -> SystemTime;
}

/// Reads `SystemTime::now()`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

impl<F> Clock for F
where
    F: Fn() -> SystemTime,
{
    fn now(&self) -> SystemTime {
        self()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same instant, so a test can keep one handle and hand
/// another to the entry under test.
#[derive(Clone, Debug)]
pub struct ManualClock {
    now: Arc<Mutex<SystemTime>>,
}

impl ManualClock {
    pub fn new(start: SystemTime) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    /// Move the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        if let Ok(mut now) = self.now.lock() {
            *now += by;
        }
    }

    /// Jump to an absolute instant.
    pub fn set(&self, to: SystemTime) {
        if let Ok(mut now) = self.now.lock() {
            *now = to;
        }
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(SystemTime::now())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> SystemTime {
        match self.now.lock() {
            Ok(now) => *now,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Clock, ManualClock};
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    #[test]
    fn manual_clock_clones_share_time() {
        let start = UNIX_EPOCH + Duration::from_secs(1_000);
        let clock = ManualClock::new(start);
        let handle = clock.clone();

        handle.advance(Duration::from_secs(5));
        assert_eq!(clock.now(), start + Duration::from_secs(5));

        handle.set(start);
        assert_eq!(clock.now(), start);
    }

    #[test]
    fn closures_are_clocks() {
        let fixed = UNIX_EPOCH + Duration::from_secs(42);
        let clock = move || fixed;
        assert_eq!(clock.now(), fixed);
    }

    #[test]
    fn system_clock_is_not_in_the_past() {
        let before = SystemTime::now();
        let now = super::SystemClock.now();
        assert!(now >= before);
    }
}
