//! Time sources for the refresh policy and update timestamps.

use chrono::{DateTime, Utc};
use std::fmt::Debug;
use std::time::Instant;

/// Source of monotonic and wall-clock time.
pub trait Clock: Send + Sync + Debug {
    /// Monotonic instant used for cooldown arithmetic.
    fn now(&self) -> Instant;

    /// Wall-clock time used to stamp dataset updates.
    fn wall(&self) -> DateTime<Utc>;
}

/// The real clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn wall(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
pub use manual::ManualClock;

#[cfg(test)]
mod manual {
    use super::Clock;
    use chrono::{DateTime, TimeZone, Utc};
    use std::sync::Mutex;
    use std::time::{Duration, Instant};

    /// A clock that only moves when told to.
    #[derive(Debug)]
    pub struct ManualClock {
        base: Instant,
        wall_base: DateTime<Utc>,
        offset: Mutex<Duration>,
    }

    impl ManualClock {
        pub fn new() -> Self {
            Self {
                base: Instant::now(),
                wall_base: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
                offset: Mutex::new(Duration::ZERO),
            }
        }

        pub fn advance(&self, by: Duration) {
            *self.offset.lock().unwrap() += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            self.base + *self.offset.lock().unwrap()
        }

        fn wall(&self) -> DateTime<Utc> {
            let offset = *self.offset.lock().unwrap();
            self.wall_base + chrono::Duration::from_std(offset).unwrap()
        }
    }
}
