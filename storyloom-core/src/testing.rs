//! Testing utilities.
//!
//! Deterministic clocks and ids so that tests can assert on exact
//! timestamps and identifiers.

use crate::clock::{Clock, FixedClock};
use crate::config::ServiceConfig;
use crate::ids::SequentialIds;
use crate::service::ProjectService;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::path::PathBuf;
use std::sync::atomic::{AtomicI64, Ordering};

/// The instant every [`test_service`] reports as "now".
pub fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0)
        .single()
        .unwrap_or_default()
}

/// A service rooted at `projects_dir` with a frozen clock and ids
/// `id-1`, `id-2`, ...
pub fn test_service(projects_dir: impl Into<PathBuf>) -> ProjectService {
    let config = ServiceConfig::new().with_projects_dir(projects_dir);
    ProjectService::with_sources(
        config,
        Box::new(FixedClock(fixed_time())),
        Box::new(SequentialIds::new("id")),
    )
}

/// Clock that moves forward one second every time it is read.
#[derive(Debug)]
pub struct SteppingClock {
    start: DateTime<Utc>,
    ticks: AtomicI64,
}

impl SteppingClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            start,
            ticks: AtomicI64::new(0),
        }
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        let tick = self.ticks.fetch_add(1, Ordering::Relaxed);
        self.start + Duration::seconds(tick)
    }
}

/// Like [`test_service`], but every read of the clock is one second later
/// than the previous one.
pub fn stepping_service(projects_dir: impl Into<PathBuf>) -> ProjectService {
    let config = ServiceConfig::new().with_projects_dir(projects_dir);
    ProjectService::with_sources(
        config,
        Box::new(SteppingClock::new(fixed_time())),
        Box::new(SequentialIds::new("id")),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stepping_clock_advances() {
        let clock = SteppingClock::new(fixed_time());
        let first = clock.now();
        let second = clock.now();
        assert_eq!(first, fixed_time());
        assert_eq!(second - first, Duration::seconds(1));
    }
}
