//! Injectable wall clock.
//!
//! Jobs and the alert scheduler read time only through [`Clock`], so tests
//! can pin "now" and the server's local UTC offset.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, FixedOffset, Local, Offset, Utc};

/// Source of the current instant and the server's local offset.
pub trait Clock: Send + Sync + std::fmt::Debug + 'static {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;

    /// UTC offset used to interpret wall-clock times of day.
    fn local_offset(&self) -> FixedOffset;

    /// Current instant in server-local time.
    fn local_now(&self) -> DateTime<FixedOffset> {
        self.now().with_timezone(&self.local_offset())
    }
}

/// The process clock, using the host time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn local_offset(&self) -> FixedOffset {
        *Local::now().offset()
    }
}

/// A manually driven clock.
#[derive(Debug)]
pub struct FixedClock {
    millis: AtomicI64,
    offset: FixedOffset,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>, offset: FixedOffset) -> Self {
        Self {
            millis: AtomicI64::new(now.timestamp_millis()),
            offset,
        }
    }

    /// A clock pinned to `now` with a UTC local offset.
    pub fn utc(now: DateTime<Utc>) -> Self {
        Self::new(now, Utc.fix())
    }

    pub fn set(&self, now: DateTime<Utc>) {
        self.millis.store(now.timestamp_millis(), Ordering::SeqCst);
    }

    pub fn advance(&self, by: chrono::Duration) {
        self.millis.fetch_add(by.num_milliseconds(), Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.millis.load(Ordering::SeqCst)).unwrap_or_default()
    }

    fn local_offset(&self) -> FixedOffset {
        self.offset
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Timelike};

    use super::*;

    #[test]
    fn test_fixed_clock_advances() {
        let start = Utc.with_ymd_and_hms(2025, 3, 1, 7, 0, 0).unwrap();
        let clock = FixedClock::utc(start);
        clock.advance(chrono::Duration::minutes(34));
        assert_eq!(clock.now().minute(), 34);
    }

    #[test]
    fn test_local_now_applies_offset() {
        let start = Utc.with_ymd_and_hms(2025, 3, 1, 23, 30, 0).unwrap();
        let ist = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
        let clock = FixedClock::new(start, ist);
        let local = clock.local_now();
        assert_eq!(local.hour(), 5);
        assert_eq!(local.date_naive().to_string(), "2025-03-02");
    }
}
