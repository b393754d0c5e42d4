//! Time sources for stamping new entries.

use std::sync::Mutex;

use chrono::{Local, NaiveDateTime, SubsecRound, TimeDelta};

/// Supplies the registration time for new entries.
///
/// Implementations return whole seconds; anything finer is dropped by
/// the textual format anyway.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Local wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local().trunc_subsecs(0)
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    current: Mutex<NaiveDateTime>,
}

impl ManualClock {
    pub fn at(start: NaiveDateTime) -> Self {
        Self { current: Mutex::new(start.trunc_subsecs(0)) }
    }

    pub fn set(&self, to: NaiveDateTime) {
        *self.lock() = to.trunc_subsecs(0);
    }

    /// Move forward (or back) by `by`, clamping at the representable range.
    pub fn advance(&self, by: TimeDelta) {
        let mut current = self.lock();
        *current = current.checked_add_signed(by).unwrap_or(if by < TimeDelta::zero() {
            NaiveDateTime::MIN
        } else {
            NaiveDateTime::MAX.trunc_subsecs(0)
        });
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, NaiveDateTime> {
        self.current.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        *self.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    #[test]
    fn test_system_clock_whole_seconds() {
        assert_eq!(SystemClock.now().nanosecond(), 0);
    }

    #[test]
    fn test_manual_clock_advance() {
        let start = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap().and_hms_opt(23, 59, 58).unwrap();
        let clock = ManualClock::at(start);
        assert_eq!(clock.now(), start);

        clock.advance(TimeDelta::seconds(3));
        let expected = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 1).unwrap();
        assert_eq!(clock.now(), expected);
    }

    #[test]
    fn test_manual_clock_advance_saturates() {
        let start = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap().and_hms_opt(12, 0, 0).unwrap();
        let clock = ManualClock::at(start);

        clock.advance(TimeDelta::days(1_000_000_000));
        assert_eq!(clock.now(), NaiveDateTime::MAX.trunc_subsecs(0));

        clock.set(start);
        clock.advance(TimeDelta::days(-1_000_000_000));
        assert_eq!(clock.now(), NaiveDateTime::MIN);
    }

    #[test]
    fn test_manual_clock_set_drops_subseconds() {
        let start = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap().and_hms_opt(12, 0, 0).unwrap();
        let clock = ManualClock::at(start);
        let later = NaiveDate::from_ymd_opt(2024, 6, 2).unwrap().and_hms_milli_opt(8, 30, 15, 750).unwrap();
        clock.set(later);
        assert_eq!(clock.now().nanosecond(), 0);
        assert_eq!(clock.now().second(), 15);
    }
}
