use chrono::{Local, NaiveDateTime};
use std::sync::Mutex;

/// 12-hour clock format shared by replies, confirmations and the reminder file.
pub const CLOCK_FORMAT: &str = "%I:%M %p";
pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const SPOKEN_DATE_FORMAT: &str = "%B %d, %Y";

/// Source of local wall-clock time. Every time-dependent rule reads through this.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Settable clock for deterministic tests and replays.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<NaiveDateTime>,
}

impl ManualClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self { now: Mutex::new(now) }
    }

    pub fn set(&self, now: NaiveDateTime) {
        let mut guard = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *guard = now;
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut guard = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *guard += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn manual_clock_advances() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(23, 59, 0)
            .unwrap();
        let clock = ManualClock::new(start);
        clock.advance(chrono::Duration::minutes(2));
        assert_eq!(clock.now().format("%Y-%m-%d %H:%M").to_string(), "2024-03-02 00:01");
    }
}
