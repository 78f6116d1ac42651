//! Wall-clock adapter.
//!
//! On target the system clock is set by SNTP and the timezone by `TZ`;
//! `chrono::Local` reads both through libc. Before the first sync the clock
//! starts at the epoch, which only affects ClockEnd timing and log stamps.

use chrono::{Local, NaiveDateTime};

use crate::app::ports::ClockPort;

/// Anything before this is treated as "not yet synced".
const SYNCED_AFTER_YEAR: i32 = 2020;

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }

    /// True once SNTP has set a plausible date.
    pub fn is_synced(&self) -> bool {
        use chrono::Datelike;
        self.now().year() >= SYNCED_AFTER_YEAR
    }
}

impl ClockPort for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}
