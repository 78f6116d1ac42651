//! Status published by the control loop after every tick.

use core::cell::Cell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

use crate::fsm::Phase;

/// Point-in-time view of the controller for the interactive context.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusSnapshot {
    pub phase: Phase,
    /// Brightness currently shown.
    pub percent: u8,
    /// Brightness the dimmer is ramping toward.
    pub target: u8,
    pub relay_on: bool,
    pub night_active: bool,
    /// Last good illuminance reading.
    pub lux: f32,
    pub countdown_a: u32,
    pub countdown_c: u32,
    pub countdown_e: u32,
    pub override_pending: bool,
    /// Events lost to a full queue since boot.
    pub dropped_events: u32,
}

impl StatusSnapshot {
    pub const BOOT: Self = Self {
        phase: Phase::Off,
        percent: 0,
        target: 0,
        relay_on: false,
        night_active: false,
        lux: 0.0,
        countdown_a: 0,
        countdown_c: 0,
        countdown_e: 0,
        override_pending: false,
        dropped_events: 0,
    };
}

impl Default for StatusSnapshot {
    fn default() -> Self {
        Self::BOOT
    }
}

pub struct SharedStatus {
    inner: Mutex<CriticalSectionRawMutex, Cell<StatusSnapshot>>,
}

impl SharedStatus {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(Cell::new(StatusSnapshot::BOOT)),
        }
    }

    pub fn publish(&self, status: StatusSnapshot) {
        self.inner.lock(|c| c.set(status));
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        self.inner.lock(Cell::get)
    }
}

impl Default for SharedStatus {
    fn default() -> Self {
        Self::new()
    }
}
