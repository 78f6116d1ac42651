//! Blackboard threaded through every phase handler.
//!
//! `AutomationContext` carries the config snapshot for the current step, the
//! phase countdowns, the day/night gate and the dimmer request the handlers
//! leave behind. The engine applies that request to the dimmer once the step
//! has settled.

use chrono::NaiveDateTime;

use crate::config::LightConfig;

/// Inputs sampled by the control loop for one automation step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickInput {
    /// Latest good illuminance reading.
    pub lux: f32,
    /// A PIR activation edge was taken this step.
    pub pir: bool,
    pub now: NaiveDateTime,
}

/// Phase countdowns, in automation steps (one per second).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Countdowns {
    /// Master timer. Keeps draining through TIMER_C / TIMER_E.
    pub a: u32,
    pub c: u32,
    pub e: u32,
}

/// Day/night hysteresis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NightGate {
    pub active: bool,
    /// Remaining dark steps before `active` is set. Zero when idle.
    pub delay: u32,
    /// Last sample was at or above the threshold. Starts `true` so the
    /// first dark sample after boot arms the delay.
    pub lux_was_over: bool,
}

impl NightGate {
    pub const fn new() -> Self {
        Self {
            active: false,
            delay: 0,
            lux_was_over: true,
        }
    }
}

impl Default for NightGate {
    fn default() -> Self {
        Self::new()
    }
}

pub struct AutomationContext {
    pub config: LightConfig,
    pub countdowns: Countdowns,
    pub night: NightGate,
    /// Set by a manual force-off; cleared when night-active rises again.
    pub override_pending: bool,
    /// Soft target requested during this step. Last writer wins.
    pub request: Option<u8>,
}

impl AutomationContext {
    pub fn new(config: LightConfig) -> Self {
        Self {
            config,
            countdowns: Countdowns::default(),
            night: NightGate::new(),
            override_pending: false,
            request: None,
        }
    }

    /// Ask for a soft ramp to `percent` at the end of the step.
    pub fn request(&mut self, percent: u8) {
        self.request = Some(percent);
    }
}
