//! Lighting automation: day/night gate plus a function-pointer phase table.
//!
//! ```text
//! ┌────────────────────────────────────────────────┐
//! │  PhaseTable                                    │
//! │  ┌───────────┬────────────┬──────────────────┐ │
//! │  │ Phase     │ on_enter   │ on_update        │ │
//! │  ├───────────┼────────────┼──────────────────┤ │
//! │  │ Off       │ fn(ctx)    │ fn(ctx)->Option  │ │
//! │  │ TimerA    │ fn(ctx)    │ fn(ctx)->Option  │ │
//! │  │ TimerC    │ fn(ctx)    │ fn(ctx)->Option  │ │
//! │  │ TimerE    │ fn(ctx)    │ fn(ctx)->Option  │ │
//! │  │ NightGlow │ fn(ctx)    │ fn(ctx)->Option  │ │
//! │  └───────────┴────────────┴──────────────────┘ │
//! └────────────────────────────────────────────────┘
//! ```
//!
//! One automation step:
//!
//! 1. Day/night gate: a bright sample clears night-active at once; a dark
//!    sample after a bright one arms the night-day delay, which sets
//!    night-active when it runs out.
//! 2. Night/day overrides: night + OFF starts TIMER_A, night + PIR (re)starts
//!    TIMER_C, day leaves any phase for OFF.
//! 3. `on_update` of the (possibly just entered) phase.
//! 4. A pending manual force-off is released on a rising night edge by
//!    re-asserting the phase brightness.
//! 5. The last requested brightness is handed to the dimmer as a soft ramp.

pub mod context;
pub mod states;

use chrono::{NaiveDateTime, Timelike};
use log::{debug, info, warn};

use crate::app::ports::DimmerPort;
use crate::config::{ControlMode, LightConfig};
use crate::events::{Event, EventQueue};
use context::{AutomationContext, Countdowns, TickInput};

// ---------------------------------------------------------------------------
// Phase identity
// ---------------------------------------------------------------------------

/// Automation phase. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Phase {
    Off = 0,
    /// Main night period at `pwm_a`.
    TimerA = 1,
    /// Motion boost at `pwm_c`.
    TimerC = 2,
    /// Wind-down after a boost at `pwm_e`.
    TimerE = 3,
    /// Resting brightness once A has expired.
    NightGlow = 4,
}

impl Phase {
    pub const COUNT: usize = 5;

    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Off,
            1 => Self::TimerA,
            2 => Self::TimerC,
            3 => Self::TimerE,
            4 => Self::NightGlow,
            _ => {
                debug_assert!(false, "invalid phase index: {idx}");
                Self::Off
            }
        }
    }

    /// Configured brightness for this phase.
    pub fn target(self, cfg: &LightConfig) -> u8 {
        match self {
            Self::Off => 0,
            Self::TimerA => cfg.pwm_a,
            Self::TimerC => cfg.pwm_c,
            Self::TimerE => cfg.pwm_e,
            Self::NightGlow => cfg.pwm_glow,
        }
    }
}

pub type PhaseActionFn = fn(&mut AutomationContext);
pub type PhaseUpdateFn = fn(&mut AutomationContext) -> Option<Phase>;

pub struct PhaseDescriptor {
    pub id: Phase,
    pub name: &'static str,
    pub on_enter: PhaseActionFn,
    pub on_update: PhaseUpdateFn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NightEdge {
    Rising,
    Falling,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Automation engine. Owns the dimmer it drives.
pub struct Automation<D> {
    table: [PhaseDescriptor; Phase::COUNT],
    current: usize,
    ctx: AutomationContext,
    dimmer: D,
}

impl<D: DimmerPort> Automation<D> {
    pub fn new(dimmer: D) -> Self {
        Self {
            table: states::build_phase_table(),
            current: Phase::Off as usize,
            ctx: AutomationContext::new(LightConfig::DEFAULT),
            dimmer,
        }
    }

    /// Run one automation step and return the resulting phase.
    pub fn update(&mut self, input: &TickInput, cfg: &LightConfig, events: &EventQueue) -> Phase {
        self.ctx.config = *cfg;
        self.ctx.request = None;

        let edge = self.gate(input.lux, input.now, events);

        if self.ctx.night.active {
            if self.phase() == Phase::Off {
                self.ctx.countdowns.a = self.timer_a_duration(input.now);
                self.enter(Phase::TimerA);
            }
            if input.pir {
                self.enter(Phase::TimerC);
            }
        } else if self.phase() != Phase::Off {
            self.enter(Phase::Off);
        }

        if let Some(next) = (self.table[self.current].on_update)(&mut self.ctx) {
            self.enter(next);
        }

        if edge == Some(NightEdge::Rising) && self.ctx.override_pending {
            self.ctx.override_pending = false;
            let phase = self.phase();
            info!("Manual off released, restoring {}", self.table[phase as usize].name);
            self.ctx.request(phase.target(cfg));
        }

        if let Some(percent) = self.ctx.request.take() {
            self.drive(percent);
        }

        self.phase()
    }

    /// Manual full brightness. Leaves the phase alone.
    pub fn force_on(&mut self, cfg: &LightConfig) {
        info!("Manual on");
        if let Err(e) = self.dimmer.set_target_soft(100, cfg.ramp_step) {
            warn!("Manual on rejected: {}", e);
        }
    }

    /// Manual off until night-active rises again.
    pub fn force_off(&mut self, cfg: &LightConfig) {
        info!("Manual off");
        if let Err(e) = self.dimmer.set_target_soft(0, cfg.ramp_step) {
            warn!("Manual off rejected: {}", e);
        }
        self.ctx.override_pending = true;
    }

    pub fn phase(&self) -> Phase {
        Phase::from_index(self.current)
    }

    pub fn night_active(&self) -> bool {
        self.ctx.night.active
    }

    /// Remaining night-day delay steps (0 when not counting).
    pub fn night_delay(&self) -> u32 {
        self.ctx.night.delay
    }

    pub fn countdowns(&self) -> Countdowns {
        self.ctx.countdowns
    }

    pub fn override_pending(&self) -> bool {
        self.ctx.override_pending
    }

    pub fn dimmer(&self) -> &D {
        &self.dimmer
    }

    pub fn dimmer_mut(&mut self) -> &mut D {
        &mut self.dimmer
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn gate(&mut self, lux: f32, now: NaiveDateTime, events: &EventQueue) -> Option<NightEdge> {
        let cfg = self.ctx.config;
        let gate = &mut self.ctx.night;

        if lux >= cfg.lux_threshold {
            gate.lux_was_over = true;
            gate.delay = 0;
            if gate.active {
                gate.active = false;
                info!("Night-active off ({:.1} lx)", lux);
                if cfg.log_night_active {
                    events.push(Event::NightActiveOff, now);
                }
                return Some(NightEdge::Falling);
            }
            return None;
        }

        if !gate.active && gate.lux_was_over {
            // The arming sample counts as the first dark step.
            gate.delay = cfg.night_delay_ticks.max(1);
            gate.lux_was_over = false;
            debug!("Night delay armed: {} steps ({:.1} lx)", gate.delay, lux);
        }

        if gate.delay > 0 {
            gate.delay -= 1;
            if gate.delay == 0 {
                gate.active = true;
                info!("Night-active on ({:.1} lx)", lux);
                if cfg.log_night_active {
                    events.push(Event::NightActiveOn, now);
                }
                return Some(NightEdge::Rising);
            }
        }
        None
    }

    fn timer_a_duration(&self, now: NaiveDateTime) -> u32 {
        let cfg = &self.ctx.config;
        match cfg.mode {
            ControlMode::Duration => cfg.timer_a_secs,
            ControlMode::ClockEnd => {
                let end = cfg.clock_end.seconds_from_midnight();
                let secs = end.saturating_sub(now.num_seconds_from_midnight());
                if secs == 0 {
                    debug!("Clock end {:02}:{:02} already passed", cfg.clock_end.hour, cfg.clock_end.minute);
                }
                secs
            }
        }
    }

    fn enter(&mut self, next: Phase) {
        let next_idx = next as usize;
        if next_idx == self.current {
            debug!("Phase {} re-armed", self.table[next_idx].name);
        } else {
            info!(
                "Phase transition: {} -> {}",
                self.table[self.current].name, self.table[next_idx].name
            );
        }
        self.current = next_idx;
        (self.table[next_idx].on_enter)(&mut self.ctx);
    }

    fn drive(&mut self, percent: u8) {
        if let Err(e) = self.dimmer.set_target_soft(percent, self.ctx.config.ramp_step) {
            warn!("Dimmer target rejected: {}", e);
        }
    }
}
