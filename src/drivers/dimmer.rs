//! Relay + PWM dimmer driver with soft ramps.
//!
//! The luminaire is switched by a relay and dimmed by a proportional
//! PWM signal (0–10 V interface driven from an LEDC channel).
//!
//! ## Output mapping
//!
//! `duty = low + (high - low) * percent / 100` for `percent > 0`.
//! At 0 % the duty is zeroed and the relay released.
//!
//! ## Ramps
//!
//! A soft target moves the output by a fixed step each control tick until it
//! lands on the target. A new soft target overwrites the running ramp and
//! starts from wherever the output currently is. `set_target_direct(0)` is
//! the instant-off escape hatch: relay off and duty zero in the same tick.
//!
//! Pin write failures are logged and otherwise ignored; the driver keeps its
//! bookkeeping so the next write retries the same state.

use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;
use log::{debug, warn};

use crate::app::ports::DimmerPort;
use crate::config::check_percent;
use crate::error::ValidationError;

/// Step used when the configured step is zero.
pub const DEFAULT_RAMP_STEP: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RampDirection {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ramp {
    pub direction: RampDirection,
    pub target: u8,
    pub step: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimmerMode {
    Idle,
    RampingUp,
    RampingDown,
}

/// Everything the driver knows about the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimmerState {
    pub percent: u8,
    /// Duty cycle last written to the PWM channel.
    pub level: u16,
    pub relay_on: bool,
    pub ramp: Option<Ramp>,
}

pub struct DimmerDriver<R, P> {
    relay: R,
    pwm: P,
    low: u16,
    high: u16,
    state: DimmerState,
}

impl<R: OutputPin, P: SetDutyCycle> DimmerDriver<R, P> {
    /// Build the driver and force the output off.
    ///
    /// `low`/`high` are the duty values for 1 % and 100 %; `high` is clamped
    /// to the channel's maximum and `low` to `high`.
    pub fn new(relay: R, pwm: P, low: u16, high: u16) -> Self {
        let high = high.min(pwm.max_duty_cycle());
        let low = low.min(high);
        let mut driver = Self {
            relay,
            pwm,
            low,
            high,
            state: DimmerState {
                percent: 0,
                level: 0,
                relay_on: false,
                ramp: None,
            },
        };
        driver.apply(0);
        driver
    }

    /// Duty value for a given percent.
    pub fn level_for(&self, percent: u8) -> u16 {
        if percent == 0 {
            return 0;
        }
        let span = u32::from(self.high - self.low);
        self.low + (span * u32::from(percent.min(100)) / 100) as u16
    }

    pub fn state(&self) -> DimmerState {
        self.state
    }

    pub fn mode(&self) -> DimmerMode {
        match self.state.ramp {
            None => DimmerMode::Idle,
            Some(Ramp { direction: RampDirection::Up, .. }) => DimmerMode::RampingUp,
            Some(Ramp { direction: RampDirection::Down, .. }) => DimmerMode::RampingDown,
        }
    }

    pub fn level(&self) -> u16 {
        self.state.level
    }

    /// Release the pins (tests / shutdown).
    pub fn release(self) -> (R, P) {
        (self.relay, self.pwm)
    }

    fn apply(&mut self, percent: u8) {
        let level = self.level_for(percent);
        let relay_on = percent > 0;

        // Duty first when switching off so the relay opens on a dark output.
        if let Err(e) = self.pwm.set_duty_cycle(level) {
            warn!("dimmer: PWM write failed ({:?})", e);
        }
        let relay_result = if relay_on {
            self.relay.set_high()
        } else {
            self.relay.set_low()
        };
        if let Err(e) = relay_result {
            warn!("dimmer: relay write failed ({:?})", e);
        }

        self.state.percent = percent;
        self.state.level = level;
        self.state.relay_on = relay_on;
    }
}

impl<R: OutputPin, P: SetDutyCycle> DimmerPort for DimmerDriver<R, P> {
    fn set_target_soft(&mut self, percent: u8, step: u8) -> Result<(), ValidationError> {
        let target = check_percent(percent)?;
        let current = self.state.percent;
        let step = if step == 0 { DEFAULT_RAMP_STEP } else { step };

        let direction = match target.cmp(&current) {
            // Already there; a ramp passing through keeps going.
            core::cmp::Ordering::Equal => return Ok(()),
            core::cmp::Ordering::Greater => RampDirection::Up,
            core::cmp::Ordering::Less => RampDirection::Down,
        };

        debug!("dimmer: ramp {:?} {} -> {} step {}", direction, current, target, step);
        self.state.ramp = Some(Ramp {
            direction,
            target,
            step,
        });
        Ok(())
    }

    fn set_target_direct(&mut self, percent: u8) -> Result<(), ValidationError> {
        let target = check_percent(percent)?;
        self.state.ramp = None;
        self.apply(target);
        Ok(())
    }

    fn tick(&mut self) {
        let Some(ramp) = self.state.ramp else {
            return;
        };
        let current = self.state.percent;
        let (next, done) = match ramp.direction {
            RampDirection::Up => {
                let n = current.saturating_add(ramp.step);
                if n >= ramp.target { (ramp.target, true) } else { (n, false) }
            }
            RampDirection::Down => {
                let n = current.saturating_sub(ramp.step);
                if n <= ramp.target { (ramp.target, true) } else { (n, false) }
            }
        };
        self.apply(next);
        if done {
            self.state.ramp = None;
        }
    }

    fn percent(&self) -> u8 {
        self.state.percent
    }

    fn target(&self) -> u8 {
        self.state.ramp.map_or(self.state.percent, |r| r.target)
    }

    fn relay_on(&self) -> bool {
        self.state.relay_on
    }
}
