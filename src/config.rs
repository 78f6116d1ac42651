//! Light automation configuration parameters.
//!
//! All tunable parameters for the night-light. The values are owned by the
//! external configuration layer (web form + JSON file); the control loop
//! only ever reads a copied snapshot via [`SharedConfig::snapshot`].

use core::cell::Cell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Longest accepted phase duration (seconds).
pub const MAX_DURATION_SECS: u32 = 65_535;
/// Longest accepted night-day delay (automation ticks).
pub const MAX_NIGHT_DELAY_TICKS: u32 = 200;
/// Highest accepted lux threshold.
pub const MAX_LUX_THRESHOLD: f32 = 100.0;
/// Accepted soft-ramp step sizes (percent per control tick).
pub const RAMP_STEP_RANGE: core::ops::RangeInclusive<u8> = 1..=10;

/// How the duration of TIMER_A is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ControlMode {
    /// Fixed number of seconds (`timer_a_secs`).
    #[default]
    Duration,
    /// Until a fixed time of day (`clock_end`).
    ClockEnd,
}

/// Wall-clock time of day, minute resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockTime {
    pub hour: u8,
    pub minute: u8,
}

impl ClockTime {
    pub const fn new(hour: u8, minute: u8) -> Self {
        Self { hour, minute }
    }

    pub fn seconds_from_midnight(self) -> u32 {
        self.hour as u32 * 3600 + self.minute as u32 * 60
    }
}

/// Light automation configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    // --- Schedule ---
    pub mode: ControlMode,
    /// End of TIMER_A in [`ControlMode::ClockEnd`].
    pub clock_end: ClockTime,

    // --- Day/night gate ---
    /// Below this illuminance (lux) the night-day delay starts.
    pub lux_threshold: f32,
    /// Consecutive dark automation ticks before night-active is set.
    pub night_delay_ticks: u32,

    // --- Phase durations (seconds) and brightness (percent) ---
    pub timer_a_secs: u32,
    pub pwm_a: u8,
    pub timer_c_secs: u32,
    pub pwm_c: u8,
    pub timer_e_secs: u32,
    pub pwm_e: u8,
    /// Resting brightness after TIMER_A has run out.
    pub pwm_glow: u8,

    // --- Dimmer ---
    /// Percent moved per control tick while ramping.
    pub ramp_step: u8,

    // --- Event logging ---
    pub log_night_active: bool,
    pub log_detection: bool,
}

impl LightConfig {
    /// Factory defaults. `const` so the shared state can live in a `static`.
    pub const DEFAULT: Self = Self {
        mode: ControlMode::Duration,
        clock_end: ClockTime::new(22, 0),
        lux_threshold: 8.0,
        night_delay_ticks: 15,
        timer_a_secs: 75,
        pwm_a: 75,
        timer_c_secs: 30,
        pwm_c: 100,
        timer_e_secs: 30,
        pwm_e: 55,
        pwm_glow: 0,
        ramp_step: 5,
        log_night_active: true,
        log_detection: true,
    };

    /// Range-check every field.
    ///
    /// Out-of-range values are rejected, never clamped, so a bad form
    /// submission cannot silently change behaviour.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for pwm in [self.pwm_a, self.pwm_c, self.pwm_e, self.pwm_glow] {
            check_percent(pwm)?;
        }
        for secs in [self.timer_a_secs, self.timer_c_secs, self.timer_e_secs] {
            if secs > MAX_DURATION_SECS {
                return Err(ValidationError::DurationOutOfRange(secs));
            }
        }
        if self.night_delay_ticks > MAX_NIGHT_DELAY_TICKS {
            return Err(ValidationError::DelayOutOfRange(self.night_delay_ticks));
        }
        if !RAMP_STEP_RANGE.contains(&self.ramp_step) {
            return Err(ValidationError::StepOutOfRange(self.ramp_step));
        }
        if !self.lux_threshold.is_finite()
            || !(0.0..=MAX_LUX_THRESHOLD).contains(&self.lux_threshold)
        {
            return Err(ValidationError::ThresholdOutOfRange);
        }
        let ClockTime { hour, minute } = self.clock_end;
        if hour > 23 || minute > 59 {
            return Err(ValidationError::ClockOutOfRange { hour, minute });
        }
        Ok(())
    }
}

impl Default for LightConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Reject brightness values above 100 %.
pub fn check_percent(percent: u8) -> Result<u8, ValidationError> {
    if percent > 100 {
        Err(ValidationError::PercentOutOfRange(percent))
    } else {
        Ok(percent)
    }
}

// ---------------------------------------------------------------------------
// Cross-context configuration cell
// ---------------------------------------------------------------------------

/// Lock-guarded configuration shared between the interactive context
/// (writer) and the control loop (reader).
///
/// The lock is held only for the copy in or out.
pub struct SharedConfig {
    inner: Mutex<CriticalSectionRawMutex, Cell<LightConfig>>,
}

impl SharedConfig {
    pub const fn new(config: LightConfig) -> Self {
        Self {
            inner: Mutex::new(Cell::new(config)),
        }
    }

    /// Copy of the current configuration.
    pub fn snapshot(&self) -> LightConfig {
        self.inner.lock(Cell::get)
    }

    /// Validate and replace the configuration.
    /// On error the previous configuration stays in place.
    pub fn update(&self, config: LightConfig) -> Result<(), ValidationError> {
        config.validate()?;
        self.inner.lock(|c| c.set(config));
        log::info!("Configuration updated");
        Ok(())
    }
}
