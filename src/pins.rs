//! GPIO / peripheral assignments and fixed hardware constants for the
//! night-light controller board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Inputs (active-low, internal pull-ups)
// ---------------------------------------------------------------------------

/// PIR detector 1 open-collector output.
pub const PIR1_GPIO: i32 = 4;
/// PIR detector 2 (optional second zone).
pub const PIR2_GPIO: i32 = 5;
/// Wall push switch.
pub const SWITCH_GPIO: i32 = 6;

// ---------------------------------------------------------------------------
// Luminaire output
// ---------------------------------------------------------------------------

/// Relay coil driver (HIGH = luminaire mains on).
pub const RELAY_GPIO: i32 = 7;
/// LEDC output into the 0–10 V dimmer interface.
pub const DIMMER_PWM_GPIO: i32 = 8;

/// LEDC frequency for the dimmer interface.
pub const DIMMER_PWM_FREQ_HZ: u32 = 1_000;
/// LEDC timer resolution (bits).
pub const PWM_RESOLUTION_BITS: u32 = 10;
/// Duty giving 1 % light (~1 V after the op-amp stage).
pub const DIMMER_DUTY_LOW: u16 = 102;
/// Duty giving 100 % light (10 V).
pub const DIMMER_DUTY_HIGH: u16 = 1023;

// ---------------------------------------------------------------------------
// I²C bus (BH1750 ambient light sensor)
// ---------------------------------------------------------------------------

pub const I2C_SDA_GPIO: i32 = 14;
pub const I2C_SCL_GPIO: i32 = 15;
pub const I2C_FREQ_HZ: u32 = 100_000;

// ---------------------------------------------------------------------------
// Timing
// ---------------------------------------------------------------------------

/// Control tick period.
pub const CONTROL_TICK_MS: u32 = 250;
/// Interactive-context drain period for the event queue.
pub const EVENT_DRAIN_MS: u32 = 500;
