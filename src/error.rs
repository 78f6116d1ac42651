//! Unified error types for the night-light firmware.
//!
//! A single `Error` enum that every subsystem converts into. All variants
//! are `Copy` so they can be handed across the control/interactive boundary
//! without allocation.
//!
//! The control context never propagates these upward: an invalid request is
//! rejected (previous value retained) and a failed sensor read keeps the last
//! good reading. Only the interactive side surfaces them to its callers.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A requested value is outside its valid range.
    Validation(ValidationError),
    /// The illuminance sensor could not be read.
    Sensor(SensorError),
    /// The manual-command mailbox is full; the control loop has not drained it.
    QueueFull,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(e) => write!(f, "validation: {e}"),
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::QueueFull => write!(f, "manual command queue full"),
        }
    }
}

// ---------------------------------------------------------------------------
// Validation errors
// ---------------------------------------------------------------------------

/// A percent, duration or other configuration value outside its valid range.
/// The offending value is carried for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Brightness percent above 100.
    PercentOutOfRange(u8),
    /// Phase duration above [`MAX_DURATION_SECS`](crate::config::MAX_DURATION_SECS).
    DurationOutOfRange(u32),
    /// Night-day delay above [`MAX_NIGHT_DELAY_TICKS`](crate::config::MAX_NIGHT_DELAY_TICKS).
    DelayOutOfRange(u32),
    /// Soft-ramp step outside 1..=10.
    StepOutOfRange(u8),
    /// Lux threshold negative, non-finite or above the sensor's useful range.
    ThresholdOutOfRange,
    /// Clock-end time-of-day is not a valid `HH:MM`.
    ClockOutOfRange { hour: u8, minute: u8 },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PercentOutOfRange(p) => write!(f, "percent {p} outside 0..=100"),
            Self::DurationOutOfRange(s) => write!(f, "duration {s}s out of range"),
            Self::DelayOutOfRange(t) => write!(f, "night delay {t} ticks out of range"),
            Self::StepOutOfRange(s) => write!(f, "ramp step {s} outside 1..=10"),
            Self::ThresholdOutOfRange => write!(f, "lux threshold out of range"),
            Self::ClockOutOfRange { hour, minute } => {
                write!(f, "clock end {hour:02}:{minute:02} is not a time of day")
            }
        }
    }
}

impl From<ValidationError> for Error {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// I2C transaction failed (NACK, arbitration loss, bus stuck).
    Bus,
    /// Sensor returned a reading that cannot be a lux value.
    InvalidReading,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus => write!(f, "I2C bus error"),
            Self::InvalidReading => write!(f, "invalid reading"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
