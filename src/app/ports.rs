//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ControlLoop / Automation (domain)
//! ```
//!
//! Driven adapters (dimmer output, lux sensor, wall clock, durable event log)
//! implement these traits. The domain consumes them via generics, so the
//! state machine never touches hardware directly and runs unchanged on the
//! host under test.

use chrono::NaiveDateTime;

use crate::error::{SensorError, ValidationError};
use crate::events::TimedEvent;

// ───────────────────────────────────────────────────────────────
// Dimmer port (domain → relay + PWM)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the luminaire output.
pub trait DimmerPort {
    /// Start a ramp toward `percent`, moving `step` percent per tick.
    /// Rejects `percent > 100` without touching state.
    fn set_target_soft(&mut self, percent: u8, step: u8) -> Result<(), ValidationError>;

    /// Jump to `percent` immediately, cancelling any ramp.
    fn set_target_direct(&mut self, percent: u8) -> Result<(), ValidationError>;

    /// Advance an active ramp by one step.
    fn tick(&mut self);

    /// Brightness currently shown.
    fn percent(&self) -> u8;

    /// Brightness the output is heading for.
    fn target(&self) -> u8;

    /// Relay energised.
    fn relay_on(&self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Illuminance port (hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Ambient light reading.
pub trait IlluminancePort {
    fn read_lux(&mut self) -> Result<f32, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Local wall-clock time (RTC / SNTP backed on target).
pub trait ClockPort {
    fn now(&self) -> NaiveDateTime;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (interactive context → durable log)
// ───────────────────────────────────────────────────────────────

/// Where drained [`TimedEvent`]s end up. Implementations may block.
pub trait EventSink {
    fn record(&mut self, event: &TimedEvent);
}
