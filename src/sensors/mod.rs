//! Ambient light sensing.

pub mod bh1750;

use crate::error::SensorError;

/// Reject readings that cannot be an illuminance.
pub fn check_lux(lux: f32) -> Result<f32, SensorError> {
    if lux.is_finite() && lux >= 0.0 {
        Ok(lux)
    } else {
        Err(SensorError::InvalidReading)
    }
}
