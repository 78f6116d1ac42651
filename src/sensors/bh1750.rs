//! BH1750 ambient light sensor over I2C.
//!
//! Runs in continuous high-resolution mode (1 lx resolution, ~120 ms per
//! conversion), so a read just fetches the latest result. Raw counts are
//! converted with the datasheet's default 1.2 counts/lx.

use embedded_hal::i2c::I2c;
use log::{debug, warn};

use crate::app::ports::IlluminancePort;
use crate::error::SensorError;

/// ADDR pin low.
pub const DEFAULT_ADDRESS: u8 = 0x23;
/// ADDR pin high.
pub const ALT_ADDRESS: u8 = 0x5C;

const CMD_POWER_ON: u8 = 0x01;
const CMD_RESET: u8 = 0x07;
const CMD_CONTINUOUS_HIGH_RES: u8 = 0x10;

const COUNTS_PER_LUX: f32 = 1.2;

pub struct Bh1750<I> {
    i2c: I,
    address: u8,
    configured: bool,
}

impl<I: I2c> Bh1750<I> {
    pub fn new(i2c: I, address: u8) -> Self {
        Self {
            i2c,
            address,
            configured: false,
        }
    }

    /// Power on, reset the data register and start continuous conversion.
    pub fn init(&mut self) -> Result<(), SensorError> {
        for cmd in [CMD_POWER_ON, CMD_RESET, CMD_CONTINUOUS_HIGH_RES] {
            self.i2c.write(self.address, &[cmd]).map_err(|e| {
                warn!("BH1750 @0x{:02X}: command 0x{:02X} failed ({:?})", self.address, cmd, e);
                SensorError::Bus
            })?;
        }
        self.configured = true;
        debug!("BH1750 @0x{:02X} in continuous high-res mode", self.address);
        Ok(())
    }

    pub fn read_raw(&mut self) -> Result<u16, SensorError> {
        let mut buf = [0u8; 2];
        self.i2c
            .read(self.address, &mut buf)
            .map_err(|_| SensorError::Bus)?;
        Ok(u16::from_be_bytes(buf))
    }

    pub fn release(self) -> I {
        self.i2c
    }
}

impl<I: I2c> IlluminancePort for Bh1750<I> {
    /// A failed read drops the configured flag so the next call
    /// re-initialises the sensor (it loses its mode on a brown-out).
    fn read_lux(&mut self) -> Result<f32, SensorError> {
        if !self.configured {
            self.init()?;
        }
        match self.read_raw() {
            Ok(raw) => Ok(f32::from(raw) / COUNTS_PER_LUX),
            Err(e) => {
                self.configured = false;
                Err(e)
            }
        }
    }
}
