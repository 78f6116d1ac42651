//! Night-light controller library.
//!
//! Exposes the pure-logic modules for integration testing and the firmware
//! binary. All ESP-IDF-specific code is guarded by `#[cfg]` within each
//! module; everything else builds and tests on the host.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod drivers;
pub mod error;
pub mod events;
pub mod fsm;
pub mod pins;
pub mod sensors;

#[cfg(all(feature = "espidf", target_os = "espidf"))]
mod esp_link_shims;

pub use error::{Error, Result};
