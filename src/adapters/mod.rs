//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements | Connects to            |
//! |------------|------------|------------------------|
//! | `log_sink` | EventSink  | Serial log output      |
//! | `time`     | ClockPort  | SNTP-synced local time |
//!
//! The dimmer and lux sensor ports are implemented directly by
//! [`drivers::dimmer`](crate::drivers::dimmer) and
//! [`sensors::bh1750`](crate::sensors::bh1750) over `embedded-hal` traits.

pub mod log_sink;
pub mod time;
