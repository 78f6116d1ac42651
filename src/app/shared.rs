//! Everything the control and interactive contexts share.
//!
//! `Shared` is built in a `static` on target and borrowed by both
//! contexts. Every field guards its own state with a short critical
//! section, so no lock is ever held across I/O.

use crate::config::{LightConfig, SharedConfig};
use crate::drivers::inputs::SharedInputs;
use crate::events::EventQueue;

use super::commands::ManualHandle;
use super::status::SharedStatus;

pub struct Shared {
    /// Written by the configuration layer, snapshotted every tick.
    pub config: SharedConfig,
    /// Per-channel input state and activation edges.
    pub inputs: SharedInputs,
    /// Published after every tick.
    pub status: SharedStatus,
    /// Control → interactive event log.
    pub events: EventQueue,
    /// Interactive → control manual commands.
    pub manual: ManualHandle,
}

impl Shared {
    pub const fn new(config: LightConfig) -> Self {
        Self {
            config: SharedConfig::new(config),
            inputs: SharedInputs::new(),
            status: SharedStatus::new(),
            events: EventQueue::new(),
            manual: ManualHandle::new(),
        }
    }
}

impl Default for Shared {
    fn default() -> Self {
        Self::new(LightConfig::DEFAULT)
    }
}
