//! Manual control surface.
//!
//! The interactive context (web form, button handler, console) posts
//! [`ManualCommand`]s through a [`ManualHandle`]; the control loop drains
//! them at the start of each tick. Values are validated on the posting side
//! so a rejected request never reaches the control context.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use crate::config::check_percent;
use crate::error::{Error, Result};

/// Commands the control loop accepts from outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManualCommand {
    /// Ramp to a brightness at the configured step.
    SetPercentSoft(u8),
    /// Jump to a brightness immediately.
    SetPercentDirect(u8),
    /// Full brightness, phase untouched.
    ForceOn,
    /// Off until the next night activation.
    ForceOff,
}

/// Pending commands the control loop has not drained yet.
pub const MANUAL_QUEUE_CAP: usize = 4;

/// Bounded mailbox into the control loop. Never blocks either side.
pub struct ManualHandle {
    queue: Channel<CriticalSectionRawMutex, ManualCommand, MANUAL_QUEUE_CAP>,
}

impl ManualHandle {
    pub const fn new() -> Self {
        Self {
            queue: Channel::new(),
        }
    }

    pub fn set_percent_soft(&self, percent: u8) -> Result<()> {
        self.post(ManualCommand::SetPercentSoft(check_percent(percent)?))
    }

    pub fn set_percent_direct(&self, percent: u8) -> Result<()> {
        self.post(ManualCommand::SetPercentDirect(check_percent(percent)?))
    }

    pub fn force_on(&self) -> Result<()> {
        self.post(ManualCommand::ForceOn)
    }

    pub fn force_off(&self) -> Result<()> {
        self.post(ManualCommand::ForceOff)
    }

    fn post(&self, cmd: ManualCommand) -> Result<()> {
        self.queue.try_send(cmd).map_err(|_| {
            log::warn!("Manual command {:?} dropped: mailbox full", cmd);
            Error::QueueFull
        })
    }

    /// Next pending command, if any. Control context only.
    pub(crate) fn try_next(&self) -> Option<ManualCommand> {
        self.queue.try_receive().ok()
    }
}

impl Default for ManualHandle {
    fn default() -> Self {
        Self::new()
    }
}
