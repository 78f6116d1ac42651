//! Debounced PIR / wall-switch input monitor.
//!
//! ## Hardware
//!
//! Two PIR detectors and one push switch, all active-low with pull-ups.
//! Any of them may be left unfitted; an unfitted channel is built with
//! `None` and stays inert.
//!
//! ## Debounce
//!
//! Polled once per control tick. A channel must read active on
//! `threshold()` consecutive samples before it is considered pressed; one
//! inactive sample resets it. The rising edge of the debounced level latches
//! a single-consume activation flag in [`SharedInputs`] that the automation
//! takes with [`SharedInputs::take_activation`].

use core::cell::RefCell;

use chrono::NaiveDateTime;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embedded_hal::digital::InputPin;
use log::{debug, info};

use crate::config::LightConfig;
use crate::events::{Event, EventQueue};

const PIR_THRESHOLD: u8 = 3;
const SWITCH_THRESHOLD: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputChannel {
    Pir1,
    Pir2,
    Switch,
}

impl InputChannel {
    pub const ALL: [Self; 3] = [Self::Pir1, Self::Pir2, Self::Switch];

    /// Consecutive active samples required.
    pub const fn threshold(self) -> u8 {
        match self {
            Self::Pir1 | Self::Pir2 => PIR_THRESHOLD,
            Self::Switch => SWITCH_THRESHOLD,
        }
    }

    /// Event logged when this channel activates.
    pub const fn detection_event(self) -> Event {
        match self {
            Self::Pir1 => Event::Pir1Detected,
            Self::Pir2 => Event::Pir2Detected,
            Self::Switch => Event::SwitchOn,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Pir1 => "PIR1",
            Self::Pir2 => "PIR2",
            Self::Switch => "SWITCH",
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

/// Externally visible state of one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelStatus {
    pub present: bool,
    pub active: bool,
    pub edge: bool,
    pub last_activation: Option<NaiveDateTime>,
}

impl ChannelStatus {
    const INERT: Self = Self {
        present: false,
        active: false,
        edge: false,
        last_activation: None,
    };
}

// ---------------------------------------------------------------------------
// Shared (cross-context) view
// ---------------------------------------------------------------------------

/// Per-channel status shared between the control loop and the interactive
/// context.
pub struct SharedInputs {
    channels: Mutex<CriticalSectionRawMutex, RefCell<[ChannelStatus; 3]>>,
}

impl SharedInputs {
    pub const fn new() -> Self {
        Self {
            channels: Mutex::new(RefCell::new([ChannelStatus::INERT; 3])),
        }
    }

    /// Read and clear the activation edge.
    pub fn take_activation(&self, channel: InputChannel) -> bool {
        self.channels.lock(|c| {
            let status = &mut c.borrow_mut()[channel.index()];
            core::mem::replace(&mut status.edge, false)
        })
    }

    pub fn status(&self, channel: InputChannel) -> ChannelStatus {
        self.channels.lock(|c| c.borrow()[channel.index()])
    }

    pub fn is_present(&self, channel: InputChannel) -> bool {
        self.status(channel).present
    }

    pub fn is_active(&self, channel: InputChannel) -> bool {
        self.status(channel).active
    }

    pub fn last_activation(&self, channel: InputChannel) -> Option<NaiveDateTime> {
        self.status(channel).last_activation
    }

    /// Mark the channel active and latch a new edge.
    ///
    /// A PIR whose previous edge has not been taken yet keeps that edge and
    /// its timestamp; returns `false` when nothing new was latched.
    fn latch(&self, channel: InputChannel, now: NaiveDateTime) -> bool {
        self.channels.lock(|c| {
            let status = &mut c.borrow_mut()[channel.index()];
            status.active = true;
            if status.edge && channel != InputChannel::Switch {
                return false;
            }
            status.edge = true;
            status.last_activation = Some(now);
            true
        })
    }

    fn update(&self, channel: InputChannel, f: impl FnOnce(&mut ChannelStatus)) {
        self.channels.lock(|c| f(&mut c.borrow_mut()[channel.index()]));
    }
}

impl Default for SharedInputs {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Monitor (control-context side)
// ---------------------------------------------------------------------------

pub struct InputMonitor<'a, P> {
    pins: [Option<P>; 3],
    counters: [u8; 3],
    active: [bool; 3],
    shared: &'a SharedInputs,
}

impl<'a, P: InputPin> InputMonitor<'a, P> {
    pub fn new(
        pir1: Option<P>,
        pir2: Option<P>,
        switch: Option<P>,
        shared: &'a SharedInputs,
    ) -> Self {
        let pins = [pir1, pir2, switch];
        for channel in InputChannel::ALL {
            let present = pins[channel.index()].is_some();
            shared.update(channel, |s| *s = ChannelStatus { present, ..ChannelStatus::INERT });
            if !present {
                info!("inputs: {} not fitted", channel.name());
            }
        }
        Self {
            pins,
            counters: [0; 3],
            active: [false; 3],
            shared,
        }
    }

    /// Sample every fitted channel once.
    pub fn tick(&mut self, now: NaiveDateTime, cfg: &LightConfig, events: &EventQueue) {
        for channel in InputChannel::ALL {
            let i = channel.index();
            let Some(pin) = self.pins[i].as_mut() else {
                continue;
            };
            // Active-low; a read error counts as released.
            let sample = pin.is_low().unwrap_or(false);

            if sample {
                self.counters[i] = self.counters[i].saturating_add(1);
                if self.counters[i] >= channel.threshold() && !self.active[i] {
                    self.active[i] = true;
                    if self.shared.latch(channel, now) {
                        debug!("inputs: {} activated", channel.name());
                        if cfg.log_detection {
                            events.push(channel.detection_event(), now);
                        }
                    } else {
                        debug!("inputs: {} re-triggered before its edge was taken", channel.name());
                    }
                }
            } else {
                self.counters[i] = 0;
                if self.active[i] {
                    self.active[i] = false;
                    self.shared.update(channel, |s| s.active = false);
                }
            }
        }
    }

    pub fn shared(&self) -> &'a SharedInputs {
        self.shared
    }
}
