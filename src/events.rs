//! Cross-context event queue.
//!
//! Events are produced by the control loop:
//! - Day/night gate (night-active on/off)
//! - Input monitor (PIR / switch detections)
//! - Manual control surface (software switch on/off)
//! - Boot (hardware reset notice)
//!
//! Events are consumed by the interactive context, which performs the
//! durable (blocking) write through an [`EventSink`].
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ Day/night    │────▶│              │     │              │
//! │ Input monitor│────▶│  EventQueue  │────▶│ Interactive  │
//! │ Manual cmds  │────▶│ (drop-count) │     │ (EventSink)  │
//! └──────────────┘     └──────────────┘     └──────────────┘
//! ```
//!
//! The producer never blocks: on overflow the event is dropped and the
//! drop counter incremented. Delivered events keep FIFO order.

use core::cell::RefCell;
use core::sync::atomic::{AtomicU32, Ordering};

use chrono::NaiveDateTime;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use heapless::Deque;

use crate::app::ports::EventSink;

/// Maximum number of pending events.
pub const EVENT_QUEUE_CAP: usize = 32;

/// Log-worthy occurrences raised by the control loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    NightActiveOn,
    NightActiveOff,
    Pir1Detected,
    Pir2Detected,
    SwitchOn,
    SwitchOff,
    /// Controller (re)started after a power cycle or watchdog reset.
    HardwareReset,
}

impl Event {
    /// Tag written to the durable log.
    pub fn label(self) -> &'static str {
        match self {
            Self::NightActiveOn => "NIGHT_ACTIVE_ON",
            Self::NightActiveOff => "NIGHT_ACTIVE_OFF",
            Self::Pir1Detected => "PIR1_ACTIVATED",
            Self::Pir2Detected => "PIR2_ACTIVATED",
            Self::SwitchOn => "SWITCH_ON",
            Self::SwitchOff => "SWITCH_OFF",
            Self::HardwareReset => "HARDWARE_RESET",
        }
    }
}

/// An [`Event`] stamped with the wall-clock time of the tick that raised it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimedEvent {
    pub event: Event,
    pub at: NaiveDateTime,
}

/// Bounded FIFO with drop-and-count overflow.
pub struct EventQueue {
    buffer: Mutex<CriticalSectionRawMutex, RefCell<Deque<TimedEvent, EVENT_QUEUE_CAP>>>,
    dropped: AtomicU32,
}

impl EventQueue {
    pub const fn new() -> Self {
        Self {
            buffer: Mutex::new(RefCell::new(Deque::new())),
            dropped: AtomicU32::new(0),
        }
    }

    /// Enqueue an event. Never blocks.
    /// Returns `false` if the queue was full and the event was dropped.
    pub fn push(&self, event: Event, at: NaiveDateTime) -> bool {
        let accepted = self
            .buffer
            .lock(|q| q.borrow_mut().push_back(TimedEvent { event, at }).is_ok());
        if !accepted {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
        accepted
    }

    /// Dequeue the oldest event.
    pub fn pop(&self) -> Option<TimedEvent> {
        self.buffer.lock(|q| q.borrow_mut().pop_front())
    }

    /// Pop events one at a time into `handler`.
    ///
    /// The lock is released before each handler call, so the handler may
    /// block on I/O without stalling the producer.
    pub fn drain(&self, mut handler: impl FnMut(TimedEvent)) -> usize {
        let mut count = 0;
        while let Some(event) = self.pop() {
            handler(event);
            count += 1;
        }
        count
    }

    /// Drain every pending event into a sink.
    pub fn drain_into(&self, sink: &mut impl EventSink) -> usize {
        self.drain(|e| sink.record(&e))
    }

    pub fn len(&self) -> usize {
        self.buffer.lock(|q| q.borrow().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total events dropped on overflow since boot.
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}
