//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing each drained event as one line in the
//! event-log format `[YYYY-MM-DD HH:MM:SS] LABEL` through the `log` facade
//! (UART / USB-CDC in production). A file-backed sink would implement the
//! same trait and reuse [`format_line`].

use core::fmt::Write as _;

use heapless::String;
use log::info;

use crate::app::ports::EventSink;
use crate::events::TimedEvent;

/// Longest rendered line: 21-char timestamp prefix + longest label.
pub const LINE_CAP: usize = 48;

/// Render an event as a log line.
pub fn format_line(event: &TimedEvent) -> String<LINE_CAP> {
    let mut line = String::new();
    // Cannot overflow: timestamp and labels are fixed width.
    let _ = write!(
        line,
        "[{}] {}",
        event.at.format("%Y-%m-%d %H:%M:%S"),
        event.event.label()
    );
    line
}

/// Adapter that logs every event to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink {
    written: u32,
}

impl LogEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines written since construction.
    pub fn written(&self) -> u32 {
        self.written
    }
}

impl EventSink for LogEventSink {
    fn record(&mut self, event: &TimedEvent) {
        info!("EVENT | {}", format_line(event));
        self.written = self.written.wrapping_add(1);
    }
}
