//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).

use log::info;

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(t) => {
                info!(
                    "TELEM | voltage={:.2}V | T={:.1}\u{00b0}C",
                    t.battery_v, t.temperature_c,
                );
            }
            AppEvent::SceneChanged { index, kinds } => {
                info!("SCENE | #{} | {:?}", index, kinds.as_slice());
            }
            AppEvent::Started { boot_state } => {
                info!("START | last_state={boot_state}");
            }
            AppEvent::Sleeping => {
                info!("SLEEP | outputs blanked, halting");
            }
        }
    }
}
