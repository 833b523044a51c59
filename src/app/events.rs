//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port. Adapters on the other side
//! decide what to do with them — log to serial, or record them in a test
//! sink for assertion.

use crate::app::activation::ActivationState;
use crate::scene::KindNames;

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The run loop is about to start (carries the boot token it found).
    Started { boot_state: ActivationState },

    /// Scene rotation advanced to a new current scene.
    SceneChanged { index: usize, kinds: KindNames },

    /// Periodic health snapshot.
    Telemetry(TelemetryData),

    /// The deadline fired: LEDs are blanked and the stored token updated.
    Sleeping,
}

/// A point-in-time telemetry snapshot suitable for logging.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelemetryData {
    /// Battery voltage after undoing the 1:2 divider.
    pub battery_v: f32,
    pub temperature_c: f32,
}

impl TelemetryData {
    /// Reference voltage of the ADC front end.
    const VREF: f32 = 3.3;

    /// Convert a raw 16-bit reading into volts at the battery terminal.
    /// The board halves the battery voltage before the ADC, hence ×2.
    pub fn battery_v_from_raw(raw: u16) -> f32 {
        f32::from(raw) * Self::VREF / 65536.0 * 2.0
    }
}
