//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (PWM bank, ADC sensors, VBUS sense, state file, log sink,
//! monotonic clock) implement these traits. The
//! [`AppService`](super::service::AppService) consumes them via generics, so
//! the domain core never touches hardware directly and the whole service runs
//! under test with mock adapters.

use crate::animation::ChannelId;
use crate::app::activation::ActivationState;
use crate::app::events::AppEvent;
use crate::error::StorageError;

// ───────────────────────────────────────────────────────────────
// LED output port (domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain pushes per-channel intensities here.
pub trait LedOutputPort {
    /// Drive one channel at an intensity in `[0.0, 1.0]`.
    ///
    /// Implementations clamp out-of-range values; animations may hand over
    /// slightly out-of-range floats at waveform extremes.
    fn set_intensity(&mut self, channel: ChannelId, intensity: f32);

    /// Force every registered channel dark.
    fn blank(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Telemetry sensor port (hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port for the periodic health report.
pub trait TelemetrySensorPort {
    /// Raw 16-bit battery ADC reading, taken through a 1:2 divider.
    fn battery_raw(&mut self) -> u16;

    /// Die temperature in degrees Celsius.
    fn temperature_c(&mut self) -> f32;
}

// ───────────────────────────────────────────────────────────────
// Power sense port (hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Reports whether external (USB) power is present.
///
/// The activation store is only writable while running from battery, so
/// every persist decision consults this port first.
pub trait PowerSensePort {
    fn is_externally_powered(&mut self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Activation state port (domain ⇄ storage)
// ───────────────────────────────────────────────────────────────

/// Persistent activation token, surviving reboots and battery swaps.
pub trait StatePort {
    /// Read the stored token. Unreadable or unrecognised content maps to
    /// [`ActivationState::Unknown`] — never an error.
    fn load(&mut self) -> ActivationState;

    /// Overwrite the stored token.
    fn store(&mut self, state: ActivationState) -> Result<(), StorageError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink (domain → observer)
// ───────────────────────────────────────────────────────────────

/// Receives domain events for logging or inspection under test.
pub trait EventSink {
    fn emit(&mut self, event: &AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Clock port (environment → domain)
// ───────────────────────────────────────────────────────────────

/// Monotonic time source and sleep primitive for the run loop.
pub trait ClockPort {
    /// Milliseconds since the clock was created. Monotonic, never wraps
    /// within a session.
    fn uptime_ms(&mut self) -> u64;

    /// Block for at least `ms` milliseconds, yielding the CPU.
    fn sleep_ms(&mut self, ms: u64);
}
