//! Monotonic clock adapter.
//!
//! Implements [`ClockPort`] for the run loop.
//!
//! - **`target_os = "espidf"`** — wraps `esp_timer_get_time()` from the
//!   ESP-IDF high-resolution timer (microsecond precision, monotonic) and
//!   sleeps through FreeRTOS `vTaskDelay`, yielding the CPU.
//! - **`not(target_os = "espidf")`** — uses `std::time::Instant` and
//!   `std::thread::sleep` for host-side testing.

use crate::app::ports::ClockPort;

pub struct MonotonicClock {
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockPort for MonotonicClock {
    #[cfg(target_os = "espidf")]
    fn uptime_ms(&mut self) -> u64 {
        (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64 / 1000
    }

    #[cfg(not(target_os = "espidf"))]
    fn uptime_ms(&mut self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    #[cfg(target_os = "espidf")]
    fn sleep_ms(&mut self, ms: u64) {
        // Rounds up to the FreeRTOS tick period; the scheduler re-anchors
        // if this overshoots a deadline.
        esp_idf_hal::delay::FreeRtos::delay_ms(ms.min(u64::from(u32::MAX)) as u32);
    }

    #[cfg(not(target_os = "espidf"))]
    fn sleep_ms(&mut self, ms: u64) {
        std::thread::sleep(std::time::Duration::from_millis(ms));
    }
}
