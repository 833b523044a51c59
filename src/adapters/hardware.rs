//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the four [`PwmLed`] strings and the battery ADC, exposing them
//! through [`LedOutputPort`] and [`TelemetrySensorPort`]. This is the
//! only module in the system that touches actual output hardware. On
//! non-espidf targets the LEDC/ADC calls are cfg-gated no-ops and the
//! sensor readings come from injectable atomics, so the adapter itself
//! runs unchanged under host tests.

use heapless::Vec;

use crate::animation::ChannelId;
use crate::app::ports::{LedOutputPort, TelemetrySensorPort};
#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;
use crate::drivers::pwm_led::PwmLed;
use crate::pins;

#[cfg(not(target_os = "espidf"))]
use std::sync::atomic::{AtomicU16, AtomicU32, Ordering};

/// Injectable battery reading for host-side runs.
#[cfg(not(target_os = "espidf"))]
pub static SIM_VBAT_RAW: AtomicU16 = AtomicU16::new(36759); // ≈ 3.7 V

/// Injectable die temperature (milli-degrees C) for host-side runs.
#[cfg(not(target_os = "espidf"))]
pub static SIM_TEMP_MILLI_C: AtomicU32 = AtomicU32::new(21_000);

const MAX_LEDS: usize = 4;

/// Concrete adapter that combines all output hardware behind port traits.
pub struct HardwareAdapter {
    leds: Vec<PwmLed, MAX_LEDS>,
}

impl HardwareAdapter {
    /// Register the four LED strings in channel order. [`ChannelId`]
    /// values index straight into this vector.
    pub fn new() -> Self {
        let mut leds = Vec::new();
        let bank = [
            PwmLed::new(pins::LEDC_CH_LIGHT_GREEN, pins::MAX_DUTY),
            PwmLed::new(pins::LEDC_CH_STAR, pins::STAR_MAX_DUTY),
            PwmLed::new(pins::LEDC_CH_RED, pins::MAX_DUTY),
            PwmLed::new(pins::LEDC_CH_GREEN, pins::STAR_MAX_DUTY),
        ];
        for led in bank {
            // Capacity is MAX_LEDS; the push cannot fail.
            let _ = leds.push(led);
        }
        Self { leds }
    }
}

impl Default for HardwareAdapter {
    fn default() -> Self {
        Self::new()
    }
}

// ── LedOutputPort implementation ──────────────────────────────

impl LedOutputPort for HardwareAdapter {
    fn set_intensity(&mut self, channel: ChannelId, intensity: f32) {
        if let Some(led) = self.leds.get_mut(usize::from(channel.0)) {
            led.set(intensity);
        }
    }

    fn blank(&mut self) {
        for led in &mut self.leds {
            led.off();
        }
    }
}

// ── TelemetrySensorPort implementation ────────────────────────

impl TelemetrySensorPort for HardwareAdapter {
    #[cfg(target_os = "espidf")]
    fn battery_raw(&mut self) -> u16 {
        hw_init::adc1_read_vbat()
    }

    #[cfg(not(target_os = "espidf"))]
    fn battery_raw(&mut self) -> u16 {
        SIM_VBAT_RAW.load(Ordering::Relaxed)
    }

    #[cfg(target_os = "espidf")]
    fn temperature_c(&mut self) -> f32 {
        read_die_temperature()
    }

    #[cfg(not(target_os = "espidf"))]
    fn temperature_c(&mut self) -> f32 {
        SIM_TEMP_MILLI_C.load(Ordering::Relaxed) as f32 / 1000.0
    }
}

/// Die temperature from the internal sensor.
#[cfg(target_os = "espidf")]
fn read_die_temperature() -> f32 {
    use esp_idf_svc::sys::*;

    static mut HANDLE: temperature_sensor_handle_t = core::ptr::null_mut();

    // SAFETY: Lazily installed and only touched from the main task; the
    // static is read and written through raw pointers only.
    unsafe {
        let mut handle = *(&raw const HANDLE);
        if handle.is_null() {
            let cfg = temperature_sensor_config_t {
                range_min: -10,
                range_max: 80,
                clk_src: temperature_sensor_clk_src_t_TEMPERATURE_SENSOR_CLK_SRC_DEFAULT,
                ..Default::default()
            };
            if temperature_sensor_install(&cfg, &mut handle) != ESP_OK as i32 {
                return 0.0;
            }
            temperature_sensor_enable(handle);
            *(&raw mut HANDLE) = handle;
        }
        let mut celsius: f32 = 0.0;
        if temperature_sensor_get_celsius(handle, &mut celsius) != ESP_OK as i32 {
            return 0.0;
        }
        celsius
    }
}

#[cfg(all(test, not(target_os = "espidf")))]
mod tests {
    use super::*;

    #[test]
    fn sim_sensor_values_flow_through_port() {
        let mut hw = HardwareAdapter::new();
        SIM_VBAT_RAW.store(40000, Ordering::Relaxed);
        SIM_TEMP_MILLI_C.store(25_500, Ordering::Relaxed);
        assert_eq!(hw.battery_raw(), 40000);
        assert!((hw.temperature_c() - 25.5).abs() < f32::EPSILON);
    }

    #[test]
    fn out_of_range_channel_is_ignored() {
        let mut hw = HardwareAdapter::new();
        hw.set_intensity(ChannelId(9), 0.5);
        hw.blank();
    }
}
