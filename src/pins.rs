//! GPIO / peripheral pin assignments for the ornament board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers. Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// LED strings (LEDC PWM, one channel per string)
// ---------------------------------------------------------------------------

/// Light-green string, lower branches.
pub const LED_LIGHT_GREEN_GPIO: i32 = 5;
/// Tree-top star. Driven through a smaller MOSFET; duty is capped in
/// software (see [`STAR_MAX_DUTY`]).
pub const LED_STAR_GPIO: i32 = 9;
/// Red string.
pub const LED_RED_GPIO: i32 = 10;
/// Dark-green string. Shares the star's duty cap.
pub const LED_GREEN_GPIO: i32 = 12;

/// LEDC channel indices, in registration order.
pub const LEDC_CH_LIGHT_GREEN: u32 = 0;
pub const LEDC_CH_STAR: u32 = 1;
pub const LEDC_CH_RED: u32 = 2;
pub const LEDC_CH_GREEN: u32 = 3;

// ---------------------------------------------------------------------------
// Power and battery sensing
// ---------------------------------------------------------------------------

/// Digital input: HIGH while VBUS (USB 5 V) is present.
pub const VBUS_SENSE_GPIO: i32 = 4;

/// Battery voltage monitor through a 1:2 divider.
/// ADC1 channel 2 (GPIO 3 on ESP32-S3).
pub const VBAT_ADC_GPIO: i32 = 3;
pub const VBAT_ADC_CHANNEL: u32 = 2;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC timer resolution (bits). 16-bit matches the full-scale duty the
/// intensity maths are written against.
pub const PWM_RESOLUTION_BITS: u32 = 16;
/// LEDC base frequency for all LED strings. 500 Hz is flicker-free and
/// well inside the MOSFET switching budget.
pub const PWM_FREQ_HZ: u32 = 500;

/// Full-scale 16-bit duty.
pub const MAX_DUTY: u16 = u16::MAX;
/// Duty ceiling for the star and dark-green strings (2^14). Their
/// MOSFETs run hot at full duty.
pub const STAR_MAX_DUTY: u16 = 1 << 14;
