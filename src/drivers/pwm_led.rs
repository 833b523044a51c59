//! A single PWM-dimmed LED string.
//!
//! Thin wrapper over one LEDC channel: takes a fractional intensity in
//! `[0.0, 1.0]`, scales it against the string's duty ceiling, and writes
//! the duty register. Some strings carry a ceiling below full scale
//! because their MOSFETs cannot sit at 100% duty.

use crate::drivers::hw_init;

pub struct PwmLed {
    channel: u32,
    max_duty: u16,
}

impl PwmLed {
    pub fn new(channel: u32, max_duty: u16) -> Self {
        Self { channel, max_duty }
    }

    /// Drive the string at a fractional intensity. Out-of-range values
    /// clamp; animation waveforms can overshoot slightly at extremes.
    pub fn set(&mut self, pct: f32) {
        hw_init::ledc_set(self.channel, self.duty_for(pct));
    }

    /// Turn the string fully off.
    pub fn off(&mut self) {
        hw_init::ledc_set(self.channel, 0);
    }

    fn duty_for(&self, pct: f32) -> u16 {
        let pct = pct.clamp(0.0, 1.0);
        (pct * f32::from(self.max_duty)) as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pins::{MAX_DUTY, STAR_MAX_DUTY};

    #[test]
    fn duty_scales_against_ceiling() {
        let full = PwmLed::new(0, MAX_DUTY);
        assert_eq!(full.duty_for(0.0), 0);
        assert_eq!(full.duty_for(1.0), MAX_DUTY);
        assert_eq!(full.duty_for(0.5), MAX_DUTY / 2);

        let capped = PwmLed::new(1, STAR_MAX_DUTY);
        assert_eq!(capped.duty_for(1.0), STAR_MAX_DUTY);
    }

    #[test]
    fn out_of_range_intensity_clamps() {
        let led = PwmLed::new(0, MAX_DUTY);
        assert_eq!(led.duty_for(-0.2), 0);
        assert_eq!(led.duty_for(1.7), MAX_DUTY);
        assert_eq!(led.duty_for(f32::NAN), 0);
    }
}
