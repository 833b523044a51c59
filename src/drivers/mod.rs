//! Hardware drivers: one-shot peripheral init and the PWM LED primitive.

pub mod hw_init;
pub mod pwm_led;
