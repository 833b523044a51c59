//! External-power sense adapter.
//!
//! Implements [`PowerSensePort`] from the VBUS divider GPIO: HIGH while
//! the board is on USB 5 V, LOW on battery. The host backend reads an
//! injectable atomic so tests can flip the supply mid-scenario.

use crate::app::ports::PowerSensePort;

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;
#[cfg(target_os = "espidf")]
use crate::pins;

#[cfg(not(target_os = "espidf"))]
use std::sync::atomic::{AtomicBool, Ordering};

/// Injectable supply state for host-side runs. `false` = on battery.
#[cfg(not(target_os = "espidf"))]
pub static SIM_EXTERNAL_POWER: AtomicBool = AtomicBool::new(false);

pub struct VbusPowerSense;

impl VbusPowerSense {
    pub fn new() -> Self {
        Self
    }
}

impl Default for VbusPowerSense {
    fn default() -> Self {
        Self::new()
    }
}

impl PowerSensePort for VbusPowerSense {
    #[cfg(target_os = "espidf")]
    fn is_externally_powered(&mut self) -> bool {
        hw_init::gpio_read(pins::VBUS_SENSE_GPIO)
    }

    #[cfg(not(target_os = "espidf"))]
    fn is_externally_powered(&mut self) -> bool {
        SIM_EXTERNAL_POWER.load(Ordering::Relaxed)
    }
}
