//! INFINITREE Firmware — Main Entry Point
//!
//! Boot sequence: bring up the logger and peripherals, wire the adapters
//! to the application service, evaluate the activation token, then run
//! the show until the timed shutdown fires. After the halt the board
//! idles indefinitely.
#![deny(unused_must_use)]

use anyhow::Result;
use log::info;

use infinitree::adapters::hardware::HardwareAdapter;
use infinitree::adapters::log_sink::LogEventSink;
use infinitree::adapters::power::VbusPowerSense;
use infinitree::adapters::state_store::StateStoreAdapter;
use infinitree::adapters::time::MonotonicClock;
use infinitree::app::ports::{ClockPort, LedOutputPort};
use infinitree::app::service::{AppService, StartupDecision};
use infinitree::config::SystemConfig;
use infinitree::drivers;

const BANNER: &str = r"
██╗███╗   ██╗███████╗██╗███╗   ██╗██╗████████╗██████╗ ███████╗███████╗
██║████╗  ██║██╔════╝██║████╗  ██║██║╚══██╔══╝██╔══██╗██╔════╝██╔════╝
██║██╔██╗ ██║█████╗  ██║██╔██╗ ██║██║   ██║   ██████╔╝█████╗  █████╗
██║██║╚██╗██║██╔══╝  ██║██║╚██╗██║██║   ██║   ██╔══██╗██╔══╝  ██╔══╝
██║██║ ╚████║██║     ██║██║ ╚████║██║   ██║   ██║  ██║███████╗███████╗
╚═╝╚═╝  ╚═══╝╚═╝     ╚═╝╚═╝  ╚═══╝╚═╝   ╚═╝   ╚═╝  ╚═╝╚══════╝╚══════╝
";

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("{BANNER}");
    info!("infinitree v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Peripherals ────────────────────────────────────────
    if let Err(e) = drivers::hw_init::init_peripherals() {
        // Peripheral init failure is critical — log and halt.
        log::error!("HAL init failed: {e} — halting");
        idle_forever();
    }

    // ── 3. Wire adapters to the service ───────────────────────
    let mut hw = HardwareAdapter::new();
    hw.blank();
    let mut power = VbusPowerSense::new();
    let mut state = StateStoreAdapter::new();
    let mut clock = MonotonicClock::new();
    let mut sink = LogEventSink::new();

    let mut service = AppService::new(SystemConfig::default())?;

    // ── 4. Activation check, then run ─────────────────────────
    match service.startup(&mut hw, &mut power, &mut state, &mut sink) {
        StartupDecision::Halt => {
            info!("activation token says sleep, not scheduling");
        }
        StartupDecision::Run => {
            service.run(&mut hw, &mut power, &mut state, &mut clock, &mut sink)?;
        }
    }

    // TODO(power): replace with esp_deep_sleep_start once the wake wiring
    // for the VBUS sense pin is decided.
    idle_forever()
}

/// Low-power wait after the show: nothing left to schedule, just keep
/// the watchdog fed by sleeping in long stretches.
fn idle_forever() -> ! {
    let mut clock = MonotonicClock::new();
    loop {
        clock.sleep_ms(60_000);
    }
}
