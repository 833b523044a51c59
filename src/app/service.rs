//! Application service — the hexagonal core.
//!
//! [`AppService`] owns the scene table and the run-loop logic. All I/O
//! flows through port traits injected at call sites, making the entire
//! service testable with mock adapters and a fake clock.
//!
//! ```text
//!  TelemetrySensorPort ──▶ ┌────────────────────────┐ ──▶ EventSink
//!      PowerSensePort  ──▶ │       AppService        │ ──▶ LedOutputPort
//!           ClockPort  ──▶ │  scenes · scheduler     │ ⇄── StatePort
//!                          └────────────────────────┘
//! ```

use log::{debug, info, warn};

use crate::app::activation::ActivationState;
use crate::app::events::{AppEvent, TelemetryData};
use crate::app::ports::{ClockPort, EventSink, LedOutputPort, PowerSensePort, StatePort, TelemetrySensorPort};
use crate::config::SystemConfig;
use crate::error::{Error, Result};
use crate::rng::XorShift64;
use crate::scene::{build_scene_table, SceneTable};
use crate::scheduler::{Cadence, Scheduler, TaskDelegate, TaskOutcome};

// Fixed slot layout; dispatch order within one tick follows slot order.
const SLOT_RENDER: usize = 0;
const SLOT_ROTATION: usize = 1;
const SLOT_TELEMETRY: usize = 2;
const SLOT_SHUTDOWN: usize = 3;

/// What the startup activation check decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupDecision {
    /// Run the light show.
    Run,
    /// A battery boot found `Active`: the show already ran, go back to
    /// sleep without scheduling anything.
    Halt,
}

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct AppService {
    config: SystemConfig,
    table: SceneTable,
}

impl AppService {
    /// Construct the service from configuration, drawing flicker levels
    /// from an entropy-seeded generator.
    pub fn new(config: SystemConfig) -> Result<Self> {
        let mut rng = XorShift64::from_entropy();
        let table = build_scene_table(&config, &mut rng)?;
        Self::with_scene_table(config, table)
    }

    /// Construct with a pre-built scene table. Used by tests to pin the
    /// randomized flicker content.
    pub fn with_scene_table(config: SystemConfig, table: SceneTable) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, table })
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    // ── Startup ───────────────────────────────────────────────

    /// Evaluate the persisted activation token and decide whether to run.
    ///
    /// | stored  | powered | action                                    |
    /// |---------|---------|-------------------------------------------|
    /// | Active  | no      | blank, persist `Sleep`, halt              |
    /// | Active  | yes     | run (persists are disabled anyway)        |
    /// | Sleep   | —       | persist `Active`, run                     |
    /// | Unknown | —       | persist `Active`, run                     |
    ///
    /// A battery boot that finds `Active` means the previous session ran
    /// to completion (or someone pressed reset mid-show); either way the
    /// ornament goes dark until it is next plugged in.
    pub fn startup(
        &mut self,
        leds: &mut impl LedOutputPort,
        power: &mut impl PowerSensePort,
        state: &mut impl StatePort,
        sink: &mut impl EventSink,
    ) -> StartupDecision {
        let boot_state = state.load();
        info!("last state: {boot_state}");

        match boot_state {
            ActivationState::Active if !power.is_externally_powered() => {
                self.shut_down(leds, power, state, sink);
                return StartupDecision::Halt;
            }
            ActivationState::Sleep | ActivationState::Unknown => {
                self.persist(power, state, ActivationState::Active);
            }
            ActivationState::Active => {}
        }

        sink.emit(&AppEvent::Started { boot_state });
        StartupDecision::Run
    }

    // ── Run loop ──────────────────────────────────────────────

    /// Run the show until the timed shutdown fires.
    ///
    /// Registers the four tasks, then loops: tick the scheduler at the
    /// current uptime, sleep until the earliest pending deadline, repeat.
    /// Returns once the shutdown task has blanked the LEDs and persisted
    /// `Sleep`.
    pub fn run<H>(
        &mut self,
        hw: &mut H,
        power: &mut impl PowerSensePort,
        state: &mut impl StatePort,
        clock: &mut impl ClockPort,
        sink: &mut impl EventSink,
    ) -> Result<()>
    where
        H: LedOutputPort + TelemetrySensorPort,
    {
        let mut sched = Scheduler::new();
        sched
            .add("render", Cadence::PerFrame { hz: self.config.frame_rate_fps })
            .ok_or(Error::Init("task table full"))?;
        sched
            .add("scene-rotation", Cadence::Every { period_ms: self.config.rotation_check_interval_ms })
            .ok_or(Error::Init("task table full"))?;
        sched
            .add("telemetry", Cadence::Every { period_ms: self.config.telemetry_interval_secs * 1000 })
            .ok_or(Error::Init("task table full"))?;
        sched
            .add("shutdown", Cadence::OnceAfter { delay_ms: self.config.run_for_secs * 1000 })
            .ok_or(Error::Init("task table full"))?;

        let start_ms = clock.uptime_ms();
        let mut tasks = RunTasks {
            service: self,
            hw,
            power,
            state,
            sink,
            elapsed_ms: 0,
        };

        loop {
            let now_ms = clock.uptime_ms() - start_ms;
            tasks.elapsed_ms = now_ms;
            if sched.tick(now_ms, &mut tasks) == TaskOutcome::Halt {
                return Ok(());
            }
            let Some(deadline) = sched.next_deadline_ms() else {
                return Ok(());
            };
            let now_ms = clock.uptime_ms() - start_ms;
            clock.sleep_ms(deadline.saturating_sub(now_ms).max(1));
        }
    }

    // ── Task bodies ───────────────────────────────────────────

    fn draw_frame(&mut self, elapsed_ms: u64, leds: &mut impl LedOutputPort) {
        let frame = u64::from(self.config.frame_rate_fps) * elapsed_ms / 1000;
        self.table.render_current(frame, leds);
    }

    fn check_rotation(&mut self, elapsed_ms: u64, sink: &mut impl EventSink) {
        let elapsed_secs = elapsed_ms as f64 / 1000.0;
        if let Some(index) = self
            .table
            .check_rotation(elapsed_secs, self.config.switch_every_secs)
        {
            let kinds = self.table.current_kind_names();
            info!("scene #{index}: {kinds:?}");
            sink.emit(&AppEvent::SceneChanged { index, kinds });
        }
    }

    fn report_telemetry(
        &mut self,
        sensors: &mut impl TelemetrySensorPort,
        sink: &mut impl EventSink,
    ) {
        let data = TelemetryData {
            battery_v: TelemetryData::battery_v_from_raw(sensors.battery_raw()),
            temperature_c: sensors.temperature_c(),
        };
        sink.emit(&AppEvent::Telemetry(data));
    }

    fn shut_down(
        &mut self,
        leds: &mut impl LedOutputPort,
        power: &mut impl PowerSensePort,
        state: &mut impl StatePort,
        sink: &mut impl EventSink,
    ) {
        info!("going to sleep...");
        sink.emit(&AppEvent::Sleeping);
        self.persist(power, state, ActivationState::Sleep);
        leds.blank();
    }

    // ── Activation persistence ────────────────────────────────

    /// Write the activation token unless external power is present.
    ///
    /// On USB the store stays read-only so the development host can own
    /// the filesystem; the write is dropped silently. A failed write on
    /// battery is logged and swallowed — a stale token only costs one
    /// extra (or one missed) show, never the session.
    fn persist(
        &self,
        power: &mut impl PowerSensePort,
        state: &mut impl StatePort,
        value: ActivationState,
    ) {
        if power.is_externally_powered() {
            debug!("externally powered, not persisting '{value}'");
            return;
        }
        if let Err(err) = state.store(value) {
            warn!("failed to persist '{value}': {err}");
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Scheduler delegate
// ───────────────────────────────────────────────────────────────

/// Borrows the service and its ports for the duration of [`AppService::run`]
/// and routes scheduler dispatches to the task bodies.
struct RunTasks<'a, H, P, S, E>
where
    H: LedOutputPort + TelemetrySensorPort,
    P: PowerSensePort,
    S: StatePort,
    E: EventSink,
{
    service: &'a mut AppService,
    hw: &'a mut H,
    power: &'a mut P,
    state: &'a mut S,
    sink: &'a mut E,
    elapsed_ms: u64,
}

impl<H, P, S, E> TaskDelegate for RunTasks<'_, H, P, S, E>
where
    H: LedOutputPort + TelemetrySensorPort,
    P: PowerSensePort,
    S: StatePort,
    E: EventSink,
{
    fn run_task(&mut self, slot: usize, label: &'static str) -> TaskOutcome {
        match slot {
            SLOT_RENDER => self.service.draw_frame(self.elapsed_ms, self.hw),
            SLOT_ROTATION => self.service.check_rotation(self.elapsed_ms, self.sink),
            SLOT_TELEMETRY => self.service.report_telemetry(self.hw, self.sink),
            SLOT_SHUTDOWN => {
                self.service
                    .shut_down(self.hw, self.power, self.state, self.sink);
                return TaskOutcome::Halt;
            }
            _ => warn!("unknown task slot {slot} ('{label}')"),
        }
        TaskOutcome::Continue
    }
}
