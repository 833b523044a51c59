//! Shared mock adapters for integration tests.

use std::collections::HashMap;

use infinitree::animation::ChannelId;
use infinitree::app::activation::ActivationState;
use infinitree::app::events::AppEvent;
use infinitree::app::ports::{
    ClockPort, EventSink, LedOutputPort, PowerSensePort, StatePort, TelemetrySensorPort,
};
use infinitree::error::StorageError;

// ── LED bank + sensors ────────────────────────────────────────

/// Records every intensity write and keeps the last value per channel.
pub struct MockHw {
    pub writes: Vec<(ChannelId, f32)>,
    pub last: HashMap<u8, f32>,
    pub blank_count: usize,
    pub battery_raw: u16,
    pub temperature_c: f32,
}

impl MockHw {
    pub fn new() -> Self {
        Self {
            writes: Vec::new(),
            last: HashMap::new(),
            blank_count: 0,
            battery_raw: 36759, // ≈ 3.7 V
            temperature_c: 21.0,
        }
    }
}

impl LedOutputPort for MockHw {
    fn set_intensity(&mut self, channel: ChannelId, intensity: f32) {
        self.writes.push((channel, intensity));
        self.last.insert(channel.0, intensity);
    }

    fn blank(&mut self) {
        self.blank_count += 1;
        for value in self.last.values_mut() {
            *value = 0.0;
        }
    }
}

impl TelemetrySensorPort for MockHw {
    fn battery_raw(&mut self) -> u16 {
        self.battery_raw
    }

    fn temperature_c(&mut self) -> f32 {
        self.temperature_c
    }
}

// ── Power / state / events ────────────────────────────────────

pub struct MockPower {
    pub external: bool,
}

impl PowerSensePort for MockPower {
    fn is_externally_powered(&mut self) -> bool {
        self.external
    }
}

/// In-memory token store that counts writes.
pub struct MemoryState {
    pub current: ActivationState,
    pub write_count: usize,
}

impl MemoryState {
    pub fn new(current: ActivationState) -> Self {
        Self {
            current,
            write_count: 0,
        }
    }
}

impl StatePort for MemoryState {
    fn load(&mut self) -> ActivationState {
        self.current
    }

    fn store(&mut self, state: ActivationState) -> Result<(), StorageError> {
        self.current = state;
        self.write_count += 1;
        Ok(())
    }
}

pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn scene_indices(&self) -> Vec<usize> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::SceneChanged { index, .. } => Some(*index),
                _ => None,
            })
            .collect()
    }

    pub fn telemetry_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::Telemetry(_)))
            .count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Fake clock ────────────────────────────────────────────────

/// Virtual clock: `sleep_ms` advances time instantly, so a four-minute
/// run completes in milliseconds of wall time.
pub struct FakeClock {
    pub now_ms: u64,
}

impl FakeClock {
    pub fn new() -> Self {
        Self { now_ms: 0 }
    }
}

impl ClockPort for FakeClock {
    fn uptime_ms(&mut self) -> u64 {
        self.now_ms
    }

    fn sleep_ms(&mut self, ms: u64) {
        self.now_ms += ms;
    }
}
