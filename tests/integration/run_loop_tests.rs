//! End-to-end run-loop behaviour under a virtual clock.

use infinitree::app::activation::ActivationState;
use infinitree::app::events::AppEvent;
use infinitree::app::service::{AppService, StartupDecision};
use infinitree::config::SystemConfig;
use infinitree::rng::XorShift64;
use infinitree::scene::build_scene_table;

use crate::mock_hw::{FakeClock, MemoryState, MockHw, MockPower, RecordingSink};

fn service_with(config: SystemConfig) -> AppService {
    let mut rng = XorShift64::new(42);
    let table = build_scene_table(&config, &mut rng).unwrap();
    AppService::with_scene_table(config, table).unwrap()
}

fn run_show(run_for_secs: u32) -> (MockHw, MemoryState, RecordingSink) {
    let config = SystemConfig {
        run_for_secs,
        ..SystemConfig::default()
    };
    let mut svc = service_with(config);
    let mut hw = MockHw::new();
    let mut power = MockPower { external: false };
    let mut state = MemoryState::new(ActivationState::Unknown);
    let mut clock = FakeClock::new();
    let mut sink = RecordingSink::new();

    let decision = svc.startup(&mut hw, &mut power, &mut state, &mut sink);
    assert_eq!(decision, StartupDecision::Run);
    svc.run(&mut hw, &mut power, &mut state, &mut clock, &mut sink)
        .unwrap();
    (hw, state, sink)
}

#[test]
fn run_terminates_at_deadline_and_goes_to_sleep() {
    let (hw, state, sink) = run_show(35);

    assert_eq!(state.current, ActivationState::Sleep);
    assert_eq!(hw.blank_count, 1);
    assert!(matches!(sink.events.last(), Some(AppEvent::Sleeping)));
}

#[test]
fn telemetry_reports_every_five_seconds() {
    let (_, _, sink) = run_show(35);

    // Reports at 5, 10, ..., 35 s inclusive.
    assert_eq!(sink.telemetry_count(), 7);

    let Some(AppEvent::Telemetry(data)) = sink
        .events
        .iter()
        .find(|e| matches!(e, AppEvent::Telemetry(_)))
    else {
        panic!("no telemetry event");
    };
    // MockHw reports raw 36759 ≈ 3.7 V through the 1:2 divider.
    assert!((data.battery_v - 3.7).abs() < 0.01);
    assert!((data.temperature_c - 21.0).abs() < f32::EPSILON);
}

#[test]
fn scenes_rotate_past_grace_then_on_interval() {
    let (_, _, sink) = run_show(35);

    // Leaves the intro scene at 3 s (first check after the 2 s grace
    // window), then advances on the 15 s boundaries.
    assert_eq!(sink.scene_indices(), vec![1, 2, 3]);
}

#[test]
fn rotation_wraps_to_scene_one_never_back_to_intro() {
    let (_, _, sink) = run_show(100);

    // Six scenes: 3 s → 1, then 15/30/45/60 s → 2..5, 75 s wraps to 1.
    assert_eq!(sink.scene_indices(), vec![1, 2, 3, 4, 5, 1, 2]);
}

#[test]
fn render_keeps_writing_until_halt_and_ends_dark() {
    let (hw, _, _) = run_show(10);

    assert!(!hw.writes.is_empty());
    // The final blank forces every channel it has seen to zero.
    assert!(hw.last.values().all(|v| *v == 0.0));

    // Frame indices derive from elapsed time, so the last write happened
    // at or before the 10 s deadline; a 25 fps run writes many times.
    assert!(hw.writes.len() > 100);
}
