//! Startup activation scenarios: what the persisted token and the power
//! source decide at boot.

use infinitree::app::activation::ActivationState;
use infinitree::app::events::AppEvent;
use infinitree::app::service::{AppService, StartupDecision};
use infinitree::config::SystemConfig;
use infinitree::rng::XorShift64;
use infinitree::scene::build_scene_table;

use crate::mock_hw::{MemoryState, MockHw, MockPower, RecordingSink};

fn service() -> AppService {
    let config = SystemConfig::default();
    let mut rng = XorShift64::new(0xBAD5EED);
    let table = build_scene_table(&config, &mut rng).unwrap();
    AppService::with_scene_table(config, table).unwrap()
}

#[test]
fn unknown_token_on_battery_arms_active_and_runs() {
    let mut svc = service();
    let mut hw = MockHw::new();
    let mut power = MockPower { external: false };
    let mut state = MemoryState::new(ActivationState::Unknown);
    let mut sink = RecordingSink::new();

    let decision = svc.startup(&mut hw, &mut power, &mut state, &mut sink);

    assert_eq!(decision, StartupDecision::Run);
    assert_eq!(state.current, ActivationState::Active);
    assert_eq!(state.write_count, 1);
}

#[test]
fn active_token_on_battery_halts_and_persists_sleep() {
    let mut svc = service();
    let mut hw = MockHw::new();
    let mut power = MockPower { external: false };
    let mut state = MemoryState::new(ActivationState::Active);
    let mut sink = RecordingSink::new();

    let decision = svc.startup(&mut hw, &mut power, &mut state, &mut sink);

    assert_eq!(decision, StartupDecision::Halt);
    assert_eq!(state.current, ActivationState::Sleep);
    assert_eq!(hw.blank_count, 1);
    // Halted before scheduling: the only event is the sleep notice.
    assert!(matches!(sink.events.as_slice(), [AppEvent::Sleeping]));
}

#[test]
fn sleep_token_rearms_active_regardless_of_power() {
    for external in [false, true] {
        let mut svc = service();
        let mut hw = MockHw::new();
        let mut power = MockPower { external };
        let mut state = MemoryState::new(ActivationState::Sleep);
        let mut sink = RecordingSink::new();

        let decision = svc.startup(&mut hw, &mut power, &mut state, &mut sink);

        assert_eq!(decision, StartupDecision::Run);
        if external {
            // Write gated on USB: the stored value must be untouched.
            assert_eq!(state.current, ActivationState::Sleep);
            assert_eq!(state.write_count, 0);
        } else {
            assert_eq!(state.current, ActivationState::Active);
        }
    }
}

#[test]
fn active_token_on_usb_runs_without_writing() {
    let mut svc = service();
    let mut hw = MockHw::new();
    let mut power = MockPower { external: true };
    let mut state = MemoryState::new(ActivationState::Active);
    let mut sink = RecordingSink::new();

    let decision = svc.startup(&mut hw, &mut power, &mut state, &mut sink);

    assert_eq!(decision, StartupDecision::Run);
    assert_eq!(state.current, ActivationState::Active);
    assert_eq!(state.write_count, 0);
    assert_eq!(hw.blank_count, 0);
}
