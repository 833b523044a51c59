//! Property tests for the animation and rotation invariants.
//!
//! Runs on host (x86_64) only — proptest is not available for ESP32
//! targets. On ESP32, these tests are compiled out.

#![cfg(not(target_os = "espidf"))]

use infinitree::animation::{Animation, ChannelId};
use infinitree::app::ports::LedOutputPort;
use infinitree::config::SystemConfig;
use infinitree::rng::XorShift64;
use infinitree::scene::build_scene_table;
use proptest::prelude::*;

/// Captures the writes of a single exec call.
#[derive(Default)]
struct Capture {
    writes: Vec<(u8, f32)>,
}

impl LedOutputPort for Capture {
    fn set_intensity(&mut self, channel: ChannelId, intensity: f32) {
        self.writes.push((channel.0, intensity));
    }

    fn blank(&mut self) {
        self.writes.clear();
    }
}

fn writes_at(animation: &mut Animation, frame: u64) -> Vec<(u8, f32)> {
    let mut out = Capture::default();
    animation.exec(frame, &mut out);
    out.writes
}

proptest! {
    /// Every periodic variant repeats exactly with period `frame_count`.
    #[test]
    fn periodic_variants_repeat_with_frame_count(
        duration in 1u32..=30,
        frame_rate in 1u32..=60,
        frame in 0u64..100_000,
        variant in 0usize..3,
    ) {
        let targets = infinitree::animation::targets(&[ChannelId(0)]);
        let build = |t| match variant {
            0 => Animation::sine(t, duration as f32, frame_rate),
            1 => Animation::decay(t, duration as f32, frame_rate),
            _ => Animation::blink(t, duration as f32, frame_rate),
        };
        let mut a = build(targets).unwrap();
        let frame_count = u64::from(duration * frame_rate);

        let now = writes_at(&mut a, frame);
        let next_period = writes_at(&mut a, frame + frame_count);
        prop_assert_eq!(now, next_period);
    }

    /// Output intensity never exceeds the configured scale ceiling.
    #[test]
    fn intensity_respects_scale_ceiling(
        frame in 0u64..10_000,
        scale_max in 0.0f32..=1.0,
    ) {
        let targets = infinitree::animation::targets(&[ChannelId(0)]);
        let mut a = Animation::sine(targets, 4.0, 25)
            .unwrap()
            .with_scale_max(scale_max);
        for (_, value) in writes_at(&mut a, frame) {
            prop_assert!(value >= 0.0);
            prop_assert!(value <= scale_max + f32::EPSILON);
        }
    }

    /// Flicker construction succeeds iff the glitch count divides the
    /// frame count; a constructed flicker is frame-deterministic.
    #[test]
    fn flicker_divisibility_and_determinism(
        half_duration in 1u32..=5,
        frame in 0u64..10_000,
        seed in 0u64..u64::MAX,
    ) {
        // Even durations only: at 25 fps the ten glitch segments must
        // divide the frame count.
        let duration = half_duration * 2;
        let frame_rate = 25;
        let glitch = duration as f32 / 10.0;
        let mut rng = XorShift64::new(seed);
        let targets = infinitree::animation::targets(&[ChannelId(1)]);
        let mut a = Animation::flicker(
            targets,
            duration as f32,
            frame_rate,
            Some(glitch),
            &mut rng,
        )
        .unwrap();

        let first = writes_at(&mut a, frame);
        let second = writes_at(&mut a, frame);
        prop_assert_eq!(first, second);
    }

    /// Rotation never returns to the intro scene and always yields a
    /// valid index, whatever the elapsed time sequence.
    #[test]
    fn rotation_stays_in_bounds_and_skips_intro(
        seconds in proptest::collection::vec(0u64..10_000, 1..50),
        switch_every in 1u32..=120,
    ) {
        let config = SystemConfig::default();
        let mut rng = XorShift64::new(7);
        let mut table = build_scene_table(&config, &mut rng).unwrap();
        let mut elapsed = 0u64;

        for step in seconds {
            elapsed += step;
            if let Some(index) = table.check_rotation(elapsed as f64, switch_every) {
                prop_assert!(index >= 1, "intro scene must never repeat");
                prop_assert!(index < table.len());
                prop_assert_eq!(index, table.current_index());
            }
        }
    }
}
