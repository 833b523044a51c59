//! Scene table and rotation policy.
//!
//! A scene is a group of animations rendered together each frame; the table
//! is an ordered list of scenes with one live index. Index 0 is a one-shot
//! intro — rotation always wraps back to index 1.
//!
//! ```text
//!   0 (intro) ──▶ 1 ──▶ 2 ──▶ … ──▶ N-1
//!                 ▲                   │
//!                 └───────────────────┘
//! ```
//!
//! Rotation rule (checked once per second): nothing happens for the first
//! two seconds; after that the table advances when the current scene is the
//! intro, or when the elapsed-seconds value is a multiple of
//! `switch_every_secs`. The multiple-of check is level-triggered for the
//! whole boundary second, which is why the check task must not run faster
//! than 1 Hz.

use crate::animation::{targets, Animation, ChannelId};
use crate::app::ports::LedOutputPort;
use crate::config::SystemConfig;
use crate::error::{Error, Result};
use crate::rng::XorShift64;

/// Maximum animations running concurrently in one scene.
pub const MAX_ANIMATIONS: usize = 4;

/// Maximum scenes in the table.
pub const MAX_SCENES: usize = 8;

/// Seconds of intro grace before any rotation happens.
const ROTATION_GRACE_SECS: f64 = 2.0;

/// Unique kind names of a scene's animations, for scene-change reports.
pub type KindNames = heapless::Vec<&'static str, MAX_ANIMATIONS>;

// ---------------------------------------------------------------------------
// Scene
// ---------------------------------------------------------------------------

/// An ordered group of concurrently active animations.
///
/// Animations may target overlapping channels; within a frame the later
/// animation in the group wins.
#[derive(Debug, Clone)]
pub struct Scene {
    animations: heapless::Vec<Animation, MAX_ANIMATIONS>,
}

impl Scene {
    pub fn new(animations: heapless::Vec<Animation, MAX_ANIMATIONS>) -> Self {
        Self { animations }
    }

    /// Render every animation for the given global frame number.
    pub fn render(&mut self, frame: u64, out: &mut impl LedOutputPort) {
        for animation in &mut self.animations {
            animation.exec(frame, out);
        }
    }

    /// Deduplicated kind names, in first-appearance order.
    pub fn kind_names(&self) -> KindNames {
        let mut names = KindNames::new();
        for animation in &self.animations {
            let name = animation.kind_name();
            if !names.contains(&name) {
                // Capacity equals animation count; push cannot fail.
                let _ = names.push(name);
            }
        }
        names
    }
}

// ---------------------------------------------------------------------------
// SceneTable
// ---------------------------------------------------------------------------

/// Ordered scene sequence plus the live index.
#[derive(Debug, Clone)]
pub struct SceneTable {
    scenes: heapless::Vec<Scene, MAX_SCENES>,
    current: usize,
}

impl SceneTable {
    /// A table needs the intro plus at least one rotating scene.
    pub fn new(scenes: heapless::Vec<Scene, MAX_SCENES>) -> Result<Self> {
        if scenes.len() < 2 {
            return Err(Error::Config("scene table needs an intro plus one scene"));
        }
        Ok(Self { scenes, current: 0 })
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Render the active scene.
    pub fn render_current(&mut self, frame: u64, out: &mut impl LedOutputPort) {
        self.scenes[self.current].render(frame, out);
    }

    /// Apply the rotation rule for the given elapsed time.
    ///
    /// Returns the new index when the table advanced. The intro scene is
    /// left as soon as the grace period expires and is never re-entered.
    pub fn check_rotation(&mut self, elapsed_secs: f64, switch_every_secs: u32) -> Option<usize> {
        if elapsed_secs <= ROTATION_GRACE_SECS {
            return None;
        }

        let on_boundary = (elapsed_secs.floor() as u64) % u64::from(switch_every_secs) == 0;
        if self.current == 0 || on_boundary {
            self.current += 1;
            if self.current >= self.scenes.len() {
                self.current = 1;
            }
            return Some(self.current);
        }
        None
    }

    /// Kind names of the active scene.
    pub fn current_kind_names(&self) -> KindNames {
        self.scenes[self.current].kind_names()
    }
}

// ---------------------------------------------------------------------------
// Reference table
// ---------------------------------------------------------------------------

/// Channel indices as registered by the hardware adapter, in order.
pub const CH_LIGHT_GREEN: ChannelId = ChannelId(0);
pub const CH_STAR: ChannelId = ChannelId(1);
pub const CH_RED: ChannelId = ChannelId(2);
pub const CH_GREEN: ChannelId = ChannelId(3);

/// All four ornament channels.
pub const ALL_CHANNELS: [ChannelId; 4] = [CH_LIGHT_GREEN, CH_STAR, CH_RED, CH_GREEN];

fn scene(animations: &[Animation]) -> Scene {
    let mut v = heapless::Vec::new();
    for a in animations {
        assert!(v.push(a.clone()).is_ok(), "more than MAX_ANIMATIONS");
    }
    Scene::new(v)
}

/// Build the hardcoded ornament scene table.
///
/// The star-channel "candle" flicker is constructed once and cloned into
/// each scene that uses it, so its glitch pattern is identical everywhere
/// it appears.
pub fn build_scene_table(config: &SystemConfig, rng: &mut XorShift64) -> Result<SceneTable> {
    let fr = config.frame_rate_fps;
    let main_fade_secs = 5.0;

    let candle = Animation::flicker(
        targets(&[CH_STAR]),
        2.0,
        fr,
        Some(5.0 / fr as f32),
        rng,
    )?;

    let mut scenes = heapless::Vec::new();
    let mut push = |s: Scene| {
        scenes
            .push(s)
            .map_err(|_| Error::Config("scene table exceeds capacity"))
    };

    // 0 — intro: a single flash fading out across the whole tree.
    push(scene(&[Animation::decay(targets(&ALL_CHANNELS), 2.0, fr)?]))?;

    // 1 — alternating blink, greens against red, star candle on top.
    push(scene(&[
        Animation::blink(targets(&[CH_GREEN, CH_LIGHT_GREEN]), 1.0, fr)?,
        Animation::blink(targets(&[CH_RED]), 1.0, fr)?.with_offset(0.5),
        candle.clone(),
    ]))?;

    // 2 — slow cross-fade between green and red, half a period apart.
    push(scene(&[
        Animation::sine(targets(&[CH_GREEN]), main_fade_secs, fr)?,
        Animation::sine(targets(&[CH_RED]), main_fade_secs, fr)?
            .with_offset(main_fade_secs / 2.0),
        candle.clone(),
    ]))?;

    // 3 — everything flickers at its own pace.
    push(scene(&[
        Animation::flicker(targets(&[CH_RED]), 4.0, fr, None, rng)?,
        Animation::flicker(targets(&[CH_GREEN]), 4.0, fr, None, rng)?,
        Animation::flicker(targets(&[CH_LIGHT_GREEN]), 2.0, fr, None, rng)?,
        candle.clone(),
    ]))?;

    // 4 — whole tree blinking in unison.
    push(scene(&[Animation::blink(targets(&ALL_CHANNELS), 1.0, fr)?]))?;

    // 5 — whole tree flash-and-decay.
    push(scene(&[Animation::decay(targets(&ALL_CHANNELS), 2.0, fr)?]))?;

    SceneTable::new(scenes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::ports::LedOutputPort;

    struct NullOut;

    impl LedOutputPort for NullOut {
        fn set_intensity(&mut self, _channel: ChannelId, _pct: f32) {}
        fn blank(&mut self) {}
    }

    fn reference_table() -> SceneTable {
        let mut rng = XorShift64::new(2021);
        build_scene_table(&SystemConfig::default(), &mut rng).unwrap()
    }

    #[test]
    fn reference_table_builds() {
        let table = reference_table();
        assert_eq!(table.len(), 6);
        assert_eq!(table.current_index(), 0);
    }

    #[test]
    fn no_rotation_inside_grace_period() {
        let mut table = reference_table();
        assert!(table.check_rotation(0.5, 15).is_none());
        assert!(table.check_rotation(2.0, 15).is_none());
        assert_eq!(table.current_index(), 0);
    }

    #[test]
    fn intro_is_left_on_first_check_after_grace() {
        let mut table = reference_table();
        assert_eq!(table.check_rotation(3.0, 15), Some(1));
    }

    #[test]
    fn rotation_only_on_switch_multiples() {
        let mut table = reference_table();
        table.check_rotation(3.0, 15); // leave intro
        for s in 4..15 {
            assert!(
                table.check_rotation(f64::from(s), 15).is_none(),
                "unexpected rotation at {s}s"
            );
        }
        assert_eq!(table.check_rotation(15.0, 15), Some(2));
        assert_eq!(table.check_rotation(30.0, 15), Some(3));
    }

    #[test]
    fn boundary_second_is_level_triggered() {
        // Any check landing inside the boundary second advances; the check
        // task therefore runs at exactly 1 Hz.
        let mut table = reference_table();
        table.check_rotation(3.0, 15);
        assert_eq!(table.check_rotation(15.2, 15), Some(2));
        assert_eq!(table.check_rotation(15.8, 15), Some(3));
    }

    #[test]
    fn rotation_wraps_to_one_not_zero() {
        let mut table = reference_table();
        table.check_rotation(3.0, 15);
        for i in 1..40 {
            let elapsed = 15.0 * f64::from(i);
            let next = table.check_rotation(elapsed, 15).unwrap();
            assert_ne!(next, 0, "intro must never be re-entered");
            assert!(next < table.len());
        }
    }

    #[test]
    fn table_under_two_scenes_rejected() {
        let mut scenes: heapless::Vec<Scene, MAX_SCENES> = heapless::Vec::new();
        let anim = Animation::blink(
            targets(&[CH_RED]),
            1.0,
            25,
        )
        .unwrap();
        scenes.push(scene(&[anim])).unwrap();
        assert!(SceneTable::new(scenes).is_err());
    }

    #[test]
    fn kind_names_are_deduplicated() {
        let table = reference_table();
        let mut t = table;
        t.check_rotation(3.0, 15);
        t.check_rotation(15.0, 15);
        t.check_rotation(30.0, 15); // scene 3: three flickers + candle
        let names = t.current_kind_names();
        assert_eq!(names.len(), 1);
        assert_eq!(names[0], "flicker");
    }

    #[test]
    fn render_current_touches_no_state_between_scenes() {
        let mut table = reference_table();
        let mut out = NullOut;
        table.render_current(0, &mut out);
        table.check_rotation(3.0, 15);
        table.render_current(100, &mut out);
    }
}
