//! Frame-indexed LED animations.
//!
//! Every animation is a pure function of the global frame counter: given the
//! same frame number it always writes the same intensities (the one-shot
//! [`Kind::Hold`] is the documented exception). The variants live in a
//! single enum dispatched by one `render` match — no dyn, no heap.
//!
//! | Kind    | Waveform                                    |
//! |---------|---------------------------------------------|
//! | Sine    | `(1 + sin(2π·completed)) / 2`               |
//! | Decay   | `e^(-5·completed)` — sharp attack, tail off |
//! | Flicker | linear ramps between random levels          |
//! | Blink   | square wave, one transition per period      |
//! | Hold    | a single write on first exec, then nothing  |

use crate::app::ports::LedOutputPort;
use crate::error::{Error, Result};
use crate::rng::XorShift64;

/// Maximum LED channels one animation may target.
pub const MAX_TARGETS: usize = 4;

/// Maximum random levels a flicker animation may precompute.
pub const MAX_FLICKER_LEVELS: usize = 32;

/// Index into the adapter-owned LED bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelId(pub u8);

/// Fixed-capacity channel group.
pub type Targets = heapless::Vec<ChannelId, MAX_TARGETS>;

// ---------------------------------------------------------------------------
// Variant payloads
// ---------------------------------------------------------------------------

/// Animation variant plus any variant-specific state.
#[derive(Debug, Clone)]
pub enum Kind {
    /// Smooth continuous fade in/out, period = duration.
    Sine,
    /// Flash at full intensity, exponential decay to (almost) zero.
    Decay,
    /// Linear interpolation between precomputed random target levels,
    /// wrapping circularly. The levels are drawn once at construction, so
    /// replaying a frame is deterministic but two instances differ.
    Flicker {
        levels: heapless::Vec<f32, MAX_FLICKER_LEVELS>,
        frames_per_level: u32,
    },
    /// Square wave: off for the first half of the period, on for the rest.
    Blink,
    /// One-shot static level, applied on the first exec only.
    Hold { pct: f32, applied: bool },
}

impl Kind {
    /// Short name, used in scene-change reports.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Sine => "sine",
            Self::Decay => "decay",
            Self::Flicker { .. } => "flicker",
            Self::Blink => "blink",
            Self::Hold { .. } => "hold",
        }
    }
}

// ---------------------------------------------------------------------------
// Animation
// ---------------------------------------------------------------------------

/// A periodic animation bound to one or more LED channels.
///
/// `frame_count = duration * frame_rate` is derived once at construction and
/// never changes; `exec` folds the global frame counter into the period.
#[derive(Debug, Clone)]
pub struct Animation {
    channels: Targets,
    frame_rate: u32,
    frame_count: u32,
    /// Phase offset in frames. Fractional offsets are legal (e.g. half a
    /// 5 s period at 25 fps is 62.5 frames).
    offset_frames: f32,
    scale_max: f32,
    kind: Kind,
}

/// `duration * frame_rate`, rejected when it rounds down to zero frames.
fn derive_frame_count(duration_secs: f32, frame_rate: u32) -> Result<u32> {
    let frame_count = (duration_secs * frame_rate as f32) as u32;
    if frame_count == 0 {
        return Err(Error::Config("animation duration is under one frame"));
    }
    Ok(frame_count)
}

impl Animation {
    fn new(channels: Targets, duration_secs: f32, frame_rate: u32, kind: Kind) -> Result<Self> {
        let frame_count = derive_frame_count(duration_secs, frame_rate)?;
        if channels.is_empty() {
            return Err(Error::Config("animation targets no channels"));
        }
        Ok(Self {
            channels,
            frame_rate,
            frame_count,
            offset_frames: 0.0,
            scale_max: 1.0,
            kind,
        })
    }

    /// Oscillating fade.
    pub fn sine(channels: Targets, duration_secs: f32, frame_rate: u32) -> Result<Self> {
        Self::new(channels, duration_secs, frame_rate, Kind::Sine)
    }

    /// Flash-and-decay.
    pub fn decay(channels: Targets, duration_secs: f32, frame_rate: u32) -> Result<Self> {
        Self::new(channels, duration_secs, frame_rate, Kind::Decay)
    }

    /// Binary blink.
    pub fn blink(channels: Targets, duration_secs: f32, frame_rate: u32) -> Result<Self> {
        Self::new(channels, duration_secs, frame_rate, Kind::Blink)
    }

    /// One-shot static hold at `pct`.
    pub fn hold(channels: Targets, duration_secs: f32, frame_rate: u32, pct: f32) -> Result<Self> {
        Self::new(
            channels,
            duration_secs,
            frame_rate,
            Kind::Hold {
                pct,
                applied: false,
            },
        )
    }

    /// Randomized flicker.
    ///
    /// Draws `duration / glitch_duration` uniform levels from `rng` up
    /// front (`glitch_duration` defaults to a tenth of the duration). The
    /// frame count must divide evenly into the level count; anything else
    /// is a configuration error — the table must not start half-built.
    pub fn flicker(
        channels: Targets,
        duration_secs: f32,
        frame_rate: u32,
        glitch_duration_secs: Option<f32>,
        rng: &mut XorShift64,
    ) -> Result<Self> {
        let glitch = glitch_duration_secs.unwrap_or(duration_secs / 10.0);
        if glitch <= 0.0 {
            return Err(Error::Config("flicker glitch duration must be positive"));
        }

        let count = (duration_secs / glitch) as usize;
        if count == 0 {
            return Err(Error::Config("flicker glitch duration exceeds duration"));
        }

        let frame_count = derive_frame_count(duration_secs, frame_rate)?;
        if frame_count % count as u32 != 0 {
            return Err(Error::Config(
                "flicker level count does not divide the frame count",
            ));
        }

        let mut levels = heapless::Vec::new();
        for _ in 0..count {
            levels
                .push(rng.next_f32())
                .map_err(|_| Error::Config("flicker level count exceeds capacity"))?;
        }

        Self::new(
            channels,
            duration_secs,
            frame_rate,
            Kind::Flicker {
                levels,
                frames_per_level: frame_count / count as u32,
            },
        )
    }

    /// Delay the animation's phase by `secs`.
    pub fn with_offset(mut self, secs: f32) -> Self {
        self.offset_frames = secs * self.frame_rate as f32;
        self
    }

    /// Cap the output at `scale_max` (0..1) instead of full intensity.
    pub fn with_scale_max(mut self, scale_max: f32) -> Self {
        self.scale_max = scale_max;
        self
    }

    /// Frames per period.
    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    /// The variant's short name.
    pub fn kind_name(&self) -> &'static str {
        self.kind.name()
    }

    // ── Rendering ─────────────────────────────────────────────

    /// Render the animation's state for the given global frame number.
    ///
    /// Folds `frame` (plus the phase offset) into the period, derives the
    /// completed fraction in `[0, 1)`, and writes the variant's value to
    /// every target channel. Replaying a frame yields identical output for
    /// every variant except [`Kind::Hold`], which writes exactly once.
    pub fn exec(&mut self, frame: u64, out: &mut impl LedOutputPort) {
        let period = self.frame_count as f32;
        let frame_in_animation = (frame as f32 + self.offset_frames).rem_euclid(period);
        let completed = frame_in_animation / period;

        let value = match &mut self.kind {
            Kind::Sine => {
                let d = core::f32::consts::TAU * completed;
                Some((1.0 + d.sin()) / 2.0)
            }
            Kind::Decay => Some((-5.0 * completed).exp()),
            Kind::Blink => Some(if completed <= 0.5 { 0.0 } else { 1.0 }),
            Kind::Flicker {
                levels,
                frames_per_level,
            } => {
                let fpl = *frames_per_level as f32;
                let index = (frame_in_animation / fpl) as usize;
                let from = levels[index % levels.len()];
                let to = levels[(index + 1) % levels.len()];
                let step = (to - from) / fpl;
                let steps_in = frame_in_animation - index as f32 * fpl;
                Some(from + steps_in * step)
            }
            Kind::Hold { pct, applied } => {
                if *applied {
                    None
                } else {
                    *applied = true;
                    Some(*pct)
                }
            }
        };

        if let Some(value) = value {
            self.set_all(value, out);
        }
    }

    /// Scale by the configured ceiling and write to every owned channel.
    /// The port clamps to [0, 1] before applying the channel duty limit.
    fn set_all(&self, value: f32, out: &mut impl LedOutputPort) {
        let value = value * self.scale_max;
        for channel in &self.channels {
            out.set_intensity(*channel, value);
        }
    }
}

/// Build a target group from a channel slice. Panics only if `MAX_TARGETS`
/// is exceeded, which the hardcoded table never does.
pub fn targets(channels: &[ChannelId]) -> Targets {
    let mut v = Targets::new();
    for ch in channels {
        assert!(v.push(*ch).is_ok(), "more than MAX_TARGETS channels");
    }
    v
}
