//! System configuration parameters
//!
//! All tunable timing parameters for the INFINITREE ornament. The scene
//! table itself is hardcoded (see [`scene::build_scene_table`]); this struct
//! only carries the knobs the scheduler and telemetry paths read.
//!
//! [`scene::build_scene_table`]: crate::scene::build_scene_table

use serde::{Deserialize, Serialize};

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Rendering ---
    /// Global frame rate, frames per second (shared by every animation).
    /// Must divide 1000 evenly so the scheduler's millisecond deadline
    /// grid yields an exact frame period (see [`validate`]).
    ///
    /// [`validate`]: SystemConfig::validate
    pub frame_rate_fps: u32,

    // --- Scene rotation ---
    /// Rotate to the next scene whenever the elapsed-seconds value is a
    /// multiple of this interval.
    pub switch_every_secs: u32,
    /// How often the rotation rule is checked (milliseconds).
    pub rotation_check_interval_ms: u32,

    // --- Lifecycle ---
    /// Total run duration before the timed shutdown fires (seconds).
    pub run_for_secs: u32,

    // --- Telemetry ---
    /// Battery/temperature report interval (seconds).
    pub telemetry_interval_secs: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Rendering
            frame_rate_fps: 25,

            // Scene rotation
            switch_every_secs: 15,
            rotation_check_interval_ms: 1000,

            // Lifecycle
            run_for_secs: 4 * 60,

            // Telemetry
            telemetry_interval_secs: 5,
        }
    }
}

impl SystemConfig {
    /// Range-check the configuration. The process must not start with an
    /// invalid table, so this is called before any scene is built.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.frame_rate_fps == 0 || self.frame_rate_fps > 1000 {
            return Err(crate::error::Error::Config("frame_rate_fps must be 1–1000"));
        }
        // Scheduler deadlines are tracked in whole milliseconds; a frame
        // rate that leaves a remainder in 1000 / fps would silently render
        // at a different rate than configured.
        if 1000 % self.frame_rate_fps != 0 {
            return Err(crate::error::Error::Config(
                "frame_rate_fps must divide 1000 evenly",
            ));
        }
        if self.switch_every_secs == 0 {
            return Err(crate::error::Error::Config("switch_every_secs must be > 0"));
        }
        if self.rotation_check_interval_ms == 0 {
            return Err(crate::error::Error::Config(
                "rotation_check_interval_ms must be > 0",
            ));
        }
        if self.run_for_secs == 0 {
            return Err(crate::error::Error::Config("run_for_secs must be > 0"));
        }
        if self.telemetry_interval_secs == 0 {
            return Err(crate::error::Error::Config(
                "telemetry_interval_secs must be > 0",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_sane() {
        let c = SystemConfig::default();
        assert!(c.validate().is_ok());
        assert_eq!(c.frame_rate_fps, 25);
        assert_eq!(c.switch_every_secs, 15);
        assert_eq!(c.run_for_secs, 240);
    }

    #[test]
    fn serde_roundtrip() {
        let c = SystemConfig::default();
        let json = serde_json::to_string(&c).unwrap();
        let c2: SystemConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(c.frame_rate_fps, c2.frame_rate_fps);
        assert_eq!(c.switch_every_secs, c2.switch_every_secs);
        assert_eq!(c.telemetry_interval_secs, c2.telemetry_interval_secs);
    }

    #[test]
    fn zero_frame_rate_rejected() {
        let c = SystemConfig {
            frame_rate_fps: 0,
            ..SystemConfig::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn frame_rate_must_yield_a_whole_frame_period() {
        // 30 fps would tick every 33 ms, i.e. ~30.3 Hz.
        let c = SystemConfig {
            frame_rate_fps: 30,
            ..SystemConfig::default()
        };
        assert!(c.validate().is_err());

        for fps in [1, 10, 20, 25, 50, 100, 200, 500, 1000] {
            let c = SystemConfig {
                frame_rate_fps: fps,
                ..SystemConfig::default()
            };
            assert!(c.validate().is_ok(), "{fps} fps divides the ms grid");
        }
    }

    #[test]
    fn timing_ratios_make_sense() {
        let c = SystemConfig::default();
        assert!(
            1000 / c.frame_rate_fps < c.rotation_check_interval_ms,
            "frames should be shorter than the rotation check period"
        );
        assert!(
            c.switch_every_secs < c.run_for_secs,
            "at least one rotation must fit in the run"
        );
    }
}
