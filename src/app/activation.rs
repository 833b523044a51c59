//! Three-state activation token persisted across power cycles.
//!
//! The token decides at boot whether the ornament lights up or goes back
//! to sleep. One unplugged boot runs the show and leaves `Sleep` behind;
//! the next unplugged boot finds `Sleep` and stays dark until a human
//! plugs the board in (writes are disabled on USB power, so a powered
//! boot can flip the token back without the halt path overwriting it).

/// Stored activation token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActivationState {
    /// No readable token: first boot, corrupt file, or unrecognised text.
    #[default]
    Unknown,
    /// The next battery boot should run the light show.
    Active,
    /// The show already ran; stay dark on battery.
    Sleep,
}

impl ActivationState {
    /// Token text as written to storage.
    pub fn as_token(self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::Active => "ACTIVE",
            Self::Sleep => "SLEEP",
        }
    }

    /// Parse stored text. Anything unrecognised is `Unknown` — a corrupt
    /// store degrades to the first-boot path rather than failing.
    pub fn from_token(text: &str) -> Self {
        match text.trim() {
            "ACTIVE" => Self::Active,
            "SLEEP" => Self::Sleep,
            _ => Self::Unknown,
        }
    }
}

impl core::fmt::Display for ActivationState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_token())
    }
}
