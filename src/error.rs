//! Unified error types for the INFINITREE firmware.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! top-level error handling uniform. All variants are `Copy` so they can be
//! passed around freely without allocation.
//!
//! The scheduler's halt signal is *not* an error — it is an ordinary
//! [`TaskOutcome`](crate::scheduler::TaskOutcome) value. Only real failures
//! travel through this type.

use core::fmt;

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The hardcoded animation table is invalid (fatal at construction).
    Config(&'static str),
    /// Peripheral initialisation failed.
    Init(&'static str),
    /// Durable storage could not be written.
    Storage(StorageError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Storage(e) => write!(f, "storage: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Storage errors
// ---------------------------------------------------------------------------

/// Errors from [`StatePort`](crate::app::ports::StatePort) writes.
///
/// Reads never fail: an absent or unreadable token is reported as
/// `ActivationState::Unknown`, which is a value, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// The backing medium rejected the write.
    WriteFailed,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WriteFailed => write!(f, "write failed"),
        }
    }
}

impl From<StorageError> for Error {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
