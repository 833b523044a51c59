//! Small deterministic PRNG for flicker-level generation.
//!
//! The flicker animation draws its target levels once at construction and
//! never again, so a tiny xorshift64* stream is plenty. Seeding is
//! platform-split:
//!
//! - **ESP-IDF** — `esp_fill_random` (hardware RNG).
//! - **host/test** — `RandomState` hasher entropy, or an explicit seed for
//!   reproducible tests.

/// xorshift64* generator. Not cryptographic; decorative use only.
#[derive(Debug, Clone)]
pub struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    /// Construct from an explicit seed. A zero seed is remapped because
    /// xorshift has a fixed point at zero.
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { 0x9E37_79B9_7F4A_7C15 } else { seed },
        }
    }

    /// Construct from platform entropy.
    pub fn from_entropy() -> Self {
        Self::new(entropy_seed())
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545_F491_4F6C_DD1D)
    }

    /// Uniform sample in `[0, 1)`.
    pub fn next_f32(&mut self) -> f32 {
        // Top 24 bits — the full f32 mantissa width.
        (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32
    }
}

/// Read a 64-bit seed from the hardware RNG.
#[cfg(target_os = "espidf")]
fn entropy_seed() -> u64 {
    let mut buf = [0u8; 8];
    // SAFETY: esp_fill_random writes to the provided buffer using the
    // hardware RNG. Buffer is valid and exclusively owned.
    unsafe {
        esp_idf_svc::sys::esp_fill_random(buf.as_mut_ptr().cast(), buf.len());
    }
    u64::from_le_bytes(buf)
}

/// Simulation stub — uses `RandomState` to produce non-cryptographic entropy.
#[cfg(not(target_os = "espidf"))]
fn entropy_seed() -> u64 {
    use std::collections::hash_map::RandomState;
    use std::hash::{BuildHasher, Hasher};

    RandomState::new().build_hasher().finish()
}
