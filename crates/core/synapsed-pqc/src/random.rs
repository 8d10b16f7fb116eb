//! Random number generation utilities
//!
//! [`DefaultRng`] reads the operating system source. [`RngWrapper`] adapts
//! any `rand_core` CSPRNG. [`TestRng`] is a deterministic generator for
//! tests and benchmarks and must never be used for real keys.

use crate::error::{Error, Result};
use crate::traits::SecureRandom;
use core::fmt;
use rand_core::{CryptoRng, RngCore};

/// Default RNG backed by the operating system
#[derive(Default)]
pub struct DefaultRng {
    _private: (),
}

impl SecureRandom for DefaultRng {
    fn fill_bytes(&mut self, dest: &mut [u8]) -> Result<()> {
        system_random_bytes(dest)
    }
}

impl fmt::Debug for DefaultRng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultRng")
            .field("inner", &"getrandom")
            .finish()
    }
}

/// Wrapper for any RngCore + CryptoRng
pub struct RngWrapper<R: RngCore + CryptoRng> {
    rng: R,
}

impl<R: RngCore + CryptoRng> RngWrapper<R> {
    /// Create a new RNG wrapper
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Recover the wrapped generator
    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl<R: RngCore + CryptoRng> SecureRandom for RngWrapper<R> {
    fn fill_bytes(&mut self, dest: &mut [u8]) -> Result<()> {
        self.rng.try_fill_bytes(dest).map_err(|err| {
            tracing::warn!(error = %err, "wrapped RNG failed");
            Error::RandomnessError
        })
    }
}

impl<R: RngCore + CryptoRng> fmt::Debug for RngWrapper<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RngWrapper")
            .field("rng", &"<RNG>")
            .finish()
    }
}

/// Fill `dest` from the system random number generator
///
/// # Errors
///
/// Returns [`Error::RandomnessError`] if the system source fails
pub fn system_random_bytes(dest: &mut [u8]) -> Result<()> {
    getrandom::getrandom(dest).map_err(|err| {
        tracing::warn!(error = %err, "system RNG failed");
        Error::RandomnessError
    })
}

/// Test RNG for deterministic testing
#[derive(Debug, Clone)]
pub struct TestRng {
    seed: u64,
}

impl TestRng {
    /// Create a new test RNG with the given seed
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl SecureRandom for TestRng {
    fn fill_bytes(&mut self, dest: &mut [u8]) -> Result<()> {
        // Simple LCG for deterministic testing
        for byte in dest {
            self.seed = self.seed.wrapping_mul(1664525).wrapping_add(1013904223);
            *byte = (self.seed >> 24) as u8;
        }
        Ok(())
    }
}
