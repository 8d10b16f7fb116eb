//! Error types for post-quantum operations

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = core::result::Result<T, Error>;

/// Errors that can occur during post-quantum operations
///
/// Tampered signatures and mismatched KEM ciphertexts are not errors:
/// verification returns `Ok(false)` and decapsulation returns the implicit
/// rejection key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// A seed, key, ciphertext, signature or buffer has the wrong length
    #[error("invalid {what} length: expected {expected} bytes, got {actual}")]
    InvalidLength {
        /// What was being decoded
        what: &'static str,
        /// Length required by the parameter set
        expected: usize,
        /// Length actually supplied
        actual: usize,
    },

    /// Correctly sized input with malformed contents
    #[error("invalid encoding")]
    InvalidEncoding,

    /// Encapsulation key failed the modulus check
    #[error("encapsulation key is not canonically encoded")]
    InvalidEncapsulationKey,

    /// Decapsulation key failed the embedded hash check
    #[error("decapsulation key hash check failed")]
    InvalidDecapsulationKey,

    /// Invalid parameter
    #[error("invalid parameter")]
    InvalidParameter,

    /// Context string longer than 255 bytes
    #[error("context string too long: {len} bytes (max 255)")]
    ContextTooLong {
        /// Supplied context length
        len: usize,
    },

    /// A rejection sampler hit its draw limit
    #[error("rejection sampling exhausted")]
    SamplingExhausted,

    /// The signing loop hit its attempt limit
    #[error("signing aborted after {attempts} attempts")]
    SigningAttemptsExhausted {
        /// Attempts made before giving up
        attempts: u32,
    },

    /// Random number generator failure
    #[error("random number generator error")]
    RandomnessError,

    /// Algorithm name not recognised
    #[error("unknown algorithm")]
    UnknownAlgorithm,
}

impl Error {
    /// Length error helper
    pub(crate) fn length(what: &'static str, expected: usize, actual: usize) -> Self {
        Error::InvalidLength {
            what,
            expected,
            actual,
        }
    }
}

/// Check `bytes` has exactly `expected` bytes
pub(crate) fn check_length(what: &'static str, bytes: &[u8], expected: usize) -> Result<()> {
    if bytes.len() == expected {
        Ok(())
    } else {
        Err(Error::length(what, expected, bytes.len()))
    }
}
