//! High-level API for easy-to-use cryptographic operations
//!
//! This module provides byte-oriented functions for common operations without
//! needing to work with the typed parameter sets directly. Every call is
//! timed and recorded in [`crate::observability::global`].
//!
//! ## Security Levels
//!
//! - **Level 1**: ML-KEM-512, SLH-DSA-SHAKE-128s/128f
//! - **Level 2**: ML-DSA-44
//! - **Level 3**: ML-KEM-768, ML-DSA-65
//! - **Level 5**: ML-KEM-1024, ML-DSA-87
//!
//! ## Examples
//!
//! ### Key encapsulation
//! ```no_run
//! use synapsed_pqc::api::*;
//! use synapsed_pqc::random::DefaultRng;
//!
//! let mut rng = DefaultRng::default();
//! let (public_key, secret_key) = generate_keypair(KemAlgorithm::MlKem768, &mut rng)?;
//! let (ciphertext, shared_secret) = encapsulate(KemAlgorithm::MlKem768, &public_key, &mut rng)?;
//! let recovered = decapsulate(KemAlgorithm::MlKem768, secret_key.as_ref(), &ciphertext)?;
//! assert_eq!(shared_secret, recovered);
//! # Ok::<(), synapsed_pqc::Error>(())
//! ```
//!
//! ### Digital signatures
//! ```no_run
//! use synapsed_pqc::api::*;
//! use synapsed_pqc::random::DefaultRng;
//!
//! let mut rng = DefaultRng::default();
//! let (public_key, secret_key) =
//!     generate_signing_keypair(SignatureAlgorithm::MlDsa65, &mut rng)?;
//! let signature = sign(SignatureAlgorithm::MlDsa65, secret_key.as_ref(), b"msg", &mut rng)?;
//! assert!(verify(SignatureAlgorithm::MlDsa65, &public_key, b"msg", &signature)?);
//! # Ok::<(), synapsed_pqc::Error>(())
//! ```

use crate::dsa::{MlDsa44, MlDsa65, MlDsa87};
use crate::error::{Error, Result};
use crate::kem::{MlKem1024, MlKem512, MlKem768};
use crate::observability::{global, CryptoEvent};
use crate::secure_memory::SecureBytes;
use crate::slh::{SlhDsaShake128f, SlhDsaShake128s};
use crate::traits::{Kem, SecureRandom, Serializable, Signature};
use core::fmt;
use core::str::FromStr;
use std::time::Duration;

/// Algorithm identifiers for KEMs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum KemAlgorithm {
    /// ML-KEM-512 - NIST Level 1
    MlKem512,
    /// ML-KEM-768 - NIST Level 3
    MlKem768,
    /// ML-KEM-1024 - NIST Level 5
    MlKem1024,
}

macro_rules! dispatch_kem {
    ($alg:expr, $k:ident => $body:expr) => {
        match $alg {
            KemAlgorithm::MlKem512 => {
                type $k = MlKem512;
                $body
            }
            KemAlgorithm::MlKem768 => {
                type $k = MlKem768;
                $body
            }
            KemAlgorithm::MlKem1024 => {
                type $k = MlKem1024;
                $body
            }
        }
    };
}

impl KemAlgorithm {
    /// All supported KEMs
    pub const ALL: [KemAlgorithm; 3] = [Self::MlKem512, Self::MlKem768, Self::MlKem1024];

    /// Standard name, e.g. `ML-KEM-768`
    pub fn name(&self) -> &'static str {
        match self {
            Self::MlKem512 => "ML-KEM-512",
            Self::MlKem768 => "ML-KEM-768",
            Self::MlKem1024 => "ML-KEM-1024",
        }
    }

    /// Get the security level of this algorithm
    pub fn security_level(&self) -> u8 {
        match self {
            Self::MlKem512 => 1,
            Self::MlKem768 => 3,
            Self::MlKem1024 => 5,
        }
    }

    /// Get the public key size in bytes
    pub fn public_key_size(&self) -> usize {
        dispatch_kem!(self, K => <K as Kem>::PUBLIC_KEY_SIZE)
    }

    /// Get the secret key size in bytes
    pub fn secret_key_size(&self) -> usize {
        dispatch_kem!(self, K => <K as Kem>::SECRET_KEY_SIZE)
    }

    /// Get the ciphertext size in bytes
    pub fn ciphertext_size(&self) -> usize {
        dispatch_kem!(self, K => <K as Kem>::CIPHERTEXT_SIZE)
    }

    /// Get the shared secret size in bytes (always 32)
    pub fn shared_secret_size(&self) -> usize {
        32
    }
}

impl fmt::Display for KemAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for KemAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|alg| alg.name().eq_ignore_ascii_case(s))
            .ok_or(Error::UnknownAlgorithm)
    }
}

/// Algorithm identifiers for signatures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SignatureAlgorithm {
    /// ML-DSA-44 - NIST Level 2
    MlDsa44,
    /// ML-DSA-65 - NIST Level 3
    MlDsa65,
    /// ML-DSA-87 - NIST Level 5
    MlDsa87,
    /// SLH-DSA-SHAKE-128s - NIST Level 1, small signatures
    SlhDsaShake128s,
    /// SLH-DSA-SHAKE-128f - NIST Level 1, fast signing
    SlhDsaShake128f,
}

macro_rules! dispatch_signature {
    ($alg:expr, $s:ident => $body:expr) => {
        match $alg {
            SignatureAlgorithm::MlDsa44 => {
                type $s = MlDsa44;
                $body
            }
            SignatureAlgorithm::MlDsa65 => {
                type $s = MlDsa65;
                $body
            }
            SignatureAlgorithm::MlDsa87 => {
                type $s = MlDsa87;
                $body
            }
            SignatureAlgorithm::SlhDsaShake128s => {
                type $s = SlhDsaShake128s;
                $body
            }
            SignatureAlgorithm::SlhDsaShake128f => {
                type $s = SlhDsaShake128f;
                $body
            }
        }
    };
}

impl SignatureAlgorithm {
    /// All supported signature schemes
    pub const ALL: [SignatureAlgorithm; 5] = [
        Self::MlDsa44,
        Self::MlDsa65,
        Self::MlDsa87,
        Self::SlhDsaShake128s,
        Self::SlhDsaShake128f,
    ];

    /// Standard name, e.g. `ML-DSA-65`
    pub fn name(&self) -> &'static str {
        match self {
            Self::MlDsa44 => "ML-DSA-44",
            Self::MlDsa65 => "ML-DSA-65",
            Self::MlDsa87 => "ML-DSA-87",
            Self::SlhDsaShake128s => "SLH-DSA-SHAKE-128s",
            Self::SlhDsaShake128f => "SLH-DSA-SHAKE-128f",
        }
    }

    /// Get the security level of this algorithm
    pub fn security_level(&self) -> u8 {
        match self {
            Self::MlDsa44 => 2,
            Self::MlDsa65 => 3,
            Self::MlDsa87 => 5,
            Self::SlhDsaShake128s | Self::SlhDsaShake128f => 1,
        }
    }

    /// Get the public key size in bytes
    pub fn public_key_size(&self) -> usize {
        dispatch_signature!(self, S => <S as Signature>::PUBLIC_KEY_SIZE)
    }

    /// Get the secret key size in bytes
    pub fn secret_key_size(&self) -> usize {
        dispatch_signature!(self, S => <S as Signature>::SECRET_KEY_SIZE)
    }

    /// Get the signature size in bytes
    pub fn signature_size(&self) -> usize {
        dispatch_signature!(self, S => <S as Signature>::SIGNATURE_SIZE)
    }
}

impl fmt::Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for SignatureAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|alg| alg.name().eq_ignore_ascii_case(s))
            .ok_or(Error::UnknownAlgorithm)
    }
}

/// Time `op` and record its outcome
fn observed<T>(
    operation: &'static str,
    op: impl FnOnce() -> Result<T>,
    event: impl FnOnce(&T, Duration) -> CryptoEvent,
) -> Result<T> {
    let timer = global().start_operation(operation);
    match op() {
        Ok(value) => {
            timer.complete(|duration| event(&value, duration));
            Ok(value)
        }
        Err(err) => {
            timer.failed(err);
            Err(err)
        }
    }
}

fn kem_keypair<K: Kem, R: SecureRandom>(rng: &mut R) -> Result<(Vec<u8>, SecureBytes)> {
    let (pk, sk) = K::generate_keypair(rng)?;
    Ok((pk.as_ref().to_vec(), SecureBytes::from_slice(sk.as_ref())))
}

fn kem_encapsulate<K: Kem, R: SecureRandom>(
    public_key: &[u8],
    rng: &mut R,
) -> Result<(Vec<u8>, SecureBytes)>
where
    K::PublicKey: Serializable,
{
    let pk = <K::PublicKey as Serializable>::from_bytes(public_key)?;
    let (ct, ss) = K::encapsulate(&pk, rng)?;
    Ok((ct.as_ref().to_vec(), SecureBytes::from_slice(ss.as_ref())))
}

fn kem_decapsulate<K: Kem>(secret_key: &[u8], ciphertext: &[u8]) -> Result<SecureBytes>
where
    K::SecretKey: Serializable,
    K::Ciphertext: Serializable,
{
    let sk = <K::SecretKey as Serializable>::from_bytes(secret_key)?;
    let ct = <K::Ciphertext as Serializable>::from_bytes(ciphertext)?;
    let ss = K::decapsulate(&sk, &ct)?;
    Ok(SecureBytes::from_slice(ss.as_ref()))
}

/// Generate a keypair for the specified KEM algorithm
pub fn generate_keypair<R: SecureRandom>(
    algorithm: KemAlgorithm,
    rng: &mut R,
) -> Result<(Vec<u8>, SecureBytes)> {
    observed(
        "kem_keygen",
        || dispatch_kem!(algorithm, K => kem_keypair::<K, R>(rng)),
        |_, duration| CryptoEvent::KeyGenerated {
            algorithm: algorithm.name(),
            duration,
        },
    )
}

/// Encapsulate a shared secret for the given public key
pub fn encapsulate<R: SecureRandom>(
    algorithm: KemAlgorithm,
    public_key: &[u8],
    rng: &mut R,
) -> Result<(Vec<u8>, SecureBytes)> {
    observed(
        "encapsulate",
        || dispatch_kem!(algorithm, K => kem_encapsulate::<K, R>(public_key, rng)),
        |_, duration| CryptoEvent::Encapsulated {
            algorithm: algorithm.name(),
            duration,
        },
    )
}

/// Decapsulate a shared secret using the secret key
///
/// A well-formed ciphertext that was not produced for this key yields the
/// implicit rejection secret, not an error.
pub fn decapsulate(
    algorithm: KemAlgorithm,
    secret_key: &[u8],
    ciphertext: &[u8],
) -> Result<SecureBytes> {
    observed(
        "decapsulate",
        || dispatch_kem!(algorithm, K => kem_decapsulate::<K>(secret_key, ciphertext)),
        |_, duration| CryptoEvent::Decapsulated {
            algorithm: algorithm.name(),
            duration,
        },
    )
}

fn sig_keypair<S: Signature, R: SecureRandom>(rng: &mut R) -> Result<(Vec<u8>, SecureBytes)> {
    let (pk, sk) = S::generate_keypair(rng)?;
    Ok((pk.as_ref().to_vec(), SecureBytes::from_slice(sk.as_ref())))
}

fn sig_sign<S: Signature, R: SecureRandom>(
    secret_key: &[u8],
    message: &[u8],
    context: &[u8],
    rng: Option<&mut R>,
) -> Result<Vec<u8>>
where
    S::SecretKey: Serializable,
{
    let sk = <S::SecretKey as Serializable>::from_bytes(secret_key)?;
    let sig = match rng {
        Some(rng) => S::sign_with_context(&sk, message, context, rng)?,
        None => S::sign_deterministic_with_context(&sk, message, context)?,
    };
    Ok(sig.as_ref().to_vec())
}

fn sig_verify<S: Signature>(
    public_key: &[u8],
    message: &[u8],
    context: &[u8],
    signature: &[u8],
) -> Result<bool>
where
    S::PublicKey: Serializable,
    S::Sig: Serializable,
{
    let pk = <S::PublicKey as Serializable>::from_bytes(public_key)?;
    let sig = <S::Sig as Serializable>::from_bytes(signature)?;
    S::verify_with_context(&pk, message, context, &sig)
}

/// Generate a signing keypair for the specified signature algorithm
pub fn generate_signing_keypair<R: SecureRandom>(
    algorithm: SignatureAlgorithm,
    rng: &mut R,
) -> Result<(Vec<u8>, SecureBytes)> {
    observed(
        "signature_keygen",
        || dispatch_signature!(algorithm, S => sig_keypair::<S, R>(rng)),
        |_, duration| CryptoEvent::KeyGenerated {
            algorithm: algorithm.name(),
            duration,
        },
    )
}

/// Sign a message bound to `context` (hedged)
pub fn sign_with_context<R: SecureRandom>(
    algorithm: SignatureAlgorithm,
    secret_key: &[u8],
    message: &[u8],
    context: &[u8],
    rng: &mut R,
) -> Result<Vec<u8>> {
    observed(
        "sign",
        || dispatch_signature!(algorithm, S => sig_sign::<S, R>(secret_key, message, context, Some(rng))),
        |_, duration| CryptoEvent::Signed {
            algorithm: algorithm.name(),
            message_len: message.len(),
            duration,
        },
    )
}

/// Sign a message with the secret key and the empty context
pub fn sign<R: SecureRandom>(
    algorithm: SignatureAlgorithm,
    secret_key: &[u8],
    message: &[u8],
    rng: &mut R,
) -> Result<Vec<u8>> {
    sign_with_context(algorithm, secret_key, message, &[], rng)
}

/// Sign a message deterministically (no randomness)
pub fn sign_deterministic(
    algorithm: SignatureAlgorithm,
    secret_key: &[u8],
    message: &[u8],
) -> Result<Vec<u8>> {
    observed(
        "sign",
        || {
            dispatch_signature!(algorithm, S => {
                sig_sign::<S, crate::random::DefaultRng>(secret_key, message, &[], None)
            })
        },
        |_, duration| CryptoEvent::Signed {
            algorithm: algorithm.name(),
            message_len: message.len(),
            duration,
        },
    )
}

/// Verify a signature bound to `context`
///
/// Malformed key or signature lengths are errors; a signature that does not
/// verify is `Ok(false)`.
pub fn verify_with_context(
    algorithm: SignatureAlgorithm,
    public_key: &[u8],
    message: &[u8],
    context: &[u8],
    signature: &[u8],
) -> Result<bool> {
    observed(
        "verify",
        || dispatch_signature!(algorithm, S => sig_verify::<S>(public_key, message, context, signature)),
        |&valid, duration| CryptoEvent::Verified {
            algorithm: algorithm.name(),
            valid,
            duration,
        },
    )
}

/// Verify a signature with the public key and the empty context
pub fn verify(
    algorithm: SignatureAlgorithm,
    public_key: &[u8],
    message: &[u8],
    signature: &[u8],
) -> Result<bool> {
    verify_with_context(algorithm, public_key, message, &[], signature)
}

/// Unified algorithm enum for both KEM and signatures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Algorithm {
    /// Key Encapsulation Mechanism
    Kem(KemAlgorithm),
    /// Digital Signature
    Signature(SignatureAlgorithm),
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Kem(alg) => alg.fmt(f),
            Self::Signature(alg) => alg.fmt(f),
        }
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        s.parse()
            .map(Algorithm::Kem)
            .or_else(|_| s.parse().map(Algorithm::Signature))
    }
}

/// Key pair structure for easier key management
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPair {
    /// The public key bytes
    pub public_key: Vec<u8>,
    /// The secret key bytes
    pub secret_key: SecureBytes,
    /// The algorithm used
    pub algorithm: Algorithm,
}

impl KeyPair {
    /// Generate a new keypair
    pub fn generate<R: SecureRandom>(algorithm: Algorithm, rng: &mut R) -> Result<Self> {
        let (public_key, secret_key) = match algorithm {
            Algorithm::Kem(alg) => generate_keypair(alg, rng)?,
            Algorithm::Signature(alg) => generate_signing_keypair(alg, rng)?,
        };
        Ok(KeyPair {
            public_key,
            secret_key,
            algorithm,
        })
    }

    /// Get the public key bytes
    pub fn public_key(&self) -> &[u8] {
        &self.public_key
    }

    /// Get the secret key bytes
    pub fn secret_key(&self) -> &[u8] {
        self.secret_key.as_ref()
    }

    /// Public key as lowercase hex
    pub fn public_key_hex(&self) -> String {
        hex::encode(&self.public_key)
    }
}

/// Recommended algorithm selection based on security requirements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityLevel {
    /// Good for most applications (Level 1-2)
    Standard,
    /// Higher security (Level 3)
    High,
    /// Maximum security (Level 5)
    VeryHigh,
}

impl SecurityLevel {
    /// Get recommended KEM algorithm for this security level
    pub fn recommended_kem(&self) -> KemAlgorithm {
        match self {
            Self::Standard => KemAlgorithm::MlKem512,
            Self::High => KemAlgorithm::MlKem768,
            Self::VeryHigh => KemAlgorithm::MlKem1024,
        }
    }

    /// Get recommended signature algorithm for this security level
    pub fn recommended_signature(&self) -> SignatureAlgorithm {
        match self {
            Self::Standard => SignatureAlgorithm::MlDsa44,
            Self::High => SignatureAlgorithm::MlDsa65,
            Self::VeryHigh => SignatureAlgorithm::MlDsa87,
        }
    }
}
