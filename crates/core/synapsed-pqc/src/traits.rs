//! Core traits for post-quantum operations
//!
//! Every scheme in this crate is reachable through one of two traits:
//! [`Kem`] for ML-KEM and [`Signature`] for ML-DSA and SLH-DSA. Randomness
//! is always supplied by the caller through [`SecureRandom`].

use crate::error::{Error, Result};
use core::fmt::Debug;
use zeroize::Zeroize;

/// Trait for Key Encapsulation Mechanisms (KEMs)
pub trait Kem: Debug + Send + Sync {
    /// Type representing a public (encapsulation) key
    type PublicKey: AsRef<[u8]> + Debug + Clone + PartialEq + Eq;

    /// Type representing a secret (decapsulation) key
    type SecretKey: AsRef<[u8]> + Debug + Clone + Zeroize;

    /// Type representing a ciphertext
    type Ciphertext: AsRef<[u8]> + Debug + Clone + PartialEq + Eq;

    /// Type representing a shared secret
    type SharedSecret: AsRef<[u8]> + Debug + Clone + Zeroize + PartialEq;

    /// The size of public keys in bytes
    const PUBLIC_KEY_SIZE: usize;

    /// The size of secret keys in bytes
    const SECRET_KEY_SIZE: usize;

    /// The size of ciphertexts in bytes
    const CIPHERTEXT_SIZE: usize;

    /// The size of shared secrets in bytes
    const SHARED_SECRET_SIZE: usize;

    /// Generate a new keypair
    fn generate_keypair<R: SecureRandom>(
        rng: &mut R,
    ) -> Result<(Self::PublicKey, Self::SecretKey)>;

    /// Encapsulate a shared secret for the given public key
    fn encapsulate<R: SecureRandom>(
        public_key: &Self::PublicKey,
        rng: &mut R,
    ) -> Result<(Self::Ciphertext, Self::SharedSecret)>;

    /// Decapsulate a shared secret using the secret key
    ///
    /// A ciphertext that does not re-encrypt correctly yields the implicit
    /// rejection key, not an error.
    fn decapsulate(
        secret_key: &Self::SecretKey,
        ciphertext: &Self::Ciphertext,
    ) -> Result<Self::SharedSecret>;
}

/// Trait for Digital Signature Algorithms
///
/// The plain `sign`/`verify` methods use the empty context string.
pub trait Signature: Debug + Send + Sync {
    /// Type representing a public key
    type PublicKey: AsRef<[u8]> + Debug + Clone + PartialEq + Eq;

    /// Type representing a secret key
    type SecretKey: AsRef<[u8]> + Debug + Clone + Zeroize;

    /// Type representing a signature
    type Sig: AsRef<[u8]> + Debug + Clone + PartialEq + Eq;

    /// The size of public keys in bytes
    const PUBLIC_KEY_SIZE: usize;

    /// The size of secret keys in bytes
    const SECRET_KEY_SIZE: usize;

    /// The size of signatures in bytes
    const SIGNATURE_SIZE: usize;

    /// Generate a new keypair
    fn generate_keypair<R: SecureRandom>(
        rng: &mut R,
    ) -> Result<(Self::PublicKey, Self::SecretKey)>;

    /// Sign a message bound to a context string (hedged)
    fn sign_with_context<R: SecureRandom>(
        secret_key: &Self::SecretKey,
        message: &[u8],
        context: &[u8],
        rng: &mut R,
    ) -> Result<Self::Sig>;

    /// Sign a message bound to a context string without fresh randomness
    fn sign_deterministic_with_context(
        secret_key: &Self::SecretKey,
        message: &[u8],
        context: &[u8],
    ) -> Result<Self::Sig>;

    /// Verify a signature bound to a context string
    fn verify_with_context(
        public_key: &Self::PublicKey,
        message: &[u8],
        context: &[u8],
        signature: &Self::Sig,
    ) -> Result<bool>;

    /// Sign a message with the secret key
    fn sign<R: SecureRandom>(
        secret_key: &Self::SecretKey,
        message: &[u8],
        rng: &mut R,
    ) -> Result<Self::Sig> {
        Self::sign_with_context(secret_key, message, &[], rng)
    }

    /// Sign a message deterministically (no randomness)
    fn sign_deterministic(secret_key: &Self::SecretKey, message: &[u8]) -> Result<Self::Sig> {
        Self::sign_deterministic_with_context(secret_key, message, &[])
    }

    /// Verify a signature with the public key
    fn verify(
        public_key: &Self::PublicKey,
        message: &[u8],
        signature: &Self::Sig,
    ) -> Result<bool> {
        Self::verify_with_context(public_key, message, &[], signature)
    }
}

/// Trait for secure random number generation
///
/// Failure of the underlying source is reported, never papered over.
pub trait SecureRandom {
    /// Fill the given buffer with random bytes
    fn fill_bytes(&mut self, dest: &mut [u8]) -> Result<()>;

    /// Generate a random u32
    fn next_u32(&mut self) -> Result<u32> {
        let mut buf = [0u8; 4];
        self.fill_bytes(&mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }

    /// Generate a random u64
    fn next_u64(&mut self) -> Result<u64> {
        let mut buf = [0u8; 8];
        self.fill_bytes(&mut buf)?;
        Ok(u64::from_le_bytes(buf))
    }

    /// Draw a fixed-size array
    fn random_array<const L: usize>(&mut self) -> Result<[u8; L]> {
        let mut buf = [0u8; L];
        self.fill_bytes(&mut buf)?;
        Ok(buf)
    }
}

impl<R: SecureRandom + ?Sized> SecureRandom for &mut R {
    fn fill_bytes(&mut self, dest: &mut [u8]) -> Result<()> {
        (**self).fill_bytes(dest)
    }
}

/// Trait for types that can be serialized to/from bytes
pub trait Serializable: Sized {
    /// Serialize to bytes
    fn to_bytes(&self) -> Vec<u8>;

    /// Deserialize from bytes
    fn from_bytes(bytes: &[u8]) -> Result<Self>;
}

/// Trait for types that can be encoded/decoded to/from hex
pub trait HexEncodable: Serializable {
    /// Encode to hexadecimal string
    fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Decode from hexadecimal string
    fn from_hex(hex_str: &str) -> Result<Self> {
        let bytes = hex::decode(hex_str).map_err(|_| Error::InvalidEncoding)?;
        Self::from_bytes(&bytes)
    }
}

impl<T: Serializable> HexEncodable for T {}
