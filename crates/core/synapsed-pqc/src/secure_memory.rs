//! Secure memory handling for key material
//!
//! Secret keys, seeds and shared secrets live in these wrappers so they are
//! wiped when dropped and never printed by `Debug`.

use crate::constant_time::ct_eq;
use crate::error::Result;
use crate::traits::SecureRandom;
use core::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Heap buffer for variable-length secrets (decapsulation and signing keys)
#[derive(Clone)]
pub struct SecureBytes {
    data: Vec<u8>,
}

impl SecureBytes {
    /// Take ownership of `data`
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Copy a secret out of a borrowed slice
    pub fn from_slice(data: &[u8]) -> Self {
        Self {
            data: data.to_vec(),
        }
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Append bytes
    pub fn extend_from_slice(&mut self, slice: &[u8]) {
        self.data.extend_from_slice(slice);
    }
}

impl Zeroize for SecureBytes {
    fn zeroize(&mut self) {
        self.data.zeroize();
    }
}

impl Drop for SecureBytes {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl ZeroizeOnDrop for SecureBytes {}

impl PartialEq for SecureBytes {
    fn eq(&self, other: &Self) -> bool {
        ct_eq(&self.data, &other.data).into()
    }
}

impl Eq for SecureBytes {}

impl fmt::Debug for SecureBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecureBytes")
            .field("len", &self.data.len())
            .field("data", &"[REDACTED]")
            .finish()
    }
}

impl AsRef<[u8]> for SecureBytes {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

/// Fixed-size secret such as a 32-byte seed or shared secret
#[derive(Clone)]
pub struct SecureArray<const N: usize> {
    data: [u8; N],
}

impl<const N: usize> SecureArray<N> {
    /// Wrap an existing array
    pub fn new(data: [u8; N]) -> Self {
        Self { data }
    }

    /// All-zero array
    pub fn zero() -> Self {
        Self { data: [0u8; N] }
    }

    /// Fresh array from `rng`
    pub fn random<R: SecureRandom>(rng: &mut R) -> Result<Self> {
        let mut out = Self::zero();
        rng.fill_bytes(&mut out.data)?;
        Ok(out)
    }

    /// Borrow the array
    pub fn expose(&self) -> &[u8; N] {
        &self.data
    }
}

impl<const N: usize> Zeroize for SecureArray<N> {
    fn zeroize(&mut self) {
        self.data.zeroize();
    }
}

impl<const N: usize> Drop for SecureArray<N> {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl<const N: usize> ZeroizeOnDrop for SecureArray<N> {}

impl<const N: usize> PartialEq for SecureArray<N> {
    fn eq(&self, other: &Self) -> bool {
        ct_eq(&self.data, &other.data).into()
    }
}

impl<const N: usize> Eq for SecureArray<N> {}

impl<const N: usize> fmt::Debug for SecureArray<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecureArray")
            .field("size", &N)
            .field("data", &"[REDACTED]")
            .finish()
    }
}

impl<const N: usize> AsRef<[u8]> for SecureArray<N> {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}
