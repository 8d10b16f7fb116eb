//! SHAKE instantiation of the SLH-DSA hash functions (FIPS 205 §11.1)
//!
//! `PRF`, `F`, `H` and `T_l` are all `SHAKE256(PK.seed ‖ ADRS ‖ input, 8n)`;
//! they differ only in their input.

use super::address::Address;
use crate::error::{Error, Result};
use crate::hash::{shake256, Shake256Stream};

/// Tweakable hash keyed by the public seed
#[derive(Debug, Clone, Copy)]
pub struct Tweak<'a> {
    n: usize,
    pk_seed: &'a [u8],
}

impl<'a> Tweak<'a> {
    /// Hash context for output length `n` and public seed `pk_seed`
    pub fn new(n: usize, pk_seed: &'a [u8]) -> Self {
        Self { n, pk_seed }
    }

    /// Output length in bytes
    pub fn n(&self) -> usize {
        self.n
    }

    /// `PRF(PK.seed, SK.seed, ADRS)`
    pub fn prf(&self, adrs: &Address, sk_seed: &[u8]) -> Vec<u8> {
        shake256(&[self.pk_seed, &adrs.to_bytes(), sk_seed], self.n)
    }

    /// `F(PK.seed, ADRS, M)` on one n-byte block
    pub fn f(&self, adrs: &Address, m: &[u8]) -> Vec<u8> {
        shake256(&[self.pk_seed, &adrs.to_bytes(), m], self.n)
    }

    /// `H(PK.seed, ADRS, left ‖ right)`
    pub fn h(&self, adrs: &Address, left: &[u8], right: &[u8]) -> Vec<u8> {
        shake256(&[self.pk_seed, &adrs.to_bytes(), left, right], self.n)
    }

    /// `T_l(PK.seed, ADRS, M)` over the concatenation of `blocks`
    pub fn t<B: AsRef<[u8]>>(&self, adrs: &Address, blocks: &[B]) -> Vec<u8> {
        let adrs_bytes = adrs.to_bytes();
        let mut parts: Vec<&[u8]> = Vec::with_capacity(blocks.len() + 2);
        parts.push(self.pk_seed);
        parts.push(&adrs_bytes);
        parts.extend(blocks.iter().map(AsRef::as_ref));
        let mut out = vec![0u8; self.n];
        Shake256Stream::absorb(&parts).squeeze(&mut out);
        out
    }
}

/// `PRF_msg(SK.prf, opt_rand, M)`: per-signature randomizer R
pub fn prf_msg(sk_prf: &[u8], opt_rand: &[u8], m: &[u8], n: usize) -> Vec<u8> {
    shake256(&[sk_prf, opt_rand, m], n)
}

/// `H_msg(R, PK.seed, PK.root, M)`: message digest of `len` bytes
pub fn h_msg(r: &[u8], pk_seed: &[u8], pk_root: &[u8], m: &[u8], len: usize) -> Vec<u8> {
    shake256(&[r, pk_seed, pk_root, m], len)
}

/// Split `x` into `out_len` big-endian `b`-bit digits
pub fn base_2b(x: &[u8], b: usize, out_len: usize) -> Result<Vec<u32>> {
    if x.len() * 8 < b * out_len || b == 0 || b > 24 {
        return Err(Error::InvalidParameter);
    }
    let mut digits = Vec::with_capacity(out_len);
    let mut bytes = x.iter();
    let mut total: u64 = 0;
    let mut bits = 0;
    for _ in 0..out_len {
        while bits < b {
            let next = bytes.next().copied().unwrap_or(0);
            total = (total << 8) | u64::from(next);
            bits += 8;
        }
        bits -= b;
        digits.push(((total >> bits) & ((1 << b) - 1)) as u32);
        total &= (1 << bits) - 1;
    }
    Ok(digits)
}

/// Big-endian integer from at most 8 bytes
pub fn to_int(x: &[u8]) -> u64 {
    x.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b))
}
