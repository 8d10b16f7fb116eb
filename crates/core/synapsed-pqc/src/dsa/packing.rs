//! ML-DSA key and signature encodings (FIPS 204 §7.2)

use crate::encoding::{
    bit_pack, bit_unpack, hint_bit_pack, hint_bit_unpack, simple_bit_pack, simple_bit_unpack, Hint,
};
use crate::error::{check_length, Error, Result};
use crate::ntt::DsaRing;
use crate::params::dsa::{DsaParams, D};
use crate::params::{N, SYMBYTES};
use crate::poly::{Domain, Poly, PolyVec};
use crate::secure_memory::SecureBytes;
use zeroize::{Zeroize, Zeroizing};

/// Length of `tr`
pub const TR_BYTES: usize = 64;

/// Largest t1 coefficient
const T1_MAX: u32 = (1 << 10) - 1;

/// t0 packing bounds `[-(2^12 - 1), 2^12]`
const T0_LOW: u32 = (1 << (D - 1)) - 1;
const T0_HIGH: u32 = 1 << (D - 1);

/// Centered coefficients of a coefficient-domain element
pub fn signed_coeffs(p: &Poly<DsaRing>) -> [i32; N] {
    let mut out = [0i32; N];
    for (i, o) in out.iter_mut().enumerate() {
        *o = p.centered(i);
    }
    out
}

fn unpack_vec(
    bytes: &[u8],
    count: usize,
    unpack: impl Fn(&[u8]) -> Result<[i32; N]>,
) -> Result<PolyVec<DsaRing>> {
    let width = bytes.len() / count;
    let polys = bytes
        .chunks_exact(width)
        .map(|chunk| Ok(Poly::from_signed(&unpack(chunk)?)))
        .collect::<Result<Vec<_>>>()?;
    Ok(PolyVec::from_vec(polys))
}

/// pkEncode: `ρ ‖ SimpleBitPack(t1, 2^10 - 1)`
pub fn pk_encode(rho: &[u8; 32], t1: &PolyVec<DsaRing>) -> Vec<u8> {
    let mut pk = rho.to_vec();
    for p in t1.iter() {
        pk.extend_from_slice(&simple_bit_pack(p.coeffs(), T1_MAX));
    }
    pk
}

/// pkDecode: inverse of [`pk_encode`]
pub fn pk_decode(pk: &[u8], params: &DsaParams) -> Result<([u8; 32], PolyVec<DsaRing>)> {
    check_length("ML-DSA public key", pk, params.pk_len())?;
    let mut rho = [0u8; SYMBYTES];
    rho.copy_from_slice(&pk[..SYMBYTES]);
    let t1 = pk[SYMBYTES..]
        .chunks_exact(32 * params.t1_bits())
        .map(|chunk| {
            let coeffs = simple_bit_unpack(chunk, T1_MAX)?;
            Ok(Poly::from_coeffs(coeffs, Domain::Coefficient))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok((rho, PolyVec::from_vec(t1)))
}

/// Decoded ML-DSA signing key
pub struct DecodedSigningKey {
    /// Public matrix seed
    pub rho: [u8; 32],
    /// Signing seed K
    pub key: Zeroizing<[u8; 32]>,
    /// Public key hash
    pub tr: [u8; TR_BYTES],
    /// Secret vector s1
    pub s1: PolyVec<DsaRing>,
    /// Secret vector s2
    pub s2: PolyVec<DsaRing>,
    /// Low part of t
    pub t0: PolyVec<DsaRing>,
}

impl Drop for DecodedSigningKey {
    fn drop(&mut self) {
        self.s1.zeroize();
        self.s2.zeroize();
        self.t0.zeroize();
    }
}

impl core::fmt::Debug for DecodedSigningKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DecodedSigningKey")
            .field("rho", &hex::encode(self.rho))
            .field("secrets", &"[REDACTED]")
            .finish()
    }
}

/// skEncode: `ρ ‖ K ‖ tr ‖ BitPack(s1) ‖ BitPack(s2) ‖ BitPack(t0)`
pub fn sk_encode(
    rho: &[u8; 32],
    key: &[u8; 32],
    tr: &[u8; TR_BYTES],
    s1: &PolyVec<DsaRing>,
    s2: &PolyVec<DsaRing>,
    t0: &PolyVec<DsaRing>,
    params: &DsaParams,
) -> SecureBytes {
    let mut sk = SecureBytes::new(Vec::with_capacity(params.sk_len()));
    sk.extend_from_slice(rho);
    sk.extend_from_slice(key);
    sk.extend_from_slice(tr);
    for p in s1.iter().chain(s2.iter()) {
        let mut packed = bit_pack(&signed_coeffs(p), params.eta, params.eta);
        sk.extend_from_slice(&packed);
        packed.zeroize();
    }
    for p in t0.iter() {
        let mut packed = bit_pack(&signed_coeffs(p), T0_LOW, T0_HIGH);
        sk.extend_from_slice(&packed);
        packed.zeroize();
    }
    sk
}

/// skDecode: inverse of [`sk_encode`]
///
/// Secret coefficients outside `[-η, η]` are rejected with
/// [`Error::InvalidEncoding`].
pub fn sk_decode(sk: &[u8], params: &DsaParams) -> Result<DecodedSigningKey> {
    check_length("ML-DSA signing key", sk, params.sk_len())?;
    let (head, rest) = sk.split_at(2 * SYMBYTES + TR_BYTES);
    let eta_len = 32 * params.eta_bits();
    let (s1_bytes, rest) = rest.split_at(params.l * eta_len);
    let (s2_bytes, t0_bytes) = rest.split_at(params.k * eta_len);

    let eta = params.eta;
    let unpack_eta = |chunk: &[u8]| {
        let w = bit_unpack(chunk, eta, eta)?;
        if w.iter().all(|&c| c >= -(eta as i32)) {
            Ok(w)
        } else {
            Err(Error::InvalidEncoding)
        }
    };
    let s1 = unpack_vec(s1_bytes, params.l, unpack_eta)?;
    let s2 = unpack_vec(s2_bytes, params.k, unpack_eta)?;
    let t0 = unpack_vec(t0_bytes, params.k, |chunk| bit_unpack(chunk, T0_LOW, T0_HIGH))?;

    let mut rho = [0u8; 32];
    let mut key = Zeroizing::new([0u8; 32]);
    let mut tr = [0u8; TR_BYTES];
    rho.copy_from_slice(&head[..32]);
    key.copy_from_slice(&head[32..64]);
    tr.copy_from_slice(&head[64..]);
    Ok(DecodedSigningKey {
        rho,
        key,
        tr,
        s1,
        s2,
        t0,
    })
}

/// sigEncode: `c̃ ‖ BitPack(z, γ1 - 1, γ1) ‖ HintBitPack(h)`
pub fn sig_encode(
    c_tilde: &[u8],
    z: &PolyVec<DsaRing>,
    h: &[[bool; N]],
    params: &DsaParams,
) -> Result<Vec<u8>> {
    let mut sig = Vec::with_capacity(params.sig_len());
    sig.extend_from_slice(c_tilde);
    for p in z.iter() {
        sig.extend_from_slice(&bit_pack(&signed_coeffs(p), params.gamma1 - 1, params.gamma1));
    }
    sig.extend_from_slice(&hint_bit_pack(h, params.omega)?);
    Ok(sig)
}

/// Decoded signature parts
#[derive(Debug)]
pub struct DecodedSignature {
    /// Commitment hash
    pub c_tilde: Vec<u8>,
    /// Response vector
    pub z: PolyVec<DsaRing>,
    /// Hint
    pub h: Hint,
}

/// sigDecode: inverse of [`sig_encode`]
///
/// A wrong length is an error; a malformed hint gives `Ok(None)`.
pub fn sig_decode(sig: &[u8], params: &DsaParams) -> Result<Option<DecodedSignature>> {
    check_length("ML-DSA signature", sig, params.sig_len())?;
    let (c_tilde, rest) = sig.split_at(params.c_tilde_len());
    let (z_bytes, h_bytes) = rest.split_at(32 * params.l * params.z_bits());
    let (g1, g) = (params.gamma1 - 1, params.gamma1);
    let z = unpack_vec(z_bytes, params.l, |chunk| bit_unpack(chunk, g1, g))?;
    Ok(hint_bit_unpack(h_bytes, params.k, params.omega).map(|h| DecodedSignature {
        c_tilde: c_tilde.to_vec(),
        z,
        h,
    }))
}

/// w1Encode: `SimpleBitPack(w1, (q-1)/(2γ2) - 1)` for each element
pub fn w1_encode(w1: &PolyVec<DsaRing>, params: &DsaParams) -> Vec<u8> {
    let mut out = Vec::with_capacity(32 * params.k * params.w1_bits());
    for p in w1.iter() {
        out.extend_from_slice(&simple_bit_pack(p.coeffs(), params.w1_max()));
    }
    out
}
