//! Deterministic sampling of ring elements from seeds
//!
//! Every sampler reads an XOF stream in whole rate-sized blocks, which
//! yields the same byte sequence as drawing a few bytes at a time. Rejection
//! loops are bounded by a block budget far above the expected need; running
//! out of budget is reported as [`Error::SamplingExhausted`] instead of
//! looping forever.

use crate::encoding::bit_unpack;
use crate::error::{check_length, Error, Result};
use crate::hash::{shake256_into, Shake128Stream, Shake256Stream};
use crate::ntt::{DsaRing, KemRing, RingModulus};
use crate::params::{dsa::DsaParams, N};
use crate::poly::{Domain, Poly, PolyMatrix, PolyVec};

/// SHAKE128 rate in bytes
const SHAKE128_RATE: usize = 168;

/// SHAKE256 rate in bytes
const SHAKE256_RATE: usize = 136;

/// XOF blocks a single rejection sampler may consume
const MAX_BLOCKS: usize = 64;

/// Bytes `sample_in_ball` may draw for positions
const MAX_BALL_DRAWS: usize = 64 * SHAKE256_RATE;

fn exhausted(sampler: &'static str) -> Error {
    tracing::warn!(sampler, "rejection sampling budget exhausted");
    Error::SamplingExhausted
}

/// SampleNTT: uniform element of T_q for ML-KEM from `ρ ‖ col ‖ row`
///
/// Each 3-byte chunk yields two 12-bit candidates, kept when below q.
pub fn sample_ntt(rho: &[u8; 32], col: u8, row: u8) -> Result<Poly<KemRing>> {
    let mut xof = Shake128Stream::absorb(&[rho, &[col, row]]);
    let mut coeffs = [0u32; N];
    let mut filled = 0;
    let mut block = [0u8; SHAKE128_RATE];

    for _ in 0..MAX_BLOCKS {
        xof.squeeze(&mut block);
        for chunk in block.chunks_exact(3) {
            let (b0, b1, b2) = (u32::from(chunk[0]), u32::from(chunk[1]), u32::from(chunk[2]));
            let d1 = b0 + 256 * (b1 % 16);
            let d2 = b1 / 16 + 16 * b2;
            for d in [d1, d2] {
                if d < KemRing::Q && filled < N {
                    coeffs[filled] = d;
                    filled += 1;
                }
            }
            if filled == N {
                return Ok(Poly::from_coeffs(coeffs, Domain::Transformed));
            }
        }
    }
    Err(exhausted("sample_ntt"))
}

/// RejNTTPoly: uniform element of T_q for ML-DSA from `ρ ‖ col ‖ row`
///
/// Each 3-byte chunk yields one 23-bit candidate (top bit cleared).
pub fn rej_ntt_poly(rho: &[u8; 32], col: u8, row: u8) -> Result<Poly<DsaRing>> {
    let mut xof = Shake128Stream::absorb(&[rho, &[col, row]]);
    let mut coeffs = [0u32; N];
    let mut filled = 0;
    let mut block = [0u8; SHAKE128_RATE];

    for _ in 0..MAX_BLOCKS {
        xof.squeeze(&mut block);
        for chunk in block.chunks_exact(3) {
            let z = u32::from(chunk[0])
                | (u32::from(chunk[1]) << 8)
                | (u32::from(chunk[2] & 0x7F) << 16);
            if z < DsaRing::Q {
                coeffs[filled] = z;
                filled += 1;
                if filled == N {
                    return Ok(Poly::from_coeffs(coeffs, Domain::Transformed));
                }
            }
        }
    }
    Err(exhausted("rej_ntt_poly"))
}

/// Rings whose public matrix is sampled uniformly from a seed
pub trait UniformSampler: RingModulus {
    /// Uniform transformed element seeded with `ρ ‖ col ‖ row`
    fn sample_uniform(rho: &[u8; 32], col: u8, row: u8) -> Result<Poly<Self>>;
}

impl UniformSampler for KemRing {
    fn sample_uniform(rho: &[u8; 32], col: u8, row: u8) -> Result<Poly<Self>> {
        sample_ntt(rho, col, row)
    }
}

impl UniformSampler for DsaRing {
    fn sample_uniform(rho: &[u8; 32], col: u8, row: u8) -> Result<Poly<Self>> {
        rej_ntt_poly(rho, col, row)
    }
}

/// ExpandA: `rows × cols` matrix in NTT form
///
/// Entry `(i, j)` is seeded with `ρ ‖ j ‖ i` (column byte first) in both
/// schemes. ML-KEM encryption reuses this matrix through
/// [`PolyMatrix::transpose_mul_vec`] rather than re-seeding with swapped
/// indices.
pub fn expand_a<M: UniformSampler>(rho: &[u8; 32], rows: usize, cols: usize) -> Result<PolyMatrix<M>> {
    let mut out = Vec::with_capacity(rows);
    for i in 0..rows {
        let row = (0..cols)
            .map(|j| M::sample_uniform(rho, j as u8, i as u8))
            .collect::<Result<Vec<_>>>()?;
        out.push(PolyVec::from_vec(row));
    }
    Ok(PolyMatrix::from_rows(out))
}

/// SamplePolyCBD_η: centered binomial element from `64·η` bytes
///
/// Coefficient `i` is the popcount of bits `[2iη, 2iη+η)` minus the
/// popcount of the next `η` bits. Never rejects.
pub fn sample_poly_cbd(bytes: &[u8], eta: usize) -> Result<Poly<KemRing>> {
    if !(2..=3).contains(&eta) {
        return Err(Error::InvalidParameter);
    }
    check_length("CBD input", bytes, 64 * eta)?;
    let bit = |b: usize| u32::from((bytes[b / 8] >> (b % 8)) & 1);
    let mut coeffs = [0u32; N];
    for (i, c) in coeffs.iter_mut().enumerate() {
        let base = 2 * i * eta;
        let x: u32 = (0..eta).map(|j| bit(base + j)).sum();
        let y: u32 = (0..eta).map(|j| bit(base + eta + j)).sum();
        *c = (x + KemRing::Q - y) % KemRing::Q;
    }
    Ok(Poly::from_coeffs(coeffs, Domain::Coefficient))
}

/// CBD element from `PRF_η(σ, nonce) = SHAKE256(σ ‖ nonce, 64η)`
pub fn sample_cbd_prf(sigma: &[u8; 32], nonce: u8, eta: usize) -> Result<Poly<KemRing>> {
    let mut buf = [0u8; 64 * 3];
    let buf = buf
        .get_mut(..64 * eta)
        .ok_or(Error::InvalidParameter)?;
    shake256_into(&[sigma, &[nonce]], buf);
    sample_poly_cbd(buf, eta)
}

fn coeff_from_half_byte(b: u8, eta: u32) -> Option<i32> {
    match eta {
        2 if b < 15 => Some(2 - i32::from(b % 5)),
        4 if b < 9 => Some(4 - i32::from(b)),
        _ => None,
    }
}

/// RejBoundedPoly: element with coefficients in `[-η, η]` from `ρ' ‖ LE16(nonce)`
pub fn rej_bounded_poly(rho_prime: &[u8; 64], nonce: u16, eta: u32) -> Result<Poly<DsaRing>> {
    if eta != 2 && eta != 4 {
        return Err(Error::InvalidParameter);
    }
    let mut xof = Shake256Stream::absorb(&[rho_prime, &nonce.to_le_bytes()]);
    let mut coeffs = [0i32; N];
    let mut filled = 0;
    let mut block = [0u8; SHAKE256_RATE];

    for _ in 0..MAX_BLOCKS {
        xof.squeeze(&mut block);
        for &z in block.iter() {
            for half in [z & 0x0F, z >> 4] {
                if filled < N {
                    if let Some(c) = coeff_from_half_byte(half, eta) {
                        coeffs[filled] = c;
                        filled += 1;
                    }
                }
            }
            if filled == N {
                return Ok(Poly::from_signed(&coeffs));
            }
        }
    }
    Err(exhausted("rej_bounded_poly"))
}

/// ExpandS: secret vectors `s1` (length l) and `s2` (length k)
pub fn expand_s(
    rho_prime: &[u8; 64],
    params: &DsaParams,
) -> Result<(PolyVec<DsaRing>, PolyVec<DsaRing>)> {
    let s1 = (0..params.l)
        .map(|r| rej_bounded_poly(rho_prime, r as u16, params.eta))
        .collect::<Result<Vec<_>>>()?;
    let s2 = (0..params.k)
        .map(|r| rej_bounded_poly(rho_prime, (r + params.l) as u16, params.eta))
        .collect::<Result<Vec<_>>>()?;
    Ok((PolyVec::from_vec(s1), PolyVec::from_vec(s2)))
}

/// ExpandMask: mask vector `y` with coefficients in `[-(γ1-1), γ1]`
///
/// `y[r]` unpacks `SHAKE256(ρ'' ‖ LE16(κ + r))`; no rejection. The caller
/// keeps `κ + l` below 2^16.
pub fn expand_mask(rho_pp: &[u8; 64], kappa: u16, params: &DsaParams) -> Result<PolyVec<DsaRing>> {
    let width = params.z_bits();
    let mut buf = vec![0u8; 32 * width];
    let mut polys = Vec::with_capacity(params.l);
    for r in 0..params.l {
        let counter = kappa.wrapping_add(r as u16);
        shake256_into(&[rho_pp, &counter.to_le_bytes()], &mut buf);
        let y = bit_unpack(&buf, params.gamma1 - 1, params.gamma1)?;
        polys.push(Poly::from_signed(&y));
    }
    Ok(PolyVec::from_vec(polys))
}

/// SampleInBall: challenge with exactly τ coefficients in {−1, +1}
///
/// The first 8 bytes of `SHAKE256(c̃)` are sign bits; positions are drawn
/// Fisher–Yates style, rejecting bytes greater than the current index.
pub fn sample_in_ball(c_tilde: &[u8], tau: usize) -> Result<Poly<DsaRing>> {
    if tau == 0 || tau > 64 {
        return Err(Error::InvalidParameter);
    }
    let mut xof = Shake256Stream::absorb(&[c_tilde]);
    let mut sign_bytes = [0u8; 8];
    xof.squeeze(&mut sign_bytes);
    let signs = u64::from_le_bytes(sign_bytes);

    let mut c = [0u32; N];
    let mut draws = 0;
    for (bit, i) in (N - tau..N).enumerate() {
        let j = loop {
            if draws == MAX_BALL_DRAWS {
                return Err(exhausted("sample_in_ball"));
            }
            draws += 1;
            let j = usize::from(xof.next_byte());
            if j <= i {
                break j;
            }
        };
        c[i] = c[j];
        c[j] = if (signs >> bit) & 1 == 0 {
            1
        } else {
            DsaRing::Q - 1
        };
    }
    Ok(Poly::from_coeffs(c, Domain::Coefficient))
}
