//! K-PKE: the CPA-secure encryption scheme underneath ML-KEM
//!
//! All three routines are pure functions of their inputs. Keys travel as
//! byte strings in their FIPS 203 encodings.

use crate::encoding::{byte_decode, byte_encode, compress, decompress};
use crate::error::{check_length, Result};
use crate::hash::sha3_512;
use crate::ntt::KemRing;
use crate::params::{kem::KemParams, N, SYMBYTES};
use crate::poly::{Domain, Poly, PolyVec};
use crate::sampling::{expand_a, sample_cbd_prf};
use zeroize::Zeroizing;

/// Sample `count` CBD elements, advancing the shared nonce counter
fn sample_noise(
    sigma: &[u8; 32],
    nonce: &mut u8,
    count: usize,
    eta: usize,
) -> Result<PolyVec<KemRing>> {
    let mut polys = Vec::with_capacity(count);
    for _ in 0..count {
        polys.push(sample_cbd_prf(sigma, *nonce, eta)?);
        *nonce += 1;
    }
    Ok(PolyVec::from_vec(polys))
}

fn encode_vec(v: &PolyVec<KemRing>, d: usize) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(32 * d * v.len());
    for p in v.iter() {
        out.extend_from_slice(&byte_encode(p.coeffs(), d)?);
    }
    Ok(out)
}

fn decode_vec(bytes: &[u8], d: usize, domain: Domain) -> Result<PolyVec<KemRing>> {
    let polys = bytes
        .chunks_exact(32 * d)
        .map(|chunk| Ok(Poly::from_coeffs(byte_decode(chunk, d)?, domain)))
        .collect::<Result<Vec<_>>>()?;
    Ok(PolyVec::from_vec(polys))
}

fn compress_poly(p: &Poly<KemRing>, d: usize) -> [u32; N] {
    let mut out = [0u32; N];
    for (o, &c) in out.iter_mut().zip(p.coeffs()) {
        *o = compress(c, d);
    }
    out
}

fn decompress_poly(values: &[u32; N], d: usize) -> Poly<KemRing> {
    let mut out = [0u32; N];
    for (o, &y) in out.iter_mut().zip(values) {
        *o = decompress(y, d);
    }
    Poly::from_coeffs(out, Domain::Coefficient)
}

/// K-PKE.KeyGen: `(ek, dk)` from the 32-byte seed `d`
///
/// `ek = ByteEncode12(t̂) ‖ ρ`, `dk = ByteEncode12(ŝ)`.
pub fn keygen(d: &[u8; 32], params: &KemParams) -> Result<(Vec<u8>, Zeroizing<Vec<u8>>)> {
    let g = Zeroizing::new(sha3_512(&[d, &[params.k as u8]]));
    let mut rho = [0u8; SYMBYTES];
    rho.copy_from_slice(&g[..SYMBYTES]);
    let mut sigma = Zeroizing::new([0u8; SYMBYTES]);
    sigma.copy_from_slice(&g[SYMBYTES..]);

    let a_hat = expand_a::<KemRing>(&rho, params.k, params.k)?;

    let mut nonce = 0u8;
    let s = Zeroizing::new(sample_noise(&sigma, &mut nonce, params.k, params.eta1)?);
    let e = Zeroizing::new(sample_noise(&sigma, &mut nonce, params.k, params.eta1)?);

    let s_hat = Zeroizing::new(s.ntt());
    let t_hat = a_hat.mul_vec(&s_hat).add(&e.ntt());

    let mut ek = encode_vec(&t_hat, 12)?;
    ek.extend_from_slice(&rho);
    let dk = Zeroizing::new(encode_vec(&s_hat, 12)?);
    Ok((ek, dk))
}

/// K-PKE.Encrypt: ciphertext of the 32-byte message `m` under `ek`
///
/// `r` is the encryption seed; the same `(ek, m, r)` always gives the same
/// ciphertext.
pub fn encrypt(ek: &[u8], m: &[u8; 32], r: &[u8; 32], params: &KemParams) -> Result<Vec<u8>> {
    check_length("encapsulation key", ek, params.ek_len())?;
    let (t_bytes, rho_bytes) = ek.split_at(params.dk_pke_len());
    let t_hat = decode_vec(t_bytes, 12, Domain::Transformed)?;
    let mut rho = [0u8; SYMBYTES];
    rho.copy_from_slice(rho_bytes);

    let a_hat = expand_a::<KemRing>(&rho, params.k, params.k)?;

    let mut nonce = 0u8;
    let y = Zeroizing::new(sample_noise(r, &mut nonce, params.k, params.eta1)?);
    let e1 = sample_noise(r, &mut nonce, params.k, params.eta2)?;
    let e2 = sample_cbd_prf(r, nonce, params.eta2)?;

    let y_hat = Zeroizing::new(y.ntt());
    let u = a_hat.transpose_mul_vec(&y_hat).inv_ntt().add(&e1);
    let mu = decompress_poly(&byte_decode(m, 1)?, 1);
    let v = t_hat.inner_product(&y_hat).inv_ntt().add(&e2).add(&mu);

    let mut c = Vec::with_capacity(params.ct_len());
    for p in u.iter() {
        c.extend_from_slice(&byte_encode(&compress_poly(p, params.du), params.du)?);
    }
    c.extend_from_slice(&byte_encode(&compress_poly(&v, params.dv), params.dv)?);
    Ok(c)
}

/// K-PKE.Decrypt: recover the 32-byte message from `c` with `dk`
pub fn decrypt(dk: &[u8], c: &[u8], params: &KemParams) -> Result<Zeroizing<[u8; 32]>> {
    check_length("K-PKE decryption key", dk, params.dk_pke_len())?;
    check_length("ciphertext", c, params.ct_len())?;
    let (c1, c2) = c.split_at(32 * params.du * params.k);

    let u = c1
        .chunks_exact(32 * params.du)
        .map(|chunk| Ok(decompress_poly(&byte_decode(chunk, params.du)?, params.du)))
        .collect::<Result<Vec<_>>>()?;
    let u = PolyVec::from_vec(u);
    let v = decompress_poly(&byte_decode(c2, params.dv)?, params.dv);

    let s_hat = Zeroizing::new(decode_vec(dk, 12, Domain::Transformed)?);
    let w = Zeroizing::new(v.sub(&s_hat.inner_product(&u.ntt()).inv_ntt()));

    let mut m = Zeroizing::new([0u8; 32]);
    m.copy_from_slice(&byte_encode(&compress_poly(&w, 1), 1)?);
    Ok(m)
}
