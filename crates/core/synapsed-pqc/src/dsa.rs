//! ML-DSA implementation
//!
//! This module implements the Module-Lattice-Based Digital Signature
//! Algorithm as specified in NIST FIPS 204.
//!
//! Signing is the Fiat–Shamir-with-aborts loop: each attempt samples a mask,
//! commits to its high bits and is rejected if the response or the hint
//! would leak information about the secret. The loop is bounded; see
//! [`max_signing_attempts`].
//!
//! The external ("pure") interface binds every signature to a context
//! string of at most 255 bytes by signing `M' = 0 ‖ |ctx| ‖ ctx ‖ M`.

pub mod packing;
pub mod rounding;

use crate::constant_time::ct_eq;
use crate::encoding::hint_weight;
use crate::error::{Error, Result};
use crate::hash::{shake256, shake256_array};
use crate::ntt::{DsaRing, RingModulus};
use crate::params::dsa::{DsaParams, D, ML_DSA_44, ML_DSA_65, ML_DSA_87};
use crate::params::N;
use crate::poly::{Domain, Poly, PolyVec};
use crate::sampling::{expand_a, expand_mask, expand_s, sample_in_ball};
use crate::secure_memory::{SecureArray, SecureBytes};
use crate::traits::{SecureRandom, Serializable, Signature};
use core::fmt::Debug;
use core::marker::PhantomData;
use packing::{pk_decode, pk_encode, sig_decode, sig_encode, sk_decode, sk_encode, w1_encode, TR_BYTES};
use rounding::{high_bits, low_bits, make_hint, power2_round, use_hint};
use zeroize::{Zeroize, Zeroizing};

/// Longest accepted context string
pub const MAX_CONTEXT_LEN: usize = 255;

/// Most signing attempts before giving up: `⌊65536 / l⌋`
///
/// Each attempt consumes `l` values of the 16-bit mask counter, so this is
/// the largest count for which no mask seed repeats.
pub const fn max_signing_attempts(params: &DsaParams) -> u32 {
    (1 << 16) / params.l as u32
}

/// Formatted message `M' = 0 ‖ |ctx| ‖ ctx ‖ M`
pub(crate) fn format_message(message: &[u8], context: &[u8]) -> Result<Vec<u8>> {
    if context.len() > MAX_CONTEXT_LEN {
        return Err(Error::ContextTooLong { len: context.len() });
    }
    let mut out = Vec::with_capacity(2 + context.len() + message.len());
    out.push(0);
    out.push(context.len() as u8);
    out.extend_from_slice(context);
    out.extend_from_slice(message);
    Ok(out)
}

fn map_coeffs(v: &PolyVec<DsaRing>, f: impl Fn(u32) -> u32 + Copy) -> PolyVec<DsaRing> {
    v.map(|p| p.map(f))
}

/// Largest `|LowBits|` over a vector
fn low_bits_norm(v: &PolyVec<DsaRing>, gamma2: u32) -> u32 {
    v.iter()
        .flat_map(|p| p.coeffs().iter())
        .map(|&c| low_bits(c, gamma2).unsigned_abs())
        .max()
        .unwrap_or(0)
}

/// ML-DSA.KeyGen_internal: `(pk, sk)` from the 32-byte seed `ξ`
pub fn keygen_internal(xi: &[u8; 32], params: &DsaParams) -> Result<(Vec<u8>, SecureBytes)> {
    tracing::debug!(params = params.name, "ML-DSA key generation");
    let seed: Zeroizing<[u8; 128]> =
        Zeroizing::new(shake256_array(&[xi, &[params.k as u8, params.l as u8]]));
    let mut rho = [0u8; 32];
    let mut rho_prime = Zeroizing::new([0u8; 64]);
    let mut key = Zeroizing::new([0u8; 32]);
    rho.copy_from_slice(&seed[..32]);
    rho_prime.copy_from_slice(&seed[32..96]);
    key.copy_from_slice(&seed[96..]);

    let a_hat = expand_a::<DsaRing>(&rho, params.k, params.l)?;
    let (s1, s2) = expand_s(&rho_prime, params)?;
    let (s1, s2) = (Zeroizing::new(s1), Zeroizing::new(s2));

    let t = a_hat.mul_vec(&s1.ntt()).inv_ntt().add(&s2);
    let mut t1 = Vec::with_capacity(params.k);
    let mut t0 = Vec::with_capacity(params.k);
    for p in t.iter() {
        let mut hi = [0u32; N];
        let mut lo = [0i32; N];
        for ((h, l), &c) in hi.iter_mut().zip(lo.iter_mut()).zip(p.coeffs()) {
            (*h, *l) = power2_round(c);
        }
        t1.push(Poly::from_coeffs(hi, Domain::Coefficient));
        t0.push(Poly::from_signed(&lo));
    }
    let t1 = PolyVec::from_vec(t1);
    let t0 = Zeroizing::new(PolyVec::from_vec(t0));

    let pk = pk_encode(&rho, &t1);
    let tr: [u8; TR_BYTES] = shake256_array(&[&pk]);
    let sk = sk_encode(&rho, &key, &tr, &s1, &s2, &t0, params);
    Ok((pk, sk))
}

/// ML-DSA.Sign_internal: signature over the formatted message `m_prime`
///
/// `rnd` is 32 fresh random bytes for hedged signing, or all zeros for the
/// deterministic variant.
pub fn sign_internal(
    sk: &[u8],
    m_prime: &[u8],
    rnd: &[u8; 32],
    params: &DsaParams,
) -> Result<Vec<u8>> {
    sign_with_limit(sk, m_prime, rnd, params, max_signing_attempts(params))
}

pub(crate) fn sign_with_limit(
    sk: &[u8],
    m_prime: &[u8],
    rnd: &[u8; 32],
    params: &DsaParams,
    max_attempts: u32,
) -> Result<Vec<u8>> {
    let key = sk_decode(sk, params)?;
    let s1_hat = Zeroizing::new(key.s1.ntt());
    let s2_hat = Zeroizing::new(key.s2.ntt());
    let t0_hat = Zeroizing::new(key.t0.ntt());
    let a_hat = expand_a::<DsaRing>(&key.rho, params.k, params.l)?;

    let mu: [u8; 64] = shake256_array(&[&key.tr, m_prime]);
    let rho_pp: Zeroizing<[u8; 64]> = Zeroizing::new(shake256_array(&[&key.key[..], rnd, &mu]));

    let gamma2 = params.gamma2;
    let z_bound = params.gamma1 - params.beta;
    let r0_bound = gamma2 - params.beta;

    let mut kappa: u32 = 0;
    for attempt in 1..=max_attempts {
        let y = Zeroizing::new(expand_mask(&rho_pp, kappa as u16, params)?);
        kappa += params.l as u32;

        let w = Zeroizing::new(a_hat.mul_vec(&y.ntt()).inv_ntt());
        let w1 = map_coeffs(&w, |c| high_bits(c, gamma2));
        let c_tilde = shake256(&[&mu, &w1_encode(&w1, params)], params.c_tilde_len());
        let c_hat = sample_in_ball(&c_tilde, params.tau)?.ntt();

        let cs1 = s1_hat.multiply_each(&c_hat).inv_ntt();
        let cs2 = s2_hat.multiply_each(&c_hat).inv_ntt();
        let z = y.add(&cs1);
        if z.infinity_norm() >= z_bound {
            tracing::trace!(attempt, reason = "z norm", "signing attempt rejected");
            continue;
        }
        let w_minus_cs2 = w.sub(&cs2);
        if low_bits_norm(&w_minus_cs2, gamma2) >= r0_bound {
            tracing::trace!(attempt, reason = "low bits", "signing attempt rejected");
            continue;
        }

        let ct0 = t0_hat.multiply_each(&c_hat).inv_ntt();
        if ct0.infinity_norm() >= gamma2 {
            tracing::trace!(attempt, reason = "ct0 norm", "signing attempt rejected");
            continue;
        }
        let r = w_minus_cs2.add(&ct0);
        let h: Vec<[bool; N]> = ct0
            .iter()
            .zip(r.iter())
            .map(|(ct0_i, r_i)| {
                let mut row = [false; N];
                for ((bit, &c), &rc) in row.iter_mut().zip(ct0_i.coeffs()).zip(r_i.coeffs()) {
                    let minus_c = (DsaRing::Q - c) % DsaRing::Q;
                    *bit = make_hint(minus_c, rc, gamma2);
                }
                row
            })
            .collect();
        if hint_weight(&h) > params.omega {
            tracing::trace!(attempt, reason = "hint weight", "signing attempt rejected");
            continue;
        }

        tracing::debug!(params = params.name, attempts = attempt, "ML-DSA signature produced");
        return sig_encode(&c_tilde, &z, &h, params);
    }

    tracing::warn!(params = params.name, max_attempts, "ML-DSA signing gave up");
    Err(Error::SigningAttemptsExhausted {
        attempts: max_attempts,
    })
}

/// ML-DSA.Verify_internal
///
/// Wrong key or signature lengths are errors. Every other failure,
/// including a malformed hint, yields `Ok(false)`.
pub fn verify_internal(pk: &[u8], m_prime: &[u8], sig: &[u8], params: &DsaParams) -> Result<bool> {
    let (rho, t1) = pk_decode(pk, params)?;
    let Some(decoded) = sig_decode(sig, params)? else {
        return Ok(false);
    };
    if decoded.z.infinity_norm() >= params.gamma1 - params.beta {
        return Ok(false);
    }

    let a_hat = expand_a::<DsaRing>(&rho, params.k, params.l)?;
    let tr: [u8; TR_BYTES] = shake256_array(&[pk]);
    let mu: [u8; 64] = shake256_array(&[&tr, m_prime]);
    let c_hat = sample_in_ball(&decoded.c_tilde, params.tau)?.ntt();

    let az = a_hat.mul_vec(&decoded.z.ntt());
    let ct1 = t1.map(|p| p.scale(1 << D)).ntt().multiply_each(&c_hat);
    let w_approx = az.sub(&ct1).inv_ntt();

    let w1 = PolyVec::from_vec(
        w_approx
            .iter()
            .zip(&decoded.h)
            .map(|(p, row)| {
                let mut out = [0u32; N];
                for ((o, &c), &bit) in out.iter_mut().zip(p.coeffs()).zip(row) {
                    *o = use_hint(bit, c, params.gamma2);
                }
                Poly::from_coeffs(out, Domain::Coefficient)
            })
            .collect(),
    );
    let c_tilde = shake256(&[&mu, &w1_encode(&w1, params)], params.c_tilde_len());
    Ok(ct_eq(&c_tilde, &decoded.c_tilde).into())
}

/// ML-DSA.Sign: sign `message` under `context`
pub fn sign(
    sk: &[u8],
    message: &[u8],
    context: &[u8],
    rnd: &[u8; 32],
    params: &DsaParams,
) -> Result<Vec<u8>> {
    let m_prime = format_message(message, context)?;
    sign_internal(sk, &m_prime, rnd, params)
}

/// ML-DSA.Verify: check `sig` on `message` under `context`
pub fn verify(
    pk: &[u8],
    message: &[u8],
    context: &[u8],
    sig: &[u8],
    params: &DsaParams,
) -> Result<bool> {
    let m_prime = format_message(message, context)?;
    verify_internal(pk, &m_prime, sig, params)
}

/// An ML-DSA parameter set
pub trait DsaParameterSet:
    Debug + Clone + Copy + PartialEq + Eq + Default + Send + Sync + 'static
{
    /// Parameters of this set
    const PARAMS: DsaParams;

    /// Deterministic key pair from the 32-byte seed `ξ`
    fn keypair_from_seed(xi: &[u8; 32]) -> Result<(VerifyingKey<Self>, SigningKey<Self>)> {
        let (pk, sk) = keygen_internal(xi, &Self::PARAMS)?;
        Ok((
            VerifyingKey {
                bytes: pk,
                _params: PhantomData,
            },
            SigningKey {
                bytes: sk,
                _params: PhantomData,
            },
        ))
    }
}

fn sign_typed<P: DsaParameterSet>(
    sk: &SigningKey<P>,
    message: &[u8],
    context: &[u8],
    rnd: &[u8; 32],
) -> Result<MlDsaSignature<P>> {
    let bytes = sign(sk.bytes.as_ref(), message, context, rnd, &P::PARAMS)?;
    Ok(MlDsaSignature {
        bytes,
        _params: PhantomData,
    })
}

macro_rules! ml_dsa_parameter_set {
    ($name:ident, $params:expr, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        pub struct $name;

        impl DsaParameterSet for $name {
            const PARAMS: DsaParams = $params;
        }

        impl Signature for $name {
            type PublicKey = VerifyingKey<$name>;
            type SecretKey = SigningKey<$name>;
            type Sig = MlDsaSignature<$name>;

            const PUBLIC_KEY_SIZE: usize = $params.pk_len();
            const SECRET_KEY_SIZE: usize = $params.sk_len();
            const SIGNATURE_SIZE: usize = $params.sig_len();

            fn generate_keypair<R: SecureRandom>(
                rng: &mut R,
            ) -> Result<(Self::PublicKey, Self::SecretKey)> {
                let xi = SecureArray::<32>::random(rng)?;
                Self::keypair_from_seed(xi.expose())
            }

            fn sign_with_context<R: SecureRandom>(
                secret_key: &Self::SecretKey,
                message: &[u8],
                context: &[u8],
                rng: &mut R,
            ) -> Result<Self::Sig> {
                let rnd = SecureArray::<32>::random(rng)?;
                sign_typed(secret_key, message, context, rnd.expose())
            }

            fn sign_deterministic_with_context(
                secret_key: &Self::SecretKey,
                message: &[u8],
                context: &[u8],
            ) -> Result<Self::Sig> {
                sign_typed(secret_key, message, context, &[0u8; 32])
            }

            fn verify_with_context(
                public_key: &Self::PublicKey,
                message: &[u8],
                context: &[u8],
                signature: &Self::Sig,
            ) -> Result<bool> {
                verify(&public_key.bytes, message, context, &signature.bytes, &$params)
            }
        }
    };
}

ml_dsa_parameter_set!(MlDsa44, ML_DSA_44, "ML-DSA-44 (NIST security level 2)");
ml_dsa_parameter_set!(MlDsa65, ML_DSA_65, "ML-DSA-65 (NIST security level 3)");
ml_dsa_parameter_set!(MlDsa87, ML_DSA_87, "ML-DSA-87 (NIST security level 5)");

/// ML-DSA public key
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifyingKey<P: DsaParameterSet> {
    bytes: Vec<u8>,
    _params: PhantomData<P>,
}

impl<P: DsaParameterSet> AsRef<[u8]> for VerifyingKey<P> {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl<P: DsaParameterSet> Serializable for VerifyingKey<P> {
    fn to_bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        pk_decode(bytes, &P::PARAMS)?;
        Ok(Self {
            bytes: bytes.to_vec(),
            _params: PhantomData,
        })
    }
}

/// ML-DSA private key
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SigningKey<P: DsaParameterSet> {
    bytes: SecureBytes,
    _params: PhantomData<P>,
}

impl<P: DsaParameterSet> AsRef<[u8]> for SigningKey<P> {
    fn as_ref(&self) -> &[u8] {
        self.bytes.as_ref()
    }
}

impl<P: DsaParameterSet> Zeroize for SigningKey<P> {
    fn zeroize(&mut self) {
        self.bytes.zeroize();
    }
}

impl<P: DsaParameterSet> Serializable for SigningKey<P> {
    fn to_bytes(&self) -> Vec<u8> {
        self.bytes.as_ref().to_vec()
    }

    /// Parse a private key, rejecting out-of-range secret coefficients
    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        sk_decode(bytes, &P::PARAMS)?;
        Ok(Self {
            bytes: SecureBytes::from_slice(bytes),
            _params: PhantomData,
        })
    }
}

/// ML-DSA signature
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MlDsaSignature<P: DsaParameterSet> {
    bytes: Vec<u8>,
    _params: PhantomData<P>,
}

impl<P: DsaParameterSet> AsRef<[u8]> for MlDsaSignature<P> {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl<P: DsaParameterSet> Serializable for MlDsaSignature<P> {
    fn to_bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        crate::error::check_length("ML-DSA signature", bytes, P::PARAMS.sig_len())?;
        Ok(Self {
            bytes: bytes.to_vec(),
            _params: PhantomData,
        })
    }
}
