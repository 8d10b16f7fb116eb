//! SLH-DSA implementation
//!
//! Stateless hash-based signatures as specified in NIST FIPS 205, using the
//! SHAKE256 instantiation. A signature is the randomizer `R`, a FORS
//! signature on the message digest, and a hypertree signature on the FORS
//! public key.
//!
//! Keys are `PK = PK.seed ‖ PK.root` and
//! `SK = SK.seed ‖ SK.prf ‖ PK.seed ‖ PK.root`.

pub mod address;
pub mod fors;
pub mod hypertree;
pub mod tweak;
pub mod wots;
pub mod xmss;

use crate::dsa::format_message;
use crate::error::{check_length, Result};
use crate::params::slh::{SlhParams, SLH_DSA_SHAKE_128F, SLH_DSA_SHAKE_128S};
use crate::secure_memory::SecureBytes;
use crate::traits::{SecureRandom, Serializable, Signature};
use address::{Address, AddressKind};
use core::fmt::Debug;
use core::marker::PhantomData;
use tweak::{h_msg, prf_msg, to_int, Tweak};
use zeroize::{Zeroize, Zeroizing};

/// Digest split into the FORS message and the signing leaf
struct DigestParts<'a> {
    md: &'a [u8],
    idx_tree: u64,
    idx_leaf: u32,
}

fn split_digest<'a>(digest: &'a [u8], params: &SlhParams) -> DigestParts<'a> {
    let (md, rest) = digest.split_at(params.md_len());
    let (tree_bytes, rest) = rest.split_at(params.tree_idx_len());
    let leaf_bytes = &rest[..params.leaf_idx_len()];

    let tree_bits = params.h - params.hp;
    let tree_mask = if tree_bits >= 64 { u64::MAX } else { (1u64 << tree_bits) - 1 };
    DigestParts {
        md,
        idx_tree: to_int(tree_bytes) & tree_mask,
        idx_leaf: (to_int(leaf_bytes) & ((1u64 << params.hp) - 1)) as u32,
    }
}

fn fors_address(idx_tree: u64, idx_leaf: u32) -> Address {
    Address::new(0, idx_tree, AddressKind::ForsRoots { keypair: idx_leaf })
}

/// slh_keygen_internal: `(pk, sk)` from the three n-byte seeds
pub fn keygen_internal(
    sk_seed: &[u8],
    sk_prf: &[u8],
    pk_seed: &[u8],
    params: &SlhParams,
) -> Result<(Vec<u8>, SecureBytes)> {
    check_length("SK.seed", sk_seed, params.n)?;
    check_length("SK.prf", sk_prf, params.n)?;
    check_length("PK.seed", pk_seed, params.n)?;
    tracing::debug!(params = params.name, "SLH-DSA key generation");

    let tw = Tweak::new(params.n, pk_seed);
    let pk_root = hypertree::root(&tw, params, sk_seed);

    let mut pk = Vec::with_capacity(params.pk_len());
    pk.extend_from_slice(pk_seed);
    pk.extend_from_slice(&pk_root);

    let mut sk = SecureBytes::new(Vec::with_capacity(params.sk_len()));
    sk.extend_from_slice(sk_seed);
    sk.extend_from_slice(sk_prf);
    sk.extend_from_slice(&pk);
    Ok((pk, sk))
}

/// slh_sign_internal
///
/// `addrnd` is the n-byte hedging value; `None` signs deterministically
/// with `PK.seed` in its place.
pub fn sign_internal(
    m: &[u8],
    sk: &[u8],
    addrnd: Option<&[u8]>,
    params: &SlhParams,
) -> Result<Vec<u8>> {
    check_length("SLH-DSA private key", sk, params.sk_len())?;
    let n = params.n;
    let (sk_seed, rest) = sk.split_at(n);
    let (sk_prf, pk) = rest.split_at(n);
    let (pk_seed, pk_root) = pk.split_at(n);

    let opt_rand = match addrnd {
        Some(rand) => {
            check_length("additional randomness", rand, n)?;
            rand
        }
        None => pk_seed,
    };

    let tw = Tweak::new(n, pk_seed);
    let r = prf_msg(sk_prf, opt_rand, m, n);
    let digest = h_msg(&r, pk_seed, pk_root, m, params.m);
    let parts = split_digest(&digest, params);
    tracing::trace!(
        params = params.name,
        idx_tree = parts.idx_tree,
        idx_leaf = parts.idx_leaf,
        "SLH-DSA signing leaf selected"
    );

    let adrs = fors_address(parts.idx_tree, parts.idx_leaf);
    let fors_sig = fors::sign(&tw, params, parts.md, sk_seed, adrs, parts.idx_leaf)?;
    let fors_pk = fors::public_key_from_signature(&tw, params, &fors_sig, parts.md, adrs, parts.idx_leaf)?;
    let ht_sig = hypertree::sign(&tw, params, &fors_pk, sk_seed, parts.idx_tree, parts.idx_leaf)?;

    let mut sig = Vec::with_capacity(params.sig_len());
    sig.extend_from_slice(&r);
    sig.extend_from_slice(&fors_sig);
    sig.extend_from_slice(&ht_sig);
    tracing::debug!(params = params.name, deterministic = addrnd.is_none(), "SLH-DSA signature produced");
    Ok(sig)
}

/// slh_verify_internal
///
/// Wrong key or signature lengths are errors; a signature that does not
/// verify is `Ok(false)`.
pub fn verify_internal(m: &[u8], sig: &[u8], pk: &[u8], params: &SlhParams) -> Result<bool> {
    check_length("SLH-DSA public key", pk, params.pk_len())?;
    check_length("SLH-DSA signature", sig, params.sig_len())?;
    let n = params.n;
    let (pk_seed, pk_root) = pk.split_at(n);
    let (r, rest) = sig.split_at(n);
    let (fors_sig, ht_sig) = rest.split_at(params.fors_sig_len());

    let tw = Tweak::new(n, pk_seed);
    let digest = h_msg(r, pk_seed, pk_root, m, params.m);
    let parts = split_digest(&digest, params);

    let adrs = fors_address(parts.idx_tree, parts.idx_leaf);
    let fors_pk = fors::public_key_from_signature(&tw, params, fors_sig, parts.md, adrs, parts.idx_leaf)?;
    hypertree::verify(&tw, params, &fors_pk, ht_sig, pk_root, parts.idx_tree, parts.idx_leaf)
}

/// slh_sign: sign `message` under `context`
pub fn sign(
    sk: &[u8],
    message: &[u8],
    context: &[u8],
    addrnd: Option<&[u8]>,
    params: &SlhParams,
) -> Result<Vec<u8>> {
    let m_prime = format_message(message, context)?;
    sign_internal(&m_prime, sk, addrnd, params)
}

/// slh_verify: check `sig` on `message` under `context`
pub fn verify(
    pk: &[u8],
    message: &[u8],
    context: &[u8],
    sig: &[u8],
    params: &SlhParams,
) -> Result<bool> {
    let m_prime = format_message(message, context)?;
    verify_internal(&m_prime, sig, pk, params)
}

/// An SLH-DSA parameter set
pub trait SlhParameterSet:
    Debug + Clone + Copy + PartialEq + Eq + Default + Send + Sync + 'static
{
    /// Parameters of this set
    const PARAMS: SlhParams;

    /// Deterministic key pair from the seeds `SK.seed`, `SK.prf` and `PK.seed`
    fn keypair_from_seeds(
        sk_seed: &[u8],
        sk_prf: &[u8],
        pk_seed: &[u8],
    ) -> Result<(VerifyingKey<Self>, SigningKey<Self>)> {
        let (pk, sk) = keygen_internal(sk_seed, sk_prf, pk_seed, &Self::PARAMS)?;
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

fn sign_typed<P: SlhParameterSet>(
    sk: &SigningKey<P>,
    message: &[u8],
    context: &[u8],
    addrnd: Option<&[u8]>,
) -> Result<SlhDsaSignature<P>> {
    let bytes = sign(sk.bytes.as_ref(), message, context, addrnd, &P::PARAMS)?;
    Ok(SlhDsaSignature {
        bytes,
        _params: PhantomData,
    })
}

macro_rules! slh_dsa_parameter_set {
    ($name:ident, $params:expr, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        pub struct $name;

        impl SlhParameterSet for $name {
            const PARAMS: SlhParams = $params;
        }

        impl Signature for $name {
            type PublicKey = VerifyingKey<$name>;
            type SecretKey = SigningKey<$name>;
            type Sig = SlhDsaSignature<$name>;

            const PUBLIC_KEY_SIZE: usize = $params.pk_len();
            const SECRET_KEY_SIZE: usize = $params.sk_len();
            const SIGNATURE_SIZE: usize = $params.sig_len();

            fn generate_keypair<R: SecureRandom>(
                rng: &mut R,
            ) -> Result<(Self::PublicKey, Self::SecretKey)> {
                let n = $params.n;
                let mut seeds = Zeroizing::new(vec![0u8; 3 * n]);
                rng.fill_bytes(&mut seeds)?;
                Self::keypair_from_seeds(&seeds[..n], &seeds[n..2 * n], &seeds[2 * n..])
            }

            fn sign_with_context<R: SecureRandom>(
                secret_key: &Self::SecretKey,
                message: &[u8],
                context: &[u8],
                rng: &mut R,
            ) -> Result<Self::Sig> {
                let mut addrnd = Zeroizing::new(vec![0u8; $params.n]);
                rng.fill_bytes(&mut addrnd)?;
                sign_typed(secret_key, message, context, Some(addrnd.as_slice()))
            }

            fn sign_deterministic_with_context(
                secret_key: &Self::SecretKey,
                message: &[u8],
                context: &[u8],
            ) -> Result<Self::Sig> {
                sign_typed(secret_key, message, context, None)
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

slh_dsa_parameter_set!(
    SlhDsaShake128s,
    SLH_DSA_SHAKE_128S,
    "SLH-DSA-SHAKE-128s (NIST security level 1, small signatures)"
);
slh_dsa_parameter_set!(
    SlhDsaShake128f,
    SLH_DSA_SHAKE_128F,
    "SLH-DSA-SHAKE-128f (NIST security level 1, fast signing)"
);

/// SLH-DSA public key
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifyingKey<P: SlhParameterSet> {
    bytes: Vec<u8>,
    _params: PhantomData<P>,
}

impl<P: SlhParameterSet> AsRef<[u8]> for VerifyingKey<P> {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl<P: SlhParameterSet> Serializable for VerifyingKey<P> {
    fn to_bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        check_length("SLH-DSA public key", bytes, P::PARAMS.pk_len())?;
        Ok(Self {
            bytes: bytes.to_vec(),
            _params: PhantomData,
        })
    }
}

/// SLH-DSA private key
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SigningKey<P: SlhParameterSet> {
    bytes: SecureBytes,
    _params: PhantomData<P>,
}

impl<P: SlhParameterSet> SigningKey<P> {
    /// Public key embedded in the private key
    pub fn verifying_key(&self) -> VerifyingKey<P> {
        let sk = self.bytes.as_ref();
        VerifyingKey {
            bytes: sk[2 * P::PARAMS.n..].to_vec(),
            _params: PhantomData,
        }
    }
}

impl<P: SlhParameterSet> AsRef<[u8]> for SigningKey<P> {
    fn as_ref(&self) -> &[u8] {
        self.bytes.as_ref()
    }
}

impl<P: SlhParameterSet> Zeroize for SigningKey<P> {
    fn zeroize(&mut self) {
        self.bytes.zeroize();
    }
}

impl<P: SlhParameterSet> Serializable for SigningKey<P> {
    fn to_bytes(&self) -> Vec<u8> {
        self.bytes.as_ref().to_vec()
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        check_length("SLH-DSA private key", bytes, P::PARAMS.sk_len())?;
        Ok(Self {
            bytes: SecureBytes::from_slice(bytes),
            _params: PhantomData,
        })
    }
}

/// SLH-DSA signature
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlhDsaSignature<P: SlhParameterSet> {
    bytes: Vec<u8>,
    _params: PhantomData<P>,
}

impl<P: SlhParameterSet> AsRef<[u8]> for SlhDsaSignature<P> {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl<P: SlhParameterSet> Serializable for SlhDsaSignature<P> {
    fn to_bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        check_length("SLH-DSA signature", bytes, P::PARAMS.sig_len())?;
        Ok(Self {
            bytes: bytes.to_vec(),
            _params: PhantomData,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::random::TestRng;

    fn seeds() -> ([u8; 16], [u8; 16], [u8; 16]) {
        ([1u8; 16], [2u8; 16], [3u8; 16])
    }

    #[test]
    fn test_split_digest() {
        let params = SLH_DSA_SHAKE_128F;
        let digest = vec![0xFFu8; params.m];
        let parts = split_digest(&digest, &params);
        assert_eq!(parts.md.len(), params.md_len());
        assert_eq!(parts.idx_tree, (1u64 << 63) - 1);
        assert_eq!(parts.idx_leaf, 7);
    }

    #[test]
    fn test_keys_layout() {
        let (sk_seed, sk_prf, pk_seed) = seeds();
        let (pk, sk) = SlhDsaShake128f::keypair_from_seeds(&sk_seed, &sk_prf, &pk_seed).unwrap();
        assert_eq!(pk.as_ref().len(), 32);
        assert_eq!(&pk.as_ref()[..16], &pk_seed);
        assert_eq!(&sk.as_ref()[..16], &sk_seed);
        assert_eq!(&sk.as_ref()[16..32], &sk_prf);
        assert_eq!(sk.verifying_key(), pk);
    }

    #[test]
    fn test_sign_verify_roundtrip() {
        let mut rng = TestRng::new(11);
        let (pk, sk) = SlhDsaShake128f::generate_keypair(&mut rng).unwrap();
        let sig = SlhDsaShake128f::sign(&sk, b"message", &mut rng).unwrap();
        assert_eq!(sig.as_ref().len(), SlhDsaShake128f::SIGNATURE_SIZE);
        assert!(SlhDsaShake128f::verify(&pk, b"message", &sig).unwrap());
        assert!(!SlhDsaShake128f::verify(&pk, b"massage", &sig).unwrap());
    }

    #[test]
    fn test_deterministic_and_context() {
        let (sk_seed, sk_prf, pk_seed) = seeds();
        let (pk, sk) = SlhDsaShake128f::keypair_from_seeds(&sk_seed, &sk_prf, &pk_seed).unwrap();
        let a = SlhDsaShake128f::sign_deterministic_with_context(&sk, b"m", b"ctx").unwrap();
        let b = SlhDsaShake128f::sign_deterministic_with_context(&sk, b"m", b"ctx").unwrap();
        assert_eq!(a, b);
        assert!(SlhDsaShake128f::verify_with_context(&pk, b"m", b"ctx", &a).unwrap());
        assert!(!SlhDsaShake128f::verify_with_context(&pk, b"m", b"", &a).unwrap());
    }

    #[test]
    fn test_tampered_signature_rejected() {
        let (sk_seed, sk_prf, pk_seed) = seeds();
        let (pk, sk) = keygen_internal(&sk_seed, &sk_prf, &pk_seed, &SLH_DSA_SHAKE_128F).unwrap();
        let sig = sign(sk.as_ref(), b"m", b"", None, &SLH_DSA_SHAKE_128F).unwrap();
        for at in [0, 20, sig.len() / 2, sig.len() - 1] {
            let mut bad = sig.clone();
            bad[at] ^= 0x01;
            assert_eq!(verify(&pk, b"m", b"", &bad, &SLH_DSA_SHAKE_128F), Ok(false), "byte {at}");
        }
        assert!(matches!(
            verify(&pk, b"m", b"", &sig[1..], &SLH_DSA_SHAKE_128F),
            Err(Error::InvalidLength { .. })
        ));
    }

    #[test]
    fn test_bad_inputs() {
        let params = SLH_DSA_SHAKE_128F;
        assert!(keygen_internal(&[0u8; 15], &[0u8; 16], &[0u8; 16], &params).is_err());
        let (_, sk) = keygen_internal(&[0u8; 16], &[0u8; 16], &[0u8; 16], &params).unwrap();
        assert!(sign_internal(b"m", sk.as_ref(), Some(&[0u8; 8][..]), &params).is_err());
        assert_eq!(
            sign(sk.as_ref(), b"m", &[0u8; 300], None, &params),
            Err(Error::ContextTooLong { len: 300 })
        );
    }
}
