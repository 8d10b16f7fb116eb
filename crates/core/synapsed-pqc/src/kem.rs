//! ML-KEM implementation
//!
//! This module implements the Module-Lattice-Based Key Encapsulation
//! Mechanism as specified in NIST FIPS 203, on top of [`kpke`].
//!
//! The `*_internal` functions are the deterministic algorithms of the
//! standard and take their randomness as explicit seeds. The
//! [`MlKem512`], [`MlKem768`] and [`MlKem1024`] marker types implement
//! [`Kem`] and draw fresh seeds from a [`SecureRandom`].

pub mod kpke;

use crate::constant_time::{ct_eq, ct_select};
use crate::encoding::{byte_decode, byte_encode};
use crate::error::{check_length, Error, Result};
use crate::hash::{sha3_256, sha3_512, shake256_array};
use crate::params::kem::{KemParams, ML_KEM_1024, ML_KEM_512, ML_KEM_768};
use crate::params::SYMBYTES;
use crate::secure_memory::{SecureArray, SecureBytes};
use crate::traits::{Kem, SecureRandom, Serializable};
use core::fmt::Debug;
use core::marker::PhantomData;
use zeroize::{Zeroize, Zeroizing};

/// Split `G(m ‖ h) = (K, r)`
fn g_split(input: &[&[u8]]) -> (Zeroizing<[u8; 32]>, Zeroizing<[u8; 32]>) {
    let g = Zeroizing::new(sha3_512(input));
    let mut k = Zeroizing::new([0u8; 32]);
    let mut r = Zeroizing::new([0u8; 32]);
    k.copy_from_slice(&g[..32]);
    r.copy_from_slice(&g[32..]);
    (k, r)
}

/// Encapsulation-key modulus check (FIPS 203 §7.2)
///
/// Every 12-bit field of the `t̂` part must already be reduced mod q.
pub fn check_encapsulation_key(ek: &[u8], params: &KemParams) -> Result<()> {
    check_length("encapsulation key", ek, params.ek_len())?;
    for chunk in ek[..params.dk_pke_len()].chunks_exact(384) {
        if byte_encode(&byte_decode(chunk, 12)?, 12)? != chunk {
            return Err(Error::InvalidEncapsulationKey);
        }
    }
    Ok(())
}

/// Decapsulation-key hash check (FIPS 203 §7.3)
///
/// The embedded `H(ek)` must match the embedded encapsulation key.
pub fn check_decapsulation_key(dk: &[u8], params: &KemParams) -> Result<()> {
    check_length("decapsulation key", dk, params.dk_len())?;
    let ek_start = params.dk_pke_len();
    let h_start = ek_start + params.ek_len();
    let h = sha3_256(&[&dk[ek_start..h_start]]);
    if bool::from(ct_eq(&h, &dk[h_start..h_start + SYMBYTES])) {
        Ok(())
    } else {
        Err(Error::InvalidDecapsulationKey)
    }
}

/// ML-KEM.KeyGen_internal: `(ek, dk)` from seeds `d` and `z`
///
/// `dk = dk_pke ‖ ek ‖ H(ek) ‖ z`.
pub fn keygen_internal(
    d: &[u8; 32],
    z: &[u8; 32],
    params: &KemParams,
) -> Result<(Vec<u8>, SecureBytes)> {
    tracing::debug!(params = params.name, "ML-KEM key generation");
    let (ek, dk_pke) = kpke::keygen(d, params)?;

    let mut dk = SecureBytes::new(Vec::with_capacity(params.dk_len()));
    dk.extend_from_slice(&dk_pke);
    dk.extend_from_slice(&ek);
    dk.extend_from_slice(&sha3_256(&[&ek]));
    dk.extend_from_slice(z);
    Ok((ek, dk))
}

/// ML-KEM.Encaps_internal: `(ct, K)` for `ek` with message seed `m`
pub fn encaps_internal(
    ek: &[u8],
    m: &[u8; 32],
    params: &KemParams,
) -> Result<(Vec<u8>, SecureArray<32>)> {
    check_encapsulation_key(ek, params)?;
    let (k, r) = g_split(&[m, &sha3_256(&[ek])]);
    let ct = kpke::encrypt(ek, m, &r, params)?;
    Ok((ct, SecureArray::new(*k)))
}

/// ML-KEM.Decaps_internal: shared secret for `ct` under `dk`
///
/// A ciphertext that does not re-encrypt to itself yields the implicit
/// rejection key `J(z ‖ ct)`. The choice is made in constant time and is
/// not an error.
pub fn decaps_internal(dk: &[u8], ct: &[u8], params: &KemParams) -> Result<SecureArray<32>> {
    check_decapsulation_key(dk, params)?;
    check_length("ciphertext", ct, params.ct_len())?;

    let ek_start = params.dk_pke_len();
    let h_start = ek_start + params.ek_len();
    let z_start = h_start + SYMBYTES;
    let dk_pke = &dk[..ek_start];
    let ek = &dk[ek_start..h_start];
    let h = &dk[h_start..z_start];
    let z = &dk[z_start..];

    let m_prime = kpke::decrypt(dk_pke, ct, params)?;
    let (k_prime, r_prime) = g_split(&[&m_prime[..], h]);
    let k_bar: Zeroizing<[u8; 32]> = Zeroizing::new(shake256_array(&[z, ct]));

    let ct_prime = kpke::encrypt(ek, &m_prime, &r_prime, params)?;
    let matches = ct_eq(ct, &ct_prime);
    Ok(SecureArray::new(ct_select(&*k_bar, &*k_prime, matches)))
}

/// An ML-KEM parameter set
///
/// Implemented by the marker types [`MlKem512`], [`MlKem768`] and
/// [`MlKem1024`]; every such type is a [`Kem`].
pub trait KemParameterSet:
    Debug + Clone + Copy + PartialEq + Eq + Default + Send + Sync + 'static
{
    /// Parameters of this set
    const PARAMS: KemParams;

    /// Deterministic key pair from the seeds `d` and `z`
    fn keypair_from_seed(
        d: &[u8; 32],
        z: &[u8; 32],
    ) -> Result<(EncapsulationKey<Self>, DecapsulationKey<Self>)> {
        let (ek, dk) = keygen_internal(d, z, &Self::PARAMS)?;
        Ok((
            EncapsulationKey::new_unchecked(ek),
            DecapsulationKey {
                bytes: dk,
                _params: PhantomData,
            },
        ))
    }

    /// Deterministic encapsulation with the message seed `m`
    fn encapsulate_with_seed(
        ek: &EncapsulationKey<Self>,
        m: &[u8; 32],
    ) -> Result<(Ciphertext<Self>, SharedSecret)> {
        let (ct, k) = encaps_internal(&ek.bytes, m, &Self::PARAMS)?;
        Ok((
            Ciphertext {
                bytes: ct,
                _params: PhantomData,
            },
            SharedSecret(k),
        ))
    }
}

macro_rules! kem_parameter_set {
    ($name:ident, $params:expr, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        pub struct $name;

        impl KemParameterSet for $name {
            const PARAMS: KemParams = $params;
        }
    };
}

kem_parameter_set!(MlKem512, ML_KEM_512, "ML-KEM-512 (NIST security level 1)");
kem_parameter_set!(MlKem768, ML_KEM_768, "ML-KEM-768 (NIST security level 3)");
kem_parameter_set!(MlKem1024, ML_KEM_1024, "ML-KEM-1024 (NIST security level 5)");

impl<P: KemParameterSet> Kem for P {
    type PublicKey = EncapsulationKey<P>;
    type SecretKey = DecapsulationKey<P>;
    type Ciphertext = Ciphertext<P>;
    type SharedSecret = SharedSecret;

    const PUBLIC_KEY_SIZE: usize = P::PARAMS.ek_len();
    const SECRET_KEY_SIZE: usize = P::PARAMS.dk_len();
    const CIPHERTEXT_SIZE: usize = P::PARAMS.ct_len();
    const SHARED_SECRET_SIZE: usize = P::PARAMS.ss_len();

    fn generate_keypair<R: SecureRandom>(
        rng: &mut R,
    ) -> Result<(Self::PublicKey, Self::SecretKey)> {
        let d = SecureArray::<32>::random(rng)?;
        let z = SecureArray::<32>::random(rng)?;
        P::keypair_from_seed(d.expose(), z.expose())
    }

    fn encapsulate<R: SecureRandom>(
        public_key: &Self::PublicKey,
        rng: &mut R,
    ) -> Result<(Self::Ciphertext, Self::SharedSecret)> {
        let m = SecureArray::<32>::random(rng)?;
        P::encapsulate_with_seed(public_key, m.expose())
    }

    fn decapsulate(
        secret_key: &Self::SecretKey,
        ciphertext: &Self::Ciphertext,
    ) -> Result<Self::SharedSecret> {
        decaps_internal(secret_key.as_ref(), &ciphertext.bytes, &P::PARAMS).map(SharedSecret)
    }
}

/// ML-KEM encapsulation key
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncapsulationKey<P: KemParameterSet> {
    bytes: Vec<u8>,
    _params: PhantomData<P>,
}

impl<P: KemParameterSet> EncapsulationKey<P> {
    fn new_unchecked(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            _params: PhantomData,
        }
    }
}

impl<P: KemParameterSet> AsRef<[u8]> for EncapsulationKey<P> {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl<P: KemParameterSet> Serializable for EncapsulationKey<P> {
    fn to_bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    /// Parse an encapsulation key, applying the modulus check
    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        check_encapsulation_key(bytes, &P::PARAMS)?;
        Ok(Self::new_unchecked(bytes.to_vec()))
    }
}

/// ML-KEM decapsulation key
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecapsulationKey<P: KemParameterSet> {
    bytes: SecureBytes,
    _params: PhantomData<P>,
}

impl<P: KemParameterSet> DecapsulationKey<P> {
    /// The encapsulation key embedded in this decapsulation key
    pub fn encapsulation_key(&self) -> EncapsulationKey<P> {
        let start = P::PARAMS.dk_pke_len();
        let end = start + P::PARAMS.ek_len();
        EncapsulationKey::new_unchecked(self.bytes.as_ref()[start..end].to_vec())
    }
}

impl<P: KemParameterSet> AsRef<[u8]> for DecapsulationKey<P> {
    fn as_ref(&self) -> &[u8] {
        self.bytes.as_ref()
    }
}

impl<P: KemParameterSet> Zeroize for DecapsulationKey<P> {
    fn zeroize(&mut self) {
        self.bytes.zeroize();
    }
}

impl<P: KemParameterSet> Serializable for DecapsulationKey<P> {
    fn to_bytes(&self) -> Vec<u8> {
        self.bytes.as_ref().to_vec()
    }

    /// Parse a decapsulation key, applying the hash check
    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        check_decapsulation_key(bytes, &P::PARAMS)?;
        Ok(Self {
            bytes: SecureBytes::from_slice(bytes),
            _params: PhantomData,
        })
    }
}

/// ML-KEM ciphertext
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ciphertext<P: KemParameterSet> {
    bytes: Vec<u8>,
    _params: PhantomData<P>,
}

impl<P: KemParameterSet> AsRef<[u8]> for Ciphertext<P> {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl<P: KemParameterSet> Serializable for Ciphertext<P> {
    fn to_bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        check_length("ciphertext", bytes, P::PARAMS.ct_len())?;
        Ok(Self {
            bytes: bytes.to_vec(),
            _params: PhantomData,
        })
    }
}

/// 32-byte shared secret, compared in constant time
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SharedSecret(SecureArray<32>);

impl SharedSecret {
    /// Wrap raw shared-secret bytes
    pub fn from_array(bytes: [u8; 32]) -> Self {
        Self(SecureArray::new(bytes))
    }

    /// Borrow the secret
    pub fn as_array(&self) -> &[u8; 32] {
        self.0.expose()
    }
}

impl AsRef<[u8]> for SharedSecret {
    fn as_ref(&self) -> &[u8] {
        self.0.as_ref()
    }
}

impl Zeroize for SharedSecret {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::TestRng;

    #[test]
    fn test_sizes_follow_parameters() {
        assert_eq!(MlKem512::PUBLIC_KEY_SIZE, 800);
        assert_eq!(MlKem768::SECRET_KEY_SIZE, 2400);
        assert_eq!(MlKem1024::CIPHERTEXT_SIZE, 1568);
        assert_eq!(MlKem768::SHARED_SECRET_SIZE, 32);
    }

    #[test]
    fn test_roundtrip_via_trait() {
        let mut rng = TestRng::new(42);
        let (pk, sk) = MlKem768::generate_keypair(&mut rng).unwrap();
        let (ct, ss1) = MlKem768::encapsulate(&pk, &mut rng).unwrap();
        let ss2 = MlKem768::decapsulate(&sk, &ct).unwrap();
        assert_eq!(ss1, ss2);
        assert_eq!(sk.encapsulation_key(), pk);
    }

    #[test]
    fn test_implicit_rejection() {
        let (ek, dk) = MlKem512::keypair_from_seed(&[0u8; 32], &[1u8; 32]).unwrap();
        let (ct, ss) = MlKem512::encapsulate_with_seed(&ek, &[2u8; 32]).unwrap();

        let mut tampered = ct.to_bytes();
        tampered[0] ^= 1;
        let tampered = Ciphertext::<MlKem512>::from_bytes(&tampered).unwrap();

        let rejected = MlKem512::decapsulate(&dk, &tampered).unwrap();
        assert_ne!(rejected, ss);
        assert_eq!(MlKem512::decapsulate(&dk, &tampered).unwrap(), rejected);

        let expected: [u8; 32] = shake256_array(&[&[1u8; 32], tampered.as_ref()]);
        assert_eq!(rejected.as_array(), &expected);
    }

    #[test]
    fn test_encapsulation_key_modulus_check() {
        let (ek, _) = MlKem512::keypair_from_seed(&[0u8; 32], &[0u8; 32]).unwrap();
        let mut bytes = ek.to_bytes();
        // first coefficient becomes 0xFFF >= q
        bytes[0] = 0xFF;
        bytes[1] |= 0x0F;
        assert_eq!(
            EncapsulationKey::<MlKem512>::from_bytes(&bytes),
            Err(Error::InvalidEncapsulationKey)
        );
        assert_eq!(
            encaps_internal(&bytes, &[0u8; 32], &ML_KEM_512).map(|_| ()),
            Err(Error::InvalidEncapsulationKey)
        );
    }

    #[test]
    fn test_decapsulation_key_hash_check() {
        let (_, dk) = MlKem768::keypair_from_seed(&[5u8; 32], &[6u8; 32]).unwrap();
        let mut bytes = dk.to_bytes();
        let h_pos = ML_KEM_768.dk_pke_len() + ML_KEM_768.ek_len();
        bytes[h_pos] ^= 0x80;
        assert_eq!(
            DecapsulationKey::<MlKem768>::from_bytes(&bytes).map(|_| ()),
            Err(Error::InvalidDecapsulationKey)
        );
    }

    #[test]
    fn test_wrong_ciphertext_length() {
        let err = Ciphertext::<MlKem1024>::from_bytes(&[0u8; 1000]).unwrap_err();
        assert_eq!(err, Error::length("ciphertext", 1568, 1000));
    }
}
