//! ML-KEM integration tests

use synapsed_pqc::error::Error;
use synapsed_pqc::kem::{
    Ciphertext, DecapsulationKey, EncapsulationKey, KemParameterSet, MlKem1024, MlKem512, MlKem768,
};
use synapsed_pqc::random::{DefaultRng, TestRng};
use synapsed_pqc::traits::{Kem, Serializable};

fn roundtrip<K: KemParameterSet>(seed: u64) {
    let mut rng = TestRng::new(seed);
    let (pk, sk) = K::generate_keypair(&mut rng).unwrap();
    assert_eq!(pk.as_ref().len(), K::PUBLIC_KEY_SIZE);
    assert_eq!(sk.as_ref().len(), K::SECRET_KEY_SIZE);

    let (ct, ss) = K::encapsulate(&pk, &mut rng).unwrap();
    assert_eq!(ct.as_ref().len(), K::CIPHERTEXT_SIZE);
    assert_eq!(ss.as_ref().len(), 32);
    assert_eq!(K::decapsulate(&sk, &ct).unwrap(), ss);
}

#[test]
fn test_roundtrip_all_levels() {
    roundtrip::<MlKem512>(1);
    roundtrip::<MlKem768>(2);
    roundtrip::<MlKem1024>(3);
}

#[test]
fn test_hundred_keypairs_agree() {
    let mut rng = TestRng::new(100);
    for _ in 0..100 {
        let (pk, sk) = MlKem512::generate_keypair(&mut rng).unwrap();
        let (ct, ss) = MlKem512::encapsulate(&pk, &mut rng).unwrap();
        assert_eq!(MlKem512::decapsulate(&sk, &ct).unwrap(), ss);
    }
}

#[test]
fn test_roundtrip_with_system_rng() {
    let mut rng = DefaultRng::default();
    for _ in 0..5 {
        let (pk, sk) = MlKem768::generate_keypair(&mut rng).unwrap();
        let (ct, ss) = MlKem768::encapsulate(&pk, &mut rng).unwrap();
        assert_eq!(MlKem768::decapsulate(&sk, &ct).unwrap(), ss);
    }
}

#[test]
fn test_key_generation_is_deterministic_in_seeds() {
    let (ek1, dk1) = MlKem768::keypair_from_seed(&[9u8; 32], &[8u8; 32]).unwrap();
    let (ek2, dk2) = MlKem768::keypair_from_seed(&[9u8; 32], &[8u8; 32]).unwrap();
    assert_eq!(ek1, ek2);
    assert_eq!(dk1.to_bytes(), dk2.to_bytes());

    let (ek3, _) = MlKem768::keypair_from_seed(&[9u8; 32], &[7u8; 32]).unwrap();
    // z only affects the decapsulation key
    assert_eq!(ek1, ek3);
}

#[test]
fn test_wrong_key_gives_different_secret() {
    let mut rng = TestRng::new(77);
    let (pk, _) = MlKem512::generate_keypair(&mut rng).unwrap();
    let (_, other_sk) = MlKem512::generate_keypair(&mut rng).unwrap();
    let (ct, ss) = MlKem512::encapsulate(&pk, &mut rng).unwrap();
    assert_ne!(MlKem512::decapsulate(&other_sk, &ct).unwrap(), ss);
}

#[test]
fn test_every_tampered_position_is_rejected_implicitly() {
    let (ek, dk) = MlKem512::keypair_from_seed(&[1u8; 32], &[2u8; 32]).unwrap();
    let (ct, ss) = MlKem512::encapsulate_with_seed(&ek, &[3u8; 32]).unwrap();
    let bytes = ct.to_bytes();
    for pos in [0, 1, 100, 639, 640, bytes.len() - 1] {
        let mut tampered = bytes.clone();
        tampered[pos] ^= 0x10;
        let tampered = Ciphertext::<MlKem512>::from_bytes(&tampered).unwrap();
        let rejected = MlKem512::decapsulate(&dk, &tampered).unwrap();
        assert_ne!(rejected, ss, "position {pos}");
    }
}

#[test]
fn test_serialization_roundtrip_preserves_function() {
    let mut rng = TestRng::new(5);
    let (pk, sk) = MlKem1024::generate_keypair(&mut rng).unwrap();
    let pk2 = EncapsulationKey::<MlKem1024>::from_bytes(&pk.to_bytes()).unwrap();
    let sk2 = DecapsulationKey::<MlKem1024>::from_bytes(&sk.to_bytes()).unwrap();
    let (ct, ss) = MlKem1024::encapsulate(&pk2, &mut rng).unwrap();
    let ct2 = Ciphertext::<MlKem1024>::from_bytes(&ct.to_bytes()).unwrap();
    assert_eq!(MlKem1024::decapsulate(&sk2, &ct2).unwrap(), ss);
}

#[test]
fn test_length_errors() {
    assert!(matches!(
        EncapsulationKey::<MlKem768>::from_bytes(&[0u8; 1183]),
        Err(Error::InvalidLength { expected: 1184, actual: 1183, .. })
    ));
    assert!(matches!(
        DecapsulationKey::<MlKem512>::from_bytes(&[0u8; 10]),
        Err(Error::InvalidLength { .. })
    ));
    assert!(Ciphertext::<MlKem512>::from_bytes(&[0u8; 769]).is_err());
}
