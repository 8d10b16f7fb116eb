//! Tests for the byte-level API module
//!
//! These tests drive every supported algorithm through the dispatching
//! functions and check error and metrics behaviour.

use synapsed_pqc::api::*;
use synapsed_pqc::error::Error;
use synapsed_pqc::observability;
use synapsed_pqc::random::{DefaultRng, TestRng};

#[test]
fn test_kem_algorithms_basic_operations() {
    for alg in KemAlgorithm::ALL {
        let mut rng = DefaultRng::default();

        let (pk, sk) = generate_keypair(alg, &mut rng).unwrap();
        assert_eq!(pk.len(), alg.public_key_size());
        assert_eq!(sk.len(), alg.secret_key_size());

        let (ct, ss1) = encapsulate(alg, &pk, &mut rng).unwrap();
        assert_eq!(ct.len(), alg.ciphertext_size());
        assert_eq!(ss1.len(), alg.shared_secret_size());

        let ss2 = decapsulate(alg, sk.as_ref(), &ct).unwrap();
        assert_eq!(ss1, ss2);
    }
}

#[test]
fn test_signature_algorithms_basic_operations() {
    let test_messages: &[&[u8]] = &[b"", b"Hello, World!", &[0xAB; 1000]];

    for alg in SignatureAlgorithm::ALL {
        let mut rng = TestRng::new(alg.signature_size() as u64);
        let (pk, sk) = generate_signing_keypair(alg, &mut rng).unwrap();
        assert_eq!(pk.len(), alg.public_key_size());
        assert_eq!(sk.len(), alg.secret_key_size());

        // 128s signing is slow, one message is enough
        let count = if alg == SignatureAlgorithm::SlhDsaShake128s { 1 } else { test_messages.len() };
        for msg in &test_messages[..count] {
            let sig = sign(alg, sk.as_ref(), msg, &mut rng).unwrap();
            assert_eq!(sig.len(), alg.signature_size());
            assert!(verify(alg, &pk, msg, &sig).unwrap(), "{alg}");
            assert!(!verify(alg, &pk, b"wrong message", &sig).unwrap(), "{alg}");
        }
    }
}

#[test]
fn test_deterministic_and_context_signing() {
    let mut rng = TestRng::new(3);
    let alg = SignatureAlgorithm::MlDsa44;
    let (pk, sk) = generate_signing_keypair(alg, &mut rng).unwrap();

    let a = sign_deterministic(alg, sk.as_ref(), b"msg").unwrap();
    let b = sign_deterministic(alg, sk.as_ref(), b"msg").unwrap();
    assert_eq!(a, b);
    assert!(verify(alg, &pk, b"msg", &a).unwrap());

    let sig = sign_with_context(alg, sk.as_ref(), b"msg", b"app-v1", &mut rng).unwrap();
    assert!(verify_with_context(alg, &pk, b"msg", b"app-v1", &sig).unwrap());
    assert!(!verify(alg, &pk, b"msg", &sig).unwrap());
}

#[test]
fn test_kem_error_handling() {
    let mut rng = TestRng::new(4);
    let alg = KemAlgorithm::MlKem768;

    let result = encapsulate(alg, &[0u8; 100], &mut rng);
    assert!(matches!(
        result,
        Err(Error::InvalidLength { expected: 1184, actual: 100, .. })
    ));

    // 0xFF 0xFF 0xFF decodes to 4095 > q
    let mut bad_pk = vec![0u8; alg.public_key_size()];
    bad_pk[..3].copy_from_slice(&[0xFF, 0xFF, 0xFF]);
    assert_eq!(
        encapsulate(alg, &bad_pk, &mut rng).unwrap_err(),
        Error::InvalidEncapsulationKey
    );

    let (pk, sk) = generate_keypair(alg, &mut rng).unwrap();
    let (ct, _) = encapsulate(alg, &pk, &mut rng).unwrap();
    assert!(matches!(
        decapsulate(alg, &[0u8; 100], &ct),
        Err(Error::InvalidLength { .. })
    ));
    assert!(matches!(
        decapsulate(alg, sk.as_ref(), &[0u8; 100]),
        Err(Error::InvalidLength { .. })
    ));

    let mut bad_sk = sk.as_ref().to_vec();
    let h_pos = bad_sk.len() - 64;
    bad_sk[h_pos] ^= 1;
    assert_eq!(
        decapsulate(alg, &bad_sk, &ct).unwrap_err(),
        Error::InvalidDecapsulationKey
    );
}

#[test]
fn test_signature_error_handling() {
    let mut rng = TestRng::new(5);
    let alg = SignatureAlgorithm::MlDsa65;
    let (pk, sk) = generate_signing_keypair(alg, &mut rng).unwrap();
    let sig = sign(alg, sk.as_ref(), b"m", &mut rng).unwrap();

    assert!(sign(alg, &[0u8; 10], b"m", &mut rng).is_err());
    assert!(verify(alg, &[0u8; 10], b"m", &sig).is_err());
    assert!(verify(alg, &pk, b"m", &sig[..sig.len() - 1]).is_err());
    assert_eq!(
        sign_with_context(alg, sk.as_ref(), b"m", &[0u8; 256], &mut rng).unwrap_err(),
        Error::ContextTooLong { len: 256 }
    );
}

#[test]
fn test_operations_are_recorded() {
    let before = observability::global().get_metrics();
    let mut rng = TestRng::new(6);
    let alg = KemAlgorithm::MlKem512;
    let (pk, sk) = generate_keypair(alg, &mut rng).unwrap();
    let (ct, _) = encapsulate(alg, &pk, &mut rng).unwrap();
    decapsulate(alg, sk.as_ref(), &ct).unwrap();
    let _ = encapsulate(alg, &[0u8; 3], &mut rng);

    // other tests share the global sink, so only lower bounds hold
    let after = observability::global().get_metrics();
    assert!(after.total_operations >= before.total_operations + 4);
    assert!(after.key_generations > before.key_generations);
    assert!(after.encapsulations > before.encapsulations);
    assert!(after.decapsulations > before.decapsulations);
    assert!(after.failed_operations > before.failed_operations);
}

#[test]
fn test_algorithm_names_parse() {
    for alg in KemAlgorithm::ALL {
        assert_eq!(alg.to_string().parse::<KemAlgorithm>().unwrap(), alg);
        assert_eq!(alg.name().parse::<Algorithm>().unwrap(), Algorithm::Kem(alg));
    }
    for alg in SignatureAlgorithm::ALL {
        assert_eq!(alg.name().parse::<SignatureAlgorithm>().unwrap(), alg);
        assert_eq!(
            alg.name().parse::<Algorithm>().unwrap(),
            Algorithm::Signature(alg)
        );
    }
    assert_eq!("ml-kem-768".parse::<KemAlgorithm>().unwrap(), KemAlgorithm::MlKem768);
    assert_eq!(
        "RSA-2048".parse::<Algorithm>().unwrap_err(),
        Error::UnknownAlgorithm
    );
}

#[test]
fn test_keypair_struct() {
    let mut rng = TestRng::new(7);
    let kp = KeyPair::generate(Algorithm::Kem(KemAlgorithm::MlKem512), &mut rng).unwrap();
    assert_eq!(kp.public_key().len(), 800);
    assert_eq!(kp.secret_key().len(), 1632);
    assert_eq!(kp.public_key_hex().len(), 1600);

    let alg = SignatureAlgorithm::MlDsa44;
    let kp = KeyPair::generate(Algorithm::Signature(alg), &mut rng).unwrap();
    let sig = sign(alg, kp.secret_key(), b"kp", &mut rng).unwrap();
    assert!(verify(alg, kp.public_key(), b"kp", &sig).unwrap());
}

#[test]
fn test_security_level_recommendations() {
    assert_eq!(SecurityLevel::Standard.recommended_kem(), KemAlgorithm::MlKem512);
    assert_eq!(SecurityLevel::High.recommended_kem(), KemAlgorithm::MlKem768);
    assert_eq!(
        SecurityLevel::VeryHigh.recommended_signature(),
        SignatureAlgorithm::MlDsa87
    );
    assert_eq!(SecurityLevel::VeryHigh.recommended_kem().security_level(), 5);
}

#[cfg(feature = "serde")]
#[test]
fn test_serde_representations() {
    let alg = Algorithm::Signature(SignatureAlgorithm::SlhDsaShake128f);
    let json = serde_json::to_string(&alg).unwrap();
    assert_eq!(serde_json::from_str::<Algorithm>(&json).unwrap(), alg);

    let metrics = observability::CryptoObservability::new("serde").get_metrics();
    let json = serde_json::to_string(&metrics).unwrap();
    assert!(json.contains("\"total_operations\":0"));
}
