//! Known-answer tests
//!
//! Fixed seeds are fed through the deterministic internal algorithms and the
//! outputs compared against an independent FIPS 203/204/205 implementation.
//! Large outputs are compared by their SHA3-256 digest.

use synapsed_pqc::dsa;
use synapsed_pqc::hash::sha3_256;
use synapsed_pqc::kem;
use synapsed_pqc::params::dsa::{DsaParams, ML_DSA_44, ML_DSA_65, ML_DSA_87};
use synapsed_pqc::params::kem::{KemParams, ML_KEM_1024, ML_KEM_512, ML_KEM_768};
use synapsed_pqc::params::slh::{SlhParams, SLH_DSA_SHAKE_128F, SLH_DSA_SHAKE_128S};
use synapsed_pqc::slh;

fn digest(bytes: &[u8]) -> String {
    hex::encode(sha3_256(&[bytes]))
}

struct KemVector {
    params: KemParams,
    ek_prefix: &'static str,
    ek_digest: &'static str,
    dk_digest: &'static str,
    ct_digest: &'static str,
    shared_secret: &'static str,
    rejection_secret: &'static str,
}

const KEM_VECTORS: [KemVector; 3] = [
    KemVector {
        params: ML_KEM_512,
        ek_prefix: "df17848677416e954d66f9b09e128153",
        ek_digest: "e5bd1b37a75e0f092974e846e8c37c45487d60739f99351719a5394723262b3b",
        dk_digest: "37c3dc6fa2459a2308f3c69fd4a1565ebf2eeef769d6b1a26018fa38b207ef96",
        ct_digest: "6b02d0a055b2d5c2c757a8823294dfe8c9eb9c19cabbbea375de5ca20b5ff1b0",
        shared_secret: "805b31f67005a4b1a02692e6d92a96e2bc11f6960d06b75d8e24d4e6269f54a5",
        rejection_secret: "fe2eeb75f9fd7885a48b405f175f58e8a51790e73978b2d6b96b81995e48bf3d",
    },
    KemVector {
        params: ML_KEM_768,
        ek_prefix: "254a797885c63b1440aa389c65340ef3",
        ek_digest: "07f81a8b0e266a3ee92d3a63cdae5cff921905544c9dd797a849e1d054180eca",
        dk_digest: "4d870d492a5eabd7f9dd6ad56d36a4295bdd5343976a6037ae614e601ad271ae",
        ct_digest: "b53b8532b3e86dd5a2ed1fdd67ca6c25d0d9c8b5659ce67e370b29d4aead63e5",
        shared_secret: "bbc8c4442ddf85935c2478d3e246a5d827066cbd8b45f110a91b38c305e9bf4d",
        rejection_secret: "3a78268e199d7bc381ba50d2402e42e33d5c35b84d567eba6b49c35daa4df074",
    },
    KemVector {
        params: ML_KEM_1024,
        ek_prefix: "b1572c900b8b8202357437819c129e3c",
        ek_digest: "9f62e8c88195d7ad50b14514fbe94a887554204da7a40dafbe72c5e15d39e969",
        dk_digest: "24cc9517ae1294451603e52796d202ddc9f65b1fc24060eb3b84a85454b839a2",
        ct_digest: "53ef73abd15bfae05d6f05a2465a36101433439dfae513a360b3218244bda74c",
        shared_secret: "17414ae4c6789685f48c54e356257ef7d586d9d5a0b4a7033c4656aaf4705b69",
        rejection_secret: "ad840c4b4a5af61e7828355d9bb3fb9467469d05e7bc59558a5b7979263549e8",
    },
];

#[test]
fn test_ml_kem_known_answers() {
    let d = [0u8; 32];
    let z = [1u8; 32];
    let mut m = [0u8; 32];
    for (i, byte) in m.iter_mut().enumerate() {
        *byte = i as u8;
    }

    for vector in &KEM_VECTORS {
        let name = vector.params.name;
        let (ek, dk) = kem::keygen_internal(&d, &z, &vector.params).unwrap();
        assert_eq!(hex::encode(&ek[..16]), vector.ek_prefix, "{name} ek prefix");
        assert_eq!(digest(&ek), vector.ek_digest, "{name} ek");
        assert_eq!(digest(dk.as_ref()), vector.dk_digest, "{name} dk");

        let (ct, k) = kem::encaps_internal(&ek, &m, &vector.params).unwrap();
        assert_eq!(digest(&ct), vector.ct_digest, "{name} ct");
        assert_eq!(hex::encode(k.expose()), vector.shared_secret, "{name} K");

        let recovered = kem::decaps_internal(dk.as_ref(), &ct, &vector.params).unwrap();
        assert_eq!(recovered, k, "{name} decaps");

        let mut tampered = ct.clone();
        tampered[0] ^= 1;
        let rejected = kem::decaps_internal(dk.as_ref(), &tampered, &vector.params).unwrap();
        assert_eq!(hex::encode(rejected.expose()), vector.rejection_secret, "{name} K-bar");
    }
}

struct DsaVector {
    params: DsaParams,
    pk_prefix: &'static str,
    pk_digest: &'static str,
    sk_digest: &'static str,
    sig_digest: &'static str,
    sig_ctx_digest: &'static str,
}

const DSA_VECTORS: [DsaVector; 3] = [
    DsaVector {
        params: ML_DSA_44,
        pk_prefix: "ba71f9f64e11baeb58fa9c6fbb6e14e6",
        pk_digest: "0f3cf699dcd46ec303d7bf35b185988d452dfde433ada2413f1f0604d91c1d6a",
        sk_digest: "389cc952935bd876a4ed2c48b625f530bb9c012ddd8a1d1055e112c089e9fdcf",
        sig_digest: "a198a36fc0d6706d2a95f8987a49b413f8b30ff18926bf06fd9179f2657a3c68",
        sig_ctx_digest: "1de66ea2f45cf2c49e33d754afc20797d99b728ac9a9fa4d8daa09d9e4cce725",
    },
    DsaVector {
        params: ML_DSA_65,
        pk_prefix: "424b2f267e58d5b3b44d71acfc6a656b",
        pk_digest: "b0681bf95c4068feb39a3099dbcc299108cc779dbeed196debdea877074a37aa",
        sk_digest: "621bf6e9fdcbfc369b6f8789057b8ad20d2176c5ead9a9f066c1b22dd19710bb",
        sig_digest: "b7b774ff71031f2d1054c29ef8324a187312572a6b3daf5519ac6b00904e6789",
        sig_ctx_digest: "7a9a7f1a7f8369a80f565e717f0a07976d3950bbb95a74f15b38263b60b133ba",
    },
    DsaVector {
        params: ML_DSA_87,
        pk_prefix: "e45ffc8cc73db885dc662e62a18cd8e3",
        pk_digest: "7c85a243530be895a0d736cb9d79a7135be5ac80a224d6ea89d01bdc4771cddf",
        sk_digest: "1bf807bc5e11067234e9617099d5bfe11740fe14d4ca628e81941c1c53b9aaf4",
        sig_digest: "46ee2e984a3e3c67caeeb4b58cceab32de3e73764f7a2642a436e91ff52b0149",
        sig_ctx_digest: "0903640e3b38b64659bae70ef70fa9c36672ef96bb118ebed85e83baef747f9b",
    },
];

#[test]
fn test_ml_dsa_known_answers() {
    let xi = [0u8; 32];
    let rnd = [0u8; 32];

    for vector in &DSA_VECTORS {
        let name = vector.params.name;
        let (pk, sk) = dsa::keygen_internal(&xi, &vector.params).unwrap();
        assert_eq!(hex::encode(&pk[..16]), vector.pk_prefix, "{name} pk prefix");
        assert_eq!(digest(&pk), vector.pk_digest, "{name} pk");
        assert_eq!(digest(sk.as_ref()), vector.sk_digest, "{name} sk");

        let sig = dsa::sign(sk.as_ref(), b"hello", b"", &rnd, &vector.params).unwrap();
        assert_eq!(digest(&sig), vector.sig_digest, "{name} sig");
        assert!(dsa::verify(&pk, b"hello", b"", &sig, &vector.params).unwrap());

        let sig_ctx = dsa::sign(sk.as_ref(), b"hello", b"ctx", &rnd, &vector.params).unwrap();
        assert_eq!(digest(&sig_ctx), vector.sig_ctx_digest, "{name} sig with context");
        assert!(dsa::verify(&pk, b"hello", b"ctx", &sig_ctx, &vector.params).unwrap());
    }
}

struct SlhVector {
    params: SlhParams,
    pk: &'static str,
    sig_digest: &'static str,
    hedged_ctx_digest: &'static str,
}

const SLH_VECTORS: [SlhVector; 2] = [
    SlhVector {
        params: SLH_DSA_SHAKE_128S,
        pk: "03030303030303030303030303030303e44a5f240c54e64459aded34d1c263f6",
        sig_digest: "0fb7cd985adbb12e0f0fa6a4e1acffac8a84104662dc2237848c70901e4d49b9",
        hedged_ctx_digest: "fe22f57442dd2b259b29f24925c5872cc35cf9717e3a930a78bcd608a3c00f96",
    },
    SlhVector {
        params: SLH_DSA_SHAKE_128F,
        pk: "0303030303030303030303030303030372e8a228409ff5093a981b1f4d45365f",
        sig_digest: "e36122c846a6971107731ed313c686b9f3d97185f5d5cd2ff38098aea3bcb6d9",
        hedged_ctx_digest: "8e6fa9fc745f68a2751b4474de6d48acffee67e46efc8e8b4b46895111e642a4",
    },
];

#[test]
fn test_slh_dsa_known_answers() {
    let (sk_seed, sk_prf, pk_seed) = ([1u8; 16], [2u8; 16], [3u8; 16]);
    let addrnd = [4u8; 16];

    for vector in &SLH_VECTORS {
        let name = vector.params.name;
        let (pk, sk) =
            slh::keygen_internal(&sk_seed, &sk_prf, &pk_seed, &vector.params).unwrap();
        assert_eq!(hex::encode(&pk), vector.pk, "{name} pk");
        assert_eq!(&sk.as_ref()[32..], pk.as_slice(), "{name} sk tail");

        let sig = slh::sign(sk.as_ref(), b"hello", b"", None, &vector.params).unwrap();
        assert_eq!(sig.len(), vector.params.sig_len(), "{name} sig length");
        assert_eq!(
            hex::encode(&sig[..16]),
            "676f0557c01ddde9839c898a7c2558d4",
            "{name} R"
        );
        assert_eq!(digest(&sig), vector.sig_digest, "{name} sig");
        assert!(slh::verify(&pk, b"hello", b"", &sig, &vector.params).unwrap());

        let hedged = slh::sign(
            sk.as_ref(),
            b"hello",
            b"ctx",
            Some(addrnd.as_slice()),
            &vector.params,
        )
        .unwrap();
        assert_eq!(digest(&hedged), vector.hedged_ctx_digest, "{name} hedged sig with context");
        assert!(slh::verify(&pk, b"hello", b"ctx", &hedged, &vector.params).unwrap());
    }
}

#[test]
fn test_sha3_reference_digests() {
    assert_eq!(
        digest(b""),
        "a7ffc6f8bf1ed76651c14756a061d662f580ff4de43b49fa82d80a4b80f8434a"
    );
    assert_eq!(
        hex::encode(synapsed_pqc::hash::shake256(&[b"".as_slice()], 32)),
        "46b9dd2b0ba88d13233b3feb743eeb243fcd52ea62b81b82b50c27646ed5762f"
    );
}
