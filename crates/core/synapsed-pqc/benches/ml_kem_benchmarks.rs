//! Benchmarks for the ML-KEM key encapsulation mechanism
//!
//! This benchmark suite measures the performance of:
//! - Key generation
//! - Encapsulation
//! - Decapsulation (valid and implicitly rejected ciphertexts)
//! - Key parsing with the modulus check
//!
//! For all three parameter sets (ML-KEM-512, ML-KEM-768, ML-KEM-1024)

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use synapsed_pqc::kem::{Ciphertext, EncapsulationKey, KemParameterSet, MlKem1024, MlKem512, MlKem768};
use synapsed_pqc::random::DefaultRng;
use synapsed_pqc::traits::{Kem, Serializable};

fn bench_keygen<K: KemParameterSet>(c: &mut Criterion, group_name: &str) {
    let mut group = c.benchmark_group(group_name);
    let name = K::PARAMS.name;

    group.bench_function(BenchmarkId::new("keygen", name), |b| {
        let mut rng = DefaultRng::default();
        b.iter(|| {
            let (pk, sk) = K::generate_keypair(&mut rng).unwrap();
            black_box((pk, sk))
        });
    });

    group.bench_function(BenchmarkId::new("keygen_from_seed", name), |b| {
        b.iter(|| black_box(K::keypair_from_seed(black_box(&[7u8; 32]), &[8u8; 32]).unwrap()));
    });

    group.finish();
}

fn bench_encaps_decaps<K: KemParameterSet>(c: &mut Criterion, group_name: &str) {
    let mut group = c.benchmark_group(group_name);
    let name = K::PARAMS.name;

    let mut rng = DefaultRng::default();
    let (pk, sk) = K::generate_keypair(&mut rng).unwrap();
    let (ct, _) = K::encapsulate(&pk, &mut rng).unwrap();
    let mut tampered = ct.to_bytes();
    tampered[0] ^= 1;
    let tampered = Ciphertext::<K>::from_bytes(&tampered).unwrap();
    let pk_bytes = pk.to_bytes();

    group.bench_function(BenchmarkId::new("encapsulate", name), |b| {
        let mut rng = DefaultRng::default();
        b.iter(|| {
            let (ct, ss) = K::encapsulate(&pk, &mut rng).unwrap();
            black_box((ct, ss))
        });
    });

    group.bench_function(BenchmarkId::new("decapsulate", name), |b| {
        b.iter(|| black_box(K::decapsulate(&sk, black_box(&ct)).unwrap()));
    });

    group.bench_function(BenchmarkId::new("decapsulate_rejected", name), |b| {
        b.iter(|| black_box(K::decapsulate(&sk, black_box(&tampered)).unwrap()));
    });

    group.bench_function(BenchmarkId::new("parse_encapsulation_key", name), |b| {
        b.iter(|| black_box(EncapsulationKey::<K>::from_bytes(black_box(&pk_bytes)).unwrap()));
    });

    group.finish();
}

fn bench_ml_kem_keygen(c: &mut Criterion) {
    bench_keygen::<MlKem512>(c, "ml_kem_keygen");
    bench_keygen::<MlKem768>(c, "ml_kem_keygen");
    bench_keygen::<MlKem1024>(c, "ml_kem_keygen");
}

fn bench_ml_kem_operations(c: &mut Criterion) {
    bench_encaps_decaps::<MlKem512>(c, "ml_kem_operations");
    bench_encaps_decaps::<MlKem768>(c, "ml_kem_operations");
    bench_encaps_decaps::<MlKem1024>(c, "ml_kem_operations");
}

criterion_group!(benches, bench_ml_kem_keygen, bench_ml_kem_operations);
criterion_main!(benches);
