//! Key encapsulation example using ML-KEM
//!
//! This example demonstrates how to:
//! - Generate ML-KEM keypairs at each security level
//! - Encapsulate and decapsulate a shared secret
//! - Observe implicit rejection of a tampered ciphertext
//! - Use the byte-level API and read its metrics
//!
//! Run with `RUST_LOG=synapsed_pqc=debug` to see the library's tracing output.

use std::time::Instant;
use synapsed_pqc::kem::Ciphertext;
use synapsed_pqc::observability;
use synapsed_pqc::prelude::*;
use synapsed_pqc::random::DefaultRng;
use tracing_subscriber::EnvFilter;

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Synapsed PQC: Key Encapsulation Example ===\n");
    let mut rng = DefaultRng::default();

    // Step 1: Typed interface
    println!("1. Generating an ML-KEM-768 keypair...");
    let start = Instant::now();
    let (public_key, secret_key) = MlKem768::generate_keypair(&mut rng)?;
    println!("   ✓ Encapsulation key: {} bytes", public_key.to_bytes().len());
    println!("   ✓ Decapsulation key: {} bytes", secret_key.to_bytes().len());
    println!("   ✓ Generation time: {:?}", start.elapsed());

    println!("\n2. Encapsulating a shared secret...");
    let (ciphertext, sender_secret) = MlKem768::encapsulate(&public_key, &mut rng)?;
    println!("   ✓ Ciphertext: {} bytes", ciphertext.as_ref().len());

    let receiver_secret = MlKem768::decapsulate(&secret_key, &ciphertext)?;
    if receiver_secret == sender_secret {
        println!("   ✓ Both sides derived the same 32-byte secret");
    } else {
        println!("   ✗ Shared secrets differ");
    }

    // Step 3: Implicit rejection
    println!("\n3. Decapsulating a tampered ciphertext...");
    let mut tampered = ciphertext.to_bytes();
    tampered[0] ^= 0x01;
    let tampered = Ciphertext::<MlKem768>::from_bytes(&tampered)?;
    let rejected = MlKem768::decapsulate(&secret_key, &tampered)?;
    if rejected != sender_secret {
        println!("   ✓ No error, but the secret is unrelated to the real one");
    }

    // Step 4: Byte-level API over every parameter set
    println!("\n4. Byte-level API:");
    for algorithm in KemAlgorithm::ALL {
        let start = Instant::now();
        let (pk, sk) = generate_keypair(algorithm, &mut rng)?;
        let (ct, ss) = encapsulate(algorithm, &pk, &mut rng)?;
        let recovered = decapsulate(algorithm, sk.as_ref(), &ct)?;
        println!(
            "   {algorithm:<12} level {} | ek {:>4} B | ct {:>4} B | agree: {} | {:?}",
            algorithm.security_level(),
            pk.len(),
            ct.len(),
            ss == recovered,
            start.elapsed()
        );
    }

    let metrics = observability::global().get_metrics();
    println!("\n5. Metrics:");
    println!("   operations: {}", metrics.total_operations);
    println!("   average:    {:.3} ms", metrics.avg_duration_ms);

    Ok(())
}
