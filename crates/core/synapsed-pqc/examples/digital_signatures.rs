//! Digital signature example using ML-DSA and SLH-DSA
//!
//! This example demonstrates how to:
//! - Generate signing keypairs
//! - Sign messages with and without a context string
//! - Verify signatures and detect tampering
//! - Compare lattice and hash-based signature sizes

use std::time::Instant;
use synapsed_pqc::prelude::*;
use synapsed_pqc::random::DefaultRng;
use tracing_subscriber::EnvFilter;

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Synapsed PQC: Digital Signatures Example ===\n");
    let mut rng = DefaultRng::default();

    // Step 1: Generate an ML-DSA keypair
    println!("1. Generating ML-DSA-65 keypair...");
    let start = Instant::now();
    let (public_key, secret_key) = MlDsa65::generate_keypair(&mut rng)?;
    println!("   ✓ Public key size: {} bytes", public_key.to_bytes().len());
    println!("   ✓ Secret key size: {} bytes", secret_key.to_bytes().len());
    println!("   ✓ Generation time: {:?}", start.elapsed());

    // Step 2: Sign a message
    println!("\n2. Signing a message...");
    let message = b"Important document: Transfer 1000 units to account XYZ";
    let start = Instant::now();
    let signature = MlDsa65::sign(&secret_key, message, &mut rng)?;
    println!("   ✓ Signature size: {} bytes", signature.as_ref().len());
    println!("   ✓ Signing time: {:?}", start.elapsed());

    // Step 3: Verify
    println!("\n3. Verifying signature...");
    match MlDsa65::verify(&public_key, message, &signature) {
        Ok(true) => println!("   ✓ Signature is valid"),
        Ok(false) => println!("   ✗ Signature is invalid"),
        Err(e) => println!("   ✗ Verification failed: {e}"),
    }

    // Step 4: Hedged vs deterministic signing
    println!("\n4. Hedged and deterministic signing...");
    let hedged = MlDsa65::sign(&secret_key, message, &mut rng)?;
    println!("   ✓ Hedged signatures differ: {}", hedged != signature);
    let d1 = MlDsa65::sign_deterministic(&secret_key, message)?;
    let d2 = MlDsa65::sign_deterministic(&secret_key, message)?;
    println!("   ✓ Deterministic signatures match: {}", d1 == d2);

    // Step 5: Context strings bind a signature to a domain
    println!("\n5. Context strings...");
    let ctx = b"payments-v1";
    let bound = MlDsa65::sign_with_context(&secret_key, message, ctx, &mut rng)?;
    println!(
        "   ✓ Verifies under its context: {}",
        MlDsa65::verify_with_context(&public_key, message, ctx, &bound)?
    );
    println!(
        "   ✓ Verifies without it: {}",
        MlDsa65::verify(&public_key, message, &bound)?
    );

    // Step 6: Tampering
    println!("\n6. Tampered message...");
    let tampered = b"Important document: Transfer 9000 units to account XYZ";
    println!(
        "   ✓ Tampered message verifies: {}",
        MlDsa65::verify(&public_key, tampered, &signature)?
    );

    // Step 7: Hash-based signatures
    println!("\n7. SLH-DSA-SHAKE-128f (stateless hash-based)...");
    let (slh_pk, slh_sk) = SlhDsaShake128f::generate_keypair(&mut rng)?;
    let start = Instant::now();
    let slh_sig = SlhDsaShake128f::sign(&slh_sk, message, &mut rng)?;
    println!("   ✓ Signing time: {:?}", start.elapsed());
    println!(
        "   ✓ Valid: {}",
        SlhDsaShake128f::verify(&slh_pk, message, &slh_sig)?
    );

    println!("\n8. Size comparison:");
    for algorithm in SignatureAlgorithm::ALL {
        println!(
            "   {algorithm:<20} pk {:>5} B | sk {:>5} B | sig {:>6} B",
            algorithm.public_key_size(),
            algorithm.secret_key_size(),
            algorithm.signature_size()
        );
    }

    Ok(())
}
