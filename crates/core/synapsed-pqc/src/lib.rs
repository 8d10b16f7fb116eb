//! # Synapsed PQC
//!
//! Post-quantum key encapsulation and signatures for the Synapsed stack,
//! implementing the three NIST standards:
//!
//! - **ML-KEM** (FIPS 203): module-lattice key encapsulation, [`kem`]
//! - **ML-DSA** (FIPS 204): module-lattice signatures, [`dsa`]
//! - **SLH-DSA** (FIPS 205): stateless hash-based signatures, [`slh`]
//!
//! Every scheme is deterministic given its seeds, so the internal entry
//! points (`keygen_internal`, `encaps_internal`, `sign_internal`) reproduce
//! known-answer tests byte for byte. The typed interface goes through the
//! [`Kem`] and [`Signature`] traits, and [`api`] wraps it in a byte-level
//! interface selected by algorithm name.
//!
//! ## Quick Start
//!
//! ```no_run
//! use synapsed_pqc::prelude::*;
//! use synapsed_pqc::random::DefaultRng;
//!
//! # fn main() -> synapsed_pqc::Result<()> {
//! let mut rng = DefaultRng::default();
//!
//! // Key exchange
//! let (ek, dk) = MlKem768::generate_keypair(&mut rng)?;
//! let (ct, shared) = MlKem768::encapsulate(&ek, &mut rng)?;
//! assert_eq!(MlKem768::decapsulate(&dk, &ct)?, shared);
//!
//! // Signatures
//! let (pk, sk) = MlDsa65::generate_keypair(&mut rng)?;
//! let sig = MlDsa65::sign_with_context(&sk, b"message", b"app-v1", &mut rng)?;
//! assert!(MlDsa65::verify_with_context(&pk, b"message", b"app-v1", &sig)?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Security Levels
//!
//! | Algorithm | NIST Level | Public key | Ciphertext / signature |
//! |-----------|------------|------------|------------------------|
//! | ML-KEM-512 | 1 | 800 | 768 |
//! | ML-KEM-768 | 3 | 1184 | 1088 |
//! | ML-KEM-1024 | 5 | 1568 | 1568 |
//! | ML-DSA-44 | 2 | 1312 | 2420 |
//! | ML-DSA-65 | 3 | 1952 | 3309 |
//! | ML-DSA-87 | 5 | 2592 | 4627 |
//! | SLH-DSA-SHAKE-128s | 1 | 32 | 7856 |
//! | SLH-DSA-SHAKE-128f | 1 | 32 | 17088 |
//!
//! ## Module Structure
//!
//! - [`ntt`], [`poly`]: ring arithmetic for both lattice moduli
//! - [`sampling`], [`encoding`]: seed expansion and byte formats
//! - [`kem`], [`dsa`], [`slh`]: the schemes
//! - [`api`]: byte-level functions keyed by algorithm
//! - [`observability`]: operation counters fed by [`api`]
//!
//! ## Security Considerations
//!
//! Secret keys and shared secrets are held in zeroizing wrappers and are
//! compared in constant time. Decapsulation never reports a bad ciphertext;
//! it returns the implicit rejection secret instead. This library has not
//! had a formal audit.

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    unused_qualifications,
    missing_debug_implementations
)]

pub use crate::error::{Error, Result};
pub use crate::traits::{Kem, SecureRandom, Signature};

// Core modules
pub mod constant_time;
pub mod error;
pub mod params;
pub mod secure_memory;
pub mod traits;

// Primitives
pub mod encoding;
pub mod hash;
pub mod ntt;
pub mod poly;
pub mod random;
pub mod sampling;

// Schemes
pub mod dsa;
pub mod kem;
pub mod slh;

pub mod api;
pub mod observability;

pub mod prelude {
    //! Common imports
    //!
    //! ```
    //! use synapsed_pqc::prelude::*;
    //! ```

    pub use crate::{
        api::{
            decapsulate, encapsulate, generate_keypair, generate_signing_keypair, sign,
            sign_deterministic, sign_with_context, verify, verify_with_context, Algorithm,
            KemAlgorithm, KeyPair, SecurityLevel, SignatureAlgorithm,
        },
        dsa::{DsaParameterSet, MlDsa44, MlDsa65, MlDsa87},
        kem::{KemParameterSet, MlKem1024, MlKem512, MlKem768},
        slh::{SlhDsaShake128f, SlhDsaShake128s, SlhParameterSet},
        traits::Serializable,
        Error, Kem, Result, SecureRandom, Signature,
    };
}
