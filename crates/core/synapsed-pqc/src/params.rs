//! Algorithm parameters for ML-KEM, ML-DSA and SLH-DSA
//!
//! Each security level is an immutable configuration value. Selecting a
//! parameter set selects the whole scheme instance; it is passed explicitly
//! to every routine that needs it.

#[cfg(feature = "serde")]
use serde::Serialize;

/// Polynomial degree shared by both lattice schemes
pub const N: usize = 256;

/// Size of seeds, hashes and shared secrets in bytes
pub const SYMBYTES: usize = 32;

/// Bit length of a non-negative integer
pub(crate) const fn bitlen(x: u32) -> usize {
    (u32::BITS - x.leading_zeros()) as usize
}

/// ML-KEM (FIPS 203) parameters
pub mod kem {
    use super::*;

    /// Modulus q
    pub const Q: u32 = 3329;

    /// One ML-KEM parameter set
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "serde", derive(Serialize))]
    pub struct KemParams {
        /// Display name
        pub name: &'static str,
        /// Module dimension
        pub k: usize,
        /// Noise parameter for s, e and y
        pub eta1: usize,
        /// Noise parameter for e1 and e2
        pub eta2: usize,
        /// Compression width for u
        pub du: usize,
        /// Compression width for v
        pub dv: usize,
    }

    impl KemParams {
        /// K-PKE decryption key length (384k)
        pub const fn dk_pke_len(&self) -> usize {
            384 * self.k
        }

        /// Encapsulation key length (384k + 32)
        pub const fn ek_len(&self) -> usize {
            384 * self.k + SYMBYTES
        }

        /// Decapsulation key length (768k + 96)
        pub const fn dk_len(&self) -> usize {
            768 * self.k + 3 * SYMBYTES
        }

        /// Ciphertext length 32(du·k + dv)
        pub const fn ct_len(&self) -> usize {
            32 * (self.du * self.k + self.dv)
        }

        /// Shared secret length
        pub const fn ss_len(&self) -> usize {
            SYMBYTES
        }
    }

    /// ML-KEM-512 (NIST level 1)
    pub const ML_KEM_512: KemParams = KemParams {
        name: "ML-KEM-512",
        k: 2,
        eta1: 3,
        eta2: 2,
        du: 10,
        dv: 4,
    };

    /// ML-KEM-768 (NIST level 3)
    pub const ML_KEM_768: KemParams = KemParams {
        name: "ML-KEM-768",
        k: 3,
        eta1: 2,
        eta2: 2,
        du: 10,
        dv: 4,
    };

    /// ML-KEM-1024 (NIST level 5)
    pub const ML_KEM_1024: KemParams = KemParams {
        name: "ML-KEM-1024",
        k: 4,
        eta1: 2,
        eta2: 2,
        du: 11,
        dv: 5,
    };
}

/// ML-DSA (FIPS 204) parameters
pub mod dsa {
    use super::*;

    /// Modulus q
    pub const Q: u32 = 8_380_417;

    /// Dropped bits of t
    pub const D: usize = 13;

    /// One ML-DSA parameter set
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "serde", derive(Serialize))]
    pub struct DsaParams {
        /// Display name
        pub name: &'static str,
        /// Rows of A
        pub k: usize,
        /// Columns of A
        pub l: usize,
        /// Secret coefficient bound
        pub eta: u32,
        /// Number of ±1 coefficients in the challenge
        pub tau: usize,
        /// Collision strength of the challenge hash in bits
        pub lambda: usize,
        /// Mask coefficient range
        pub gamma1: u32,
        /// Low-order rounding range
        pub gamma2: u32,
        /// tau · eta
        pub beta: u32,
        /// Maximum number of ones in the hint
        pub omega: usize,
    }

    impl DsaParams {
        /// Length of the commitment hash c̃
        pub const fn c_tilde_len(&self) -> usize {
            self.lambda / 4
        }

        /// Bits per packed t1 coefficient
        pub const fn t1_bits(&self) -> usize {
            bitlen(Q - 1) - D
        }

        /// Bits per packed s1/s2 coefficient
        pub const fn eta_bits(&self) -> usize {
            bitlen(2 * self.eta)
        }

        /// Bits per packed z coefficient
        pub const fn z_bits(&self) -> usize {
            1 + bitlen(self.gamma1 - 1)
        }

        /// Largest w1 coefficient, (q−1)/(2γ2) − 1
        pub const fn w1_max(&self) -> u32 {
            (Q - 1) / (2 * self.gamma2) - 1
        }

        /// Bits per packed w1 coefficient
        pub const fn w1_bits(&self) -> usize {
            bitlen(self.w1_max())
        }

        /// Public key length
        pub const fn pk_len(&self) -> usize {
            SYMBYTES + 32 * self.k * self.t1_bits()
        }

        /// Private key length
        pub const fn sk_len(&self) -> usize {
            4 * SYMBYTES + 32 * (self.k + self.l) * self.eta_bits() + 32 * self.k * D
        }

        /// Signature length
        pub const fn sig_len(&self) -> usize {
            self.c_tilde_len() + 32 * self.l * self.z_bits() + self.omega + self.k
        }
    }

    /// ML-DSA-44 (NIST level 2)
    pub const ML_DSA_44: DsaParams = DsaParams {
        name: "ML-DSA-44",
        k: 4,
        l: 4,
        eta: 2,
        tau: 39,
        lambda: 128,
        gamma1: 1 << 17,
        gamma2: (Q - 1) / 88,
        beta: 78,
        omega: 80,
    };

    /// ML-DSA-65 (NIST level 3)
    pub const ML_DSA_65: DsaParams = DsaParams {
        name: "ML-DSA-65",
        k: 6,
        l: 5,
        eta: 4,
        tau: 49,
        lambda: 192,
        gamma1: 1 << 19,
        gamma2: (Q - 1) / 32,
        beta: 196,
        omega: 55,
    };

    /// ML-DSA-87 (NIST level 5)
    pub const ML_DSA_87: DsaParams = DsaParams {
        name: "ML-DSA-87",
        k: 8,
        l: 7,
        eta: 2,
        tau: 60,
        lambda: 256,
        gamma1: 1 << 19,
        gamma2: (Q - 1) / 32,
        beta: 120,
        omega: 75,
    };
}

/// SLH-DSA (FIPS 205) parameters, SHAKE instantiation
pub mod slh {
    use super::*;

    /// One SLH-DSA parameter set
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "serde", derive(Serialize))]
    pub struct SlhParams {
        /// Display name
        pub name: &'static str,
        /// Security parameter: hash output length in bytes
        pub n: usize,
        /// Total hypertree height
        pub h: usize,
        /// Hypertree layers
        pub d: usize,
        /// Height of one XMSS tree (h / d)
        pub hp: usize,
        /// FORS tree height
        pub a: usize,
        /// Number of FORS trees
        pub k: usize,
        /// log2 of the Winternitz parameter
        pub lg_w: usize,
        /// Message digest length in bytes
        pub m: usize,
    }

    impl SlhParams {
        /// Winternitz parameter w
        pub const fn w(&self) -> u32 {
            1 << self.lg_w
        }

        /// Message digits per WOTS+ signature
        pub const fn len1(&self) -> usize {
            (8 * self.n).div_ceil(self.lg_w)
        }

        /// Checksum digits per WOTS+ signature
        pub const fn len2(&self) -> usize {
            let max_checksum = (self.len1() as u32) * (self.w() - 1);
            (bitlen(max_checksum) - 1) / self.lg_w + 1
        }

        /// Total WOTS+ chains
        pub const fn wots_len(&self) -> usize {
            self.len1() + self.len2()
        }

        /// WOTS+ signature length
        pub const fn wots_sig_len(&self) -> usize {
            self.wots_len() * self.n
        }

        /// XMSS signature length (WOTS+ signature plus authentication path)
        pub const fn xmss_sig_len(&self) -> usize {
            (self.wots_len() + self.hp) * self.n
        }

        /// FORS signature length
        pub const fn fors_sig_len(&self) -> usize {
            self.k * (self.a + 1) * self.n
        }

        /// Public key length
        pub const fn pk_len(&self) -> usize {
            2 * self.n
        }

        /// Private key length
        pub const fn sk_len(&self) -> usize {
            4 * self.n
        }

        /// Signature length
        pub const fn sig_len(&self) -> usize {
            self.n + self.fors_sig_len() + self.d * self.xmss_sig_len()
        }

        /// Bytes of the digest feeding FORS
        pub const fn md_len(&self) -> usize {
            (self.k * self.a).div_ceil(8)
        }

        /// Bytes of the digest selecting the XMSS tree
        pub const fn tree_idx_len(&self) -> usize {
            (self.h - self.hp).div_ceil(8)
        }

        /// Bytes of the digest selecting the leaf
        pub const fn leaf_idx_len(&self) -> usize {
            self.hp.div_ceil(8)
        }
    }

    /// SLH-DSA-SHAKE-128s (small signatures)
    pub const SLH_DSA_SHAKE_128S: SlhParams = SlhParams {
        name: "SLH-DSA-SHAKE-128s",
        n: 16,
        h: 63,
        d: 7,
        hp: 9,
        a: 12,
        k: 14,
        lg_w: 4,
        m: 30,
    };

    /// SLH-DSA-SHAKE-128f (fast signing)
    pub const SLH_DSA_SHAKE_128F: SlhParams = SlhParams {
        name: "SLH-DSA-SHAKE-128f",
        n: 16,
        h: 66,
        d: 22,
        hp: 3,
        a: 6,
        k: 33,
        lg_w: 4,
        m: 34,
    };
}
