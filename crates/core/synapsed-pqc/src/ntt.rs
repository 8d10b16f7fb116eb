//! Number Theoretic Transform (NTT) implementation
//!
//! One butterfly network serves both lattice schemes. The ring is selected
//! by a [`RingModulus`] marker type carrying the modulus, the bit-reversed
//! twiddle table, the depth of the transform and the transformed-domain
//! product:
//!
//! * [`KemRing`]: q = 3329, seven layers (block length 128 down to 2), the
//!   transformed domain holds 128 degree-one residues multiplied with
//!   base-case products.
//! * [`DsaRing`]: q = 8380417, eight layers (block length 128 down to 1),
//!   the transformed domain is multiplied coefficient-wise.
//!
//! Coefficients are kept fully reduced in `[0, q)`; arithmetic widens to
//! `u64` instead of using Montgomery form.

use crate::params::N;
use core::fmt::Debug;

/// Modulus and twiddle table of a polynomial ring Z_q[X]/(X^256 + 1)
pub trait RingModulus: Copy + Debug + PartialEq + Eq + Send + Sync + 'static {
    /// Prime modulus
    const Q: u32;

    /// Smallest butterfly block length
    const MIN_BLOCK: usize;

    /// Powers of the root of unity in bit-reversed order
    const ZETAS: &'static [u32];

    /// Scaling applied at the end of the inverse transform
    const N_INV: u32;

    /// Product of two transformed elements
    fn multiply_transformed(a: &[u32; N], b: &[u32; N]) -> [u32; N];
}

/// Ring of ML-KEM, q = 3329
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KemRing;

/// Ring of ML-DSA, q = 8380417
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DsaRing;

impl RingModulus for KemRing {
    const Q: u32 = crate::params::kem::Q;
    const MIN_BLOCK: usize = 2;
    const ZETAS: &'static [u32] = &KEM_ZETAS;
    // 128^-1 mod q: the transform stops at degree-one residues
    const N_INV: u32 = 3303;

    fn multiply_transformed(a: &[u32; N], b: &[u32; N]) -> [u32; N] {
        let mut c = [0u32; N];
        for (i, &gamma) in KEM_GAMMAS.iter().enumerate() {
            let (c0, c1) = base_case_multiply::<Self>(
                a[2 * i],
                a[2 * i + 1],
                b[2 * i],
                b[2 * i + 1],
                gamma,
            );
            c[2 * i] = c0;
            c[2 * i + 1] = c1;
        }
        c
    }
}

impl RingModulus for DsaRing {
    const Q: u32 = crate::params::dsa::Q;
    const MIN_BLOCK: usize = 1;
    const ZETAS: &'static [u32] = &DSA_ZETAS;
    // 256^-1 mod q
    const N_INV: u32 = 8_347_681;

    fn multiply_transformed(a: &[u32; N], b: &[u32; N]) -> [u32; N] {
        let mut c = [0u32; N];
        for ((c, &x), &y) in c.iter_mut().zip(a).zip(b) {
            *c = mul_mod::<Self>(x, y);
        }
        c
    }
}

/// 17^brv7(i) mod 3329
const KEM_ZETAS: [u32; 128] = [
    1, 1729, 2580, 3289, 2642, 630, 1897, 848, 1062, 1919, 193, 797,
    2786, 3260, 569, 1746, 296, 2447, 1339, 1476, 3046, 56, 2240, 1333,
    1426, 2094, 535, 2882, 2393, 2879, 1974, 821, 289, 331, 3253, 1756,
    1197, 2304, 2277, 2055, 650, 1977, 2513, 632, 2865, 33, 1320, 1915,
    2319, 1435, 807, 452, 1438, 2868, 1534, 2402, 2647, 2617, 1481, 648,
    2474, 3110, 1227, 910, 17, 2761, 583, 2649, 1637, 723, 2288, 1100,
    1409, 2662, 3281, 233, 756, 2156, 3015, 3050, 1703, 1651, 2789, 1789,
    1847, 952, 1461, 2687, 939, 2308, 2437, 2388, 733, 2337, 268, 641,
    1584, 2298, 2037, 3220, 375, 2549, 2090, 1645, 1063, 319, 2773, 757,
    2099, 561, 2466, 2594, 2804, 1092, 403, 1026, 1143, 2150, 2775, 886,
    1722, 1212, 1874, 1029, 2110, 2935, 885, 2154,
];

/// 17^(2·brv7(i)+1) mod 3329
const KEM_GAMMAS: [u32; 128] = [
    17, 3312, 2761, 568, 583, 2746, 2649, 680, 1637, 1692, 723, 2606,
    2288, 1041, 1100, 2229, 1409, 1920, 2662, 667, 3281, 48, 233, 3096,
    756, 2573, 2156, 1173, 3015, 314, 3050, 279, 1703, 1626, 1651, 1678,
    2789, 540, 1789, 1540, 1847, 1482, 952, 2377, 1461, 1868, 2687, 642,
    939, 2390, 2308, 1021, 2437, 892, 2388, 941, 733, 2596, 2337, 992,
    268, 3061, 641, 2688, 1584, 1745, 2298, 1031, 2037, 1292, 3220, 109,
    375, 2954, 2549, 780, 2090, 1239, 1645, 1684, 1063, 2266, 319, 3010,
    2773, 556, 757, 2572, 2099, 1230, 561, 2768, 2466, 863, 2594, 735,
    2804, 525, 1092, 2237, 403, 2926, 1026, 2303, 1143, 2186, 2150, 1179,
    2775, 554, 886, 2443, 1722, 1607, 1212, 2117, 1874, 1455, 1029, 2300,
    2110, 1219, 2935, 394, 885, 2444, 2154, 1175,
];

/// 1753^brv8(i) mod 8380417
const DSA_ZETAS: [u32; 256] = [
    1, 4808194, 3765607, 3761513, 5178923, 5496691, 5234739, 5178987,
    7778734, 3542485, 2682288, 2129892, 3764867, 7375178, 557458, 7159240,
    5010068, 4317364, 2663378, 6705802, 4855975, 7946292, 676590, 7044481,
    5152541, 1714295, 2453983, 1460718, 7737789, 4795319, 2815639, 2283733,
    3602218, 3182878, 2740543, 4793971, 5269599, 2101410, 3704823, 1159875,
    394148, 928749, 1095468, 4874037, 2071829, 4361428, 3241972, 2156050,
    3415069, 1759347, 7562881, 4805951, 3756790, 6444618, 6663429, 4430364,
    5483103, 3192354, 556856, 3870317, 2917338, 1853806, 3345963, 1858416,
    3073009, 1277625, 5744944, 3852015, 4183372, 5157610, 5258977, 8106357,
    2508980, 2028118, 1937570, 4564692, 2811291, 5396636, 7270901, 4158088,
    1528066, 482649, 1148858, 5418153, 7814814, 169688, 2462444, 5046034,
    4213992, 4892034, 1987814, 5183169, 1736313, 235407, 5130263, 3258457,
    5801164, 1787943, 5989328, 6125690, 3482206, 4197502, 7080401, 6018354,
    7062739, 2461387, 3035980, 621164, 3901472, 7153756, 2925816, 3374250,
    1356448, 5604662, 2683270, 5601629, 4912752, 2312838, 7727142, 7921254,
    348812, 8052569, 1011223, 6026202, 4561790, 6458164, 6143691, 1744507,
    1753, 6444997, 5720892, 6924527, 2660408, 6600190, 8321269, 2772600,
    1182243, 87208, 636927, 4415111, 4423672, 6084020, 5095502, 4663471,
    8352605, 822541, 1009365, 5926272, 6400920, 1596822, 4423473, 4620952,
    6695264, 4969849, 2678278, 4611469, 4829411, 635956, 8129971, 5925040,
    4234153, 6607829, 2192938, 6653329, 2387513, 4768667, 8111961, 5199961,
    3747250, 2296099, 1239911, 4541938, 3195676, 2642980, 1254190, 8368000,
    2998219, 141835, 8291116, 2513018, 7025525, 613238, 7070156, 6161950,
    7921677, 6458423, 4040196, 4908348, 2039144, 6500539, 7561656, 6201452,
    6757063, 2105286, 6006015, 6346610, 586241, 7200804, 527981, 5637006,
    6903432, 1994046, 2491325, 6987258, 507927, 7192532, 7655613, 6545891,
    5346675, 8041997, 2647994, 3009748, 5767564, 4148469, 749577, 4357667,
    3980599, 2569011, 6764887, 1723229, 1665318, 2028038, 1163598, 5011144,
    3994671, 8368538, 7009900, 3020393, 3363542, 214880, 545376, 7609976,
    3105558, 7277073, 508145, 7826699, 860144, 3430436, 140244, 6866265,
    6195333, 3123762, 2358373, 6187330, 5365997, 6663603, 2926054, 7987710,
    8077412, 3531229, 4405932, 4606686, 1900052, 7598542, 1054478, 7648983,
];

/// `a + b mod q` for reduced operands
#[inline]
pub fn add_mod<M: RingModulus>(a: u32, b: u32) -> u32 {
    let s = a + b;
    if s >= M::Q {
        s - M::Q
    } else {
        s
    }
}

/// `a - b mod q` for reduced operands
#[inline]
pub fn sub_mod<M: RingModulus>(a: u32, b: u32) -> u32 {
    if a >= b {
        a - b
    } else {
        a + M::Q - b
    }
}

/// `a · b mod q`
#[inline]
pub fn mul_mod<M: RingModulus>(a: u32, b: u32) -> u32 {
    ((u64::from(a) * u64::from(b)) % u64::from(M::Q)) as u32
}

/// Reduce any signed integer into `[0, q)`
#[inline]
pub fn reduce_signed<M: RingModulus>(x: i64) -> u32 {
    x.rem_euclid(i64::from(M::Q)) as u32
}

/// Product of `a0 + a1·X` and `b0 + b1·X` modulo `X^2 - gamma`
pub fn base_case_multiply<M: RingModulus>(
    a0: u32,
    a1: u32,
    b0: u32,
    b1: u32,
    gamma: u32,
) -> (u32, u32) {
    let c0 = add_mod::<M>(mul_mod::<M>(a0, b0), mul_mod::<M>(mul_mod::<M>(a1, b1), gamma));
    let c1 = add_mod::<M>(mul_mod::<M>(a0, b1), mul_mod::<M>(a1, b0));
    (c0, c1)
}

/// Forward NTT
///
/// Block length starts at 128 and halves down to `M::MIN_BLOCK`; twiddles
/// are consumed in increasing order from index 1.
pub fn forward<M: RingModulus>(coeffs: &[u32; N]) -> [u32; N] {
    let mut f = *coeffs;
    let mut k = 1;
    let mut len = N / 2;
    while len >= M::MIN_BLOCK {
        for start in (0..N).step_by(2 * len) {
            let zeta = M::ZETAS[k];
            k += 1;
            for j in start..start + len {
                let t = mul_mod::<M>(zeta, f[j + len]);
                f[j + len] = sub_mod::<M>(f[j], t);
                f[j] = add_mod::<M>(f[j], t);
            }
        }
        len /= 2;
    }
    f
}

/// Inverse NTT
///
/// Block length starts at `M::MIN_BLOCK` and doubles up to 128; twiddles
/// are consumed in decreasing order, then every coefficient is scaled by
/// `M::N_INV`.
pub fn inverse<M: RingModulus>(coeffs: &[u32; N]) -> [u32; N] {
    let mut f = *coeffs;
    let mut k = M::ZETAS.len() - 1;
    let mut len = M::MIN_BLOCK;
    while len < N {
        for start in (0..N).step_by(2 * len) {
            let zeta = M::ZETAS[k];
            k -= 1;
            for j in start..start + len {
                let t = f[j];
                f[j] = add_mod::<M>(t, f[j + len]);
                f[j + len] = mul_mod::<M>(zeta, sub_mod::<M>(f[j + len], t));
            }
        }
        len *= 2;
    }
    for c in f.iter_mut() {
        *c = mul_mod::<M>(*c, M::N_INV);
    }
    f
}
