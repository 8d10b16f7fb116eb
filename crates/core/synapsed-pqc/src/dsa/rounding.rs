//! High/low bit decomposition and hints (FIPS 204 §7.4)
//!
//! Inputs are coefficients in `[0, q)`; signed outputs are centered
//! representatives.

use crate::params::dsa::{D, Q};

/// `r mod± α`: representative of `r mod α` in `(-α/2, α/2]`
pub fn mod_pm(r: u32, alpha: u32) -> i32 {
    let r0 = r % alpha;
    if r0 > alpha / 2 {
        r0 as i32 - alpha as i32
    } else {
        r0 as i32
    }
}

/// Power2Round: `r = r1·2^d + r0` with `r0 ∈ (-2^(d-1), 2^(d-1)]`
pub fn power2_round(r: u32) -> (u32, i32) {
    let r = r % Q;
    let r0 = mod_pm(r, 1 << D);
    let r1 = (r as i32 - r0) as u32 >> D;
    (r1, r0)
}

/// Decompose: `r = r1·2γ2 + r0` with the wrap-around case folded into r1 = 0
pub fn decompose(r: u32, gamma2: u32) -> (u32, i32) {
    let r = r % Q;
    let r0 = mod_pm(r, 2 * gamma2);
    let diff = (r as i32 - r0) as u32;
    if diff == Q - 1 {
        (0, r0 - 1)
    } else {
        (diff / (2 * gamma2), r0)
    }
}

/// HighBits
pub fn high_bits(r: u32, gamma2: u32) -> u32 {
    decompose(r, gamma2).0
}

/// LowBits
pub fn low_bits(r: u32, gamma2: u32) -> i32 {
    decompose(r, gamma2).1
}

/// MakeHint: whether adding `z` to `r` changes the high bits
pub fn make_hint(z: u32, r: u32, gamma2: u32) -> bool {
    high_bits(r, gamma2) != high_bits((r + z) % Q, gamma2)
}

/// UseHint: high bits of `r` corrected by hint `h`
pub fn use_hint(h: bool, r: u32, gamma2: u32) -> u32 {
    let m = (Q - 1) / (2 * gamma2);
    let (r1, r0) = decompose(r, gamma2);
    match (h, r0 > 0) {
        (false, _) => r1,
        (true, true) => (r1 + 1) % m,
        (true, false) => (r1 + m - 1) % m,
    }
}
