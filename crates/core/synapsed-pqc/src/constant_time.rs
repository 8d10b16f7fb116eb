//! Constant-time operations for side-channel resistance
//!
//! Comparisons and selections on secret-dependent byte strings go through
//! `subtle` so the branch never depends on the data.

use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

/// Constant-time equality of two byte strings
///
/// Strings of different length compare unequal; the length itself is not
/// treated as secret.
pub fn ct_eq(a: &[u8], b: &[u8]) -> Choice {
    if a.len() != b.len() {
        return Choice::from(0);
    }
    a.ct_eq(b)
}

/// Pick `a` when `choice` is 0 and `b` when it is 1, without branching
pub fn ct_select<const L: usize>(a: &[u8; L], b: &[u8; L], choice: Choice) -> [u8; L] {
    let mut out = [0u8; L];
    for ((o, x), y) in out.iter_mut().zip(a).zip(b) {
        *o = u8::conditional_select(x, y, choice);
    }
    out
}
