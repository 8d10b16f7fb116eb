//! Hash functions and XOF implementations
//!
//! Thin wrappers over `sha3` giving the absorb/squeeze interface the
//! schemes are written against. Inputs are absorbed as a list of slices so
//! callers never have to concatenate seeds and indices by hand.

use core::fmt;
use sha3::{
    digest::{ExtendableOutput, Update, XofReader},
    Digest, Sha3_256, Sha3_512, Shake128, Shake256,
};

/// SHA3-256 over the concatenation of `parts`
pub fn sha3_256(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha3_256::new();
    for part in parts {
        Digest::update(&mut hasher, part);
    }
    hasher.finalize().into()
}

/// SHA3-512 over the concatenation of `parts`
pub fn sha3_512(parts: &[&[u8]]) -> [u8; 64] {
    let mut hasher = Sha3_512::new();
    for part in parts {
        Digest::update(&mut hasher, part);
    }
    hasher.finalize().into()
}

/// SHAKE256 of `parts` squeezed into `out`
pub fn shake256_into(parts: &[&[u8]], out: &mut [u8]) {
    Shake256Stream::absorb(parts).squeeze(out);
}

/// SHAKE256 of `parts`, `len` bytes of output
pub fn shake256(parts: &[&[u8]], len: usize) -> Vec<u8> {
    let mut out = vec![0u8; len];
    shake256_into(parts, &mut out);
    out
}

/// SHAKE256 of `parts` into a fixed-size array
pub fn shake256_array<const L: usize>(parts: &[&[u8]]) -> [u8; L] {
    let mut out = [0u8; L];
    shake256_into(parts, &mut out);
    out
}

macro_rules! xof_stream {
    ($name:ident, $hasher:ty, $reader:ty, $label:literal) => {
        #[doc = concat!("Incremental ", $label, " output stream")]
        pub struct $name {
            reader: $reader,
        }

        impl $name {
            /// Absorb the concatenation of `parts` and switch to squeezing
            pub fn absorb(parts: &[&[u8]]) -> Self {
                let mut hasher = <$hasher>::default();
                for part in parts {
                    Update::update(&mut hasher, part);
                }
                Self {
                    reader: hasher.finalize_xof(),
                }
            }

            /// Squeeze the next `buf.len()` bytes
            pub fn squeeze(&mut self, buf: &mut [u8]) {
                self.reader.read(buf);
            }

            /// Squeeze a single byte
            pub fn next_byte(&mut self) -> u8 {
                let mut b = [0u8; 1];
                self.reader.read(&mut b);
                b[0]
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("reader", &concat!("<", $label, " reader>"))
                    .finish()
            }
        }
    };
}

xof_stream!(Shake128Stream, Shake128, sha3::Shake128Reader, "SHAKE128");
xof_stream!(Shake256Stream, Shake256, sha3::Shake256Reader, "SHAKE256");
