//! Hash addresses (ADRS) for the SLH-DSA tweakable hashes
//!
//! An [`Address`] names the position of one hash call inside the
//! hypertree. Each address type fills the last three words differently, so
//! the type is an enum and only the fields it uses can be set. The 32-byte
//! form is produced by [`Address::to_bytes`]:
//!
//! | bytes    | field                  |
//! |----------|------------------------|
//! | `0..4`   | layer                  |
//! | `4..16`  | tree (top 4 bytes zero)|
//! | `16..20` | type                   |
//! | `20..32` | three type-specific words |

use crate::error::{check_length, Error, Result};

/// Length of a serialized address
pub const ADDRESS_BYTES: usize = 32;

/// Type-specific part of an address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressKind {
    /// One step of a WOTS+ chain
    WotsHash {
        /// Leaf (key pair) index within the XMSS tree
        keypair: u32,
        /// Chain index
        chain: u32,
        /// Position along the chain
        hash: u32,
    },
    /// Compression of WOTS+ chain ends into a public key
    WotsPk {
        /// Leaf index
        keypair: u32,
    },
    /// Inner node of an XMSS tree
    Tree {
        /// Node height (leaves are 0)
        height: u32,
        /// Node index at that height
        index: u32,
    },
    /// Node of a FORS tree
    ForsTree {
        /// Key pair the FORS instance belongs to
        keypair: u32,
        /// Node height
        height: u32,
        /// Node index across all FORS trees
        index: u32,
    },
    /// Compression of FORS roots
    ForsRoots {
        /// Key pair index
        keypair: u32,
    },
    /// Derivation of a WOTS+ chain secret
    WotsPrf {
        /// Leaf index
        keypair: u32,
        /// Chain index
        chain: u32,
    },
    /// Derivation of a FORS leaf secret
    ForsPrf {
        /// Key pair index
        keypair: u32,
        /// Leaf index across all FORS trees
        index: u32,
    },
}

impl AddressKind {
    /// Numeric type tag
    pub fn type_code(&self) -> u32 {
        match self {
            AddressKind::WotsHash { .. } => 0,
            AddressKind::WotsPk { .. } => 1,
            AddressKind::Tree { .. } => 2,
            AddressKind::ForsTree { .. } => 3,
            AddressKind::ForsRoots { .. } => 4,
            AddressKind::WotsPrf { .. } => 5,
            AddressKind::ForsPrf { .. } => 6,
        }
    }

    fn words(&self) -> [u32; 3] {
        match *self {
            AddressKind::WotsHash {
                keypair,
                chain,
                hash,
            } => [keypair, chain, hash],
            AddressKind::WotsPk { keypair } | AddressKind::ForsRoots { keypair } => [keypair, 0, 0],
            AddressKind::Tree { height, index } => [0, height, index],
            AddressKind::ForsTree {
                keypair,
                height,
                index,
            } => [keypair, height, index],
            AddressKind::WotsPrf { keypair, chain } => [keypair, chain, 0],
            AddressKind::ForsPrf { keypair, index } => [keypair, 0, index],
        }
    }

    fn from_words(code: u32, [w0, w1, w2]: [u32; 3]) -> Result<Self> {
        let kind = match code {
            0 => AddressKind::WotsHash {
                keypair: w0,
                chain: w1,
                hash: w2,
            },
            1 => AddressKind::WotsPk { keypair: w0 },
            2 => AddressKind::Tree {
                height: w1,
                index: w2,
            },
            3 => AddressKind::ForsTree {
                keypair: w0,
                height: w1,
                index: w2,
            },
            4 => AddressKind::ForsRoots { keypair: w0 },
            5 => AddressKind::WotsPrf {
                keypair: w0,
                chain: w1,
            },
            6 => AddressKind::ForsPrf {
                keypair: w0,
                index: w2,
            },
            _ => return Err(Error::InvalidEncoding),
        };
        // unused words must be zero
        if kind.words() == [w0, w1, w2] {
            Ok(kind)
        } else {
            Err(Error::InvalidEncoding)
        }
    }
}

/// Position of a single tweakable-hash call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address {
    /// Hypertree layer (0 is the bottom)
    pub layer: u32,
    /// Tree index within the layer
    pub tree: u64,
    /// Type and type-specific fields
    pub kind: AddressKind,
}

impl Address {
    /// Build an address
    pub fn new(layer: u32, tree: u64, kind: AddressKind) -> Self {
        Self { layer, tree, kind }
    }

    /// Same layer and tree with a different kind
    pub fn with_kind(self, kind: AddressKind) -> Self {
        Self { kind, ..self }
    }

    /// 32-byte big-endian encoding
    pub fn to_bytes(&self) -> [u8; ADDRESS_BYTES] {
        let mut out = [0u8; ADDRESS_BYTES];
        out[0..4].copy_from_slice(&self.layer.to_be_bytes());
        out[8..16].copy_from_slice(&self.tree.to_be_bytes());
        out[16..20].copy_from_slice(&self.kind.type_code().to_be_bytes());
        for (slot, word) in out[20..].chunks_exact_mut(4).zip(self.kind.words()) {
            slot.copy_from_slice(&word.to_be_bytes());
        }
        out
    }

    /// Parse a 32-byte address
    ///
    /// Rejects unknown type tags, a tree index wider than 64 bits, and
    /// nonzero words the type does not use.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        check_length("address", bytes, ADDRESS_BYTES)?;
        let word = |at: usize| u32::from_be_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]]);
        if word(4) != 0 {
            return Err(Error::InvalidEncoding);
        }
        let mut tree = [0u8; 8];
        tree.copy_from_slice(&bytes[8..16]);
        let kind = AddressKind::from_words(word(16), [word(20), word(24), word(28)])?;
        Ok(Self {
            layer: word(0),
            tree: u64::from_be_bytes(tree),
            kind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let adrs = Address::new(
            1,
            0x0102_0304_0506_0708,
            AddressKind::WotsHash {
                keypair: 5,
                chain: 6,
                hash: 7,
            },
        );
        let bytes = adrs.to_bytes();
        assert_eq!(&bytes[0..4], &[0, 0, 0, 1]);
        assert_eq!(&bytes[4..8], &[0; 4]);
        assert_eq!(&bytes[8..16], &[1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(&bytes[16..20], &[0, 0, 0, 0]);
        assert_eq!(&bytes[20..24], &[0, 0, 0, 5]);
        assert_eq!(&bytes[28..32], &[0, 0, 0, 7]);
    }

    #[test]
    fn test_kinds_roundtrip() {
        let kinds = [
            AddressKind::WotsHash {
                keypair: 1,
                chain: 2,
                hash: 3,
            },
            AddressKind::WotsPk { keypair: 4 },
            AddressKind::Tree {
                height: 5,
                index: 6,
            },
            AddressKind::ForsTree {
                keypair: 7,
                height: 8,
                index: 9,
            },
            AddressKind::ForsRoots { keypair: 10 },
            AddressKind::WotsPrf {
                keypair: 11,
                chain: 12,
            },
            AddressKind::ForsPrf {
                keypair: 13,
                index: 14,
            },
        ];
        for (code, kind) in kinds.into_iter().enumerate() {
            let adrs = Address::new(3, 99, kind);
            let bytes = adrs.to_bytes();
            assert_eq!(u32::from_be_bytes(bytes[16..20].try_into().unwrap()), code as u32);
            assert_eq!(Address::from_bytes(&bytes).unwrap(), adrs);
        }
    }

    #[test]
    fn test_with_kind_keeps_position() {
        let adrs = Address::new(2, 40, AddressKind::WotsPk { keypair: 1 });
        let moved = adrs.with_kind(AddressKind::Tree {
            height: 1,
            index: 0,
        });
        assert_eq!(moved.layer, 2);
        assert_eq!(moved.tree, 40);
        assert_eq!(adrs.kind, AddressKind::WotsPk { keypair: 1 });
    }

    #[test]
    fn test_from_bytes_rejects_malformed() {
        let good = Address::new(0, 0, AddressKind::Tree { height: 1, index: 2 }).to_bytes();

        let mut bad_type = good;
        bad_type[19] = 7;
        assert_eq!(Address::from_bytes(&bad_type), Err(Error::InvalidEncoding));

        // Tree addresses leave the key-pair word empty
        let mut stray = good;
        stray[23] = 1;
        assert_eq!(Address::from_bytes(&stray), Err(Error::InvalidEncoding));

        let mut wide_tree = good;
        wide_tree[4] = 1;
        assert_eq!(Address::from_bytes(&wide_tree), Err(Error::InvalidEncoding));

        assert!(Address::from_bytes(&good[..31]).is_err());
    }
}
