//! FORS few-time signatures over the message digest (FIPS 205 §8)

use super::address::{Address, AddressKind};
use super::tweak::{base_2b, Tweak};
use crate::error::{check_length, Result};
use crate::params::slh::SlhParams;

/// fors_skGen: secret value of leaf `idx` (counted across all k trees)
pub fn secret(tw: &Tweak<'_>, sk_seed: &[u8], adrs: Address, keypair: u32, idx: u32) -> Vec<u8> {
    tw.prf(
        &adrs.with_kind(AddressKind::ForsPrf {
            keypair,
            index: idx,
        }),
        sk_seed,
    )
}

/// fors_node: node `i` at height `z`
pub fn node(
    tw: &Tweak<'_>,
    sk_seed: &[u8],
    i: u32,
    z: u32,
    adrs: Address,
    keypair: u32,
) -> Vec<u8> {
    let here = adrs.with_kind(AddressKind::ForsTree {
        keypair,
        height: z,
        index: i,
    });
    if z == 0 {
        let sk = secret(tw, sk_seed, adrs, keypair, i);
        return tw.f(&here, &sk);
    }
    let left = node(tw, sk_seed, 2 * i, z - 1, adrs, keypair);
    let right = node(tw, sk_seed, 2 * i + 1, z - 1, adrs, keypair);
    tw.h(&here, &left, &right)
}

/// fors_sign: one revealed secret plus authentication path per tree
pub fn sign(
    tw: &Tweak<'_>,
    params: &SlhParams,
    md: &[u8],
    sk_seed: &[u8],
    adrs: Address,
    keypair: u32,
) -> Result<Vec<u8>> {
    let a = params.a as u32;
    let mut sig = Vec::with_capacity(params.fors_sig_len());
    for (i, &leaf) in base_2b(md, params.a, params.k)?.iter().enumerate() {
        let offset = (i as u32) << a;
        sig.extend_from_slice(&secret(tw, sk_seed, adrs, keypair, offset + leaf));
        for j in 0..a {
            let sibling = (leaf >> j) ^ 1;
            let i_tree = (i as u32) << (a - j);
            sig.extend_from_slice(&node(tw, sk_seed, i_tree + sibling, j, adrs, keypair));
        }
    }
    Ok(sig)
}

/// fors_pkFromSig: FORS public key implied by a signature on `md`
pub fn public_key_from_signature(
    tw: &Tweak<'_>,
    params: &SlhParams,
    sig: &[u8],
    md: &[u8],
    adrs: Address,
    keypair: u32,
) -> Result<Vec<u8>> {
    check_length("FORS signature", sig, params.fors_sig_len())?;
    let a = params.a as u32;
    let n = params.n;
    let indices = base_2b(md, params.a, params.k)?;

    let mut roots = Vec::with_capacity(params.k);
    for (i, (&leaf, tree_sig)) in indices
        .iter()
        .zip(sig.chunks_exact((params.a + 1) * n))
        .enumerate()
    {
        let (sk, auth) = tree_sig.split_at(n);
        let mut index = ((i as u32) << a) + leaf;
        let mut current = tw.f(
            &adrs.with_kind(AddressKind::ForsTree {
                keypair,
                height: 0,
                index,
            }),
            sk,
        );
        for (j, sibling) in auth.chunks_exact(n).enumerate() {
            let j = j as u32;
            index >>= 1;
            let parent = adrs.with_kind(AddressKind::ForsTree {
                keypair,
                height: j + 1,
                index,
            });
            current = if (leaf >> j) & 1 == 0 {
                tw.h(&parent, &current, sibling)
            } else {
                tw.h(&parent, sibling, &current)
            };
        }
        roots.push(current);
    }
    Ok(tw.t(&adrs.with_kind(AddressKind::ForsRoots { keypair }), &roots))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_params() -> SlhParams {
        SlhParams {
            name: "fors-test",
            n: 16,
            h: 6,
            d: 2,
            hp: 3,
            a: 4,
            k: 6,
            lg_w: 4,
            m: 5,
        }
    }

    /// FORS public key computed directly from the tree roots
    fn expected_public_key(tw: &Tweak<'_>, params: &SlhParams, sk_seed: &[u8], adrs: Address, keypair: u32) -> Vec<u8> {
        let roots: Vec<Vec<u8>> = (0..params.k as u32)
            .map(|i| node(tw, sk_seed, i, params.a as u32, adrs, keypair))
            .collect();
        tw.t(&adrs.with_kind(AddressKind::ForsRoots { keypair }), &roots)
    }

    #[test]
    fn test_signature_recovers_public_key() {
        let params = small_params();
        let pk_seed = [8u8; 16];
        let sk_seed = [9u8; 16];
        let tw = Tweak::new(params.n, &pk_seed);
        let adrs = Address::new(0, 12, AddressKind::WotsPk { keypair: 0 });
        let expected = expected_public_key(&tw, &params, &sk_seed, adrs, 3);

        for md in [[0u8; 3], [0xFF; 3], [0x12, 0x34, 0x56]] {
            let sig = sign(&tw, &params, &md, &sk_seed, adrs, 3).unwrap();
            assert_eq!(sig.len(), params.fors_sig_len());
            let pk = public_key_from_signature(&tw, &params, &sig, &md, adrs, 3).unwrap();
            assert_eq!(pk, expected);
        }
    }

    #[test]
    fn test_different_digest_changes_key() {
        let params = small_params();
        let tw = Tweak::new(params.n, &[1u8; 16]);
        let adrs = Address::new(0, 0, AddressKind::WotsPk { keypair: 0 });
        let sig = sign(&tw, &params, &[1, 2, 3], &[2u8; 16], adrs, 0).unwrap();
        let a = public_key_from_signature(&tw, &params, &sig, &[1, 2, 3], adrs, 0).unwrap();
        let b = public_key_from_signature(&tw, &params, &sig, &[1, 2, 4], adrs, 0).unwrap();
        assert_ne!(a, b);
    }
}
