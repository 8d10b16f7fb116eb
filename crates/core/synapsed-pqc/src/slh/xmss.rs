//! XMSS trees of WOTS+ keys (FIPS 205 §6)

use super::address::{Address, AddressKind};
use super::tweak::Tweak;
use super::wots;
use crate::error::{check_length, Result};
use crate::params::slh::SlhParams;

/// xmss_node: node `i` at height `z` of the tree at `adrs`
///
/// Height 0 is a WOTS+ public key; the root is `node(0, h')`.
pub fn node(
    tw: &Tweak<'_>,
    params: &SlhParams,
    sk_seed: &[u8],
    i: u32,
    z: u32,
    adrs: Address,
) -> Vec<u8> {
    if z == 0 {
        return wots::public_key(tw, params, sk_seed, adrs, i);
    }
    let left = node(tw, params, sk_seed, 2 * i, z - 1, adrs);
    let right = node(tw, params, sk_seed, 2 * i + 1, z - 1, adrs);
    tw.h(
        &adrs.with_kind(AddressKind::Tree {
            height: z,
            index: i,
        }),
        &left,
        &right,
    )
}

/// xmss_sign: WOTS+ signature of leaf `idx` followed by its authentication path
pub fn sign(
    tw: &Tweak<'_>,
    params: &SlhParams,
    msg: &[u8],
    sk_seed: &[u8],
    idx: u32,
    adrs: Address,
) -> Result<Vec<u8>> {
    let mut sig = wots::sign(tw, params, msg, sk_seed, adrs, idx)?;
    sig.reserve(params.hp * params.n);
    for j in 0..params.hp as u32 {
        let sibling = (idx >> j) ^ 1;
        sig.extend_from_slice(&node(tw, params, sk_seed, sibling, j, adrs));
    }
    Ok(sig)
}

/// xmss_pkFromSig: root implied by a signature of leaf `idx` on `msg`
pub fn public_key_from_signature(
    tw: &Tweak<'_>,
    params: &SlhParams,
    idx: u32,
    sig: &[u8],
    msg: &[u8],
    adrs: Address,
) -> Result<Vec<u8>> {
    check_length("XMSS signature", sig, params.xmss_sig_len())?;
    let (wots_sig, auth) = sig.split_at(params.wots_sig_len());
    let mut current = wots::public_key_from_signature(tw, params, wots_sig, msg, adrs, idx)?;

    for (k, sibling) in auth.chunks_exact(params.n).enumerate() {
        let k = k as u32;
        let parent = adrs.with_kind(AddressKind::Tree {
            height: k + 1,
            index: idx >> (k + 1),
        });
        current = if (idx >> k) & 1 == 0 {
            tw.h(&parent, &current, sibling)
        } else {
            tw.h(&parent, sibling, &current)
        };
    }
    Ok(current)
}
