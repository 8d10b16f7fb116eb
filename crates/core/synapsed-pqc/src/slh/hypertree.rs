//! The hypertree: `d` layers of XMSS trees, each signing the root below it

use super::address::{Address, AddressKind};
use super::tweak::Tweak;
use super::xmss;
use crate::constant_time::ct_eq;
use crate::error::{check_length, Result};
use crate::params::slh::SlhParams;

fn tree_address(layer: u32, tree: u64) -> Address {
    Address::new(layer, tree, AddressKind::Tree { height: 0, index: 0 })
}

/// ht_sign: sign the n-byte `msg` with leaf `idx_leaf` of bottom tree `idx_tree`
pub fn sign(
    tw: &Tweak<'_>,
    params: &SlhParams,
    msg: &[u8],
    sk_seed: &[u8],
    mut idx_tree: u64,
    mut idx_leaf: u32,
) -> Result<Vec<u8>> {
    let mask = (1u64 << params.hp) - 1;
    let mut sig = Vec::with_capacity(params.d * params.xmss_sig_len());
    let mut root = msg.to_vec();

    for layer in 0..params.d as u32 {
        let adrs = tree_address(layer, idx_tree);
        let layer_sig = xmss::sign(tw, params, &root, sk_seed, idx_leaf, adrs)?;
        if layer + 1 < params.d as u32 {
            root = xmss::public_key_from_signature(tw, params, idx_leaf, &layer_sig, &root, adrs)?;
        }
        sig.extend_from_slice(&layer_sig);
        idx_leaf = (idx_tree & mask) as u32;
        idx_tree >>= params.hp;
    }
    Ok(sig)
}

/// ht_verify: whether `sig` chains `msg` up to `pk_root`
pub fn verify(
    tw: &Tweak<'_>,
    params: &SlhParams,
    msg: &[u8],
    sig: &[u8],
    pk_root: &[u8],
    mut idx_tree: u64,
    mut idx_leaf: u32,
) -> Result<bool> {
    check_length("hypertree signature", sig, params.d * params.xmss_sig_len())?;
    let mask = (1u64 << params.hp) - 1;
    let mut node = msg.to_vec();

    for (layer, layer_sig) in sig.chunks_exact(params.xmss_sig_len()).enumerate() {
        let adrs = tree_address(layer as u32, idx_tree);
        node = xmss::public_key_from_signature(tw, params, idx_leaf, layer_sig, &node, adrs)?;
        idx_leaf = (idx_tree & mask) as u32;
        idx_tree >>= params.hp;
    }
    Ok(ct_eq(&node, pk_root).into())
}

/// Root of the top XMSS tree
pub fn root(tw: &Tweak<'_>, params: &SlhParams, sk_seed: &[u8]) -> Vec<u8> {
    let top = tree_address(params.d as u32 - 1, 0);
    xmss::node(tw, params, sk_seed, 0, params.hp as u32, top)
}
