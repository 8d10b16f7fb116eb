//! WOTS+ one-time signatures (FIPS 205 §5)
//!
//! Every function receives the address of its XMSS tree by value; only its
//! layer and tree fields are read. The key pair (leaf) index is passed
//! separately.

use super::address::{Address, AddressKind};
use super::tweak::{base_2b, Tweak};
use crate::error::{check_length, Result};
use crate::params::slh::SlhParams;

/// Apply `F` `steps` times to `x`, starting at chain position `start`
pub fn chain(
    tw: &Tweak<'_>,
    x: &[u8],
    start: u32,
    steps: u32,
    adrs: Address,
    keypair: u32,
    chain_index: u32,
) -> Vec<u8> {
    let mut tmp = x.to_vec();
    for hash in start..start + steps {
        let step = adrs.with_kind(AddressKind::WotsHash {
            keypair,
            chain: chain_index,
            hash,
        });
        tmp = tw.f(&step, &tmp);
    }
    tmp
}

/// Message digits followed by checksum digits
pub(crate) fn digits(params: &SlhParams, msg: &[u8]) -> Result<Vec<u32>> {
    let lg_w = params.lg_w;
    let mut out = base_2b(msg, lg_w, params.len1())?;
    let w_max = params.w() - 1;
    let mut csum: u32 = out.iter().map(|&d| w_max - d).sum();
    let csum_bits = params.len2() * lg_w;
    csum <<= (8 - csum_bits % 8) % 8;
    let csum_bytes = csum.to_be_bytes();
    let csum_len = csum_bits.div_ceil(8);
    out.extend(base_2b(&csum_bytes[4 - csum_len..], lg_w, params.len2())?);
    Ok(out)
}

/// wots_pkGen: compressed public key of leaf `keypair`
pub fn public_key(
    tw: &Tweak<'_>,
    params: &SlhParams,
    sk_seed: &[u8],
    adrs: Address,
    keypair: u32,
) -> Vec<u8> {
    let w_max = params.w() - 1;
    let ends: Vec<Vec<u8>> = (0..params.wots_len() as u32)
        .map(|i| {
            let sk = tw.prf(&adrs.with_kind(AddressKind::WotsPrf { keypair, chain: i }), sk_seed);
            chain(tw, &sk, 0, w_max, adrs, keypair, i)
        })
        .collect();
    tw.t(&adrs.with_kind(AddressKind::WotsPk { keypair }), &ends)
}

/// wots_sign: signature on the n-byte message `msg`
pub fn sign(
    tw: &Tweak<'_>,
    params: &SlhParams,
    msg: &[u8],
    sk_seed: &[u8],
    adrs: Address,
    keypair: u32,
) -> Result<Vec<u8>> {
    check_length("WOTS+ message", msg, params.n)?;
    let mut sig = Vec::with_capacity(params.wots_sig_len());
    for (i, &d) in digits(params, msg)?.iter().enumerate() {
        let i = i as u32;
        let sk = tw.prf(&adrs.with_kind(AddressKind::WotsPrf { keypair, chain: i }), sk_seed);
        sig.extend_from_slice(&chain(tw, &sk, 0, d, adrs, keypair, i));
    }
    Ok(sig)
}

/// wots_pkFromSig: public key implied by a signature on `msg`
pub fn public_key_from_signature(
    tw: &Tweak<'_>,
    params: &SlhParams,
    sig: &[u8],
    msg: &[u8],
    adrs: Address,
    keypair: u32,
) -> Result<Vec<u8>> {
    check_length("WOTS+ signature", sig, params.wots_sig_len())?;
    check_length("WOTS+ message", msg, params.n)?;
    let w_max = params.w() - 1;
    let ends: Vec<Vec<u8>> = digits(params, msg)?
        .iter()
        .zip(sig.chunks_exact(params.n))
        .enumerate()
        .map(|(i, (&d, block))| chain(tw, block, d, w_max - d, adrs, keypair, i as u32))
        .collect();
    Ok(tw.t(&adrs.with_kind(AddressKind::WotsPk { keypair }), &ends))
}
