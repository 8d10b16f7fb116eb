//! Bit-level packing of ring elements
//!
//! All packers write fixed-width little-endian bit fields: coefficient 0
//! occupies the lowest bits of byte 0. A packed element of width `w`
//! always takes exactly `32·w` bytes, and every unpacker rejects any other
//! input length.

use crate::error::{check_length, Error, Result};
use crate::params::{bitlen, kem, N};

fn pack_bits(values: impl IntoIterator<Item = u32>, width: usize, out: &mut Vec<u8>) {
    let mut acc: u64 = 0;
    let mut nbits = 0;
    for v in values {
        acc |= u64::from(v) << nbits;
        nbits += width;
        while nbits >= 8 {
            out.push(acc as u8);
            acc >>= 8;
            nbits -= 8;
        }
    }
}

fn unpack_bits(bytes: &[u8], width: usize) -> [u32; N] {
    let mask = (1u64 << width) - 1;
    let mut out = [0u32; N];
    let mut acc: u64 = 0;
    let mut nbits = 0;
    let mut idx = 0;
    for &b in bytes {
        acc |= u64::from(b) << nbits;
        nbits += 8;
        while nbits >= width && idx < N {
            out[idx] = (acc & mask) as u32;
            acc >>= width;
            nbits -= width;
            idx += 1;
        }
    }
    out
}

fn check_width(d: usize) -> Result<()> {
    if (1..=12).contains(&d) {
        Ok(())
    } else {
        Err(Error::InvalidParameter)
    }
}

/// ByteEncode_d: pack 256 `d`-bit values into `32·d` bytes
pub fn byte_encode(f: &[u32; N], d: usize) -> Result<Vec<u8>> {
    check_width(d)?;
    let mut out = Vec::with_capacity(32 * d);
    pack_bits(f.iter().map(|&c| c & ((1 << d) - 1)), d, &mut out);
    Ok(out)
}

/// ByteDecode_d: inverse of [`byte_encode`]
///
/// Values are reduced mod 2^d, or mod q when `d = 12`.
pub fn byte_decode(bytes: &[u8], d: usize) -> Result<[u32; N]> {
    check_width(d)?;
    check_length("encoded element", bytes, 32 * d)?;
    let mut f = unpack_bits(bytes, d);
    if d == 12 {
        for c in f.iter_mut() {
            *c %= kem::Q;
        }
    }
    Ok(f)
}

/// Compress_d: `round(2^d / q · x) mod 2^d`
pub fn compress(x: u32, d: usize) -> u32 {
    let q = u64::from(kem::Q);
    let scaled = ((u64::from(x) << d) + q / 2) / q;
    (scaled & ((1 << d) - 1)) as u32
}

/// Decompress_d: `round(q / 2^d · y)`
pub fn decompress(y: u32, d: usize) -> u32 {
    let q = u64::from(kem::Q);
    ((q * u64::from(y) + (1 << (d - 1))) >> d) as u32
}

/// Pack values in `[0, b]` with `bitlen(b)` bits each
pub fn simple_bit_pack(w: &[u32; N], b: u32) -> Vec<u8> {
    let width = bitlen(b);
    let mut out = Vec::with_capacity(32 * width);
    pack_bits(w.iter().copied(), width, &mut out);
    out
}

/// Inverse of [`simple_bit_pack`]
pub fn simple_bit_unpack(v: &[u8], b: u32) -> Result<[u32; N]> {
    let width = bitlen(b);
    check_length("packed element", v, 32 * width)?;
    Ok(unpack_bits(v, width))
}

/// Pack values in `[-a, b]` by storing `b - w` with `bitlen(a + b)` bits
pub fn bit_pack(w: &[i32; N], a: u32, b: u32) -> Vec<u8> {
    let width = bitlen(a + b);
    let mut out = Vec::with_capacity(32 * width);
    pack_bits(w.iter().map(|&c| (b as i32 - c) as u32), width, &mut out);
    out
}

/// Inverse of [`bit_pack`]
///
/// Every bit pattern decodes; values can fall below `-a` when the width
/// has slack, so callers that need the exact range must check it.
pub fn bit_unpack(v: &[u8], a: u32, b: u32) -> Result<[i32; N]> {
    let width = bitlen(a + b);
    check_length("packed element", v, 32 * width)?;
    let raw = unpack_bits(v, width);
    let mut out = [0i32; N];
    for (o, &r) in out.iter_mut().zip(&raw) {
        *o = b as i32 - r as i32;
    }
    Ok(out)
}

/// Hint matrix: one row of 256 flags per polynomial
pub type Hint = Vec<[bool; N]>;

/// Number of set flags in a hint
pub fn hint_weight(h: &[[bool; N]]) -> usize {
    h.iter().map(|row| row.iter().filter(|&&b| b).count()).sum()
}

/// Pack a hint as sparse indices plus cumulative row counts (`ω + k` bytes)
pub fn hint_bit_pack(h: &[[bool; N]], omega: usize) -> Result<Vec<u8>> {
    if hint_weight(h) > omega {
        return Err(Error::InvalidParameter);
    }
    let k = h.len();
    let mut y = vec![0u8; omega + k];
    let mut index = 0;
    for (i, row) in h.iter().enumerate() {
        for (j, _) in row.iter().enumerate().filter(|(_, &set)| set) {
            y[index] = j as u8;
            index += 1;
        }
        y[omega + i] = index as u8;
    }
    Ok(y)
}

/// Inverse of [`hint_bit_pack`]; `None` for any malformed encoding
///
/// Rejects cumulative counts that decrease or exceed `ω`, indices that do
/// not strictly increase within a row, and nonzero padding.
pub fn hint_bit_unpack(y: &[u8], k: usize, omega: usize) -> Option<Hint> {
    if y.len() != omega + k {
        return None;
    }
    let mut h = vec![[false; N]; k];
    let mut index = 0usize;
    for (i, row) in h.iter_mut().enumerate() {
        let end = usize::from(y[omega + i]);
        if end < index || end > omega {
            return None;
        }
        let first = index;
        while index < end {
            if index > first && y[index - 1] >= y[index] {
                return None;
            }
            row[usize::from(y[index])] = true;
            index += 1;
        }
    }
    if y[index..omega].iter().any(|&b| b != 0) {
        return None;
    }
    Some(h)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(modulus: u32) -> [u32; N] {
        let mut f = [0u32; N];
        for (i, c) in f.iter_mut().enumerate() {
            *c = (i as u32).wrapping_mul(2_654_435_761u32.wrapping_mul(i as u32 + 1)) % modulus;
        }
        f
    }

    #[test]
    fn test_byte_encode_roundtrip_all_widths() {
        for d in 1..=12 {
            let m = if d == 12 { kem::Q } else { 1 << d };
            let f = ramp(m);
            let bytes = byte_encode(&f, d).unwrap();
            assert_eq!(bytes.len(), 32 * d);
            assert_eq!(byte_decode(&bytes, d).unwrap(), f);
        }
    }

    #[test]
    fn test_byte_encode_layout() {
        let mut f = [0u32; N];
        f[0] = 0xABC;
        f[1] = 0x123;
        let bytes = byte_encode(&f, 12).unwrap();
        assert_eq!(&bytes[..3], &[0xBC, 0x3A, 0x12]);
    }

    #[test]
    fn test_byte_decode_reduces_mod_q() {
        let bytes = vec![0xFF; 384];
        let f = byte_decode(&bytes, 12).unwrap();
        assert!(f.iter().all(|&c| c == 4095 % kem::Q));
    }

    #[test]
    fn test_invalid_width_and_length() {
        assert_eq!(byte_encode(&[0; N], 0), Err(Error::InvalidParameter));
        assert_eq!(byte_encode(&[0; N], 13), Err(Error::InvalidParameter));
        assert!(matches!(
            byte_decode(&[0u8; 31], 1),
            Err(Error::InvalidLength { expected: 32, actual: 31, .. })
        ));
    }

    #[test]
    fn test_compress_error_bound() {
        for d in [1usize, 4, 5, 10, 11] {
            let bound = (kem::Q + (1 << (d + 1)) - 1) >> (d + 1);
            for x in 0..kem::Q {
                let y = decompress(compress(x, d), d);
                let diff = x.abs_diff(y);
                let dist = diff.min(kem::Q - diff);
                assert!(dist <= bound, "d={d} x={x} y={y}");
            }
        }
    }

    #[test]
    fn test_compress_one_bit() {
        assert_eq!(compress(0, 1), 0);
        assert_eq!(compress(832, 1), 0);
        assert_eq!(compress(833, 1), 1);
        assert_eq!(compress(1665, 1), 1);
        assert_eq!(compress(2496, 1), 1);
        assert_eq!(compress(2497, 1), 0);
        assert_eq!(decompress(1, 1), 1665);
    }

    #[test]
    fn test_bit_pack_roundtrip() {
        let mut w = [0i32; N];
        for (i, c) in w.iter_mut().enumerate() {
            *c = (i as i32 % 9) - 4;
        }
        let packed = bit_pack(&w, 4, 4);
        assert_eq!(packed.len(), 128);
        assert_eq!(bit_unpack(&packed, 4, 4).unwrap(), w);
    }

    #[test]
    fn test_bit_pack_extremes() {
        let gamma1 = 1u32 << 17;
        let mut w = [0i32; N];
        w[0] = -(gamma1 as i32 - 1);
        w[1] = gamma1 as i32;
        let packed = bit_pack(&w, gamma1 - 1, gamma1);
        assert_eq!(packed.len(), 32 * 18);
        assert_eq!(bit_unpack(&packed, gamma1 - 1, gamma1).unwrap(), w);
    }

    #[test]
    fn test_simple_bit_pack_roundtrip() {
        let w = ramp(1024);
        let packed = simple_bit_pack(&w, 1023);
        assert_eq!(packed.len(), 320);
        assert_eq!(simple_bit_unpack(&packed, 1023).unwrap(), w);
    }

    #[test]
    fn test_hint_roundtrip() {
        let mut h = vec![[false; N]; 4];
        h[0][3] = true;
        h[0][200] = true;
        h[2][0] = true;
        h[3][255] = true;
        let y = hint_bit_pack(&h, 80).unwrap();
        assert_eq!(y.len(), 84);
        assert_eq!(&y[80..], &[2, 2, 3, 4]);
        assert_eq!(hint_bit_unpack(&y, 4, 80), Some(h));
    }

    #[test]
    fn test_hint_rejects_malformed() {
        let mut h = vec![[false; N]; 4];
        h[1][10] = true;
        h[1][20] = true;
        let y = hint_bit_pack(&h, 80).unwrap();

        // indices not increasing
        let mut bad = y.clone();
        bad.swap(0, 1);
        assert_eq!(hint_bit_unpack(&bad, 4, 80), None);

        // nonzero padding
        let mut bad = y.clone();
        bad[5] = 1;
        assert_eq!(hint_bit_unpack(&bad, 4, 80), None);

        // decreasing cumulative count
        let mut bad = y.clone();
        bad[82] = 1;
        assert_eq!(hint_bit_unpack(&bad, 4, 80), None);

        // count beyond omega
        let mut bad = y;
        bad[83] = 81;
        assert_eq!(hint_bit_unpack(&bad, 4, 80), None);
    }

    #[test]
    fn test_hint_weight_limit() {
        let h = vec![[true; N]; 1];
        assert_eq!(hint_bit_pack(&h, 80), Err(Error::InvalidParameter));
    }
}
