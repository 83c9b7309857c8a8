//! This module contains the pure, stateless kernel for fixed-width
//! bit-packing and unpacking.
//!
//! Codes are written contiguously with no padding between them, MSB-first
//! within each byte; the trailing bits of the final byte are zero. For
//! widths in {8, 16, 32, 64} the packed stream is byte-identical to aligned
//! big-endian integer storage, which is exactly how raw integer columns are
//! driven through this kernel. Dictionary code streams use the sub-byte
//! widths.

use bitvec::prelude::*;
use num_traits::{PrimInt, ToPrimitive, Unsigned};
use std::convert::TryFrom;

use crate::error::HybfError;

/// The number of bytes a packed stream of `count` codes at `bit_width` bits
/// occupies.
pub fn packed_len(count: usize, bit_width: u8) -> usize {
    (count * bit_width as usize + 7) / 8
}

/// Packs a slice of unsigned integers at `bit_width` bits per value,
/// appending to `output_buf`.
pub fn pack<T>(values: &[T], bit_width: u8, output_buf: &mut Vec<u8>) -> Result<(), HybfError>
where
    T: PrimInt + Unsigned + ToPrimitive,
{
    if bit_width == 0 || bit_width > (std::mem::size_of::<T>() * 8) as u8 {
        return Err(HybfError::InvalidEncoding(format!(
            "bit width {} is invalid for a {}-bit code",
            bit_width,
            std::mem::size_of::<T>() * 8
        )));
    }

    let max_val = if bit_width >= 64 {
        u64::MAX
    } else {
        (1u64 << bit_width) - 1
    };

    let mut bits = BitVec::<u8, Msb0>::with_capacity(values.len() * bit_width as usize);
    for &val in values {
        let val_u64 = val.to_u64().ok_or_else(|| {
            HybfError::InvalidEncoding("value does not fit in a 64-bit code".to_string())
        })?;
        if val_u64 > max_val {
            return Err(HybfError::InvalidEncoding(format!(
                "value {} exceeds bit width {}",
                val_u64, bit_width
            )));
        }
        bits.extend_from_bitslice(&val_u64.view_bits::<Msb0>()[64 - bit_width as usize..]);
    }

    // Zero the spare bits of the final byte so output is deterministic.
    bits.set_uninitialized(false);
    output_buf.extend_from_slice(bits.as_raw_slice());
    Ok(())
}

/// Unpacks `count` codes of `bit_width` bits from the front of
/// `input_bytes`.
pub fn unpack<T>(input_bytes: &[u8], bit_width: u8, count: usize) -> Result<Vec<T>, HybfError>
where
    T: PrimInt + Unsigned + TryFrom<u64>,
{
    if bit_width == 0 || bit_width > (std::mem::size_of::<T>() * 8) as u8 {
        return if count == 0 {
            Ok(Vec::new())
        } else {
            Err(HybfError::InvalidEncoding(format!(
                "bit width {} is invalid for a {}-bit code",
                bit_width,
                std::mem::size_of::<T>() * 8
            )))
        };
    }
    if input_bytes.len() < packed_len(count, bit_width) {
        return Err(HybfError::Truncated("bit-packed code stream".to_string()));
    }

    let bits = BitSlice::<u8, Msb0>::from_slice(input_bytes);
    let mut decoded = Vec::with_capacity(count);
    for chunk in bits.chunks(bit_width as usize).take(count) {
        let mut container = 0u64;
        for bit in chunk.iter().by_vals() {
            container = (container << 1) | (bit as u64);
        }
        match T::try_from(container) {
            Ok(val) => decoded.push(val),
            Err(_) => {
                return Err(HybfError::InvalidEncoding(format!(
                    "unpacked code {} does not fit the target type",
                    container
                )))
            }
        }
    }

    Ok(decoded)
}

//==================================================================================
// Unit Tests
//==================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_u32_roundtrip_sub_byte_width() {
        let original: Vec<u32> = vec![5, 6, 7, 1, 0, 3];
        let mut packed = Vec::new();
        pack(&original, 3, &mut packed).unwrap();
        assert_eq!(packed.len(), packed_len(original.len(), 3));

        let decoded: Vec<u32> = unpack(&packed, 3, original.len()).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_msb_first_bit_layout() {
        // 2-bit codes 1,2,3,0 pack into one byte: 01 10 11 00.
        let mut packed = Vec::new();
        pack(&[1u32, 2, 3, 0], 2, &mut packed).unwrap();
        assert_eq!(packed, vec![0b0110_1100]);
    }

    #[test]
    fn test_tail_bits_are_zero() {
        // Three 3-bit codes occupy 9 bits; the last 7 bits must be zero.
        let mut packed = Vec::new();
        pack(&[7u8, 7, 7], 3, &mut packed).unwrap();
        assert_eq!(packed, vec![0b1111_1111, 0b1000_0000]);
    }

    #[test]
    fn test_byte_aligned_widths_match_big_endian_storage() {
        let values: Vec<u64> = vec![0x0102_0304_0506_0708, 0xFFEE_DDCC_BBAA_9988];
        let mut packed = Vec::new();
        pack(&values, 64, &mut packed).unwrap();
        let expected: Vec<u8> = values.iter().flat_map(|v| v.to_be_bytes()).collect();
        assert_eq!(packed, expected);

        let mut packed16 = Vec::new();
        pack(&[0x0102u16, 0xA0B0], 16, &mut packed16).unwrap();
        assert_eq!(packed16, vec![0x01, 0x02, 0xA0, 0xB0]);
    }

    #[test]
    fn test_value_exceeds_bit_width_error() {
        let mut packed = Vec::new();
        let err = pack(&[1u32, 2, 8], 3, &mut packed).unwrap_err();
        assert!(matches!(err, HybfError::InvalidEncoding(_)));
        assert!(err.to_string().contains("exceeds bit width"));
    }

    #[test]
    fn test_unpack_truncated_stream_error() {
        let mut packed = Vec::new();
        pack(&[10u16, 20, 30], 5, &mut packed).unwrap();
        packed.pop();

        let result: Result<Vec<u16>, _> = unpack(&packed, 5, 3);
        assert!(matches!(result, Err(HybfError::Truncated(_))));
    }

    #[test]
    fn test_empty_input() {
        let mut packed = Vec::new();
        pack::<u32>(&[], 4, &mut packed).unwrap();
        assert!(packed.is_empty());
        let decoded: Vec<u32> = unpack(&packed, 4, 0).unwrap();
        assert!(decoded.is_empty());
    }
}
