use num::Integer;

use crate::error::{index_error, Result};

/// Floor modulo: the result always has the sign of `modulus`.
///
/// Permutation indices are reduced with this function so that negative inputs wrap
/// around instead of truncating toward zero (`floor_mod(-1, 4) == 3`).
#[inline(always)]
pub fn floor_mod<T: Integer + Copy>(value: T, modulus: T) -> T {
    value.mod_floor(&modulus)
}

/// Gathers the bits of `value` selected by `mask` into the low bits of the result.
///
/// Only the low `width` bits of both arguments participate.
pub fn compress_bits(value: u64, mask: u64, width: u32) -> u64 {
    let (value, mut mask) = (value & low_bits(width), mask & low_bits(width));

    let mut result = 0u64;
    let mut out = 0u32;
    while mask != 0 {
        let bit = mask.trailing_zeros();
        result |= ((value >> bit) & 1) << out;
        out += 1;
        mask &= mask - 1;
    }
    result
}

/// Scatters the low bits of `value` to the positions selected by `mask`.
///
/// Inverse of [`compress_bits`] for the bits selected by `mask`.
pub fn expand_bits(value: u64, mask: u64, width: u32) -> u64 {
    let mut mask = mask & low_bits(width);

    let mut result = 0u64;
    let mut input = 0u32;
    while mask != 0 {
        let bit = mask.trailing_zeros();
        result |= ((value >> input) & 1) << bit;
        input += 1;
        mask &= mask - 1;
    }
    result
}

/// Mask with the low `width` bits set (`width` in `1..=64`).
#[inline(always)]
pub(crate) fn low_bits(width: u32) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

/// Checks that `[offset, offset + size)` lies inside an array of `length` elements.
pub(crate) fn check_from_index_size(offset: usize, size: usize, length: usize) -> Result<()> {
    match offset.checked_add(size) {
        Some(end) if end <= length => Ok(()),
        _ => Err(index_error(
            offset as i64,
            length,
            format!("range [{}, {} + {}) out of bounds", offset, offset, size),
        )),
    }
}

/// Checks that `index` addresses one of `length` elements and converts it to `usize`.
pub(crate) fn check_index(index: i64, length: usize) -> Result<usize> {
    if index >= 0 && (index as u64) < length as u64 {
        Ok(index as usize)
    } else {
        Err(index_error(index, length, "index out of range"))
    }
}

/// Checks `offset + delta` against `length` without wrapping the `usize` offset.
pub(crate) fn check_offset_index(offset: usize, delta: i64, length: usize) -> Result<usize> {
    match i64::try_from(offset).ok().and_then(|base| base.checked_add(delta)) {
        Some(index) => check_index(index, length),
        None => Err(index_error(
            i64::try_from(offset).unwrap_or(i64::MAX),
            length,
            format!("offset {} + {} out of range", offset, delta),
        )),
    }
}
