//! Bit-vector helpers.

/// Returns a mask with the low `width` bits set.
///
/// Widths of 64 and above saturate to a full mask.
#[inline]
pub fn width_mask(width: u32) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

/// Number of bits needed to encode an index into `lines` positions.
///
/// This is `ceil(log2(lines))`, with a single line needing zero bits.
#[inline]
pub fn index_bits(lines: u32) -> u32 {
    if lines <= 1 {
        0
    } else {
        32 - (lines - 1).leading_zeros()
    }
}

/// Width of an interrupt id field for `lines` sources: index bits plus one valid bit.
#[inline]
pub fn id_field_width(lines: u32) -> u32 {
    index_bits(lines) + 1
}
