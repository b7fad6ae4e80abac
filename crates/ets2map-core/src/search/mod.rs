//! Byte pattern search over raw file buffers.
//!
//! Sector files carry no index, so item records are re-located by searching
//! for their 8-byte uid. Both searches return every starting offset,
//! overlapping matches included, in ascending order.

mod pattern;

pub use pattern::{BytePattern, format_pattern, parse_pattern};

use crate::reader::ReadBytes;

/// Find all offsets where `needle` occurs verbatim in `haystack`.
///
/// An empty needle, or a haystack shorter than the needle, yields no matches.
pub fn indexes_of(haystack: &[u8], needle: &[u8]) -> Vec<usize> {
    let Some(&first) = needle.first() else {
        return Vec::new();
    };
    if haystack.len() < needle.len() {
        return Vec::new();
    }

    let last = haystack.len() - needle.len();
    memchr::memchr_iter(first, &haystack[..=last])
        .filter(|&pos| &haystack[pos..pos + needle.len()] == needle)
        .collect()
}

/// Find all offsets where the 8-byte `needle` occurs, comparing whole u64 values.
///
/// Offsets are not required to be aligned. Needles of any other length yield
/// no matches.
pub fn indexes_of_u64(haystack: &[u8], needle: &[u8]) -> Vec<usize> {
    if needle.len() != 8 || haystack.len() < 8 {
        return Vec::new();
    }
    let Ok(needle) = needle.read_u64(0) else {
        return Vec::new();
    };

    (0..=haystack.len() - 8)
        .filter(|&pos| haystack.read_u64(pos).is_ok_and(|value| value == needle))
        .collect()
}

/// Find all offsets of a little-endian encoded uid.
pub fn indexes_of_uid(haystack: &[u8], uid: u64) -> Vec<usize> {
    indexes_of_u64(haystack, &uid.to_le_bytes())
}
