//! Hex parsing and formatting utilities.

use anyhow::Result;

/// Parse a hex value (with or without 0x prefix), as used for uids.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(parse_hex("0x1000").unwrap(), 0x1000);
/// assert_eq!(parse_hex("1000").unwrap(), 0x1000);
/// ```
pub fn parse_hex(s: &str) -> Result<u64> {
    let digits = s.trim_start_matches("0x").trim_start_matches("0X");
    u64::from_str_radix(digits, 16).map_err(|e| anyhow::anyhow!("Invalid hex value {:?}: {}", s, e))
}

/// Format a uid or offset with 0x prefix
pub fn format_hex(value: u64) -> String {
    format!("0x{:X}", value)
}

/// One hexdump row: up to 16 bytes split in two groups, then printable ASCII.
///
/// ```text
/// 02 00 00 00 01 00 00 00  00 00 00 01 00 00 00 00  |................|
/// ```
pub fn hex_row(chunk: &[u8]) -> String {
    let mut row = String::with_capacity(68);

    for j in 0..16 {
        if j == 8 {
            row.push(' ');
        }
        match chunk.get(j) {
            Some(byte) => row.push_str(&format!("{:02X} ", byte)),
            None => row.push_str("   "),
        }
    }

    row.push_str(" |");
    for byte in chunk.iter().take(16) {
        if (0x20..0x7F).contains(byte) {
            row.push(*byte as char);
        } else {
            row.push('.');
        }
    }
    for _ in chunk.len().min(16)..16 {
        row.push(' ');
    }
    row.push('|');
    row
}
