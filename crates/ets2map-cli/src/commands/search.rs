//! Search command implementation.
//!
//! Locates a uid, a name token or a wildcard byte pattern in a raw file and
//! prints each match with the surrounding bytes.

use std::fs;
use std::path::Path;

use anyhow::{Result, bail};
use ets2map_core::{BytePattern, indexes_of, string_to_token};
use owo_colors::OwoColorize;

use crate::commands::hex_utils::{format_hex, hex_row, parse_hex};

/// Run the search command
pub fn run(
    path: &Path,
    uid: Option<String>,
    token: Option<String>,
    pattern: Option<String>,
    limit: usize,
) -> Result<()> {
    let pattern = if let Some(ref s) = uid {
        let value = parse_hex(s)?;
        println!("Searching for uid {}", format_hex(value));
        BytePattern::from_uid(value)
    } else if let Some(ref name) = token {
        let Some(value) = string_to_token(name) else {
            bail!("{:?} cannot be encoded as a token", name);
        };
        println!("Searching for token {:?} ({})", name, format_hex(value));
        BytePattern::from_uid(value)
    } else if let Some(ref pat) = pattern {
        let parsed: BytePattern = pat.parse()?;
        println!("Searching for pattern {} ({} bytes)", parsed, parsed.len());
        parsed
    } else {
        bail!("No search target specified. Use --uid, --token, or --pattern");
    };

    let bytes = fs::read(path)?;

    let found = match pattern.exact_bytes() {
        Some(exact) => indexes_of(&bytes, &exact),
        None => pattern.find_all(&bytes),
    };

    println!(
        "{} matches in {} ({} bytes)",
        found.len().bold(),
        path.display(),
        bytes.len()
    );
    println!();

    for &offset in found.iter().take(limit) {
        // Align the context row to 16 bytes
        let row_start = offset & !0xF;
        let row_end = (row_start + 16).min(bytes.len());
        println!(
            "  {}  {}",
            format!("0x{:08X}", offset).cyan(),
            hex_row(&bytes[row_start..row_end])
        );
    }

    if found.len() > limit {
        println!("  ... {} more", found.len() - limit);
    }

    Ok(())
}
