use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Byte pattern with optional wildcards, written as hex tokens (`"48 8D ?? 0D"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BytePattern {
    bytes: Vec<Option<u8>>,
}

impl BytePattern {
    pub fn new(bytes: Vec<Option<u8>>) -> Self {
        Self { bytes }
    }

    /// Pattern matching the little-endian encoding of a uid
    pub fn from_uid(uid: u64) -> Self {
        Self::new(uid.to_le_bytes().into_iter().map(Some).collect())
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Concrete bytes, if the pattern has no wildcards
    pub fn exact_bytes(&self) -> Option<Vec<u8>> {
        self.bytes.iter().copied().collect()
    }

    /// All offsets in `haystack` where the pattern matches, wildcards matching any byte
    pub fn find_all(&self, haystack: &[u8]) -> Vec<usize> {
        if self.bytes.is_empty() || haystack.len() < self.bytes.len() {
            return Vec::new();
        }

        let mut results = Vec::new();
        let last = haystack.len() - self.bytes.len();

        'outer: for i in 0..=last {
            for (j, byte) in self.bytes.iter().enumerate() {
                if let Some(value) = byte
                    && haystack[i + j] != *value
                {
                    continue 'outer;
                }
            }
            results.push(i);
        }

        results
    }
}

impl FromStr for BytePattern {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_pattern(s).map(Self::new)
    }
}

impl fmt::Display for BytePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_pattern(&self.bytes))
    }
}

pub fn parse_pattern(pattern: &str) -> Result<Vec<Option<u8>>> {
    let mut bytes = Vec::new();
    for token in pattern.split_whitespace() {
        if token == "??" || token == "?" {
            bytes.push(None);
            continue;
        }

        let value = u8::from_str_radix(token, 16)
            .map_err(|e| Error::InvalidPattern(format!("Invalid token '{}': {}", token, e)))?;
        bytes.push(Some(value));
    }

    if bytes.is_empty() {
        return Err(Error::InvalidPattern("Pattern is empty".to_string()));
    }

    Ok(bytes)
}

pub fn format_pattern(bytes: &[Option<u8>]) -> String {
    bytes
        .iter()
        .map(|b| match b {
            Some(value) => format!("{:02X}", value),
            None => "??".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pattern_with_wildcards() {
        let bytes = parse_pattern("02 00 00 00 ?? ??").unwrap();
        assert_eq!(bytes.len(), 6);
        assert_eq!(bytes[0], Some(0x02));
        assert_eq!(bytes[4], None);
    }

    #[test]
    fn test_parse_pattern_rejects_garbage() {
        assert!(matches!(parse_pattern("GG"), Err(Error::InvalidPattern(_))));
        assert!(matches!(parse_pattern("   "), Err(Error::InvalidPattern(_))));
    }

    #[test]
    fn test_display_uses_hex_tokens() {
        let pattern = BytePattern::new(vec![Some(0x48), None, Some(0xFF)]);
        assert_eq!(pattern.to_string(), "48 ?? FF");
        assert_eq!("48 ?? FF".parse::<BytePattern>().unwrap(), pattern);
    }

    #[test]
    fn test_find_all_with_wildcards() {
        let haystack = [0x02u8, 0x10, 0x00, 0x02, 0x20, 0x00, 0x03];
        let pattern: BytePattern = "02 ?? 00".parse().unwrap();
        assert_eq!(pattern.find_all(&haystack), vec![0, 3]);
    }

    #[test]
    fn test_exact_bytes() {
        assert_eq!(BytePattern::from_uid(1).exact_bytes(), Some(vec![1, 0, 0, 0, 0, 0, 0, 0]));
        let wild: BytePattern = "01 ??".parse().unwrap();
        assert_eq!(wild.exact_bytes(), None);
    }
}
