//! Game name tokens.
//!
//! Short identifiers (city names, prefab names) are packed into a u64 as base-38
//! digits, least significant digit first. Digit 0 is unused so that trailing
//! zero digits terminate the string.

const CHARSET: &[u8; 38] = b"\00123456789abcdefghijklmnopqrstuvwxyz_";
const BASE: u64 = CHARSET.len() as u64;

/// Longest string that fits into a token (38^12 < 2^64)
pub const MAX_TOKEN_LEN: usize = 12;

/// Decode a token into its string form. Token 0 is the empty string.
pub fn token_to_string(mut token: u64) -> String {
    let mut out = String::with_capacity(MAX_TOKEN_LEN);
    while token > 0 {
        let digit = (token % BASE) as usize;
        // Digit 0 has no character; it only appears in malformed tokens
        if digit != 0 {
            out.push(CHARSET[digit] as char);
        }
        token /= BASE;
    }
    out
}

/// Encode a string as a token. Returns `None` for characters outside the
/// token alphabet or strings longer than [`MAX_TOKEN_LEN`].
pub fn string_to_token(s: &str) -> Option<u64> {
    if s.len() > MAX_TOKEN_LEN {
        return None;
    }

    let mut token = 0u64;
    for byte in s.bytes().rev() {
        let lower = byte.to_ascii_lowercase();
        let digit = CHARSET[1..].iter().position(|&c| c == lower)? as u64 + 1;
        token = token * BASE + digit;
    }
    Some(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_characters() {
        assert_eq!(token_to_string(1), "0");
        assert_eq!(token_to_string(11), "a");
        assert_eq!(token_to_string(37), "_");
    }

    #[test]
    fn test_least_significant_digit_first() {
        // "ab" = 'a' + 'b' * 38
        assert_eq!(token_to_string(11 + 12 * 38), "ab");
        assert_eq!(string_to_token("ab"), Some(11 + 12 * 38));
    }

    #[test]
    fn test_city_name() {
        let token = string_to_token("berlin").unwrap();
        assert_eq!(token_to_string(token), "berlin");
        assert_eq!(string_to_token("Berlin"), Some(token));
    }

    #[test]
    fn test_rejects_invalid_input() {
        assert_eq!(string_to_token("new york"), None);
        assert_eq!(string_to_token("abcdefghijklm"), None);
        assert_eq!(token_to_string(0), "");
    }

    #[test]
    fn test_max_length_token_fits() {
        let token = string_to_token("____________").unwrap();
        assert_eq!(token_to_string(token), "____________");
    }
}
