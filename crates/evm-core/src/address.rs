use sha3::{Digest, Keccak256};

use crate::error::EvmError;

/// Parses a 0x-prefixed hex string into a 20-byte Ethereum address.
///
/// This is the canonical format check applied to every address before it
/// is used anywhere in the system: the string must be `0x` followed by
/// exactly 40 hex characters, and mixed-case input must carry a valid
/// EIP-55 checksum. All-lowercase and all-uppercase input is accepted
/// without a checksum.
pub fn parse_address(address: &str) -> Result<[u8; 20], EvmError> {
    let hex_part = address
        .strip_prefix("0x")
        .or_else(|| address.strip_prefix("0X"))
        .ok_or_else(|| EvmError::InvalidAddress("address must start with 0x".into()))?;

    if hex_part.len() != 40 {
        return Err(EvmError::InvalidAddress(format!(
            "expected 40 hex characters, got {}",
            hex_part.len()
        )));
    }

    let bytes = hex::decode(hex_part)
        .map_err(|e| EvmError::InvalidAddress(format!("invalid hex: {e}")))?;

    let mut addr = [0u8; 20];
    addr.copy_from_slice(&bytes);

    let has_lower = hex_part.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = hex_part.chars().any(|c| c.is_ascii_uppercase());

    if has_lower && has_upper {
        // Mixed case carries an EIP-55 checksum; it must match.
        let checksummed = checksum_address(&addr);
        if checksummed[2..] != *hex_part {
            return Err(EvmError::InvalidAddress("checksum mismatch".into()));
        }
    }

    Ok(addr)
}

/// Renders a 20-byte address as an EIP-55 checksummed 0x-prefixed string.
///
/// A hex letter is uppercased when the corresponding nibble of the
/// Keccak-256 hash of the lowercase hex address is >= 8.
pub fn checksum_address(address: &[u8; 20]) -> String {
    let lower = hex::encode(address);
    let hash = Keccak256::digest(lower.as_bytes());
    let hash_hex = hex::encode(hash);

    let mut out = String::with_capacity(42);
    out.push_str("0x");

    for (i, c) in lower.chars().enumerate() {
        if c.is_ascii_digit() {
            out.push(c);
        } else {
            let nibble = u8::from_str_radix(&hash_hex[i..i + 1], 16).unwrap_or(0);
            if nibble >= 8 {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
        }
    }

    out
}

/// Returns whether the string passes the canonical address check.
pub fn is_valid_address(address: &str) -> bool {
    parse_address(address).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eip55_checksum_known_addresses() {
        // Test vectors from EIP-55.
        let cases = [
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
            "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
            "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
            "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
        ];

        for expected in &cases {
            let bytes = parse_address(expected).unwrap();
            assert_eq!(&checksum_address(&bytes), expected);
        }
    }

    #[test]
    fn parse_all_lowercase() {
        let addr = parse_address("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").unwrap();
        assert_eq!(addr[0], 0x5a);
        assert_eq!(addr[19], 0xed);
    }

    #[test]
    fn parse_all_uppercase() {
        assert!(parse_address("0x5AAEB6053F3E94C9B9A09F33669435E7EF1BEAED").is_ok());
    }

    #[test]
    fn parse_valid_checksum() {
        assert!(parse_address("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed").is_ok());
    }

    #[test]
    fn parse_bad_checksum_errors() {
        // Wrong case on one letter breaks the checksum.
        let result = parse_address("0x5AAEB6053F3E94C9b9A09f33669435E7Ef1BeAed");
        assert!(matches!(result, Err(EvmError::InvalidAddress(_))));
    }

    #[test]
    fn parse_short_address_errors() {
        assert!(parse_address("0x5aAeb6053F").is_err());
    }

    #[test]
    fn parse_no_prefix_errors() {
        assert!(parse_address("5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").is_err());
    }

    #[test]
    fn parse_non_hex_errors() {
        assert!(parse_address("0xggggb6053f3e94c9b9a09f33669435e7ef1beaed").is_err());
    }

    #[test]
    fn parse_empty_errors() {
        assert!(parse_address("").is_err());
    }

    #[test]
    fn checksum_roundtrip() {
        let input = "0x000000000000000000000000000000000000dead";
        let bytes = parse_address(input).unwrap();
        let checksummed = checksum_address(&bytes);
        assert_eq!(parse_address(&checksummed).unwrap(), bytes);
    }

    #[test]
    fn is_valid_address_probe() {
        assert!(is_valid_address("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed"));
        assert!(!is_valid_address("0x5aAeb"));
        assert!(!is_valid_address("not-an-address"));
    }
}
