//! Account and contract addresses
//!
//! A 20-byte identifier for any principal the engine talks to or about:
//! callers, recipients, asset contracts, and the engine itself.
//! `Address::ZERO` is the null address; validation rejects it wherever a
//! real recipient or asset contract is required.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors produced when parsing an address from text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressParseError {
    #[error("Address must be 40 hex characters, got {0}")]
    InvalidLength(usize),

    #[error("Invalid hex digit in address: {0:?}")]
    InvalidHex(char),
}

/// A 20-byte account or contract address.
///
/// Displayed and serialized as a lowercase `0x`-prefixed hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; 20]);

impl Address {
    /// The null address (all zero bytes).
    pub const ZERO: Address = Address([0u8; 20]);

    /// Create from raw bytes.
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Create an address whose last eight bytes hold `n` big-endian.
    ///
    /// Convenient for fixtures and deterministic test identities.
    pub fn from_low_u64(n: u64) -> Self {
        let mut bytes = [0u8; 20];
        bytes[12..].copy_from_slice(&n.to_be_bytes());
        Self(bytes)
    }

    /// Parse from a hex string, with or without a `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, AddressParseError> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        if s.len() != 40 {
            return Err(AddressParseError::InvalidLength(s.len()));
        }
        let mut bytes = [0u8; 20];
        for (i, chunk) in s.as_bytes().chunks(2).enumerate() {
            let hi = hex_value(chunk[0] as char)?;
            let lo = hex_value(chunk[1] as char)?;
            bytes[i] = (hi << 4) | lo;
        }
        Ok(Self(bytes))
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// True for the null address.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

fn hex_value(c: char) -> Result<u8, AddressParseError> {
    c.to_digit(16)
        .map(|v| v as u8)
        .ok_or(AddressParseError::InvalidHex(c))
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Address::from_hex(&s).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_address() {
        assert!(Address::ZERO.is_zero());
        assert!(!Address::from_low_u64(1).is_zero());
    }

    #[test]
    fn test_from_low_u64_distinct() {
        let a = Address::from_low_u64(1);
        let b = Address::from_low_u64(2);
        assert_ne!(a, b);
    }

    #[test]
    fn test_display_format() {
        let addr = Address::from_low_u64(0xab);
        let s = addr.to_string();
        assert!(s.starts_with("0x"));
        assert_eq!(s.len(), 42);
        assert!(s.ends_with("ab"));
    }

    #[test]
    fn test_hex_round_trip() {
        let addr = Address::from_low_u64(123_456_789);
        let parsed = Address::from_hex(&addr.to_string()).unwrap();
        assert_eq!(addr, parsed);
    }

    #[test]
    fn test_from_hex_without_prefix() {
        let addr = Address::from_low_u64(7);
        let bare = addr.to_string().trim_start_matches("0x").to_string();
        assert_eq!(Address::from_hex(&bare).unwrap(), addr);
    }

    #[test]
    fn test_from_hex_bad_length() {
        let result = Address::from_hex("0x1234");
        assert_eq!(result, Err(AddressParseError::InvalidLength(4)));
    }

    #[test]
    fn test_from_hex_bad_digit() {
        let result = Address::from_hex(&"zz".repeat(20));
        assert_eq!(result, Err(AddressParseError::InvalidHex('z')));
    }

    #[test]
    fn test_serde_round_trip() {
        let addr = Address::from_low_u64(42);
        let json = serde_json::to_string(&addr).unwrap();
        assert!(json.starts_with("\"0x"));
        let deserialized: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(addr, deserialized);
    }

    #[test]
    fn test_from_str() {
        let addr: Address = "0x0000000000000000000000000000000000000001"
            .parse()
            .unwrap();
        assert_eq!(addr, Address::from_low_u64(1));
    }
}
