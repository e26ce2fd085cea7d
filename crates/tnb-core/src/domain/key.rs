use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ValidationError;

/// Hex length of an ed25519 public key (account numbers, node identifiers, balance keys).
pub const ACCOUNT_NUMBER_HEX_LEN: usize = 64;
/// Hex length of an ed25519 signature.
pub const SIGNATURE_HEX_LEN: usize = 128;

/// Hex-encoded 32-byte public key, stored lowercase.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccountNumber(String);

impl AccountNumber {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.len() != ACCOUNT_NUMBER_HEX_LEN || hex::decode(trimmed).is_err() {
            return Err(ValidationError::InvalidAccountNumber {
                value: input.to_owned(),
                expected: ACCOUNT_NUMBER_HEX_LEN,
            });
        }
        Ok(Self(trimmed.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        let mut bytes = [0_u8; 32];
        // length and alphabet were checked on construction
        if hex::decode_to_slice(&self.0, &mut bytes).is_err() {
            bytes = [0_u8; 32];
        }
        bytes
    }
}

impl FromStr for AccountNumber {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl Display for AccountNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for AccountNumber {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for AccountNumber {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(D::Error::custom)
    }
}

/// Hex-encoded block signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Signature(String);

impl Signature {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        if input.len() != SIGNATURE_HEX_LEN || hex::decode(input).is_err() {
            return Err(ValidationError::InvalidSignature {
                len: input.len(),
                expected: SIGNATURE_HEX_LEN,
            });
        }
        Ok(Self(input.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Signature {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "0CDD4BA04456CA169BAEBFE7EB6A5D5A4D6B9F1D0E6C87B8F3C4A9F8C1F3E5D2";

    #[test]
    fn account_numbers_are_normalized_to_lowercase() {
        let key = AccountNumber::parse(KEY).expect("valid key");
        assert_eq!(key.as_str(), KEY.to_ascii_lowercase());
        assert_eq!(key.to_bytes()[0], 0x0c);
    }

    #[test]
    fn short_or_non_hex_keys_are_rejected() {
        assert!(AccountNumber::parse("abcd").is_err());
        assert!(AccountNumber::parse(&"zz".repeat(32)).is_err());
    }

    #[test]
    fn signature_length_is_exact() {
        assert!(Signature::parse(&"ab".repeat(64)).is_ok());
        let error = Signature::parse(&"ab".repeat(63)).expect_err("short");
        assert_eq!(
            error,
            ValidationError::InvalidSignature {
                len: 126,
                expected: SIGNATURE_HEX_LEN
            }
        );
    }
}
