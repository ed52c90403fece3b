//! Account address codec.
//!
//! Addresses are stored and sent as raw bytes; client-side they display as
//! base58check strings with a version prefix. Short human-readable account
//! names are usable in place of binary addresses and travel as literal bytes.
//! Encoding requires checksum computation, so the textual form is computed
//! lazily and cached on first access.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ClientError;

/// Version prefix byte for binary account addresses.
pub const ADDRESS_PREFIX: u8 = 0x42;

/// Byte length of a binary address payload (compressed public key).
pub const ADDRESS_BYTE_LENGTH: usize = 33;

/// Maximum byte length of a human-readable account name.
pub const ACCOUNT_NAME_LENGTH: usize = 12;

/// An on-chain account identifier: either a binary address (checksummed when
/// displayed) or a short account name.
///
/// Equality compares canonical byte payloads only, never textual forms or
/// the name/binary classification.
pub struct Address {
    value: Vec<u8>,
    encoded: OnceLock<String>,
    is_name: bool,
}

impl Address {
    /// Construct from raw bytes. Trailing zero bytes are stripped before
    /// classification, so zero-padded name payloads are tolerated.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        let value: Vec<u8> = bytes.into();
        let stripped_len = {
            let mut len = value.len();
            while len > 0 && value[len - 1] == 0 {
                len -= 1;
            }
            len
        };
        if stripped_len <= ACCOUNT_NAME_LENGTH {
            Self {
                value: value[..stripped_len].to_vec(),
                encoded: OnceLock::new(),
                is_name: true,
            }
        } else {
            Self {
                value,
                encoded: OnceLock::new(),
                is_name: false,
            }
        }
    }

    /// Decode a base58check address string into its raw payload. Fails on a
    /// checksum mismatch, a wrong version prefix, or a wrong length.
    pub fn decode(text: &str) -> Result<Vec<u8>, ClientError> {
        let decoded = bs58::decode(text)
            .with_check(None)
            .into_vec()
            .map_err(|e| ClientError::decoding(format!("invalid address encoding: {e}")))?;
        if decoded.first() != Some(&ADDRESS_PREFIX) {
            return Err(ClientError::decoding(format!(
                "invalid address prefix ({})",
                decoded.first().copied().unwrap_or_default()
            )));
        }
        if decoded.len() != ADDRESS_BYTE_LENGTH + 1 {
            return Err(ClientError::decoding(format!(
                "invalid address length ({})",
                decoded.len() - 1
            )));
        }
        Ok(decoded[1..].to_vec())
    }

    /// Encode a raw payload as a base58check address string. Empty input is
    /// the sentinel for "no address" and encodes as the empty string.
    pub fn encode(bytes: &[u8]) -> String {
        if bytes.is_empty() {
            return String::new();
        }
        let mut buf = Vec::with_capacity(bytes.len() + 1);
        buf.push(ADDRESS_PREFIX);
        buf.extend_from_slice(bytes);
        bs58::encode(buf).with_check().into_string()
    }

    /// Canonical byte payload.
    pub fn as_bytes(&self) -> &[u8] {
        &self.value
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.value
    }

    /// `true` if this identifier is a short account name rather than a
    /// binary address.
    pub fn is_name(&self) -> bool {
        self.is_name
    }

    /// The textual form, computed on first access and cached.
    pub fn encoded(&self) -> &str {
        self.encoded.get_or_init(|| {
            if self.is_name {
                String::from_utf8_lossy(&self.value).into_owned()
            } else {
                Self::encode(&self.value)
            }
        })
    }
}

impl FromStr for Address {
    type Err = ClientError;

    /// Strings longer than the name limit are decoded as binary addresses;
    /// shorter ones are taken as literal name bytes.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let addr = if s.len() > ACCOUNT_NAME_LENGTH {
            Self::from_bytes(Self::decode(s)?)
        } else {
            Self::from_bytes(s.as_bytes().to_vec())
        };
        // Cache the already-known textual form.
        let _ = addr.encoded.set(s.to_string());
        Ok(addr)
    }
}

impl Clone for Address {
    fn clone(&self) -> Self {
        let encoded = OnceLock::new();
        if let Some(text) = self.encoded.get() {
            let _ = encoded.set(text.clone());
        }
        Self {
            value: self.value.clone(),
            encoded,
            is_name: self.is_name,
        }
    }
}

impl PartialEq for Address {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Address {}

impl std::hash::Hash for Address {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.encoded())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.encoded())
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.encoded())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
