//! Chain identity hash and its per-client cache.
//!
//! The chain identity hash names the specific network instance a signed
//! transaction is valid for; it must be established before transactions can
//! be constructed and must never leak stale across a transport change.

use std::fmt;
use std::str::FromStr;
use std::sync::Mutex;

use crate::error::ClientError;

/// Opaque hash identifying the chain a client is talking to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainIdHash(Vec<u8>);

impl ChainIdHash {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ChainIdHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&bs58::encode(&self.0).into_string())
    }
}

impl FromStr for ChainIdHash {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|e| ClientError::decoding(format!("invalid chain id hash: {e}")))?;
        Ok(Self(bytes))
    }
}

/// Lazily-initialized, instance-scoped cache of the chain identity hash.
///
/// Transitions `Unset -> Set` on first population and back to `Unset` only
/// through [`ChainIdCache::invalidate`], which the client calls when the
/// transport target is replaced. Concurrent initializers may both query the
/// node; the status call is idempotent, so whichever write lands first wins
/// and every caller still observes a value-equal hash.
#[derive(Debug, Default)]
pub struct ChainIdCache {
    slot: Mutex<Option<ChainIdHash>>,
}

impl ChainIdCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached hash, if established.
    pub fn get(&self) -> Option<ChainIdHash> {
        self.slot.lock().unwrap().clone()
    }

    /// Explicit override, skipping the network round trip.
    pub fn set(&self, hash: ChainIdHash) {
        *self.slot.lock().unwrap() = Some(hash);
    }

    /// Populate only if still unset. Used as the blockchain-status unmarshal
    /// side effect.
    pub fn set_if_unset(&self, hash: ChainIdHash) {
        let mut slot = self.slot.lock().unwrap();
        if slot.is_none() {
            *slot = Some(hash);
        }
    }

    /// Clear the cache so the next read re-queries the (new) target.
    pub fn invalidate(&self) {
        *self.slot.lock().unwrap() = None;
    }
}
