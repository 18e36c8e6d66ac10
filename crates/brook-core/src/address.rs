//! Base58Check address encoding (§4.1).
//!
//! An address is `base58(version || pubKeyHash || checksum)`, where
//! `checksum` is the first 4 bytes of `sha256(sha256(version || pubKeyHash))`.
//! There is no human-readable prefix or network discriminator — the version
//! byte is fixed at [`ADDRESS_VERSION`] for every address this crate produces
//! or accepts.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::constants::{ADDRESS_CHECKSUM_LEN, ADDRESS_VERSION};
use crate::crypto::{double_sha256, PublicKey};
use crate::error::AddressError;
use crate::types::PubKeyHash;

/// A Base58Check-encoded address wrapping a [`PubKeyHash`] (§4.1).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Address {
    version: u8,
    pub_key_hash: PubKeyHash,
}

impl Address {
    /// Build an address from a pubkey hash using the current [`ADDRESS_VERSION`].
    pub fn from_pub_key_hash(pub_key_hash: PubKeyHash) -> Self {
        Self {
            version: ADDRESS_VERSION,
            pub_key_hash,
        }
    }

    /// Build an address from a public key (`pubKeyHash(pubKey)`, §4.1).
    pub fn from_public_key(public_key: &PublicKey) -> Self {
        Self::from_pub_key_hash(public_key.pub_key_hash())
    }

    /// The pubkey hash this address locks to.
    pub fn pub_key_hash(&self) -> PubKeyHash {
        self.pub_key_hash
    }

    /// The address version byte.
    pub fn version(&self) -> u8 {
        self.version
    }

    /// Encode as `base58(version || pubKeyHash || checksum)` (§4.1 `encodeAddress`).
    pub fn encode(&self) -> String {
        let mut payload = Vec::with_capacity(1 + 20 + ADDRESS_CHECKSUM_LEN);
        payload.push(self.version);
        payload.extend_from_slice(&self.pub_key_hash.0);
        let checksum = checksum(&payload);
        payload.extend_from_slice(&checksum);
        bs58::encode(payload).into_string()
    }

    /// Decode and validate a Base58Check address string (§4.1 `validateAddress`).
    ///
    /// Checks the base58 alphabet, the payload length, the checksum, and the
    /// version byte, in that order, each with its own [`AddressError`] variant.
    pub fn decode(s: &str) -> Result<Self, AddressError> {
        let payload = bs58::decode(s)
            .into_vec()
            .map_err(|e| AddressError::Base58(e.to_string()))?;

        if payload.len() < 1 + ADDRESS_CHECKSUM_LEN {
            return Err(AddressError::TooShort);
        }

        let (versioned, checksum_bytes) = payload.split_at(payload.len() - ADDRESS_CHECKSUM_LEN);
        if checksum(versioned) != checksum_bytes {
            return Err(AddressError::InvalidChecksum);
        }

        let version = versioned[0];
        if version != ADDRESS_VERSION {
            return Err(AddressError::InvalidVersion(version));
        }

        let hash_bytes = &versioned[1..];
        if hash_bytes.len() != 20 {
            return Err(AddressError::TooShort);
        }
        let mut hash = [0u8; 20];
        hash.copy_from_slice(hash_bytes);

        Ok(Self {
            version,
            pub_key_hash: PubKeyHash(hash),
        })
    }
}

/// First [`ADDRESS_CHECKSUM_LEN`] bytes of `sha256(sha256(versioned_payload))` (§4.1).
fn checksum(versioned_payload: &[u8]) -> [u8; ADDRESS_CHECKSUM_LEN] {
    let digest = double_sha256(versioned_payload);
    let mut out = [0u8; ADDRESS_CHECKSUM_LEN];
    out.copy_from_slice(&digest.as_bytes()[..ADDRESS_CHECKSUM_LEN]);
    out
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.encode())
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encode())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::decode(&s).map_err(serde::de::Error::custom)
    }
}
