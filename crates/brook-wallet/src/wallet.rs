//! On-disk wallet keystore (§1 "external collaborator with documented
//! interface only", §6 `createwallet`/`listaddresses`).
//!
//! A [`Wallets`] is a plain map from Base58Check address to keypair,
//! persisted as one bincode-encoded file at `./DB/wallets_<NODE_ID>.data`
//! (§6). There is no passphrase encryption; a documented interface is all
//! this layer needs to provide.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use brook_core::address::Address;
use brook_core::crypto::KeyPair;

use crate::error::WalletError;

/// A single keypair and the address it derives.
pub struct Wallet {
    key_pair: KeyPair,
}

impl Wallet {
    pub fn new() -> Self {
        Self {
            key_pair: KeyPair::generate(),
        }
    }

    pub fn key_pair(&self) -> &KeyPair {
        &self.key_pair
    }

    pub fn address(&self) -> Address {
        Address::from_public_key(&self.key_pair.public_key())
    }

    fn from_secret_bytes(secret: &[u8; 32]) -> Result<Self, WalletError> {
        let key_pair = KeyPair::from_secret_bytes(secret)
            .map_err(|_| WalletError::CorruptStore("invalid private key bytes".into()))?;
        Ok(Self { key_pair })
    }
}

impl Default for Wallet {
    fn default() -> Self {
        Self::new()
    }
}

/// On-disk record: just the 32-byte private scalar, the public key and
/// address are both re-derivable from it.
#[derive(bincode::Encode, bincode::Decode)]
struct StoredWallet {
    secret: [u8; 32],
}

/// The node's wallet keystore (§6 `createwallet`, `listaddresses`).
#[derive(Default)]
pub struct Wallets {
    by_address: HashMap<String, Wallet>,
}

impl Wallets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a keystore from disk, or return an empty one if the file does
    /// not exist yet.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, WalletError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::new());
        }
        let bytes = fs::read(path).map_err(|e| WalletError::IoFailure(e.to_string()))?;
        let (stored, _): (Vec<StoredWallet>, usize) =
            bincode::decode_from_slice(&bytes, bincode::config::standard())
                .map_err(|e| WalletError::CorruptStore(e.to_string()))?;

        let mut by_address = HashMap::with_capacity(stored.len());
        for entry in stored {
            let wallet = Wallet::from_secret_bytes(&entry.secret)?;
            by_address.insert(wallet.address().encode(), wallet);
        }
        Ok(Self { by_address })
    }

    /// Persist the keystore to disk, creating parent directories as needed.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), WalletError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| WalletError::IoFailure(e.to_string()))?;
        }
        let stored: Vec<StoredWallet> = self
            .by_address
            .values()
            .map(|w| StoredWallet {
                secret: w.key_pair.secret_bytes(),
            })
            .collect();
        let bytes = bincode::encode_to_vec(&stored, bincode::config::standard())
            .expect("in-memory wallet records always encode");
        fs::write(path, bytes).map_err(|e| WalletError::IoFailure(e.to_string()))?;
        tracing::debug!(path = %path.display(), count = self.by_address.len(), "wallet keystore saved");
        Ok(())
    }

    /// Generate a new keypair, add it to the keystore, and return its
    /// encoded address (§6 `createwallet`).
    pub fn create_wallet(&mut self) -> String {
        let wallet = Wallet::new();
        let address = wallet.address().encode();
        self.by_address.insert(address.clone(), wallet);
        tracing::info!(%address, "created new wallet");
        address
    }

    /// All known addresses, in unspecified order (§6 `listaddresses`).
    pub fn addresses(&self) -> Vec<String> {
        self.by_address.keys().cloned().collect()
    }

    pub fn get(&self, address: &str) -> Option<&Wallet> {
        self.by_address.get(address)
    }

    /// Look up a wallet by address, or a typed error if none is known.
    pub fn get_or_err(&self, address: &str) -> Result<&Wallet, WalletError> {
        self.get(address)
            .ok_or_else(|| WalletError::UnknownAddress(address.to_string()))
    }

    pub fn len(&self) -> usize {
        self.by_address.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_address.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn create_wallet_produces_valid_address() {
        let mut wallets = Wallets::new();
        let addr = wallets.create_wallet();
        assert!(Address::decode(&addr).is_ok());
        assert_eq!(wallets.len(), 1);
    }

    #[test]
    fn load_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("wallets_nonexistent.data");
        let wallets = Wallets::load_from_file(&path).unwrap();
        assert!(wallets.is_empty());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("wallets_1.data");

        let mut wallets = Wallets::new();
        let addr_a = wallets.create_wallet();
        let addr_b = wallets.create_wallet();
        wallets.save_to_file(&path).unwrap();

        let loaded = Wallets::load_from_file(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert!(loaded.get(&addr_a).is_some());
        assert!(loaded.get(&addr_b).is_some());
    }

    #[test]
    fn loaded_wallet_has_same_address_as_saved() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("wallets_2.data");

        let mut wallets = Wallets::new();
        let addr = wallets.create_wallet();
        wallets.save_to_file(&path).unwrap();

        let loaded = Wallets::load_from_file(&path).unwrap();
        let wallet = loaded.get(&addr).unwrap();
        assert_eq!(wallet.address().encode(), addr);
    }

    #[test]
    fn addresses_lists_all_wallets() {
        let mut wallets = Wallets::new();
        let a = wallets.create_wallet();
        let b = wallets.create_wallet();
        let mut listed = wallets.addresses();
        listed.sort();
        let mut expected = vec![a, b];
        expected.sort();
        assert_eq!(listed, expected);
    }

    #[test]
    fn unknown_address_returns_none() {
        let wallets = Wallets::new();
        assert!(wallets.get("unknown").is_none());
    }

    #[test]
    fn get_or_err_reports_unknown_address() {
        let wallets = Wallets::new();
        assert!(matches!(
            wallets.get_or_err("unknown"),
            Err(WalletError::UnknownAddress(addr)) if addr == "unknown"
        ));
    }

    #[test]
    fn get_or_err_finds_known_address() {
        let mut wallets = Wallets::new();
        let addr = wallets.create_wallet();
        assert!(wallets.get_or_err(&addr).is_ok());
    }
}
