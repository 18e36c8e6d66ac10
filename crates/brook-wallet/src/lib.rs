//! # brook-wallet — on-disk wallet keystore.
//!
//! A thin, unencrypted keystore mapping addresses to keypairs (§1, §6).

pub mod error;
pub mod wallet;

pub use error::WalletError;
pub use wallet::{Wallet, Wallets};
