//! Wallet keystore errors (§7).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WalletError {
    #[error("wallet address is invalid: {0}")]
    InvalidAddress(#[from] brook_core::error::AddressError),
    #[error("no wallet found for address {0}")]
    UnknownAddress(String),
    #[error("underlying storage failure: {0}")]
    IoFailure(String),
    #[error("wallet file is corrupt: {0}")]
    CorruptStore(String),
}
