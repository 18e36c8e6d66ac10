//! Error kinds for the Brookchain protocol (§7).

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    #[error("invalid public key bytes")] InvalidPublicKey,
    #[error("invalid signature bytes")] InvalidSignature,
    #[error("signature verification failed")] VerificationFailed,
    #[error("input index out of bounds: {index} >= {len}")] InputIndexOutOfBounds { index: usize, len: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("invalid address: too short to contain a checksum")] TooShort,
    #[error("unsupported address version: {0}")] InvalidVersion(u8),
    #[error("checksum mismatch")] InvalidChecksum,
    #[error("base58 decode error: {0}")] Base58(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransactionError {
    #[error("insufficient funds: have {have}, need {need}")] InsufficientFunds { have: u64, need: u64 },
    #[error("referenced previous transaction is unknown: {0}")] MissingPrevTx(String),
    #[error("signature verification failed on input {index}")] InvalidSignature { index: usize },
    #[error("input index out of bounds: {index} >= {len}")] InputIndexOutOfBounds { index: usize, len: usize },
    #[error(transparent)] Crypto(#[from] CryptoError),
}

/// Errors surfaced by the chain store and UTXO index (§4.4, §4.5).
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("chain store already exists at this path")] AlreadyExists,
    #[error("no chain store found at this path")] NotFound,
    #[error("block not found: {0}")] BlockNotFound(String),
    #[error("transaction not found: {0}")] TxNotFound(String),
    #[error(transparent)] InvalidTransaction(#[from] TransactionError),
    #[error("underlying storage failure: {0}")] IoFailure(String),
    #[error("persisted chain state is internally inconsistent: {0}")] CorruptStore(String),
}

/// Errors arising from peer protocol handling. Handlers log and drop these; they never
/// terminate the process (§7).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    #[error("malformed wire message")] MalformedMessage,
    #[error("unknown command: {0}")] UnknownCommand(String),
    #[error("peer dial failed: {0}")] DialFailed(String),
}
