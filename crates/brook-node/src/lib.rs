//! # brook-node — chain store and UTXO index.
//!
//! Composes the persistence layer of a Brookchain full node:
//! - [`storage::ChainStore`] — append-only block store backed by RocksDB (§4.4)
//! - [`storage::UtxoIndex`] — derived unspent-output index over the same handle (§4.5)
//! - [`config::NodeConfig`] — node identity and data-directory layout (§6)

pub mod config;
pub mod storage;

pub use config::NodeConfig;
pub use storage::{new_coinbase, ChainStore, IndexedOutput, UtxoIndex};
