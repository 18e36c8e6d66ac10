//! In-memory transaction pool (§3 "Mempool").
//!
//! A volatile map from hex transaction id to the transaction itself. There is
//! no fee-rate ordering or eviction policy — every transaction that passes
//! validation stays until it is mined or the process restarts (§4.6
//! Non-goals: no mempool fee policy).

use std::collections::HashMap;

use crate::types::{Hash, Transaction};

/// The node's unconfirmed transaction pool.
#[derive(Default)]
pub struct Mempool {
    by_id: HashMap<String, Transaction>,
}

impl Mempool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a transaction, keyed by `hex(tx.id)`.
    pub fn insert(&mut self, tx: Transaction) {
        self.by_id.insert(tx.id.to_string(), tx);
    }

    /// Look up a transaction by hex id.
    pub fn get(&self, txid_hex: &str) -> Option<&Transaction> {
        self.by_id.get(txid_hex)
    }

    pub fn contains(&self, txid: &Hash) -> bool {
        self.by_id.contains_key(&txid.to_string())
    }

    /// Remove a transaction, typically once it has been mined into a block.
    pub fn remove(&mut self, txid: &Hash) -> Option<Transaction> {
        self.by_id.remove(&txid.to_string())
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// All pooled transactions, in unspecified order.
    pub fn transactions(&self) -> impl Iterator<Item = &Transaction> {
        self.by_id.values()
    }

    /// All pooled transaction ids as hex strings, in unspecified order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.by_id.keys().map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.by_id.clear();
    }
}
