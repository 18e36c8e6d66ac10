//! Append-only chain store and derived UTXO index, backed by RocksDB (§4.4, §4.5).
//!
//! One `rocksdb::DB` handle with three column families:
//! - `blocks`: `hash(32) -> encoded Block`, plus the single key `"lh"` holding
//!   the tip hash (§3 "Chain state").
//! - `utxo`: `"utxo-" || txid -> encoded list of (output index, TxOutput)`
//!   for a transaction's currently-unspent outputs (§3 "UTXO state").
//!
//! Every mutation that touches more than one key goes through a single
//! `rocksdb::WriteBatch`, so a crash mid-update never leaves the tip pointer
//! referencing a block that was not actually written (§4.4 "single logical
//! write transaction that is atomic and durable").

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use rocksdb::{ColumnFamilyDescriptor, Options, WriteBatch, DB};

use brook_core::address::Address;
use brook_core::constants::BLOCK_REWARD;
use brook_core::error::{StoreError, TransactionError};
use brook_core::sign::verify_transaction;
use brook_core::types::{canonical_bytes, Block, Hash, PubKeyHash, Transaction, TxInput, TxOutput};
use brook_core::merkle;
use brook_consensus::pow;

const CF_BLOCKS: &str = "blocks";
const CF_UTXO: &str = "utxo";
const TIP_KEY: &[u8] = b"lh";
const UTXO_PREFIX: &str = "utxo-";

/// One stored unspent output, tagged with its original index in the owning
/// transaction's output list so repeated partial spends never misalign
/// (§4.5 caveat: "last-writer-wins", resolved here by indexing pairs instead
/// of filtering a positional list).
#[derive(Clone, bincode::Encode, bincode::Decode)]
pub struct IndexedOutput {
    pub out_idx: u32,
    pub output: TxOutput,
}

/// Persistent chain store and UTXO index for one node's data directory.
///
/// A single process-wide handle is expected; RocksDB itself enforces this
/// with a lock file on the data directory (§5 "Resource discipline").
pub struct ChainStore {
    db: Arc<Mutex<DB>>,
}

fn open_db(path: &Path) -> Result<DB, StoreError> {
    let mut opts = Options::default();
    opts.create_if_missing(true);
    opts.create_missing_column_families(true);
    let cfs = vec![
        ColumnFamilyDescriptor::new(CF_BLOCKS, Options::default()),
        ColumnFamilyDescriptor::new(CF_UTXO, Options::default()),
    ];
    DB::open_cf_descriptors(&opts, path, cfs).map_err(|e| StoreError::IoFailure(e.to_string()))
}

/// Build a fresh coinbase transaction paying `BLOCK_REWARD` units to `to`,
/// used both for the genesis block and for each block a miner produces
/// (§4.4 `init`, §4.6 `mineTx` "append a fresh coinbase").
pub fn new_coinbase(to: &Address) -> Transaction {
    Transaction::new(
        vec![TxInput {
            ref_txid: Hash::ZERO,
            ref_out_idx: -1,
            signature: Vec::new(),
            pub_key: rand::random::<[u8; 24]>().to_vec(),
        }],
        vec![TxOutput {
            value: BLOCK_REWARD,
            pub_key_hash: to.pub_key_hash(),
        }],
    )
}

impl ChainStore {
    /// Initialize a fresh store at `path`: mine a genesis block paying
    /// `BLOCK_REWARD` to `address`, persist it, and set the tip (§4.4 `init`).
    pub fn init(path: impl AsRef<Path>, address: &Address) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if path.exists() {
            return Err(StoreError::AlreadyExists);
        }
        let db = open_db(path)?;

        let coinbase = new_coinbase(address);
        let merkle_root = merkle::merkle_root(&[coinbase.id]);
        let (nonce, hash) = pow::run(&Hash::ZERO, &merkle_root, genesis_timestamp());

        let genesis = Block {
            timestamp: genesis_timestamp(),
            prev_hash: Hash::ZERO,
            transactions: vec![coinbase],
            nonce,
            hash,
            height: 0,
        };

        let mut batch = WriteBatch::default();
        let cf_blocks = db
            .cf_handle(CF_BLOCKS)
            .expect("blocks column family was created on open");
        batch.put_cf(cf_blocks, genesis.hash.as_bytes(), canonical_bytes(&genesis));
        batch.put_cf(cf_blocks, TIP_KEY, genesis.hash.as_bytes());
        db.write(batch).map_err(|e| StoreError::IoFailure(e.to_string()))?;

        let store = Self {
            db: Arc::new(Mutex::new(db)),
        };
        UtxoIndex::new(&store).reindex()?;
        tracing::info!(hash = %store.tip_hash()?, path = %path.display(), "initialized chain store with genesis block");
        Ok(store)
    }

    /// Open an existing store at `path` (§4.4 `continue`).
    pub fn continue_existing(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(StoreError::NotFound);
        }
        let db = open_db(path)?;
        let store = Self {
            db: Arc::new(Mutex::new(db)),
        };
        store.tip_hash()?; // fail fast with CorruptStore if "lh" is missing
        Ok(store)
    }

    fn blocks_cf_get(&self, db: &DB, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        let cf = db
            .cf_handle(CF_BLOCKS)
            .expect("blocks column family was created on open");
        db.get_cf(cf, key).map_err(|e| StoreError::IoFailure(e.to_string()))
    }

    /// The current tip hash (§3 `"lh"` key).
    pub fn tip_hash(&self) -> Result<Hash, StoreError> {
        let db = self.db.lock();
        let bytes = self
            .blocks_cf_get(&db, TIP_KEY)?
            .ok_or_else(|| StoreError::CorruptStore("missing tip pointer \"lh\"".into()))?;
        if bytes.len() != 32 {
            return Err(StoreError::CorruptStore("tip pointer is not 32 bytes".into()));
        }
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&bytes);
        Ok(Hash(hash))
    }

    /// Fetch a block by hash (§4.4 `getBlock`).
    pub fn get_block(&self, hash: &Hash) -> Result<Block, StoreError> {
        let db = self.db.lock();
        let bytes = self
            .blocks_cf_get(&db, hash.as_bytes())?
            .ok_or_else(|| StoreError::BlockNotFound(hash.to_string()))?;
        decode_block(&bytes)
    }

    fn get_block_locked(&self, db: &DB, hash: &Hash) -> Result<Block, StoreError> {
        let bytes = self
            .blocks_cf_get(db, hash.as_bytes())?
            .ok_or_else(|| StoreError::BlockNotFound(hash.to_string()))?;
        decode_block(&bytes)
    }

    /// The height of the tip block (§4.4 `getBestHeight`).
    pub fn best_height(&self) -> Result<u64, StoreError> {
        let tip = self.tip_hash()?;
        Ok(self.get_block(&tip)?.height)
    }

    /// Insert `block` if its hash is not already present, updating the tip
    /// if it now has the greatest height seen (§4.4 `addBlock`, I5).
    ///
    /// Does not validate proof-of-work or transactions; callers (the peer
    /// handler, or `mine_block`) are responsible for that before insertion.
    pub fn add_block(&self, block: &Block) -> Result<(), StoreError> {
        let db = self.db.lock();
        if self.blocks_cf_get(&db, block.hash.as_bytes())?.is_some() {
            return Ok(());
        }

        let cf_blocks = db
            .cf_handle(CF_BLOCKS)
            .expect("blocks column family was created on open");
        let mut batch = WriteBatch::default();
        batch.put_cf(cf_blocks, block.hash.as_bytes(), canonical_bytes(block));

        let tip = self.get_block_locked(&db, &self.tip_hash_locked(&db)?)?;
        if block.height > tip.height {
            batch.put_cf(cf_blocks, TIP_KEY, block.hash.as_bytes());
        }
        db.write(batch).map_err(|e| StoreError::IoFailure(e.to_string()))
    }

    fn tip_hash_locked(&self, db: &DB) -> Result<Hash, StoreError> {
        let bytes = self
            .blocks_cf_get(db, TIP_KEY)?
            .ok_or_else(|| StoreError::CorruptStore("missing tip pointer \"lh\"".into()))?;
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&bytes);
        Ok(Hash(hash))
    }

    /// Verify every transaction, build a block atop the tip, mine it, persist
    /// it, and atomically advance the tip (§4.4 `mineBlock`).
    pub fn mine_block(&self, txs: &[Transaction]) -> Result<Block, StoreError> {
        for tx in txs {
            let ok = verify_transaction(tx, |id| self.find_transaction(id).ok())?;
            if !ok {
                return Err(StoreError::InvalidTransaction(TransactionError::InvalidSignature {
                    index: 0,
                }));
            }
        }

        let tip_hash = self.tip_hash()?;
        let tip = self.get_block(&tip_hash)?;

        let txids: Vec<Hash> = txs.iter().map(|t| t.id).collect();
        let merkle_root = merkle::merkle_root(&txids);
        let timestamp = now_unix();
        let (nonce, hash) = pow::run(&tip_hash, &merkle_root, timestamp);

        let block = Block {
            timestamp,
            prev_hash: tip_hash,
            transactions: txs.to_vec(),
            nonce,
            hash,
            height: tip.height + 1,
        };

        self.add_block(&block)?;
        tracing::info!(hash = %block.hash, height = block.height, txs = block.transactions.len(), "mined block");
        Ok(block)
    }

    /// Tip-to-genesis hash list, tip first (§4.4 `getBlockHashes`).
    pub fn block_hashes(&self) -> Result<Vec<Hash>, StoreError> {
        let mut hashes = Vec::new();
        let mut current = self.tip_hash()?;
        loop {
            hashes.push(current);
            let block = self.get_block(&current)?;
            if block.prev_hash.is_zero() {
                break;
            }
            current = block.prev_hash;
        }
        Ok(hashes)
    }

    /// Tip-to-genesis scan for a transaction by id (§4.4 `findTransaction`).
    pub fn find_transaction(&self, id: &Hash) -> Result<Transaction, StoreError> {
        for hash in self.block_hashes()? {
            let block = self.get_block(&hash)?;
            if let Some(tx) = block.transactions.iter().find(|t| t.id == *id) {
                return Ok(tx.clone());
            }
        }
        Err(StoreError::TxNotFound(id.to_string()))
    }

    /// Tip-to-genesis scan computing ground-truth UTXO state: for each
    /// transaction, its outputs minus whichever are referenced by any input
    /// in the chain (§4.4 `findUTXO`, I4).
    pub fn find_utxo(&self) -> Result<HashMap<Hash, Vec<IndexedOutput>>, StoreError> {
        let hashes = self.block_hashes()?;
        let blocks: Vec<Block> = hashes
            .iter()
            .map(|h| self.get_block(h))
            .collect::<Result<_, _>>()?;

        let mut spent: HashMap<Hash, Vec<i64>> = HashMap::new();
        for block in &blocks {
            for tx in &block.transactions {
                for input in &tx.inputs {
                    if input.is_coinbase() {
                        continue;
                    }
                    spent.entry(input.ref_txid).or_default().push(input.ref_out_idx);
                }
            }
        }

        let mut utxo: HashMap<Hash, Vec<IndexedOutput>> = HashMap::new();
        for block in &blocks {
            for tx in &block.transactions {
                let spent_indices = spent.get(&tx.id);
                let unspent: Vec<IndexedOutput> = tx
                    .outputs
                    .iter()
                    .enumerate()
                    .filter(|(idx, _)| {
                        !spent_indices
                            .map(|v| v.contains(&(*idx as i64)))
                            .unwrap_or(false)
                    })
                    .map(|(idx, out)| IndexedOutput {
                        out_idx: idx as u32,
                        output: out.clone(),
                    })
                    .collect();
                if !unspent.is_empty() {
                    utxo.insert(tx.id, unspent);
                }
            }
        }
        Ok(utxo)
    }

    fn db(&self) -> Arc<Mutex<DB>> {
        Arc::clone(&self.db)
    }
}

fn now_unix() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

fn genesis_timestamp() -> u64 {
    now_unix()
}

fn decode_block(bytes: &[u8]) -> Result<Block, StoreError> {
    bincode::decode_from_slice(bytes, bincode::config::standard())
        .map(|(block, _)| block)
        .map_err(|e| StoreError::CorruptStore(e.to_string()))
}

fn utxo_key(txid: &Hash) -> Vec<u8> {
    let mut key = Vec::with_capacity(UTXO_PREFIX.len() + 32);
    key.extend_from_slice(UTXO_PREFIX.as_bytes());
    key.extend_from_slice(txid.as_bytes());
    key
}

/// The derived unspent-output index (§4.5). Wraps the same RocksDB handle as
/// its [`ChainStore`], in the `utxo` column family.
pub struct UtxoIndex<'a> {
    store: &'a ChainStore,
}

impl<'a> UtxoIndex<'a> {
    pub fn new(store: &'a ChainStore) -> Self {
        Self { store }
    }

    fn cf_utxo<'b>(&self, db: &'b DB) -> &'b rocksdb::ColumnFamily {
        db.cf_handle(CF_UTXO).expect("utxo column family was created on open")
    }

    /// Drop every `utxo-` entry and rebuild from a full chain scan (§4.5
    /// `reindex`).
    pub fn reindex(&self) -> Result<(), StoreError> {
        let utxo = self.store.find_utxo()?;
        let db = self.store.db();
        let db = db.lock();
        let cf = self.cf_utxo(&db);

        let mut batch = WriteBatch::default();
        let mut iter = db.prefix_iterator_cf(cf, UTXO_PREFIX.as_bytes());
        while let Some(Ok((key, _))) = iter.next() {
            if key.starts_with(UTXO_PREFIX.as_bytes()) {
                batch.delete_cf(cf, key);
            }
        }
        for (txid, outputs) in &utxo {
            batch.put_cf(cf, utxo_key(txid), encode_outputs(outputs));
        }
        db.write(batch).map_err(|e| StoreError::IoFailure(e.to_string()))
    }

    /// Incrementally apply one newly-connected block (§4.5 `update`).
    ///
    /// For each non-coinbase input, removes the referenced output (by its
    /// original index) from its transaction's stored entry, deleting the
    /// entry if it becomes empty. Then writes the block's own transactions'
    /// outputs under their own keys, overwriting any existing entry for that
    /// id (the source's last-writer-wins behavior, §4.5 caveat — acceptable
    /// since `tx.id` is content-addressed and a collision within one chain
    /// is practically impossible).
    pub fn update(&self, block: &Block) -> Result<(), StoreError> {
        let db = self.store.db();
        let db = db.lock();
        let cf = self.cf_utxo(&db);
        let mut batch = WriteBatch::default();

        for tx in &block.transactions {
            for input in &tx.inputs {
                if input.is_coinbase() {
                    continue;
                }
                let key = utxo_key(&input.ref_txid);
                let existing = db
                    .get_cf(cf, &key)
                    .map_err(|e| StoreError::IoFailure(e.to_string()))?;
                if let Some(bytes) = existing {
                    let mut outputs = decode_outputs(&bytes)?;
                    outputs.retain(|o| i64::from(o.out_idx) != input.ref_out_idx);
                    if outputs.is_empty() {
                        batch.delete_cf(cf, &key);
                    } else {
                        batch.put_cf(cf, &key, encode_outputs(&outputs));
                    }
                }
            }
        }

        for tx in &block.transactions {
            let outputs: Vec<IndexedOutput> = tx
                .outputs
                .iter()
                .enumerate()
                .map(|(idx, out)| IndexedOutput {
                    out_idx: idx as u32,
                    output: out.clone(),
                })
                .collect();
            batch.put_cf(cf, utxo_key(&tx.id), encode_outputs(&outputs));
        }

        db.write(batch).map_err(|e| StoreError::IoFailure(e.to_string()))
    }

    /// Accumulate unspent outputs locked to `pub_key_hash` until reaching
    /// `amount`, returning the total found and which output indices to spend
    /// per transaction id (§4.5 `findSpendableOutputs`).
    pub fn find_spendable_outputs(
        &self,
        pub_key_hash: &PubKeyHash,
        amount: u64,
    ) -> Result<(u64, HashMap<String, Vec<i64>>), StoreError> {
        let mut accumulated = 0u64;
        let mut selected: HashMap<String, Vec<i64>> = HashMap::new();

        'outer: for (txid, entry) in self.scan()? {
            for indexed in entry {
                if indexed.output.pub_key_hash.0 == pub_key_hash.0 {
                    accumulated = accumulated.saturating_add(indexed.output.value);
                    selected
                        .entry(txid.to_string())
                        .or_default()
                        .push(i64::from(indexed.out_idx));
                    if accumulated >= amount {
                        break 'outer;
                    }
                }
            }
        }
        Ok((accumulated, selected))
    }

    /// All unspent outputs locked to `pub_key_hash` (§4.5 `findUnspentTransactions`).
    pub fn find_unspent_transactions(&self, pub_key_hash: &PubKeyHash) -> Result<Vec<TxOutput>, StoreError> {
        let mut outputs = Vec::new();
        for (_, entry) in self.scan()? {
            for indexed in entry {
                if indexed.output.pub_key_hash.0 == pub_key_hash.0 {
                    outputs.push(indexed.output);
                }
            }
        }
        Ok(outputs)
    }

    /// Number of distinct transaction entries in the UTXO index (§4.5
    /// `countTransactions`).
    pub fn count_transactions(&self) -> Result<usize, StoreError> {
        Ok(self.scan()?.len())
    }

    fn scan(&self) -> Result<Vec<(Hash, Vec<IndexedOutput>)>, StoreError> {
        let db = self.store.db();
        let db = db.lock();
        let cf = self.cf_utxo(&db);
        let mut out = Vec::new();
        let mut iter = db.prefix_iterator_cf(cf, UTXO_PREFIX.as_bytes());
        while let Some(Ok((key, value))) = iter.next() {
            if !key.starts_with(UTXO_PREFIX.as_bytes()) {
                continue;
            }
            let hash_bytes = &key[UTXO_PREFIX.len()..];
            if hash_bytes.len() != 32 {
                continue;
            }
            let mut hash = [0u8; 32];
            hash.copy_from_slice(hash_bytes);
            out.push((Hash(hash), decode_outputs(&value)?));
        }
        Ok(out)
    }
}

fn encode_outputs(outputs: &[IndexedOutput]) -> Vec<u8> {
    bincode::encode_to_vec(outputs, bincode::config::standard())
        .expect("in-memory UTXO entries always encode")
}

fn decode_outputs(bytes: &[u8]) -> Result<Vec<IndexedOutput>, StoreError> {
    bincode::decode_from_slice(bytes, bincode::config::standard())
        .map(|(v, _)| v)
        .map_err(|e| StoreError::CorruptStore(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use brook_core::crypto::KeyPair;
    use brook_core::sign::sign_transaction;
    use tempfile::tempdir;

    fn wallet_address() -> (KeyPair, Address) {
        let kp = KeyPair::generate();
        let addr = Address::from_public_key(&kp.public_key());
        (kp, addr)
    }

    #[test]
    fn init_creates_genesis_with_reward() {
        let dir = tempdir().unwrap();
        let (_, addr) = wallet_address();
        let store = ChainStore::init(dir.path().join("chain"), &addr).unwrap();

        assert_eq!(store.best_height().unwrap(), 0);
        let tip = store.get_block(&store.tip_hash().unwrap()).unwrap();
        assert!(tip.prev_hash.is_zero());
        assert_eq!(tip.transactions[0].outputs[0].value, BLOCK_REWARD);
    }

    #[test]
    fn init_twice_fails_already_exists() {
        let dir = tempdir().unwrap();
        let (_, addr) = wallet_address();
        let path = dir.path().join("chain");
        ChainStore::init(&path, &addr).unwrap();
        assert!(matches!(
            ChainStore::init(&path, &addr),
            Err(StoreError::AlreadyExists)
        ));
    }

    #[test]
    fn continue_missing_fails_not_found() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            ChainStore::continue_existing(dir.path().join("missing")),
            Err(StoreError::NotFound)
        ));
    }

    #[test]
    fn continue_reopens_existing_store() {
        let dir = tempdir().unwrap();
        let (_, addr) = wallet_address();
        let path = dir.path().join("chain");
        let store = ChainStore::init(&path, &addr).unwrap();
        let tip = store.tip_hash().unwrap();
        drop(store);

        let reopened = ChainStore::continue_existing(&path).unwrap();
        assert_eq!(reopened.tip_hash().unwrap(), tip);
    }

    #[test]
    fn reindex_finds_genesis_reward() {
        let dir = tempdir().unwrap();
        let (_, addr) = wallet_address();
        let store = ChainStore::init(dir.path().join("chain"), &addr).unwrap();
        let index = UtxoIndex::new(&store);

        let (balance, _) = index.find_spendable_outputs(&addr.pub_key_hash(), BLOCK_REWARD).unwrap();
        assert_eq!(balance, BLOCK_REWARD);
        assert_eq!(index.count_transactions().unwrap(), 1);
    }

    #[test]
    fn mine_block_updates_tip_and_utxo() {
        let dir = tempdir().unwrap();
        let (kp, addr) = wallet_address();
        let store = ChainStore::init(dir.path().join("chain"), &addr).unwrap();
        let index = UtxoIndex::new(&store);

        let genesis_tx = store.get_block(&store.tip_hash().unwrap()).unwrap().transactions[0].clone();
        let (to_kp, to_addr) = wallet_address();
        let _ = to_kp;

        let mut spend = Transaction::new(
            vec![TxInput {
                ref_txid: genesis_tx.id,
                ref_out_idx: 0,
                signature: vec![],
                pub_key: vec![],
            }],
            vec![TxOutput {
                value: BLOCK_REWARD,
                pub_key_hash: to_addr.pub_key_hash(),
            }],
        );
        sign_transaction(&mut spend, &kp, std::slice::from_ref(&genesis_tx.outputs[0])).unwrap();

        let block = store.mine_block(&[spend.clone()]).unwrap();
        assert_eq!(block.height, 1);
        assert_eq!(store.best_height().unwrap(), 1);

        index.update(&block).unwrap();
        let (balance_from, _) = index.find_spendable_outputs(&addr.pub_key_hash(), 1).unwrap();
        assert_eq!(balance_from, 0);
        let (balance_to, _) = index.find_spendable_outputs(&to_addr.pub_key_hash(), 1).unwrap();
        assert_eq!(balance_to, BLOCK_REWARD);
    }

    #[test]
    fn update_then_reindex_matches_reindex_alone() {
        let dir = tempdir().unwrap();
        let (kp, addr) = wallet_address();
        let store = ChainStore::init(dir.path().join("chain"), &addr).unwrap();
        let index = UtxoIndex::new(&store);

        let genesis_tx = store.get_block(&store.tip_hash().unwrap()).unwrap().transactions[0].clone();
        let (_, to_addr) = wallet_address();
        let mut spend = Transaction::new(
            vec![TxInput {
                ref_txid: genesis_tx.id,
                ref_out_idx: 0,
                signature: vec![],
                pub_key: vec![],
            }],
            vec![TxOutput {
                value: BLOCK_REWARD,
                pub_key_hash: to_addr.pub_key_hash(),
            }],
        );
        sign_transaction(&mut spend, &kp, std::slice::from_ref(&genesis_tx.outputs[0])).unwrap();
        let block = store.mine_block(&[spend]).unwrap();

        index.update(&block).unwrap();
        let via_update = index.scan().unwrap();

        index.reindex().unwrap();
        let via_reindex = index.scan().unwrap();

        let mut a: Vec<_> = via_update.into_iter().map(|(h, _)| h).collect();
        let mut b: Vec<_> = via_reindex.into_iter().map(|(h, _)| h).collect();
        a.sort();
        b.sort();
        assert_eq!(a, b);
    }

    #[test]
    fn add_block_is_idempotent() {
        let dir = tempdir().unwrap();
        let (_, addr) = wallet_address();
        let store = ChainStore::init(dir.path().join("chain"), &addr).unwrap();
        let tip = store.get_block(&store.tip_hash().unwrap()).unwrap();
        store.add_block(&tip).unwrap();
        assert_eq!(store.best_height().unwrap(), 0);
    }

    #[test]
    fn block_hashes_lists_tip_to_genesis() {
        let dir = tempdir().unwrap();
        let (_, addr) = wallet_address();
        let store = ChainStore::init(dir.path().join("chain"), &addr).unwrap();
        let hashes = store.block_hashes().unwrap();
        assert_eq!(hashes.len(), 1);
        assert_eq!(hashes[0], store.tip_hash().unwrap());
    }

    #[test]
    fn find_transaction_missing_errors() {
        let dir = tempdir().unwrap();
        let (_, addr) = wallet_address();
        let store = ChainStore::init(dir.path().join("chain"), &addr).unwrap();
        assert!(matches!(
            store.find_transaction(&Hash([0xFF; 32])),
            Err(StoreError::TxNotFound(_))
        ));
    }
}
