//! Integration tests for the chain store and UTXO index against a real
//! on-disk RocksDB instance (as opposed to storage.rs's unit tests, which
//! exercise the same paths but stay in-crate).

use brook_core::address::Address;
use brook_core::crypto::KeyPair;
use brook_node::ChainStore;
use brook_node::UtxoIndex;

fn new_address() -> Address {
    Address::from_pub_key_hash(KeyPair::generate().public_key().pub_key_hash())
}

#[test]
fn fresh_chain_credits_genesis_reward_to_miner() {
    let dir = tempfile::tempdir().unwrap();
    let miner = new_address();
    let store = ChainStore::init(dir.path(), &miner).unwrap();

    let utxo = UtxoIndex::new(&store);
    utxo.reindex().unwrap();

    let balance: u64 = utxo
        .find_unspent_transactions(&miner.pub_key_hash())
        .unwrap()
        .iter()
        .map(|out| out.value)
        .sum();
    assert_eq!(balance, brook_core::constants::BLOCK_REWARD);
    assert_eq!(store.best_height().unwrap(), 0);
}

#[test]
fn reopening_an_existing_store_preserves_tip() {
    let dir = tempfile::tempdir().unwrap();
    let miner = new_address();
    let tip = {
        let store = ChainStore::init(dir.path(), &miner).unwrap();
        store.tip_hash().unwrap()
    };

    let reopened = ChainStore::continue_existing(dir.path()).unwrap();
    assert_eq!(reopened.tip_hash().unwrap(), tip);
    assert_eq!(reopened.best_height().unwrap(), 0);
}

#[test]
fn mining_an_empty_block_advances_height_and_utxo() {
    let dir = tempfile::tempdir().unwrap();
    let miner = new_address();
    let store = ChainStore::init(dir.path(), &miner).unwrap();

    let coinbase = brook_node::new_coinbase(&miner);
    let block = store.mine_block(&[coinbase]).unwrap();
    assert_eq!(block.height, 1);
    assert_eq!(store.best_height().unwrap(), 1);

    let utxo = UtxoIndex::new(&store);
    utxo.reindex().unwrap();
    let balance: u64 = utxo
        .find_unspent_transactions(&miner.pub_key_hash())
        .unwrap()
        .iter()
        .map(|out| out.value)
        .sum();
    assert_eq!(balance, 2 * brook_core::constants::BLOCK_REWARD);
}
