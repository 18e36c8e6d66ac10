//! Command-line interface and node runner for the Brookchain protocol (§6).

use std::str::FromStr;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};

use brook_core::address::Address;
use brook_core::error::TransactionError;
use brook_core::sign::sign_transaction;
use brook_core::types::{Hash, TxInput, TxOutput, Transaction};
use brook_net::{client, NetworkMessage, NodeContext, TxPayload};
use brook_node::config::{NodeConfig, ROOT_PEER};
use brook_node::{ChainStore, UtxoIndex};
use brook_wallet::Wallets;

#[derive(Parser)]
#[command(name = "brook-cli")]
#[command(version, about = "Brookchain node and wallet command-line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a chain store with a genesis block minting the block reward to `address`.
    Createblockchain(AddressArg),
    /// Print the sum of UTXO values locked to `address`.
    Getbalance(AddressArg),
    /// Build, sign, and submit a value-transfer transaction.
    Send(SendArgs),
    /// Dump every block from the tip to genesis.
    Printchain,
    /// Rebuild the UTXO index from the chain.
    Reindexutxo,
    /// Generate a keypair, append it to the wallet file, and print its address.
    Createwallet,
    /// List every address in the wallet file.
    Listaddresses,
    /// Run the peer server.
    Startnode(StartnodeArgs),
}

#[derive(Args)]
struct AddressArg {
    #[arg(long)]
    address: String,
}

#[derive(Args)]
struct SendArgs {
    #[arg(long)]
    from: String,
    #[arg(long)]
    to: String,
    #[arg(long)]
    amount: u64,
    /// Mine the transaction into a block locally instead of broadcasting it.
    #[arg(long)]
    mine: bool,
}

#[derive(Args)]
struct StartnodeArgs {
    /// Address mining rewards should be paid to; enables mining when set.
    #[arg(long)]
    miner: Option<String>,
}

fn node_id() -> Result<String> {
    std::env::var("NODE_ID").context("NODE_ID environment variable must be set")
}

fn open_store(config: &NodeConfig) -> Result<ChainStore> {
    ChainStore::continue_existing(&config.db_path)
        .with_context(|| format!("no chain store at {}", config.db_path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let node_id = node_id()?;

    match cli.command {
        Commands::Createblockchain(args) => createblockchain(&node_id, args),
        Commands::Getbalance(args) => getbalance(&node_id, args),
        Commands::Send(args) => send(&node_id, args).await,
        Commands::Printchain => printchain(&node_id),
        Commands::Reindexutxo => reindexutxo(&node_id),
        Commands::Createwallet => createwallet(&node_id),
        Commands::Listaddresses => listaddresses(&node_id),
        Commands::Startnode(args) => startnode(&node_id, args).await,
    }
}

fn createblockchain(node_id: &str, args: AddressArg) -> Result<()> {
    let address = Address::from_str(&args.address).context("invalid address")?;
    let config = NodeConfig::new(node_id, None);
    let store = ChainStore::init(&config.db_path, &address)
        .context("failed to initialize chain store")?;
    println!("genesis block mined: {}", store.tip_hash()?);
    Ok(())
}

fn getbalance(node_id: &str, args: AddressArg) -> Result<()> {
    let address = Address::from_str(&args.address).context("invalid address")?;
    let config = NodeConfig::new(node_id, None);
    let store = open_store(&config)?;
    let utxo = UtxoIndex::new(&store);
    let balance: u64 = utxo
        .find_unspent_transactions(&address.pub_key_hash())?
        .iter()
        .map(|out| out.value)
        .sum();
    println!("{balance}");
    Ok(())
}

/// Build and sign a value-transfer transaction spending `from`'s UTXOs
/// (§4.3 `newTransaction`).
fn build_transaction(
    store: &ChainStore,
    wallets: &Wallets,
    from: &Address,
    to: &Address,
    amount: u64,
) -> Result<Transaction> {
    let utxo = UtxoIndex::new(store);
    let (accumulated, selected) = utxo.find_spendable_outputs(&from.pub_key_hash(), amount)?;
    if accumulated < amount {
        bail!(TransactionError::InsufficientFunds {
            have: accumulated,
            need: amount,
        });
    }

    let mut inputs = Vec::new();
    let mut referenced_outputs = Vec::new();
    for (txid_hex, out_indices) in &selected {
        let txid = Hash::from_str(txid_hex).context("corrupt utxo index: bad txid")?;
        let prev_tx = store.find_transaction(&txid)?;
        for &out_idx in out_indices {
            let idx = usize::try_from(out_idx).context("negative output index in utxo index")?;
            let output = prev_tx
                .outputs
                .get(idx)
                .context("utxo index references an out-of-bounds output")?
                .clone();
            referenced_outputs.push(output);
            inputs.push(TxInput {
                ref_txid: txid,
                ref_out_idx: out_idx,
                signature: Vec::new(),
                pub_key: Vec::new(),
            });
        }
    }

    let mut outputs = vec![TxOutput {
        value: amount,
        pub_key_hash: to.pub_key_hash(),
    }];
    if accumulated > amount {
        outputs.push(TxOutput {
            value: accumulated - amount,
            pub_key_hash: from.pub_key_hash(),
        });
    }

    let mut tx = Transaction::new(inputs, outputs);
    let wallet = wallets.get_or_err(&from.encode())?;
    sign_transaction(&mut tx, wallet.key_pair(), &referenced_outputs)?;
    Ok(tx)
}

async fn send(node_id: &str, args: SendArgs) -> Result<()> {
    let from = Address::from_str(&args.from).context("invalid from address")?;
    let to = Address::from_str(&args.to).context("invalid to address")?;

    let config = NodeConfig::new(node_id, None);
    let store = open_store(&config)?;
    let wallets = Wallets::load_from_file(&config.wallet_path)?;

    let tx = build_transaction(&store, &wallets, &from, &to, args.amount)?;

    if args.mine {
        let block = store.mine_block(&[tx])?;
        UtxoIndex::new(&store).reindex()?;
        println!("mined block {}", block.hash);
    } else {
        let msg = NetworkMessage::Tx(TxPayload {
            from: config.address.clone(),
            tx,
        });
        client::send_message(ROOT_PEER, &msg)
            .await
            .context("failed to broadcast transaction to root peer")?;
        println!("transaction broadcast to {ROOT_PEER}");
    }
    Ok(())
}

fn printchain(node_id: &str) -> Result<()> {
    let config = NodeConfig::new(node_id, None);
    let store = open_store(&config)?;
    for hash in store.block_hashes()? {
        let block = store.get_block(&hash)?;
        println!(
            "height={} hash={} prev={} txs={} nonce={}",
            block.height,
            block.hash,
            block.prev_hash,
            block.transactions.len(),
            block.nonce
        );
    }
    Ok(())
}

fn reindexutxo(node_id: &str) -> Result<()> {
    let config = NodeConfig::new(node_id, None);
    let store = open_store(&config)?;
    let utxo = UtxoIndex::new(&store);
    utxo.reindex()?;
    println!("reindexed, {} transactions with unspent outputs", utxo.count_transactions()?);
    Ok(())
}

fn createwallet(node_id: &str) -> Result<()> {
    let config = NodeConfig::new(node_id, None);
    let mut wallets = Wallets::load_from_file(&config.wallet_path)?;
    let address = wallets.create_wallet();
    wallets.save_to_file(&config.wallet_path)?;
    println!("{address}");
    Ok(())
}

fn listaddresses(node_id: &str) -> Result<()> {
    let config = NodeConfig::new(node_id, None);
    let wallets = Wallets::load_from_file(&config.wallet_path)?;
    for address in wallets.addresses() {
        println!("{address}");
    }
    Ok(())
}

async fn startnode(node_id: &str, args: StartnodeArgs) -> Result<()> {
    let miner_address = args
        .miner
        .as_deref()
        .map(Address::from_str)
        .transpose()
        .context("invalid miner address")?;
    let config = NodeConfig::new(node_id, miner_address);
    let store = open_store(&config)?;
    let ctx = NodeContext::new(config, store);
    brook_net::run(ctx).await.context("peer server failed")?;
    Ok(())
}
