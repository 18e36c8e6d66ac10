//! Shared node state and peer message handlers (§4.6, §5, §9 "NodeContext").
//!
//! [`NodeContext`] replaces the reference implementation's global mutable
//! `KnownNodes`/`memoryPool`/`blocksInTransit` with one value owned by the
//! server and shared via `Arc`; every mutable field is behind its own
//! `parking_lot::Mutex` (§5 "Ordering").

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::io::AsyncReadExt;
use tokio::net::{TcpListener, TcpStream};

use brook_core::constants::PROTOCOL_VERSION;
use brook_core::error::StoreError;
use brook_core::mempool::Mempool;
use brook_core::sign::verify_transaction;
use brook_core::types::Hash;
use brook_node::config::{NodeConfig, ROOT_PEER};
use brook_node::{new_coinbase, ChainStore, UtxoIndex};

use crate::client;
use crate::protocol::{
    AddressPayload, BlockPayload, GetBlocksPayload, GetDataPayload, InvPayload, ItemKind,
    NetworkMessage, TxPayload, VersionPayload,
};

/// Shared, mutex-guarded node state plus the chain store handle (§9).
pub struct NodeContext {
    pub config: NodeConfig,
    store: ChainStore,
    known_nodes: Mutex<Vec<String>>,
    mempool: Mutex<Mempool>,
    blocks_in_transit: Mutex<Vec<Hash>>,
}

impl NodeContext {
    pub fn new(config: NodeConfig, store: ChainStore) -> Arc<Self> {
        let known_nodes = Mutex::new(config.initial_known_nodes());
        Arc::new(Self {
            config,
            store,
            known_nodes,
            mempool: Mutex::new(Mempool::new()),
            blocks_in_transit: Mutex::new(Vec::new()),
        })
    }

    pub fn store(&self) -> &ChainStore {
        &self.store
    }

    fn utxo(&self) -> UtxoIndex<'_> {
        UtxoIndex::new(&self.store)
    }

    pub fn known_nodes(&self) -> Vec<String> {
        self.known_nodes.lock().clone()
    }

    pub fn mempool_len(&self) -> usize {
        self.mempool.lock().len()
    }

    fn other_known_nodes(&self, except: &str) -> Vec<String> {
        self.known_nodes
            .lock()
            .iter()
            .filter(|n| n.as_str() != except)
            .cloned()
            .collect()
    }

    fn version_message(&self) -> Result<NetworkMessage, StoreError> {
        Ok(NetworkMessage::Version(VersionPayload {
            version: PROTOCOL_VERSION,
            best_height: self.store.best_height()?,
            from: self.config.address.clone(),
        }))
    }

    /// Announce ourselves to the root peer on startup, unless we are the
    /// root (§4.6 "Node lifecycle").
    pub async fn greet_root(self: &Arc<Self>) {
        if self.config.is_root() {
            return;
        }
        match self.version_message() {
            Ok(msg) => self.send_to(ROOT_PEER, &msg).await,
            Err(e) => tracing::warn!(error = %e, "failed to build version message"),
        }
    }

    /// Send one message to a peer; on dial failure, forget that peer
    /// (§4.6 "Peer health").
    async fn send_to(&self, to: &str, msg: &NetworkMessage) {
        if let Err(e) = client::send_message(to, msg).await {
            tracing::warn!(peer = to, error = %e, "dial failed, forgetting peer");
            self.known_nodes.lock().retain(|n| n != to);
        }
    }

    pub async fn handle_message(self: &Arc<Self>, msg: NetworkMessage) {
        match msg {
            NetworkMessage::Version(p) => self.handle_version(p).await,
            NetworkMessage::GetBlocks(p) => self.handle_get_blocks(p).await,
            NetworkMessage::Inv(p) => self.handle_inv(p).await,
            NetworkMessage::GetData(p) => self.handle_get_data(p).await,
            NetworkMessage::Block(p) => self.handle_block(p).await,
            NetworkMessage::Tx(p) => self.handle_tx(p).await,
            NetworkMessage::Address(p) => self.handle_address(p).await,
        }
    }

    async fn handle_version(self: &Arc<Self>, p: VersionPayload) {
        {
            let mut known = self.known_nodes.lock();
            if !known.iter().any(|n| n == &p.from) {
                known.push(p.from.clone());
            }
        }
        let our_height = match self.store.best_height() {
            Ok(h) => h,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read best height");
                return;
            }
        };
        if our_height < p.best_height {
            let msg = NetworkMessage::GetBlocks(GetBlocksPayload {
                from: self.config.address.clone(),
            });
            self.send_to(&p.from, &msg).await;
        } else if our_height > p.best_height {
            if let Ok(msg) = self.version_message() {
                self.send_to(&p.from, &msg).await;
            }
        }
    }

    async fn handle_get_blocks(self: &Arc<Self>, p: GetBlocksPayload) {
        let hashes = match self.store.block_hashes() {
            Ok(h) => h,
            Err(e) => {
                tracing::warn!(error = %e, "failed to list block hashes");
                return;
            }
        };
        let msg = NetworkMessage::Inv(InvPayload {
            from: self.config.address.clone(),
            kind: ItemKind::Block,
            items: hashes,
        });
        self.send_to(&p.from, &msg).await;
    }

    async fn handle_inv(self: &Arc<Self>, p: InvPayload) {
        match p.kind {
            ItemKind::Block => {
                let first = {
                    let mut transit = self.blocks_in_transit.lock();
                    *transit = p.items.clone();
                    if transit.is_empty() {
                        None
                    } else {
                        Some(transit.remove(0))
                    }
                };
                if let Some(id) = first {
                    let msg = NetworkMessage::GetData(GetDataPayload {
                        from: self.config.address.clone(),
                        kind: ItemKind::Block,
                        id,
                    });
                    self.send_to(&p.from, &msg).await;
                }
            }
            ItemKind::Tx => {
                if let Some(id) = p.items.first().copied() {
                    let already_known = self.mempool.lock().contains(&id);
                    if !already_known {
                        let msg = NetworkMessage::GetData(GetDataPayload {
                            from: self.config.address.clone(),
                            kind: ItemKind::Tx,
                            id,
                        });
                        self.send_to(&p.from, &msg).await;
                    }
                }
            }
        }
    }

    async fn handle_get_data(self: &Arc<Self>, p: GetDataPayload) {
        match p.kind {
            ItemKind::Block => match self.store.get_block(&p.id) {
                Ok(block) => {
                    let msg = NetworkMessage::Block(BlockPayload {
                        from: self.config.address.clone(),
                        block,
                    });
                    self.send_to(&p.from, &msg).await;
                }
                Err(StoreError::BlockNotFound(_)) => {}
                Err(e) => tracing::warn!(error = %e, "failed to fetch requested block"),
            },
            ItemKind::Tx => {
                let tx = self.mempool.lock().get(&p.id.to_string()).cloned();
                if let Some(tx) = tx {
                    let msg = NetworkMessage::Tx(TxPayload {
                        from: self.config.address.clone(),
                        tx,
                    });
                    self.send_to(&p.from, &msg).await;
                }
            }
        }
    }

    async fn handle_block(self: &Arc<Self>, p: BlockPayload) {
        if let Err(e) = self.store.add_block(&p.block) {
            tracing::warn!(error = %e, "failed to add received block");
            return;
        }
        let next = {
            let mut transit = self.blocks_in_transit.lock();
            if transit.is_empty() {
                None
            } else {
                Some(transit.remove(0))
            }
        };
        if let Some(id) = next {
            let msg = NetworkMessage::GetData(GetDataPayload {
                from: self.config.address.clone(),
                kind: ItemKind::Block,
                id,
            });
            self.send_to(&p.from, &msg).await;
        } else if let Err(e) = self.utxo().reindex() {
            tracing::warn!(error = %e, "utxo reindex failed after sync");
        }
    }

    async fn handle_tx(self: &Arc<Self>, p: TxPayload) {
        let txid = p.tx.id;
        self.mempool.lock().insert(p.tx);

        if self.config.is_root() {
            let targets: Vec<String> = self
                .other_known_nodes(&p.from)
                .into_iter()
                .filter(|n| n != &self.config.address)
                .collect();
            let msg = NetworkMessage::Inv(InvPayload {
                from: self.config.address.clone(),
                kind: ItemKind::Tx,
                items: vec![txid],
            });
            for peer in targets {
                self.send_to(&peer, &msg).await;
            }
            return;
        }

        let ready = self.mempool.lock().len() >= 2 && self.config.miner_address.is_some();
        if ready {
            self.mine_tx().await;
        }
    }

    async fn handle_address(self: &Arc<Self>, p: AddressPayload) {
        {
            let mut known = self.known_nodes.lock();
            for addr in p.addresses {
                if !known.iter().any(|n| n == &addr) {
                    known.push(addr);
                }
            }
        }
        let targets = self.known_nodes();
        let msg = NetworkMessage::GetBlocks(GetBlocksPayload {
            from: self.config.address.clone(),
        });
        for peer in targets {
            self.send_to(&peer, &msg).await;
        }
    }

    /// Drain verified mempool transactions into freshly mined blocks until
    /// the pool is empty or nothing left in it verifies (§4.6 `mineTx`).
    pub async fn mine_tx(self: &Arc<Self>) {
        let Some(miner) = self.config.miner_address.clone() else {
            return;
        };

        loop {
            let candidates: Vec<_> = self.mempool.lock().transactions().cloned().collect();
            let verified: Vec<_> = candidates
                .into_iter()
                .filter(|tx| {
                    verify_transaction(tx, |id| self.store.find_transaction(id).ok())
                        .unwrap_or(false)
                })
                .collect();
            if verified.is_empty() {
                return;
            }

            let mut with_coinbase = vec![new_coinbase(&miner)];
            with_coinbase.extend(verified.clone());

            let block = match self.store.mine_block(&with_coinbase) {
                Ok(b) => b,
                Err(e) => {
                    tracing::warn!(error = %e, "mine_block failed");
                    return;
                }
            };
            if let Err(e) = self.utxo().reindex() {
                tracing::warn!(error = %e, "utxo reindex failed after mining");
            }

            {
                let mut pool = self.mempool.lock();
                for tx in &verified {
                    pool.remove(&tx.id);
                }
            }

            let targets = self.other_known_nodes(&self.config.address);
            let msg = NetworkMessage::Inv(InvPayload {
                from: self.config.address.clone(),
                kind: ItemKind::Block,
                items: vec![block.hash],
            });
            for peer in &targets {
                self.send_to(peer, &msg).await;
            }

            if self.mempool.lock().is_empty() {
                return;
            }
        }
    }
}

/// Read one connection's full body: `cmd[12] || payload`, to EOF (§4.6).
async fn read_to_eof(stream: &mut TcpStream) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    stream.read_to_end(&mut buf).await?;
    Ok(buf)
}

async fn handle_connection(ctx: Arc<NodeContext>, mut stream: TcpStream) {
    let bytes = match read_to_eof(&mut stream).await {
        Ok(b) => b,
        Err(e) => {
            tracing::warn!(error = %e, "connection read failed");
            return;
        }
    };
    match NetworkMessage::decode(&bytes) {
        Ok(msg) => ctx.handle_message(msg).await,
        Err(e) => tracing::warn!(error = %e, "dropping malformed message"),
    }
}

/// Bind `ctx.config.address` and accept connections forever, one task per
/// connection (§5 "Scheduling model").
pub async fn run(ctx: Arc<NodeContext>) -> std::io::Result<()> {
    let listener = TcpListener::bind(&ctx.config.address).await?;
    tracing::info!(address = %ctx.config.address, "peer server listening");
    ctx.greet_root().await;

    loop {
        let (stream, peer_addr) = listener.accept().await?;
        tracing::debug!(%peer_addr, "accepted connection");
        let ctx = Arc::clone(&ctx);
        tokio::spawn(handle_connection(ctx, stream));
    }
}
