//! Node identity and data-directory layout (§6 "Environment").

use std::path::PathBuf;

use brook_core::address::Address;

/// Hard-coded root peer; every node's `KnownNodes` starts with exactly this
/// entry (§4.6 "Node lifecycle").
pub const ROOT_PEER: &str = "localhost:3000";

/// Runtime identity and storage paths for one node process, derived from the
/// `NODE_ID` environment variable (§6).
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// The node's own peer address, `localhost:<NODE_ID>`.
    pub address: String,
    /// Path to this node's chain + UTXO store directory.
    pub db_path: PathBuf,
    /// Path to this node's wallet keystore file.
    pub wallet_path: PathBuf,
    /// Address mining rewards should be paid to, if this node mines.
    pub miner_address: Option<Address>,
}

impl NodeConfig {
    /// Build a config from a `NODE_ID` value and an optional miner address,
    /// rooted at `./DB` (§6 "Persisted layouts").
    pub fn new(node_id: &str, miner_address: Option<Address>) -> Self {
        Self {
            address: format!("localhost:{node_id}"),
            db_path: PathBuf::from(format!("./DB/blocks_{node_id}")),
            wallet_path: PathBuf::from(format!("./DB/wallets_{node_id}.data")),
            miner_address,
        }
    }

    /// Whether this node is the hard-coded root peer (§4.6).
    pub fn is_root(&self) -> bool {
        self.address == ROOT_PEER
    }

    /// The initial known-peers list: always just the root (§4.6).
    pub fn initial_known_nodes(&self) -> Vec<String> {
        vec![ROOT_PEER.to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_scoped_by_node_id() {
        let cfg = NodeConfig::new("3001", None);
        assert_eq!(cfg.address, "localhost:3001");
        assert_eq!(cfg.db_path, PathBuf::from("./DB/blocks_3001"));
        assert_eq!(cfg.wallet_path, PathBuf::from("./DB/wallets_3001.data"));
    }

    #[test]
    fn root_detection() {
        assert!(NodeConfig::new("3000", None).is_root());
        assert!(!NodeConfig::new("3001", None).is_root());
    }

    #[test]
    fn initial_known_nodes_is_just_root() {
        let cfg = NodeConfig::new("3001", None);
        assert_eq!(cfg.initial_known_nodes(), vec![ROOT_PEER.to_string()]);
    }
}
