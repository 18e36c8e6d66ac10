//! # brook-net — peer gossip protocol and node server (§4.6, §5).

pub mod client;
pub mod protocol;
pub mod server;

pub use protocol::{
    AddressPayload, BlockPayload, GetBlocksPayload, GetDataPayload, InvPayload, ItemKind,
    NetworkMessage, TxPayload, VersionPayload,
};
pub use server::{run, NodeContext};
