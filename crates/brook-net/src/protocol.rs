//! Wire message framing for the peer gossip protocol (§4.6).
//!
//! Every message on the wire is `cmd[12] || bincode-encoded payload`, sent as
//! the entire body of one TCP connection and read by the peer to EOF. `cmd`
//! is an ASCII command name left-padded to [`COMMAND_LEN`] bytes with zeros;
//! trailing zero bytes are stripped back off on decode. The payload shape is
//! specific to each command rather than a re-encoding of the whole enum, so
//! `cmd` alone is enough to pick a decoder.

use brook_core::constants::COMMAND_LEN;
use brook_core::error::NetworkError;
use brook_core::types::{Block, Hash, Transaction};
use serde::{Deserialize, Serialize};

/// Which kind of item an `inv`/`getdata` message refers to (§4.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, bincode::Encode, bincode::Decode)]
pub enum ItemKind {
    Block,
    Tx,
}

#[derive(Debug, Clone, Serialize, Deserialize, bincode::Encode, bincode::Decode)]
pub struct VersionPayload {
    pub version: u64,
    pub best_height: u64,
    pub from: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, bincode::Encode, bincode::Decode)]
pub struct GetBlocksPayload {
    pub from: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, bincode::Encode, bincode::Decode)]
pub struct InvPayload {
    pub from: String,
    pub kind: ItemKind,
    pub items: Vec<Hash>,
}

#[derive(Debug, Clone, Serialize, Deserialize, bincode::Encode, bincode::Decode)]
pub struct GetDataPayload {
    pub from: String,
    pub kind: ItemKind,
    pub id: Hash,
}

#[derive(Debug, Clone, Serialize, Deserialize, bincode::Encode, bincode::Decode)]
pub struct BlockPayload {
    pub from: String,
    pub block: Block,
}

#[derive(Debug, Clone, Serialize, Deserialize, bincode::Encode, bincode::Decode)]
pub struct TxPayload {
    pub from: String,
    pub tx: Transaction,
}

#[derive(Debug, Clone, Serialize, Deserialize, bincode::Encode, bincode::Decode)]
pub struct AddressPayload {
    pub addresses: Vec<String>,
}

/// A fully decoded peer message, tagged by its wire command name (§4.6 table).
#[derive(Debug, Clone)]
pub enum NetworkMessage {
    Version(VersionPayload),
    GetBlocks(GetBlocksPayload),
    Inv(InvPayload),
    GetData(GetDataPayload),
    Block(BlockPayload),
    Tx(TxPayload),
    Address(AddressPayload),
}

impl NetworkMessage {
    fn command(&self) -> &'static str {
        match self {
            Self::Version(_) => "version",
            Self::GetBlocks(_) => "getblocks",
            Self::Inv(_) => "inv",
            Self::GetData(_) => "getdata",
            Self::Block(_) => "block",
            Self::Tx(_) => "tx",
            Self::Address(_) => "address",
        }
    }

    /// Encode as `cmd[12] || bincode payload`, the exact bytes written to the
    /// wire for one connection (§4.6, §6 "Wire protocol").
    pub fn encode(&self) -> Result<Vec<u8>, NetworkError> {
        let mut buf = command_to_bytes(self.command()).to_vec();
        let payload = match self {
            Self::Version(p) => bincode::encode_to_vec(p, bincode::config::standard()),
            Self::GetBlocks(p) => bincode::encode_to_vec(p, bincode::config::standard()),
            Self::Inv(p) => bincode::encode_to_vec(p, bincode::config::standard()),
            Self::GetData(p) => bincode::encode_to_vec(p, bincode::config::standard()),
            Self::Block(p) => bincode::encode_to_vec(p, bincode::config::standard()),
            Self::Tx(p) => bincode::encode_to_vec(p, bincode::config::standard()),
            Self::Address(p) => bincode::encode_to_vec(p, bincode::config::standard()),
        }
        .map_err(|_| NetworkError::MalformedMessage)?;
        buf.extend_from_slice(&payload);
        Ok(buf)
    }

    /// Split a connection's full body into `cmd` and payload, then decode the
    /// payload according to `cmd`.
    pub fn decode(bytes: &[u8]) -> Result<Self, NetworkError> {
        if bytes.len() < COMMAND_LEN {
            return Err(NetworkError::MalformedMessage);
        }
        let cmd = bytes_to_command(&bytes[..COMMAND_LEN]);
        let payload = &bytes[COMMAND_LEN..];
        let cfg = bincode::config::standard();
        let decode_err = |_| NetworkError::MalformedMessage;

        match cmd.as_str() {
            "version" => Ok(Self::Version(bincode::decode_from_slice(payload, cfg).map_err(decode_err)?.0)),
            "getblocks" => Ok(Self::GetBlocks(bincode::decode_from_slice(payload, cfg).map_err(decode_err)?.0)),
            "inv" => Ok(Self::Inv(bincode::decode_from_slice(payload, cfg).map_err(decode_err)?.0)),
            "getdata" => Ok(Self::GetData(bincode::decode_from_slice(payload, cfg).map_err(decode_err)?.0)),
            "block" => Ok(Self::Block(bincode::decode_from_slice(payload, cfg).map_err(decode_err)?.0)),
            "tx" => Ok(Self::Tx(bincode::decode_from_slice(payload, cfg).map_err(decode_err)?.0)),
            "address" => Ok(Self::Address(bincode::decode_from_slice(payload, cfg).map_err(decode_err)?.0)),
            other => Err(NetworkError::UnknownCommand(other.to_string())),
        }
    }
}

fn command_to_bytes(cmd: &str) -> [u8; COMMAND_LEN] {
    let mut bytes = [0u8; COMMAND_LEN];
    let cmd = cmd.as_bytes();
    bytes[..cmd.len()].copy_from_slice(cmd);
    bytes
}

fn bytes_to_command(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use brook_core::types::{Hash, TxInput, TxOutput};

    fn sample_block() -> Block {
        Block {
            timestamp: 1_700_000_000,
            prev_hash: Hash::ZERO,
            transactions: vec![Transaction::new(
                vec![TxInput {
                    ref_txid: Hash::ZERO,
                    ref_out_idx: -1,
                    signature: vec![],
                    pub_key: vec![1, 2, 3],
                }],
                vec![TxOutput {
                    value: 20,
                    pub_key_hash: brook_core::types::PubKeyHash([0xAA; 20]),
                }],
            )],
            nonce: 42,
            hash: Hash([0xBB; 32]),
            height: 0,
        }
    }

    #[test]
    fn command_bytes_round_trip() {
        assert_eq!(bytes_to_command(&command_to_bytes("version")), "version");
        assert_eq!(bytes_to_command(&command_to_bytes("tx")), "tx");
    }

    #[test]
    fn version_round_trips() {
        let msg = NetworkMessage::Version(VersionPayload {
            version: 1,
            best_height: 10,
            from: "localhost:3000".into(),
        });
        let encoded = msg.encode().unwrap();
        match NetworkMessage::decode(&encoded).unwrap() {
            NetworkMessage::Version(p) => {
                assert_eq!(p.version, 1);
                assert_eq!(p.best_height, 10);
                assert_eq!(p.from, "localhost:3000");
            }
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn block_round_trips() {
        let msg = NetworkMessage::Block(BlockPayload {
            from: "localhost:3001".into(),
            block: sample_block(),
        });
        let encoded = msg.encode().unwrap();
        match NetworkMessage::decode(&encoded).unwrap() {
            NetworkMessage::Block(p) => assert_eq!(p.block.hash, sample_block().hash),
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn inv_round_trips() {
        let msg = NetworkMessage::Inv(InvPayload {
            from: "localhost:3000".into(),
            kind: ItemKind::Block,
            items: vec![Hash([1; 32]), Hash([2; 32])],
        });
        let encoded = msg.encode().unwrap();
        match NetworkMessage::decode(&encoded).unwrap() {
            NetworkMessage::Inv(p) => assert_eq!(p.items.len(), 2),
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn unknown_command_is_rejected() {
        let mut bytes = command_to_bytes("bogus").to_vec();
        bytes.extend_from_slice(&[0u8; 4]);
        assert!(matches!(
            NetworkMessage::decode(&bytes),
            Err(NetworkError::UnknownCommand(_))
        ));
    }

    #[test]
    fn too_short_is_malformed() {
        assert!(matches!(
            NetworkMessage::decode(&[0u8; 4]),
            Err(NetworkError::MalformedMessage)
        ));
    }

    #[test]
    fn command_field_is_fixed_width() {
        let msg = NetworkMessage::GetBlocks(GetBlocksPayload { from: "x".into() });
        let encoded = msg.encode().unwrap();
        assert_eq!(&encoded[..COMMAND_LEN], &command_to_bytes("getblocks"));
    }
}
