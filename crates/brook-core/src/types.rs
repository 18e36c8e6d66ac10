//! Core protocol data types: hashes, transactions, blocks (§3).
//!
//! All types carry both `serde` (wire/JSON) and `bincode` (canonical binary)
//! derives. Canonical `bincode` encoding under `bincode::config::standard()`
//! is what block/tx hashing and on-disk persistence are computed over, so it
//! must stay deterministic — field order here is part of the protocol.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// A 32-byte hash value (block hash, merkle root, transaction id).
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
    bincode::Encode, bincode::Decode,
)]
pub struct Hash(pub [u8; 32]);

impl Hash {
    /// The zero hash. Used for the genesis block's `prev_hash` and a coinbase input's `ref_txid`.
    pub const ZERO: Self = Self([0u8; 32]);

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// `sha256(data)`.
    pub fn sha256(data: &[u8]) -> Self {
        Self(Sha256::digest(data).into())
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl From<[u8; 32]> for Hash {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

/// Parse error for [`Hash`]'s `FromStr` impl: the string is not 64 lowercase hex characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashParseError;

impl fmt::Display for HashParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid hash: expected 64 hex characters")
    }
}

impl std::error::Error for HashParseError {}

impl std::str::FromStr for Hash {
    type Err = HashParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|_| HashParseError)?;
        let array: [u8; 32] = bytes.try_into().map_err(|_| HashParseError)?;
        Ok(Self(array))
    }
}

impl AsRef<[u8]> for Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// 20-byte RIPEMD-160(SHA-256(pubkey)) hash locking a [`TxOutput`] to its owner (§4.1).
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash,
    bincode::Encode, bincode::Decode,
)]
pub struct PubKeyHash(pub [u8; 20]);

impl fmt::Display for PubKeyHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// A transaction output, locked to the hash of a recipient public key (§3).
#[derive(
    Serialize, Deserialize, Clone, Debug, PartialEq, Eq,
    bincode::Encode, bincode::Decode,
)]
pub struct TxOutput {
    /// Value transferred, in protocol units.
    pub value: u64,
    /// Spending requires a signature verifiable against a pubkey hashing to this.
    pub pub_key_hash: PubKeyHash,
}

/// A transaction input, consuming a previously unspent output (§3).
///
/// A coinbase input has `ref_txid = Hash::ZERO`, `ref_out_idx = -1`, an empty
/// `signature`, and arbitrary bytes in `pub_key` (24 random bytes when unset).
#[derive(
    Serialize, Deserialize, Clone, Debug, PartialEq, Eq,
    bincode::Encode, bincode::Decode,
)]
pub struct TxInput {
    /// Transaction id containing the referenced output.
    pub ref_txid: Hash,
    /// Index of the referenced output within that transaction. `-1` for coinbase.
    pub ref_out_idx: i64,
    /// `r || s` of an ECDSA/P-256 signature, 32 bytes each. Empty for coinbase.
    pub signature: Vec<u8>,
    /// `X || Y` raw public key coordinates, 32 bytes each. Empty for coinbase.
    pub pub_key: Vec<u8>,
}

impl TxInput {
    /// Whether this is the single input of a coinbase transaction (§3).
    pub fn is_coinbase(&self) -> bool {
        self.ref_txid.is_zero() && self.ref_out_idx == -1
    }
}

/// A value-transfer transaction: ordered inputs consuming prior outputs, ordered
/// new outputs (§3). `id` is a pure function of `(inputs, outputs)` (I6).
#[derive(
    Serialize, Deserialize, Clone, Debug, PartialEq, Eq,
    bincode::Encode, bincode::Decode,
)]
pub struct Transaction {
    pub id: Hash,
    pub inputs: Vec<TxInput>,
    pub outputs: Vec<TxOutput>,
}

/// Canonical bincode encoding of the given value. Used for hashing and persistence;
/// must stay deterministic (§1, §3).
pub fn canonical_bytes<T: bincode::Encode>(value: &T) -> Vec<u8> {
    bincode::encode_to_vec(value, bincode::config::standard())
        .expect("in-memory protocol types always encode")
}

impl Transaction {
    /// Build a transaction and compute its id from `(inputs, outputs)` (I6).
    pub fn new(inputs: Vec<TxInput>, outputs: Vec<TxOutput>) -> Self {
        let id = Self::compute_id(&inputs, &outputs);
        Self { id, inputs, outputs }
    }

    /// `sha256` of the canonical serialization of `(inputs, outputs)` — the `id`
    /// field itself never participates, so this is stable under re-serialization (P6).
    pub fn compute_id(inputs: &[TxInput], outputs: &[TxOutput]) -> Hash {
        Hash::sha256(&canonical_bytes(&(inputs, outputs)))
    }

    /// Recompute and check this transaction's id against its own fields (P6).
    pub fn id_is_consistent(&self) -> bool {
        Self::compute_id(&self.inputs, &self.outputs) == self.id
    }

    /// A coinbase transaction has exactly one input and that input is the coinbase marker (§3).
    pub fn is_coinbase(&self) -> bool {
        self.inputs.len() == 1 && self.inputs[0].is_coinbase()
    }

    /// Sum of all output values. `None` on overflow.
    pub fn total_output_value(&self) -> Option<u64> {
        self.outputs
            .iter()
            .try_fold(0u64, |acc, out| acc.checked_add(out.value))
    }

    /// A copy with every input's `signature` and `pub_key` cleared, used as the basis
    /// for per-input signing and verification (§4.3 `trimmedCopy`).
    pub fn trimmed_copy(&self) -> Transaction {
        let inputs = self
            .inputs
            .iter()
            .map(|input| TxInput {
                ref_txid: input.ref_txid,
                ref_out_idx: input.ref_out_idx,
                signature: Vec::new(),
                pub_key: Vec::new(),
            })
            .collect();
        Transaction {
            id: Hash::ZERO,
            inputs,
            outputs: self.outputs.clone(),
        }
    }
}

/// A mined block (§3). `height` is `prev_block.height + 1`; the genesis block has
/// `height == 0` and an empty `prev_hash`.
#[derive(
    Serialize, Deserialize, Clone, Debug, PartialEq, Eq,
    bincode::Encode, bincode::Decode,
)]
pub struct Block {
    pub timestamp: u64,
    pub prev_hash: Hash,
    pub transactions: Vec<Transaction>,
    pub nonce: u64,
    pub hash: Hash,
    pub height: u64,
}

impl Block {
    /// The block's coinbase transaction (first in the list), if any.
    pub fn coinbase(&self) -> Option<&Transaction> {
        self.transactions.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_pub_key_hash() -> PubKeyHash {
        PubKeyHash([0xAA; 20])
    }

    fn sample_input() -> TxInput {
        TxInput {
            ref_txid: Hash([0x11; 32]),
            ref_out_idx: 0,
            signature: vec![0u8; 64],
            pub_key: vec![0u8; 64],
        }
    }

    fn sample_output() -> TxOutput {
        TxOutput {
            value: 20,
            pub_key_hash: sample_pub_key_hash(),
        }
    }

    #[test]
    fn hash_zero_is_zero() {
        assert!(Hash::ZERO.is_zero());
        assert_eq!(Hash::ZERO, Hash::default());
    }

    #[test]
    fn hash_display_is_lowercase_hex() {
        let h = Hash([0xAB; 32]);
        assert_eq!(format!("{h}"), "ab".repeat(32));
    }

    #[test]
    fn coinbase_input_detected() {
        let coinbase_in = TxInput {
            ref_txid: Hash::ZERO,
            ref_out_idx: -1,
            signature: vec![],
            pub_key: vec![1, 2, 3],
        };
        assert!(coinbase_in.is_coinbase());
        assert!(!sample_input().is_coinbase());
    }

    #[test]
    fn txid_is_pure_function_of_inputs_outputs() {
        let tx1 = Transaction::new(vec![sample_input()], vec![sample_output()]);
        let tx2 = Transaction::new(vec![sample_input()], vec![sample_output()]);
        assert_eq!(tx1.id, tx2.id);
    }

    #[test]
    fn txid_changes_with_output_value() {
        let tx1 = Transaction::new(vec![sample_input()], vec![sample_output()]);
        let mut other_output = sample_output();
        other_output.value = 21;
        let tx2 = Transaction::new(vec![sample_input()], vec![other_output]);
        assert_ne!(tx1.id, tx2.id);
    }

    #[test]
    fn txid_idempotent_under_reserialization() {
        // P6: hash(serialize(withIdBlanked(deserialize(serialize(t))))) == t.id
        let tx = Transaction::new(vec![sample_input()], vec![sample_output()]);
        let encoded = canonical_bytes(&tx);
        let (decoded, _): (Transaction, usize) =
            bincode::decode_from_slice(&encoded, bincode::config::standard()).unwrap();
        assert!(decoded.id_is_consistent());
        assert_eq!(decoded.id, tx.id);
    }

    #[test]
    fn trimmed_copy_clears_signature_and_pubkey() {
        let tx = Transaction::new(vec![sample_input()], vec![sample_output()]);
        let trimmed = tx.trimmed_copy();
        assert!(trimmed.inputs[0].signature.is_empty());
        assert!(trimmed.inputs[0].pub_key.is_empty());
        assert_eq!(trimmed.inputs[0].ref_txid, tx.inputs[0].ref_txid);
    }

    #[test]
    fn is_coinbase_requires_single_marker_input() {
        let coinbase = Transaction::new(
            vec![TxInput {
                ref_txid: Hash::ZERO,
                ref_out_idx: -1,
                signature: vec![],
                pub_key: vec![9; 24],
            }],
            vec![sample_output()],
        );
        assert!(coinbase.is_coinbase());

        let regular = Transaction::new(vec![sample_input()], vec![sample_output()]);
        assert!(!regular.is_coinbase());
    }

    #[test]
    fn total_output_value_sums_outputs() {
        let tx = Transaction::new(
            vec![sample_input()],
            vec![sample_output(), sample_output()],
        );
        assert_eq!(tx.total_output_value(), Some(40));
    }

    #[test]
    fn total_output_value_overflow_is_none() {
        let mut huge = sample_output();
        huge.value = u64::MAX;
        let tx = Transaction::new(vec![sample_input()], vec![huge.clone(), huge]);
        assert_eq!(tx.total_output_value(), None);
    }

    #[test]
    fn hash_from_str_round_trips_display() {
        let h = Hash([0x42; 32]);
        let parsed: Hash = h.to_string().parse().unwrap();
        assert_eq!(h, parsed);
    }

    #[test]
    fn hash_from_str_rejects_wrong_length() {
        assert!("abcd".parse::<Hash>().is_err());
    }

    #[test]
    fn hash_from_str_rejects_non_hex() {
        assert!("z".repeat(64).parse::<Hash>().is_err());
    }
}
