//! Per-input transaction signing and verification (§4.3).
//!
//! Signing and verifying both work over a `trimmedCopy` of the transaction:
//! every input's `signature` and `pub_key` cleared, then for the input under
//! consideration the referenced output's `pub_key_hash` bytes are dropped
//! into that input's (otherwise-empty) `pub_key` slot before recomputing the
//! id that gets signed or verified. This is the same trick the canonical
//! Bitcoin-tutorial `SignatureHash` computation uses to scope a signature to
//! one input without a scripting language.

use crate::crypto::{KeyPair, PublicKey};
use crate::error::TransactionError;
use crate::types::{Hash, Transaction, TxOutput};

/// Build the digest input `i` signs or verifies against, given the
/// `pub_key_hash` bytes of the output it spends (§4.3 steps 1-3).
fn signing_digest(tx: &Transaction, input_index: usize, prev_pub_key_hash: &[u8]) -> Hash {
    let mut copy = tx.trimmed_copy();
    copy.inputs[input_index].pub_key = prev_pub_key_hash.to_vec();
    let id = Transaction::compute_id(&copy.inputs, &copy.outputs);
    copy.inputs[input_index].pub_key.clear();
    id
}

/// Sign every non-coinbase input of `tx` with `key_pair`, given the outputs
/// each input references (in input order). Mutates `tx` in place (§4.3
/// steps 4).
pub fn sign_transaction(
    tx: &mut Transaction,
    key_pair: &KeyPair,
    referenced_outputs: &[TxOutput],
) -> Result<(), TransactionError> {
    if tx.is_coinbase() {
        return Ok(());
    }
    if referenced_outputs.len() != tx.inputs.len() {
        return Err(TransactionError::InputIndexOutOfBounds {
            index: referenced_outputs.len(),
            len: tx.inputs.len(),
        });
    }

    let pub_key_bytes = key_pair.public_key().to_bytes();
    for i in 0..tx.inputs.len() {
        let digest = signing_digest(tx, i, &referenced_outputs[i].pub_key_hash.0);
        let signature = key_pair.sign(digest.as_bytes());
        tx.inputs[i].signature = signature;
        tx.inputs[i].pub_key = pub_key_bytes.clone();
    }
    Ok(())
}

/// Verify every non-coinbase input of `tx` against the outputs it
/// references (§4.3 step 5, `verify`).
///
/// `resolve_prev_tx` looks up a previous transaction by id; returns
/// `MissingPrevTx` if any referenced transaction is unknown.
pub fn verify_transaction(
    tx: &Transaction,
    mut resolve_prev_tx: impl FnMut(&Hash) -> Option<Transaction>,
) -> Result<bool, TransactionError> {
    if tx.is_coinbase() {
        return Ok(true);
    }

    for (i, input) in tx.inputs.iter().enumerate() {
        let prev_tx = resolve_prev_tx(&input.ref_txid)
            .ok_or_else(|| TransactionError::MissingPrevTx(input.ref_txid.to_string()))?;
        let out_idx = usize::try_from(input.ref_out_idx).map_err(|_| {
            TransactionError::InputIndexOutOfBounds {
                index: 0,
                len: prev_tx.outputs.len(),
            }
        })?;
        let prev_output =
            prev_tx
                .outputs
                .get(out_idx)
                .ok_or(TransactionError::InputIndexOutOfBounds {
                    index: out_idx,
                    len: prev_tx.outputs.len(),
                })?;

        let digest = signing_digest(tx, i, &prev_output.pub_key_hash.0);
        let public_key = PublicKey::from_bytes(&input.pub_key)?;
        if public_key.verify(digest.as_bytes(), &input.signature).is_err() {
            return Ok(false);
        }
    }
    Ok(true)
}
