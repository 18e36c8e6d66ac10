//! Fixed-difficulty proof-of-work (§4.2).
//!
//! `header = prevHash || merkleRoot || timestamp || difficultyBits || nonce`,
//! each field a fixed-width big-endian byte string. A header is valid when
//! `sha256(header)`, read as a big-endian 256-bit integer, is less than
//! `2^(256 - difficultyBits)` — equivalently, its first `difficultyBits` bits
//! are zero. There is no retargeting: `difficultyBits` is the same constant
//! for the process lifetime (§4.2 Non-goals).

use brook_core::constants::DIFFICULTY_BITS;
use brook_core::types::Hash;

/// Build the fixed-width byte string that proof-of-work hashes.
pub fn header_bytes(
    prev_hash: &Hash,
    merkle_root: &Hash,
    timestamp: u64,
    difficulty_bits: u32,
    nonce: u64,
) -> Vec<u8> {
    let mut buf = Vec::with_capacity(32 + 32 + 8 + 4 + 8);
    buf.extend_from_slice(prev_hash.as_bytes());
    buf.extend_from_slice(merkle_root.as_bytes());
    buf.extend_from_slice(&timestamp.to_be_bytes());
    buf.extend_from_slice(&difficulty_bits.to_be_bytes());
    buf.extend_from_slice(&nonce.to_be_bytes());
    buf
}

/// Whether `hash`, read as a big-endian integer, has at least `difficulty_bits`
/// leading zero bits (i.e. is less than `2^(256 - difficulty_bits)`).
pub fn meets_difficulty(hash: &Hash, difficulty_bits: u32) -> bool {
    let mut remaining = difficulty_bits;
    for byte in hash.as_bytes() {
        if remaining >= 8 {
            if *byte != 0 {
                return false;
            }
            remaining -= 8;
        } else if remaining > 0 {
            let mask = 0xFFu8 << (8 - remaining);
            if byte & mask != 0 {
                return false;
            }
            break;
        } else {
            break;
        }
    }
    true
}

/// Search for a nonce satisfying proof-of-work for the given header fields,
/// starting at `nonce = 0` and incrementing without bound (§4.2 `run`).
///
/// Returns `(nonce, hash)` for the first nonce that satisfies the target.
pub fn run(prev_hash: &Hash, merkle_root: &Hash, timestamp: u64) -> (u64, Hash) {
    let mut nonce: u64 = 0;
    loop {
        let bytes = header_bytes(prev_hash, merkle_root, timestamp, DIFFICULTY_BITS, nonce);
        let hash = Hash::sha256(&bytes);
        if meets_difficulty(&hash, DIFFICULTY_BITS) {
            tracing::debug!(nonce, hash = %hash, "found nonce satisfying difficulty target");
            return (nonce, hash);
        }
        nonce = nonce
            .checked_add(1)
            .expect("difficulty this low always finds a nonce well before exhaustion");
    }
}

/// Recompute the header hash with the stored `nonce` and compare against the
/// stored `hash`, checking it also still meets the difficulty target (§4.2
/// `validate`).
pub fn validate(
    prev_hash: &Hash,
    merkle_root: &Hash,
    timestamp: u64,
    nonce: u64,
    hash: &Hash,
) -> bool {
    let bytes = header_bytes(prev_hash, merkle_root, timestamp, DIFFICULTY_BITS, nonce);
    let recomputed = Hash::sha256(&bytes);
    recomputed == *hash && meets_difficulty(&recomputed, DIFFICULTY_BITS)
}
