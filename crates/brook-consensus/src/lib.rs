//! # brook-consensus — Fixed-difficulty proof-of-work.
//!
//! Computes and validates block header hashes per §4.2. There is no
//! difficulty retargeting, no orphan handling, and no reorg logic here; the
//! chain store (`brook-node`) owns greatest-height-wins acceptance.

pub mod pow;

pub use pow::{header_bytes, meets_difficulty, run, validate};
