//! # brook-core
//! Foundation types, crypto, and addressing for the Brookchain protocol.

pub mod address;
pub mod constants;
pub mod crypto;
pub mod error;
pub mod mempool;
pub mod merkle;
pub mod sign;
pub mod types;
