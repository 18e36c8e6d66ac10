//! Protocol constants (§4.2, §6).

/// Fixed block-reward subsidy paid to a coinbase output (§3, §6 scenario 1).
pub const BLOCK_REWARD: u64 = 20;

/// Number of leading zero bits a block hash, read as a big-endian integer, must have
/// below `2^256` for the block to satisfy proof-of-work (§4.2).
///
/// A build-time constant per §4.2's "D is a build-time constant" note; kept low so a
/// test run mines blocks in well under a second.
pub const DIFFICULTY_BITS: u32 = 16;

/// Address version byte prepended before the pubkey hash and checksum (§4.1).
pub const ADDRESS_VERSION: u8 = 0x00;

/// Number of checksum bytes appended to a versioned payload before base58 encoding (§4.1).
pub const ADDRESS_CHECKSUM_LEN: usize = 4;

/// Command field width of a wire message, left-padded with zero bytes (§4.6, §6).
pub const COMMAND_LEN: usize = 12;

/// Current wire protocol version (§6).
pub const PROTOCOL_VERSION: u64 = 1;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_reward_is_twenty() {
        assert_eq!(BLOCK_REWARD, 20);
    }

    #[test]
    fn difficulty_bits_within_byte() {
        assert!(DIFFICULTY_BITS < 256);
    }
}
