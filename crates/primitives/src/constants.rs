//! Protocol wide constants.
use alloy_primitives::{b256, B256, U256};

/// Keccak-256 hash of empty input, the code hash of every account without code.
pub const KECCAK_EMPTY: B256 =
    b256!("0xc5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470");

/// Number of decimals the EVM always computes balances in.
pub const EVM_DECIMALS: u8 = 18;

/// Half of the secp256k1 curve order. Signatures with a larger `s` are malleable and
/// rejected (EIP-2).
pub const SECP256K1N_HALF: U256 = U256::from_be_bytes([
    0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0x5d, 0x57, 0x6e, 0x73, 0x57, 0xa4, 0x50, 0x1d, 0xdf, 0xe9, 0x2f, 0x46, 0x68, 0x1b,
    0x20, 0xa0,
]);
