//! Gas constants.

/// Base cost of every transaction.
pub const TX_GAS: u64 = 21000;
/// Base cost of a contract creation transaction (EIP-2, Homestead).
pub const TX_GAS_CONTRACT_CREATION: u64 = 53000;
/// Cost of a zero calldata byte.
pub const TX_DATA_ZERO_GAS: u64 = 4;
/// Cost of a non-zero calldata byte before Istanbul.
pub const TX_DATA_NON_ZERO_GAS_FRONTIER: u64 = 68;
/// Cost of a non-zero calldata byte, adjusted by [EIP-2028](https://eips.ethereum.org/EIPS/eip-2028).
pub const TX_DATA_NON_ZERO_GAS_EIP2028: u64 = 16;
/// Gas cost for accessing an address in the access list (EIP-2930).
pub const ACCESS_LIST_ADDRESS: u64 = 2400;
/// Gas cost for accessing a storage key in the access list (EIP-2930).
pub const ACCESS_LIST_STORAGE_KEY: u64 = 1900;
/// EIP-3860 : Limit and meter initcode
pub const INITCODE_WORD_COST: u64 = 2;

/// Refund quotient before London.
pub const REFUND_QUOTIENT: u64 = 2;
/// Refund quotient after London (EIP-3529).
pub const REFUND_QUOTIENT_EIP3529: u64 = 5;

/// Bounds the amount the base fee can change between blocks.
pub const BASE_FEE_CHANGE_DENOMINATOR: u32 = 8;
/// Bounds the maximum gas limit an EIP-1559 block may have.
pub const ELASTICITY_MULTIPLIER: u32 = 2;
/// Initial base fee of the first fee market block.
pub const INITIAL_BASE_FEE: u64 = 1_000_000_000;
/// Smallest step by which an increasing base fee moves.
pub const MIN_BASE_FEE_DELTA: u64 = 1;
