//! # evmledger-primitives
//!
//! Primitive types shared by every evmledger crate: the alloy value types, hardfork
//! identifiers, native coin metadata and the decimal scaler that converts between the
//! 18-decimal EVM unit and the native coin precision.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

pub mod coin;
pub mod constants;
pub mod decimals;
pub mod hardfork;

pub use alloy_primitives::{
    self, address, b256, bytes, hex, keccak256,
    map::{self, HashMap, HashSet},
    Address, Bytes, TxKind, B256, U256,
};
pub use coin::{Coin, CoinInfoError, Coins, EvmCoinInfo};
pub use constants::*;
pub use decimals::{from_vm18, split_vm18, to_vm18, Decimals};
pub use hardfork::SpecId;

/// Storage key of a contract slot.
pub type StorageKey = B256;

/// Storage value of a contract slot. The zero hash means "deleted".
pub type StorageValue = B256;
