//! # evmledger-gas
//!
//! Gas economy of the ledger: fork-gated intrinsic gas, the EIP-1559 style base fee
//! recurrence and the capped gas refund.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

pub mod base_fee;
pub mod constants;
mod error;
pub mod intrinsic;
mod params;
pub mod refund;

pub use base_fee::{calc_gas_base_fee, calculate_base_fee};
pub use constants::*;
pub use error::GasError;
pub use intrinsic::{intrinsic_gas, intrinsic_gas_for_tx};
pub use params::{ChainConfig, FeeMarketParams};
pub use refund::{gas_to_refund, leftover_gas};
