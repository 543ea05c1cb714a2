//! # evmledger-transaction
//!
//! Ethereum transaction payloads as a closed set of fee shapes: legacy, EIP-2930 access
//! list and EIP-1559 dynamic fee. [`TxData`] gives them one set of accessors for fees
//! and gas. [`SignedTransaction`] adds the signature, the EIP-2718 wire encoding, the
//! transaction hash and sender recovery. Encodings and hashes are bit-exact with any
//! standard Ethereum decoder.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod access_list;
mod args;
mod eip1559;
mod eip2930;
mod error;
mod legacy;
mod signed;
mod tx_data;
mod tx_type;

pub use access_list::{AccessList, AccessListItem};
pub use args::TxArgs;
pub use eip1559::DynamicFeeTx;
pub use eip2930::AccessListTx;
pub use error::{DecodeError, RecoveryError, SigningError, TxError};
pub use legacy::LegacyTx;
pub use signed::SignedTransaction;
pub use tx_data::TxData;
pub use tx_type::TxType;

pub use alloy_primitives::Signature;
pub use k256::ecdsa::SigningKey;
