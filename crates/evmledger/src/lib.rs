//! # evmledger
//!
//! A journaled EVM ledger view for chains whose native coin lives in a separate ledger.
//!
//! This crate re-exports the workspace crates and adds [`EvmConfig`], the chain
//! configuration that is validated once at start-up and then shared as an `Arc`.
//!
//! - [`statedb`]: the ledger view, its journal and revisions.
//! - [`gas`]: intrinsic gas, base fee and refunds.
//! - [`transaction`]: transaction payloads, wire codec and sender recovery.
//! - [`handler`]: fee checks, the native coin boundary and [`apply_transaction`].
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod config;

pub use config::{ConfigError, EvmConfig};

// reexport dependencies
pub use database;
pub use database_interface;
pub use gas;
pub use handler;
pub use primitives;
pub use state;
pub use statedb;
pub use transaction;

pub use database::{InMemoryStore, Store};
pub use handler::{apply_transaction, BankKeeper, BankWrapper, BlockEnv, TxResult, VmOutcome};
pub use statedb::{StateDB, TxConfig};
pub use transaction::{SignedTransaction, TxData};
