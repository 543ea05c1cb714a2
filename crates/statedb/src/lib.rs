//! # evmledger-statedb
//!
//! Journaled, revertible view over a persistent [`database::Store`] used by the EVM for
//! one transaction. Changes live in memory as [`state::StateObject`]s and reach the store
//! only through [`StateDB::commit`], in ascending address order.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

pub mod access_list;
pub mod cache_context;
mod error;
pub mod journal;
pub mod log;
mod statedb;

pub use access_list::AccessList;
pub use cache_context::{CacheContext, CacheSnapshot, Event, MAX_PRECOMPILE_CALLS};
pub use error::StateDbError;
pub use journal::{Journal, JournalEntry, Revision, RevisionId};
pub use log::{Log, TxConfig};
pub use statedb::{LedgerState, StateDB};
