//! # evmledger-handler
//!
//! Everything around a transaction's execution: fee verification and mempool priority,
//! the boundary with the native coin ledger, gas refund settlement and
//! [`apply_transaction`], which drives a transaction through a journaled
//! [`StateDB`](statedb::StateDB).
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

pub mod bank;
mod error;
pub mod execution;
pub mod fee;
pub mod post_execution;
mod result;

pub use bank::{BankKeeper, BankWrapper, FEE_COLLECTOR};
pub use error::{FeeError, RefundError, TxExecutionError};
pub use execution::{apply_transaction, BlockEnv, ExecutionEnv, LedgerTxError};
pub use fee::{check_sender_balance, get_tx_priority, verify_fee, DEFAULT_PRIORITY_REDUCTION};
pub use post_execution::refund_gas;
pub use result::{Message, TxResult, VmOutcome};
