use gas::GasError;
use primitives::U256;
use statedb::StateDbError;
use transaction::{RecoveryError, TxError};

/// Fee checks that reject a transaction before execution.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeeError {
    /// Intrinsic gas could not be computed or exceeds the gas limit.
    #[error(transparent)]
    Gas(#[from] GasError),
    /// The fee cap does not cover the block base fee.
    #[error("gas fee cap {gas_fee_cap} is lower than the base fee {base_fee}")]
    FeeCapBelowBaseFee {
        /// Fee cap of the transaction.
        gas_fee_cap: U256,
        /// Base fee of the block.
        base_fee: U256,
    },
    /// The sender cannot afford the transaction.
    #[error("sender balance {balance} is lower than the transaction cost {cost}")]
    InsufficientFunds {
        /// Balance of the sender.
        balance: U256,
        /// `value + gas_limit * gas_fee_cap`.
        cost: U256,
    },
}

/// Refund settlement failed after execution.
#[derive(Debug, thiserror::Error)]
pub enum RefundError<E> {
    /// The fee collector could not pay the refund back.
    #[error("failed to refund {leftover_gas} leftover gas ({amount})")]
    RefundFailed {
        /// Gas being refunded.
        leftover_gas: u64,
        /// Refund in 18-decimal units.
        amount: U256,
        /// Native ledger error.
        #[source]
        source: E,
    },
}

/// Errors of [`apply_transaction`](crate::apply_transaction).
///
/// Execution failures of the VM are not errors; they are reported in
/// [`TxResult::vm_error`](crate::TxResult::vm_error).
#[derive(Debug, thiserror::Error)]
pub enum TxExecutionError<S, B> {
    /// Stateless validation failed.
    #[error(transparent)]
    Tx(#[from] TxError),
    /// The sender could not be recovered.
    #[error(transparent)]
    Recovery(#[from] RecoveryError),
    /// The fee checks failed.
    #[error(transparent)]
    Fee(#[from] FeeError),
    /// The transaction nonce does not match the sender account.
    #[error("invalid nonce: expected {expected}, got {got}")]
    InvalidNonce {
        /// Nonce of the sender account.
        expected: u64,
        /// Nonce of the transaction.
        got: u64,
    },
    /// Fees could not be moved to the fee collector.
    #[error("failed to deduct transaction fees")]
    FeeDeduction(#[source] B),
    /// The ledger view could not be committed.
    #[error("failed to commit the ledger view")]
    Commit(#[source] StateDbError<S>),
    /// Leftover gas could not be refunded.
    #[error(transparent)]
    Refund(RefundError<B>),
}
