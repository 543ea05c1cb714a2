use primitives::Address;

/// Errors of the ledger view.
#[derive(Debug, thiserror::Error)]
pub enum StateDbError<E> {
    /// The store rejected an account write during commit.
    #[error("failed to commit account {address}")]
    Commit {
        /// Account being written.
        address: Address,
        /// Store error.
        #[source]
        source: E,
    },
    /// Writing the cache context back to the store failed.
    #[error("failed to write back the cache context")]
    WriteBack(#[source] E),
    /// Too many native precompile calls in one transaction.
    #[error("precompile calls exceeded the limit of {limit} per transaction")]
    PrecompileCallsExceeded {
        /// Maximum number of calls.
        limit: usize,
    },
}
