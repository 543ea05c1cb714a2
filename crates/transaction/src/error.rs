use core::fmt;

/// Reasons a transaction is malformed. Reported before any state is touched.
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum TxError {
    /// Gas limit is zero.
    #[error("gas limit must be greater than zero")]
    GasLimitZero,
    /// `gas_limit * gas_price` does not fit in 256 bits.
    #[error("transaction fee overflows 256 bits")]
    FeeOverflow,
    /// `fee + value` does not fit in 256 bits.
    #[error("transaction cost overflows 256 bits")]
    CostOverflow,
    /// EIP-1559 tip cap is above the fee cap.
    #[error("max priority fee per gas higher than max fee per gas")]
    PriorityFeeGreaterThanMaxFee,
    /// Typed transaction without chain id.
    #[error("chain id is required for typed transactions")]
    MissingChainId,
    /// Transaction signed for another chain.
    #[error("invalid chain id {got}, expected {expected}")]
    InvalidChainId {
        /// Chain id of the transaction.
        got: u64,
        /// Chain id of the ledger.
        expected: u64,
    },
    /// `gas_price` mixed with `max_fee_per_gas`/`max_priority_fee_per_gas`.
    #[error("both gas price and max fee per gas or max priority fee per gas specified")]
    MixedFeeFields,
    /// Dynamic fee arguments without a fee cap.
    #[error("max fee per gas is required when max priority fee per gas is set")]
    MissingFeeCap,
}

/// Errors decoding the EIP-2718 envelope.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// Malformed RLP.
    #[error("rlp: {0}")]
    Rlp(#[from] alloy_rlp::Error),
    /// Input was empty.
    #[error("empty transaction bytes")]
    Empty,
    /// Envelope type this crate does not know.
    #[error("unsupported transaction type {0:#04x}")]
    UnsupportedType(u8),
    /// Bytes left after the transaction.
    #[error("{0} trailing bytes after transaction")]
    TrailingBytes(usize),
    /// Legacy `v` that is neither 27/28 nor EIP-155 encoded.
    #[error("invalid legacy signature v value {0}")]
    InvalidV(u64),
}

/// Errors recovering the sender of a signed transaction.
#[derive(Debug, thiserror::Error)]
pub enum RecoveryError {
    /// `s` above half the curve order (EIP-2).
    #[error("signature s value is too high")]
    HighS,
    /// `r` or `s` is zero.
    #[error("signature r or s value is zero")]
    ZeroRS,
    /// Public key recovery failed.
    #[error("invalid signature: {0}")]
    Signature(#[from] alloy_primitives::SignatureError),
    /// The signing key rejected the digest.
    #[error("signing failed: {0}")]
    Signing(SigningError),
}

/// Opaque error from the signing backend.
#[derive(Debug)]
pub struct SigningError(pub(crate) k256::ecdsa::Error);

impl fmt::Display for SigningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
