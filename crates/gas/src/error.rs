/// Gas economy errors.
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum GasError {
    /// Intrinsic gas does not fit in 64 bits.
    #[error("intrinsic gas overflows 64 bits")]
    IntrinsicGasOverflow,
    /// Intrinsic gas exceeds the transaction gas limit.
    #[error("intrinsic gas too low: have {gas_limit}, want {intrinsic_gas}")]
    IntrinsicGasTooLow {
        /// Gas limit of the transaction.
        gas_limit: u64,
        /// Gas the transaction needs before execution.
        intrinsic_gas: u64,
    },
    /// A fee market parameter is out of range.
    #[error("invalid fee market params: {0}")]
    InvalidFeeMarketParams(&'static str),
}
