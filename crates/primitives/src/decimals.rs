//! Conversion between the 18-decimal unit the EVM computes in and the native coin precision.
//!
//! Every balance and fee inside the ledger view and the gas economy is an 18-decimal
//! amount. Conversion happens only at the boundary with the native coin ledger.
//!
//! Scaling down truncates: a remainder below one native unit is dropped, never rounded
//! and never refunded. Consensus depends on this exact arithmetic.
use crate::{coin::CoinInfoError, constants::EVM_DECIMALS};
use alloy_primitives::U256;

/// Decimal precision of a native coin, always in `1..=18`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
pub struct Decimals(u8);

impl Decimals {
    /// Precision of the EVM itself.
    pub const EIGHTEEN: Self = Self(EVM_DECIMALS);
    /// Precision of most cosmos-style native coins.
    pub const SIX: Self = Self(6);

    /// Creates a precision, rejecting zero and anything above 18.
    pub fn new(decimals: u8) -> Result<Self, CoinInfoError> {
        if decimals == 0 || decimals > EVM_DECIMALS {
            return Err(CoinInfoError::InvalidDecimals(decimals));
        }
        Ok(Self(decimals))
    }

    /// Returns the raw number of decimals.
    #[inline]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Returns `true` when no scaling is needed.
    #[inline]
    pub const fn is_eighteen(self) -> bool {
        self.0 == EVM_DECIMALS
    }

    /// `10^(18 - decimals)`, the number of 18-decimal units in one native unit.
    #[inline]
    pub fn conversion_factor(self) -> U256 {
        U256::from(10u64).pow(U256::from(EVM_DECIMALS - self.0))
    }
}

impl Default for Decimals {
    fn default() -> Self {
        Self::EIGHTEEN
    }
}

impl TryFrom<u8> for Decimals {
    type Error = CoinInfoError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Decimals> for u8 {
    fn from(value: Decimals) -> Self {
        value.0
    }
}

/// Scales a native amount up to 18 decimals.
///
/// Saturates at `U256::MAX`; a native supply that large cannot exist on a real chain.
#[inline]
pub fn to_vm18(amount: U256, decimals: Decimals) -> U256 {
    if decimals.is_eighteen() {
        return amount;
    }
    amount.saturating_mul(decimals.conversion_factor())
}

/// Scales an 18-decimal amount down to the native precision, truncating.
#[inline]
pub fn from_vm18(amount: U256, decimals: Decimals) -> U256 {
    if decimals.is_eighteen() {
        return amount;
    }
    amount / decimals.conversion_factor()
}

/// Splits an 18-decimal amount into its native part and the truncated remainder,
/// still expressed in 18-decimal units.
#[inline]
pub fn split_vm18(amount: U256, decimals: Decimals) -> (U256, U256) {
    if decimals.is_eighteen() {
        return (amount, U256::ZERO);
    }
    let factor = decimals.conversion_factor();
    (amount / factor, amount % factor)
}
