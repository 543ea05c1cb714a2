//! Native coin metadata and coin amounts.
use crate::decimals::{from_vm18, to_vm18, Decimals};
use alloy_primitives::U256;
use core::fmt;

/// Errors returned when building an [`EvmCoinInfo`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CoinInfoError {
    /// Decimals outside `1..=18`.
    #[error("invalid coin decimals {0}, expected a value in 1..=18")]
    InvalidDecimals(u8),
    /// A denomination was left empty.
    #[error("empty {0} denomination")]
    EmptyDenom(&'static str),
    /// An 18-decimal coin has no separate extended denomination.
    #[error("denom {denom} has 18 decimals but extended denom is {extended_denom}")]
    ExtendedDenomMismatch {
        /// Native denomination.
        denom: String,
        /// Extended denomination.
        extended_denom: String,
    },
}

/// Metadata of the chain's native coin as seen by the EVM.
///
/// A value is validated on construction and immutable afterwards. It is built once at
/// chain start and threaded through the components that need it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct EvmCoinInfo {
    denom: String,
    extended_denom: String,
    display_denom: String,
    decimals: Decimals,
}

impl EvmCoinInfo {
    /// Creates validated coin metadata.
    pub fn new(
        denom: impl Into<String>,
        extended_denom: impl Into<String>,
        display_denom: impl Into<String>,
        decimals: u8,
    ) -> Result<Self, CoinInfoError> {
        let info = Self {
            denom: denom.into(),
            extended_denom: extended_denom.into(),
            display_denom: display_denom.into(),
            decimals: Decimals::new(decimals)?,
        };
        info.validate()?;
        Ok(info)
    }

    /// Checks the invariants. Values produced by [`EvmCoinInfo::new`] always pass; this
    /// exists for values that were deserialized.
    pub fn validate(&self) -> Result<(), CoinInfoError> {
        if self.denom.is_empty() {
            return Err(CoinInfoError::EmptyDenom("base"));
        }
        if self.extended_denom.is_empty() {
            return Err(CoinInfoError::EmptyDenom("extended"));
        }
        if self.display_denom.is_empty() {
            return Err(CoinInfoError::EmptyDenom("display"));
        }
        if self.decimals.is_eighteen() && self.denom != self.extended_denom {
            return Err(CoinInfoError::ExtendedDenomMismatch {
                denom: self.denom.clone(),
                extended_denom: self.extended_denom.clone(),
            });
        }
        Ok(())
    }

    /// Native denomination, e.g. `uatom`.
    pub fn denom(&self) -> &str {
        &self.denom
    }

    /// Denomination of the 18-decimal representation, e.g. `aatom`.
    pub fn extended_denom(&self) -> &str {
        &self.extended_denom
    }

    /// Human readable denomination, e.g. `atom`.
    pub fn display_denom(&self) -> &str {
        &self.display_denom
    }

    /// Native precision.
    pub fn decimals(&self) -> Decimals {
        self.decimals
    }

    /// Converts a native coin to its extended 18-decimal form.
    pub fn to_extended(&self, coin: &Coin) -> Coin {
        Coin::new(self.extended_denom.clone(), to_vm18(coin.amount, self.decimals))
    }

    /// Converts an extended 18-decimal coin to the native denomination, truncating.
    pub fn to_native(&self, coin: &Coin) -> Coin {
        Coin::new(self.denom.clone(), from_vm18(coin.amount, self.decimals))
    }
}

/// An amount of a single denomination.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coin {
    /// Denomination.
    pub denom: String,
    /// Amount in the smallest unit of `denom`.
    pub amount: U256,
}

impl Coin {
    /// Creates a new coin.
    pub fn new(denom: impl Into<String>, amount: U256) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }

    /// Returns `true` if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

/// A set of coins with distinct denominations, sorted by denomination and free of zero
/// amounts.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coins(Vec<Coin>);

impl Coins {
    /// Builds a normalized set: zero amounts dropped, equal denominations summed.
    pub fn new(coins: impl IntoIterator<Item = Coin>) -> Self {
        let mut out: Vec<Coin> = Vec::new();
        for coin in coins {
            if coin.is_zero() {
                continue;
            }
            match out.binary_search_by(|c| c.denom.as_str().cmp(&coin.denom)) {
                Ok(i) => out[i].amount = out[i].amount.saturating_add(coin.amount),
                Err(i) => out.insert(i, coin),
            }
        }
        Self(out)
    }

    /// Amount of `denom`, zero if absent.
    pub fn amount_of(&self, denom: &str) -> U256 {
        self.0
            .iter()
            .find(|c| c.denom == denom)
            .map(|c| c.amount)
            .unwrap_or_default()
    }

    /// Returns `true` if the set holds nothing.
    pub fn is_zero(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates the coins in denomination order.
    pub fn iter(&self) -> impl Iterator<Item = &Coin> {
        self.0.iter()
    }
}

impl From<Coin> for Coins {
    fn from(coin: Coin) -> Self {
        Self::new([coin])
    }
}

impl fmt::Display for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, coin) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{coin}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eighteen_decimals_need_matching_denoms() {
        assert!(EvmCoinInfo::new("aevm", "aevm", "evm", 18).is_ok());
        assert_eq!(
            EvmCoinInfo::new("uatom", "aatom", "atom", 18),
            Err(CoinInfoError::ExtendedDenomMismatch {
                denom: "uatom".into(),
                extended_denom: "aatom".into(),
            })
        );
    }

    #[test]
    fn rejects_bad_metadata() {
        assert_eq!(
            EvmCoinInfo::new("uatom", "aatom", "atom", 0),
            Err(CoinInfoError::InvalidDecimals(0))
        );
        assert_eq!(
            EvmCoinInfo::new("", "aatom", "atom", 6),
            Err(CoinInfoError::EmptyDenom("base"))
        );
    }

    #[test]
    fn converts_between_native_and_extended() {
        let info = EvmCoinInfo::new("uatom", "aatom", "atom", 6).unwrap();
        let native = Coin::new("uatom", U256::from(5u64));
        let extended = info.to_extended(&native);
        assert_eq!(extended, Coin::new("aatom", U256::from(5_000_000_000_000u64)));
        assert_eq!(info.to_native(&extended), native);
    }

    #[test]
    fn coins_are_normalized() {
        let coins = Coins::new([
            Coin::new("b", U256::from(1u64)),
            Coin::new("a", U256::ZERO),
            Coin::new("a", U256::from(2u64)),
            Coin::new("b", U256::from(3u64)),
        ]);
        assert_eq!(coins.to_string(), "2a,4b");
        assert_eq!(coins.amount_of("b"), U256::from(4u64));
        assert_eq!(coins.amount_of("c"), U256::ZERO);
        assert!(Coins::new([Coin::new("a", U256::ZERO)]).is_zero());
    }
}
