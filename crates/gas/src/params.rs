use crate::{
    GasError, BASE_FEE_CHANGE_DENOMINATOR, ELASTICITY_MULTIPLIER, INITIAL_BASE_FEE,
    REFUND_QUOTIENT, REFUND_QUOTIENT_EIP3529,
};
use primitives::{SpecId, U256};

/// Fork activation schedule of the chain.
///
/// Block based forks activate at a height, the later ones at a block time. `None`
/// means the fork never activates.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct ChainConfig {
    /// EVM chain id.
    pub chain_id: u64,
    /// Homestead activation height.
    pub homestead_block: Option<u64>,
    /// Spurious Dragon (EIP-155, EIP-161) activation height.
    pub eip155_block: Option<u64>,
    /// Istanbul activation height.
    pub istanbul_block: Option<u64>,
    /// Berlin activation height.
    pub berlin_block: Option<u64>,
    /// London activation height.
    pub london_block: Option<u64>,
    /// Shanghai activation time.
    pub shanghai_time: Option<u64>,
    /// Cancun activation time.
    pub cancun_time: Option<u64>,
    /// Prague activation time.
    pub prague_time: Option<u64>,
}

impl Default for ChainConfig {
    /// Every supported fork active from genesis.
    fn default() -> Self {
        Self {
            chain_id: 262144,
            homestead_block: Some(0),
            eip155_block: Some(0),
            istanbul_block: Some(0),
            berlin_block: Some(0),
            london_block: Some(0),
            shanghai_time: Some(0),
            cancun_time: Some(0),
            prague_time: Some(0),
        }
    }
}

#[inline]
fn activated(fork: Option<u64>, head: u64) -> bool {
    fork.is_some_and(|fork| fork <= head)
}

impl ChainConfig {
    /// A configuration where no fork after Frontier is active.
    pub fn frontier(chain_id: u64) -> Self {
        Self {
            chain_id,
            homestead_block: None,
            eip155_block: None,
            istanbul_block: None,
            berlin_block: None,
            london_block: None,
            shanghai_time: None,
            cancun_time: None,
            prague_time: None,
        }
    }

    /// Rules in force at the given block height and time.
    pub fn spec_id(&self, height: u64, time: u64) -> SpecId {
        if activated(self.prague_time, time) {
            SpecId::PRAGUE
        } else if activated(self.cancun_time, time) {
            SpecId::CANCUN
        } else if activated(self.shanghai_time, time) {
            SpecId::SHANGHAI
        } else if activated(self.london_block, height) {
            SpecId::LONDON
        } else if activated(self.berlin_block, height) {
            SpecId::BERLIN
        } else if activated(self.istanbul_block, height) {
            SpecId::ISTANBUL
        } else if activated(self.eip155_block, height) {
            SpecId::SPURIOUS_DRAGON
        } else if activated(self.homestead_block, height) {
            SpecId::HOMESTEAD
        } else {
            SpecId::FRONTIER
        }
    }

    /// Refund quotient of `spec`: 2 before London, 5 from London on (EIP-3529).
    pub fn refund_quotient(spec: SpecId) -> u64 {
        if spec.is_enabled_in(SpecId::LONDON) {
            REFUND_QUOTIENT_EIP3529
        } else {
            REFUND_QUOTIENT
        }
    }
}

/// Fee market parameters.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct FeeMarketParams {
    /// Disables the base fee entirely.
    pub no_base_fee: bool,
    /// Bounds the amount the base fee can change between blocks.
    pub base_fee_change_denominator: u32,
    /// Bounds the maximum gas limit an EIP-1559 block may have.
    pub elasticity_multiplier: u32,
    /// Height at which the base fee starts being computed.
    pub enable_height: u64,
    /// Base fee of the parent block, or the seed on the enable height.
    pub base_fee: U256,
    /// Floor for a decreasing base fee.
    pub min_gas_price: U256,
}

impl Default for FeeMarketParams {
    fn default() -> Self {
        Self {
            no_base_fee: false,
            base_fee_change_denominator: BASE_FEE_CHANGE_DENOMINATOR,
            elasticity_multiplier: ELASTICITY_MULTIPLIER,
            enable_height: 0,
            base_fee: U256::from(INITIAL_BASE_FEE),
            min_gas_price: U256::ZERO,
        }
    }
}

impl FeeMarketParams {
    /// Checks the parameters can drive the base fee recurrence.
    pub fn validate(&self) -> Result<(), GasError> {
        if self.base_fee_change_denominator == 0 {
            return Err(GasError::InvalidFeeMarketParams(
                "base fee change denominator cannot be 0",
            ));
        }
        if self.elasticity_multiplier == 0 {
            return Err(GasError::InvalidFeeMarketParams(
                "elasticity multiplier cannot be 0",
            ));
        }
        Ok(())
    }

    /// Returns `true` if a base fee applies at `height`.
    #[inline]
    pub fn is_base_fee_enabled(&self, height: u64) -> bool {
        !self.no_base_fee && height >= self.enable_height
    }
}
