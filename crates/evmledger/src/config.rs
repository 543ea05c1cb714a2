//! Chain configuration bundle, validated once at start-up and shared read-only.
use gas::{calculate_base_fee, ChainConfig, FeeMarketParams, GasError};
use handler::{BlockEnv, ExecutionEnv};
use primitives::{Address, CoinInfoError, EvmCoinInfo, SpecId, U256};
use std::sync::Arc;

/// Errors returned by [`EvmConfig::seal`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Chain id zero is reserved for unprotected legacy signatures.
    #[error("chain id must not be zero")]
    ZeroChainId,
    /// A fork is scheduled before the one it builds on, or without it.
    #[error("fork {fork} is scheduled out of order with {previous}")]
    ForkOrder {
        /// Fork that activates too early.
        fork: &'static str,
        /// Fork it depends on.
        previous: &'static str,
    },
    /// The native coin metadata is invalid.
    #[error(transparent)]
    CoinInfo(#[from] CoinInfoError),
    /// The fee market parameters are invalid.
    #[error(transparent)]
    FeeMarket(#[from] GasError),
    /// The configuration is not valid JSON.
    #[cfg(feature = "serde")]
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Everything the ledger needs to know about the chain: fork schedule, fee market and
/// native coin.
///
/// Build one at process start, [`seal`](EvmConfig::seal) it and hand the resulting
/// `Arc` to whoever needs it. A sealed configuration is never mutated.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct EvmConfig {
    /// Fork schedule and chain id.
    pub chain: ChainConfig,
    /// Fee market parameters.
    #[cfg_attr(feature = "serde", serde(default))]
    pub fee_market: FeeMarketParams,
    /// Native coin metadata.
    pub coin_info: EvmCoinInfo,
}

impl EvmConfig {
    /// Bundles the three parts without validating them.
    pub fn new(chain: ChainConfig, fee_market: FeeMarketParams, coin_info: EvmCoinInfo) -> Self {
        Self {
            chain,
            fee_market,
            coin_info,
        }
    }

    /// Parses a JSON configuration and seals it.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Arc<Self>, ConfigError> {
        serde_json::from_str::<Self>(json)?.seal()
    }

    /// Validates every part.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chain.chain_id == 0 {
            return Err(ConfigError::ZeroChainId);
        }
        check_fork_order(&self.chain)?;
        self.fee_market.validate()?;
        self.coin_info.validate()?;
        Ok(())
    }

    /// Validates the configuration and freezes it for sharing.
    pub fn seal(self) -> Result<Arc<Self>, ConfigError> {
        self.validate()?;
        Ok(Arc::new(self))
    }

    /// Rules in force at `height` and `time`.
    pub fn spec_id(&self, height: u64, time: u64) -> SpecId {
        self.chain.spec_id(height, time)
    }

    /// Base fee of the block at `height`, `None` when the fee market is off.
    pub fn base_fee(
        &self,
        height: u64,
        parent_gas_used: u64,
        block_max_gas: Option<u64>,
    ) -> Option<U256> {
        calculate_base_fee(&self.fee_market, height, parent_gas_used, block_max_gas)
    }

    /// Execution inputs of `block`.
    pub fn execution_env<'a>(
        &'a self,
        block: &'a BlockEnv,
        precompiles: &'a [Address],
    ) -> ExecutionEnv<'a> {
        ExecutionEnv {
            chain: &self.chain,
            coin_info: &self.coin_info,
            block,
            precompiles,
        }
    }
}

fn check_fork_order(chain: &ChainConfig) -> Result<(), ConfigError> {
    let block_forks = [
        ("homestead", chain.homestead_block),
        ("eip155", chain.eip155_block),
        ("istanbul", chain.istanbul_block),
        ("berlin", chain.berlin_block),
        ("london", chain.london_block),
    ];
    let time_forks = [
        ("london", chain.london_block.map(|_| 0)),
        ("shanghai", chain.shanghai_time),
        ("cancun", chain.cancun_time),
        ("prague", chain.prague_time),
    ];
    for forks in [&block_forks[..], &time_forks[..]] {
        for pair in forks.windows(2) {
            let (previous, previous_at) = pair[0];
            let (fork, at) = pair[1];
            let in_order = match (previous_at, at) {
                (_, None) => true,
                (None, Some(_)) => false,
                (Some(previous_at), Some(at)) => previous_at <= at,
            };
            if !in_order {
                return Err(ConfigError::ForkOrder { fork, previous });
            }
        }
    }
    Ok(())
}
