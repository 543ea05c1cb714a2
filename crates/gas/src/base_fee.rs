//! EIP-1559 style base fee recurrence.
use crate::{FeeMarketParams, MIN_BASE_FEE_DELTA};
use primitives::U256;
use tracing::trace;

/// Base fee of the block at `height`.
///
/// Returns `None` when the fee market is disabled or not yet enabled, which is distinct
/// from a zero base fee. On the enable height the base fee is seeded from the
/// parameters. Otherwise `params.base_fee` is taken as the parent base fee and moved
/// toward equilibrium with [`calc_gas_base_fee`].
///
/// `block_max_gas` of `None` means unlimited block gas.
pub fn calculate_base_fee(
    params: &FeeMarketParams,
    height: u64,
    parent_gas_used: u64,
    block_max_gas: Option<u64>,
) -> Option<U256> {
    if !params.is_base_fee_enabled(height) {
        return None;
    }
    if height == params.enable_height {
        return Some(params.base_fee);
    }

    let gas_limit = block_max_gas.unwrap_or(u64::MAX);
    let parent_gas_target = gas_limit / u64::from(params.elasticity_multiplier.max(1));
    let base_fee = calc_gas_base_fee(
        parent_gas_used,
        parent_gas_target,
        params.base_fee_change_denominator,
        params.base_fee,
        params.min_gas_price,
    );
    trace!(
        target: "evmledger::fee_market",
        height,
        parent_gas_used,
        parent_gas_target,
        parent_base_fee = %params.base_fee,
        %base_fee,
        "computed base fee"
    );
    Some(base_fee)
}

/// One step of the base fee recurrence.
///
/// - `gas_used == gas_target`: unchanged.
/// - `gas_used > gas_target`: increases by `max(1, base_fee * delta / target / denominator)`.
/// - `gas_used < gas_target`: decreases by `base_fee * delta / target / denominator`.
///
/// A moved base fee is never below `min_gas_price`.
///
/// A zero target yields zero.
pub fn calc_gas_base_fee(
    gas_used: u64,
    gas_target: u64,
    base_fee_change_denominator: u32,
    base_fee: U256,
    min_gas_price: U256,
) -> U256 {
    if gas_used == gas_target {
        return base_fee;
    }
    if gas_target == 0 {
        return U256::ZERO;
    }

    let gas_used_delta = U256::from(gas_used.abs_diff(gas_target));
    let base_fee_delta = gas_used_delta.saturating_mul(base_fee)
        / U256::from(gas_target)
        / U256::from(base_fee_change_denominator.max(1));

    if gas_used > gas_target {
        base_fee
            .saturating_add(base_fee_delta.max(U256::from(MIN_BASE_FEE_DELTA)))
            .max(min_gas_price)
    } else {
        base_fee.saturating_sub(base_fee_delta).max(min_gas_price)
    }
}
