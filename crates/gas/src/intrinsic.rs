//! Intrinsic gas: what a transaction costs before any opcode runs.
use crate::{
    GasError, ACCESS_LIST_ADDRESS, ACCESS_LIST_STORAGE_KEY, INITCODE_WORD_COST, TX_DATA_NON_ZERO_GAS_EIP2028,
    TX_DATA_NON_ZERO_GAS_FRONTIER, TX_DATA_ZERO_GAS, TX_GAS, TX_GAS_CONTRACT_CREATION,
};
use primitives::SpecId;
use transaction::{AccessList, TxData};

/// EIP-3860 init code cost: two gas per 32 byte word.
#[inline]
pub const fn initcode_cost(len: u64) -> u64 {
    len.div_ceil(32).saturating_mul(INITCODE_WORD_COST)
}

/// Initial gas that is deducted for transaction to be included.
/// Initial gas contains initial stipend gas, gas for access list and input data.
///
/// Fails only when the sum does not fit in 64 bits.
pub fn intrinsic_gas(
    spec_id: SpecId,
    input: &[u8],
    is_create: bool,
    access_list: Option<&AccessList>,
) -> Result<u64, GasError> {
    // base stipend
    let mut gas = if is_create && spec_id.is_enabled_in(SpecId::HOMESTEAD) {
        // EIP-2: Homestead Hard-fork Changes
        TX_GAS_CONTRACT_CREATION
    } else {
        TX_GAS
    };

    let zero_data_len = input.iter().filter(|v| **v == 0).count() as u64;
    let non_zero_data_len = input.len() as u64 - zero_data_len;

    // EIP-2028: Transaction data gas cost reduction
    let non_zero_gas = if spec_id.is_enabled_in(SpecId::ISTANBUL) {
        TX_DATA_NON_ZERO_GAS_EIP2028
    } else {
        TX_DATA_NON_ZERO_GAS_FRONTIER
    };
    gas = checked_add_mul(gas, non_zero_data_len, non_zero_gas)?;
    gas = checked_add_mul(gas, zero_data_len, TX_DATA_ZERO_GAS)?;

    // EIP-3860: Limit and meter initcode
    if is_create && spec_id.is_enabled_in(SpecId::SHANGHAI) {
        gas = gas
            .checked_add(initcode_cost(input.len() as u64))
            .ok_or(GasError::IntrinsicGasOverflow)?;
    }

    if let Some(access_list) = access_list {
        if spec_id.is_enabled_in(SpecId::BERLIN) {
            gas = checked_add_mul(gas, access_list.len() as u64, ACCESS_LIST_ADDRESS)?;
            gas = checked_add_mul(
                gas,
                access_list.storage_key_count() as u64,
                ACCESS_LIST_STORAGE_KEY,
            )?;
        }
    }

    Ok(gas)
}

/// [`intrinsic_gas`] of a transaction payload, checked against its gas limit.
pub fn intrinsic_gas_for_tx(tx: &TxData, spec_id: SpecId) -> Result<u64, GasError> {
    let intrinsic_gas = intrinsic_gas(spec_id, tx.input(), tx.is_create(), tx.access_list())?;
    if tx.gas_limit() < intrinsic_gas {
        return Err(GasError::IntrinsicGasTooLow {
            gas_limit: tx.gas_limit(),
            intrinsic_gas,
        });
    }
    Ok(intrinsic_gas)
}

#[inline]
fn checked_add_mul(gas: u64, count: u64, cost: u64) -> Result<u64, GasError> {
    count
        .checked_mul(cost)
        .and_then(|extra| gas.checked_add(extra))
        .ok_or(GasError::IntrinsicGasOverflow)
}
