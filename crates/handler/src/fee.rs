//! Fee and priority resolution for incoming transactions.
use crate::FeeError;
use gas::intrinsic_gas;
use primitives::{Coin, Coins, SpecId, U256};
use transaction::TxData;

/// Divisor turning a tip in wei into a mempool priority.
pub const DEFAULT_PRIORITY_REDUCTION: U256 = U256::from_limbs([1_000_000, 0, 0, 0]);

/// Checks the fee a transaction offers and returns what it owes, denominated in
/// `denom`.
///
/// The fee cap (the gas price of flat-fee transactions) must cover `base_fee`. The owed
/// fee is `gas_limit * effective_gas_price(base_fee)`. With `check_intrinsic`, as done
/// when admitting a transaction to the mempool, the gas limit must also cover the
/// intrinsic gas.
pub fn verify_fee(
    tx: &TxData,
    denom: &str,
    base_fee: Option<U256>,
    spec_id: SpecId,
    check_intrinsic: bool,
) -> Result<Coins, FeeError> {
    let intrinsic_gas = intrinsic_gas(spec_id, tx.input(), tx.is_create(), tx.access_list())?;
    if check_intrinsic && tx.gas_limit() < intrinsic_gas {
        return Err(gas::GasError::IntrinsicGasTooLow {
            gas_limit: tx.gas_limit(),
            intrinsic_gas,
        }
        .into());
    }

    if let Some(base_fee) = base_fee {
        if tx.gas_fee_cap() < base_fee {
            return Err(FeeError::FeeCapBelowBaseFee {
                gas_fee_cap: tx.gas_fee_cap(),
                base_fee,
            });
        }
    }

    Ok(Coins::from(Coin::new(denom, tx.effective_fee(base_fee))))
}

/// Mempool priority of a transaction: its tip per gas divided by
/// [`DEFAULT_PRIORITY_REDUCTION`], saturating at `i64::MAX`.
///
/// Without a base fee there is no tip market and every transaction has priority zero.
pub fn get_tx_priority(tx: &TxData, base_fee: Option<U256>) -> i64 {
    let Some(base_fee) = base_fee else {
        return 0;
    };
    let tip = tx
        .effective_gas_price(Some(base_fee))
        .saturating_sub(base_fee);
    let priority = tip / DEFAULT_PRIORITY_REDUCTION;
    i64::try_from(priority).unwrap_or(i64::MAX)
}

/// Checks that `balance` covers `value + gas_limit * gas_fee_cap`.
pub fn check_sender_balance(balance: U256, tx: &TxData) -> Result<(), FeeError> {
    let cost = tx.cost();
    if balance < cost {
        return Err(FeeError::InsufficientFunds { balance, cost });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gas::GasError;
    use primitives::{Address, Bytes};
    use rstest::rstest;
    use transaction::{DynamicFeeTx, LegacyTx};

    const GWEI: u64 = 1_000_000_000;

    fn dynamic(tip: u64, cap: u64) -> TxData {
        DynamicFeeTx {
            chain_id: 9001,
            gas_limit: 21_000,
            gas_tip_cap: U256::from(tip),
            gas_fee_cap: U256::from(cap),
            to: Some(Address::with_last_byte(1)),
            ..Default::default()
        }
        .into()
    }

    fn legacy(gas_price: u64) -> TxData {
        LegacyTx {
            gas_price: U256::from(gas_price),
            gas_limit: 21_000,
            to: Some(Address::with_last_byte(1)),
            value: U256::from(5),
            ..Default::default()
        }
        .into()
    }

    #[test]
    fn owed_fee_uses_effective_price() {
        let fees = verify_fee(
            &dynamic(2 * GWEI, 10 * GWEI),
            "aevm",
            Some(U256::from(GWEI)),
            SpecId::LONDON,
            true,
        )
        .unwrap();
        assert_eq!(fees.amount_of("aevm"), U256::from(21_000 * 3 * GWEI));
    }

    #[test]
    fn owed_fee_without_base_fee_uses_fee_cap() {
        let fees = verify_fee(&dynamic(GWEI, 4 * GWEI), "aevm", None, SpecId::LONDON, true)
            .unwrap();
        assert_eq!(fees.amount_of("aevm"), U256::from(21_000 * 4 * GWEI));
    }

    #[rstest]
    #[case::dynamic(dynamic(GWEI, 2 * GWEI))]
    #[case::legacy(legacy(2 * GWEI))]
    fn fee_cap_below_base_fee_is_rejected(#[case] tx: TxData) {
        let err = verify_fee(&tx, "aevm", Some(U256::from(3 * GWEI)), SpecId::LONDON, false)
            .unwrap_err();
        assert_eq!(
            err,
            FeeError::FeeCapBelowBaseFee {
                gas_fee_cap: U256::from(2 * GWEI),
                base_fee: U256::from(3 * GWEI),
            }
        );
    }

    #[test]
    fn zero_fee_yields_no_coins() {
        let fees = verify_fee(&legacy(0), "aevm", None, SpecId::LONDON, true).unwrap();
        assert!(fees.is_zero());
    }

    #[test]
    fn intrinsic_gas_is_checked_on_admission() {
        let tx: TxData = LegacyTx {
            gas_limit: 21_000,
            to: Some(Address::with_last_byte(1)),
            input: Bytes::from_static(&[1; 4]),
            ..Default::default()
        }
        .into();
        let err = verify_fee(&tx, "aevm", None, SpecId::LONDON, true).unwrap_err();
        assert_eq!(
            err,
            FeeError::Gas(GasError::IntrinsicGasTooLow {
                gas_limit: 21_000,
                intrinsic_gas: 21_064,
            })
        );
        assert!(verify_fee(&tx, "aevm", None, SpecId::LONDON, false).is_ok());
    }

    #[rstest]
    #[case::capped_by_tip(dynamic(3 * GWEI, 10 * GWEI), Some(GWEI), 3_000)]
    #[case::capped_by_fee_cap(dynamic(3 * GWEI, 2 * GWEI), Some(GWEI), 1_000)]
    #[case::legacy(legacy(5 * GWEI), Some(GWEI), 4_000)]
    #[case::below_base_fee(legacy(GWEI / 2), Some(GWEI), 0)]
    #[case::no_fee_market(dynamic(3 * GWEI, 10 * GWEI), None, 0)]
    fn priority(#[case] tx: TxData, #[case] base_fee: Option<u64>, #[case] expected: i64) {
        assert_eq!(get_tx_priority(&tx, base_fee.map(U256::from)), expected);
    }

    #[test]
    fn priority_saturates() {
        let tx: TxData = LegacyTx {
            gas_price: U256::MAX,
            gas_limit: 1,
            ..Default::default()
        }
        .into();
        assert_eq!(get_tx_priority(&tx, Some(U256::ZERO)), i64::MAX);
    }

    #[test]
    fn sender_balance_covers_cost() {
        let tx = legacy(10);
        // 21000 * 10 + 5
        assert!(check_sender_balance(U256::from(210_005), &tx).is_ok());
        assert_eq!(
            check_sender_balance(U256::from(210_004), &tx),
            Err(FeeError::InsufficientFunds {
                balance: U256::from(210_004),
                cost: U256::from(210_005),
            })
        );
    }
}
