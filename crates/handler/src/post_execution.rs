//! Settlement after execution.
use crate::{BankKeeper, BankWrapper, RefundError, FEE_COLLECTOR};
use primitives::{Address, Coin, Coins, U256};
use tracing::debug;

/// Pays `leftover_gas * gas_price` from the fee collector back to `from`.
///
/// `denom` is the denomination the fees were deducted in, normally the extended one. A
/// zero refund is a no-op.
pub fn refund_gas<B: BankKeeper>(
    bank: &mut BankWrapper<B>,
    from: Address,
    leftover_gas: u64,
    gas_price: U256,
    denom: &str,
) -> Result<(), RefundError<B::Error>> {
    let amount = U256::from(leftover_gas).saturating_mul(gas_price);
    if amount.is_zero() {
        return Ok(());
    }

    let coins = Coins::from(Coin::new(denom, amount));
    bank.send_coins_from_module_to_account(FEE_COLLECTOR, from, &coins)
        .map_err(|source| RefundError::RefundFailed {
            leftover_gas,
            amount,
            source,
        })?;
    debug!(target: "handler", %from, leftover_gas, %amount, "refunded leftover gas");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::tests::MockBank;
    use primitives::EvmCoinInfo;

    fn eighteen_decimals() -> EvmCoinInfo {
        EvmCoinInfo::new("aevm", "aevm", "evm", 18).unwrap()
    }

    #[test]
    fn refunds_from_fee_collector() {
        let sender = Address::with_last_byte(7);
        let mut bank = MockBank::default();
        bank.modules.insert(FEE_COLLECTOR.to_string(), U256::from(1_000));
        let mut wrapper = BankWrapper::new(bank, eighteen_decimals());

        refund_gas(&mut wrapper, sender, 30, U256::from(10), "aevm").unwrap();

        let bank = wrapper.into_inner();
        assert_eq!(bank.accounts[&sender], U256::from(300));
        assert_eq!(bank.modules[FEE_COLLECTOR], U256::from(700));
    }

    #[test]
    fn zero_refund_sends_nothing() {
        let mut wrapper = BankWrapper::new(MockBank::default(), eighteen_decimals());
        refund_gas(&mut wrapper, Address::ZERO, 0, U256::from(10), "aevm").unwrap();
        refund_gas(&mut wrapper, Address::ZERO, 10, U256::ZERO, "aevm").unwrap();
        assert!(wrapper.into_inner().sent.is_empty());
    }

    #[test]
    fn empty_fee_collector_fails_the_refund() {
        let mut wrapper = BankWrapper::new(MockBank::default(), eighteen_decimals());
        let err = refund_gas(&mut wrapper, Address::ZERO, 5, U256::from(2), "aevm").unwrap_err();
        let RefundError::RefundFailed {
            leftover_gas,
            amount,
            ..
        } = err;
        assert_eq!(leftover_gas, 5);
        assert_eq!(amount, U256::from(10));
    }
}
