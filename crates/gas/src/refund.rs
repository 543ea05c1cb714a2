//! Refund cap and leftover gas.

/// Gas actually refunded: the refund counter, capped at `gas_used / refund_quotient`.
///
/// # Panics
///
/// Panics if `refund_quotient` is zero. The quotient is a protocol constant; zero means
/// the chain configuration is broken.
#[inline]
pub fn gas_to_refund(refund_counter: u64, gas_used: u64, refund_quotient: u64) -> u64 {
    if refund_quotient == 0 {
        panic!("refund quotient must not be zero");
    }
    refund_counter.min(gas_used / refund_quotient)
}

/// Gas returned to the sender after execution: unspent gas plus the capped refund.
///
/// # Panics
///
/// Panics if `gas_used` exceeds `gas_limit`, which would mean negative gas consumption,
/// or if `refund_quotient` is zero.
pub fn leftover_gas(gas_limit: u64, gas_used: u64, refund_counter: u64, refund_quotient: u64) -> u64 {
    let Some(remaining) = gas_limit.checked_sub(gas_used) else {
        panic!("gas used {gas_used} exceeds gas limit {gas_limit}");
    };
    remaining + gas_to_refund(refund_counter, gas_used, refund_quotient)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::capped_by_counter(10, 11, 1, 10)]
    #[case::capped_by_gas_used(10, 5, 1, 5)]
    #[case::london_quotient(30_000, 100_000, 5, 20_000)]
    #[case::pre_london_quotient(30_000, 50_000, 2, 25_000)]
    #[case::nothing_to_refund(0, 50_000, 5, 0)]
    fn refund_cap(
        #[case] refund_counter: u64,
        #[case] gas_used: u64,
        #[case] quotient: u64,
        #[case] expected: u64,
    ) {
        assert_eq!(gas_to_refund(refund_counter, gas_used, quotient), expected);
    }

    #[test]
    #[should_panic(expected = "refund quotient must not be zero")]
    fn zero_quotient_aborts() {
        gas_to_refund(10, 10, 0);
    }

    #[test]
    fn leftover_includes_refund() {
        assert_eq!(leftover_gas(100_000, 60_000, 20_000, 5), 40_000 + 12_000);
        assert_eq!(leftover_gas(21_000, 21_000, 0, 5), 0);
    }

    #[test]
    #[should_panic(expected = "exceeds gas limit")]
    fn negative_consumption_aborts() {
        leftover_gas(10, 11, 0, 5);
    }
}
