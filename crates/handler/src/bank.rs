//! Boundary with the native coin ledger.
//!
//! The EVM works in 18-decimal units. The native ledger keeps its own precision, so
//! every amount crossing this boundary goes through the decimal scaler.
use auto_impl::auto_impl;
use primitives::{to_vm18, Address, Coin, Coins, EvmCoinInfo, U256};

/// Module account collecting transaction fees.
pub const FEE_COLLECTOR: &str = "fee_collector";

/// Native coin ledger, in native units.
#[auto_impl(&mut, Box)]
pub trait BankKeeper {
    /// The ledger error type.
    type Error: core::error::Error + Send + Sync + 'static;

    /// Balance of `address` in `denom`.
    fn get_balance(&self, address: Address, denom: &str) -> U256;

    /// Moves `coins` from the module account `module` to `recipient`.
    fn send_coins_from_module_to_account(
        &mut self,
        module: &str,
        recipient: Address,
        coins: &Coins,
    ) -> Result<(), Self::Error>;

    /// Moves `coins` from `sender` to the module account `module`.
    fn send_coins_from_account_to_module(
        &mut self,
        sender: Address,
        module: &str,
        coins: &Coins,
    ) -> Result<(), Self::Error>;
}

/// A [`BankKeeper`] seen in 18-decimal units.
///
/// Coins of the extended denomination are converted to the native denomination before
/// they reach the ledger. The conversion truncates: sub-unit remainders are not moved.
#[derive(Clone, Debug)]
pub struct BankWrapper<B> {
    bank: B,
    coin_info: EvmCoinInfo,
}

impl<B: BankKeeper> BankWrapper<B> {
    /// Wraps `bank` for the coin described by `coin_info`.
    pub fn new(bank: B, coin_info: EvmCoinInfo) -> Self {
        Self { bank, coin_info }
    }

    /// Coin metadata used for conversions.
    pub fn coin_info(&self) -> &EvmCoinInfo {
        &self.coin_info
    }

    /// Returns the wrapped ledger.
    pub fn into_inner(self) -> B {
        self.bank
    }

    /// Balance of `address` in 18-decimal units.
    pub fn get_balance(&self, address: Address) -> U256 {
        let native = self.bank.get_balance(address, self.coin_info.denom());
        to_vm18(native, self.coin_info.decimals())
    }

    /// Converts 18-decimal coins to what the native ledger moves.
    pub fn to_native_coins(&self, coins: &Coins) -> Coins {
        Coins::new(coins.iter().map(|coin| self.to_native_coin(coin)))
    }

    fn to_native_coin(&self, coin: &Coin) -> Coin {
        if coin.denom == self.coin_info.extended_denom() {
            self.coin_info.to_native(coin)
        } else {
            coin.clone()
        }
    }

    /// Moves 18-decimal `coins` from the module account `module` to `recipient`.
    ///
    /// Nothing is sent when the coins truncate to zero.
    pub fn send_coins_from_module_to_account(
        &mut self,
        module: &str,
        recipient: Address,
        coins: &Coins,
    ) -> Result<(), B::Error> {
        let coins = self.to_native_coins(coins);
        if coins.is_zero() {
            return Ok(());
        }
        self.bank
            .send_coins_from_module_to_account(module, recipient, &coins)
    }

    /// Moves 18-decimal `coins` from `sender` to the module account `module`.
    ///
    /// Nothing is sent when the coins truncate to zero.
    pub fn send_coins_from_account_to_module(
        &mut self,
        sender: Address,
        module: &str,
        coins: &Coins,
    ) -> Result<(), B::Error> {
        let coins = self.to_native_coins(coins);
        if coins.is_zero() {
            return Ok(());
        }
        self.bank
            .send_coins_from_account_to_module(sender, module, &coins)
    }
}
