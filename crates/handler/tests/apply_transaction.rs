//! Drives signed transactions through fee deduction, execution, commit and refund.
use core::convert::Infallible;
use database::{InMemoryStore, Store};
use evmledger_handler::{
    apply_transaction, BankKeeper, BlockEnv, ExecutionEnv, FeeError, RefundError,
    TxExecutionError, VmOutcome, FEE_COLLECTOR,
};
use gas::{ChainConfig, GasError};
use primitives::{Address, Bytes, Coins, EvmCoinInfo, StorageKey, StorageValue, B256, U256};
use rstest::rstest;
use state::Account;
use statedb::Log;
use transaction::{DynamicFeeTx, SignedTransaction, SigningKey, TxError};

const RECIPIENT: Address = Address::with_last_byte(0xb0);
const COINBASE: Address = Address::with_last_byte(0xc0);
const FEE_COLLECTOR_ADDRESS: Address = Address::repeat_byte(0xfe);
const GWEI: u64 = 1_000_000_000;

/// Ledger whose native coin is the 18-decimal account balance of the store.
#[derive(Debug, Default)]
struct Chain {
    store: InMemoryStore,
    fail_refunds: bool,
}

#[derive(Debug, thiserror::Error)]
#[error("bank: {0}")]
struct BankError(&'static str);

impl Chain {
    fn module_address(module: &str) -> Address {
        assert_eq!(module, FEE_COLLECTOR);
        FEE_COLLECTOR_ADDRESS
    }

    fn balance(&self, address: Address) -> U256 {
        self.store
            .get_account(address)
            .map(|account| account.balance)
            .unwrap_or_default()
    }

    fn nonce(&self, address: Address) -> u64 {
        self.store
            .get_account(address)
            .map(|account| account.nonce)
            .unwrap_or_default()
    }

    fn transfer(&mut self, from: Address, to: Address, coins: &Coins) -> Result<(), BankError> {
        let amount = coins.amount_of("aevm");
        let balance = self.balance(from);
        if balance < amount {
            return Err(BankError("insufficient funds"));
        }
        self.store.insert_balance(from, balance - amount);
        let to_balance = self.balance(to);
        self.store.insert_balance(to, to_balance + amount);
        Ok(())
    }
}

impl Store for Chain {
    type Error = Infallible;

    fn get_account(&self, address: Address) -> Option<Account> {
        self.store.get_account(address)
    }

    fn get_code(&self, code_hash: B256) -> Option<Bytes> {
        self.store.get_code(code_hash)
    }

    fn get_state(&self, address: Address, key: StorageKey) -> StorageValue {
        self.store.get_state(address, key)
    }

    fn for_each_storage(
        &self,
        address: Address,
        f: &mut dyn FnMut(StorageKey, StorageValue) -> bool,
    ) {
        self.store.for_each_storage(address, f)
    }

    fn set_account(&mut self, address: Address, account: Account) -> Result<(), Self::Error> {
        self.store.set_account(address, account)
    }

    fn delete_account(&mut self, address: Address) -> Result<(), Self::Error> {
        self.store.delete_account(address)
    }

    fn set_code(&mut self, code_hash: B256, code: Bytes) {
        self.store.set_code(code_hash, code)
    }

    fn delete_code(&mut self, code_hash: B256) {
        self.store.delete_code(code_hash)
    }

    fn set_state(&mut self, address: Address, key: StorageKey, value: StorageValue) {
        self.store.set_state(address, key, value)
    }

    fn delete_state(&mut self, address: Address, key: StorageKey) {
        self.store.delete_state(address, key)
    }
}

impl BankKeeper for Chain {
    type Error = BankError;

    fn get_balance(&self, address: Address, _denom: &str) -> U256 {
        self.balance(address)
    }

    fn send_coins_from_module_to_account(
        &mut self,
        module: &str,
        recipient: Address,
        coins: &Coins,
    ) -> Result<(), Self::Error> {
        if self.fail_refunds {
            return Err(BankError("module account locked"));
        }
        self.transfer(Self::module_address(module), recipient, coins)
    }

    fn send_coins_from_account_to_module(
        &mut self,
        sender: Address,
        module: &str,
        coins: &Coins,
    ) -> Result<(), Self::Error> {
        self.transfer(sender, Self::module_address(module), coins)
    }
}

struct Fixture {
    chain: ChainConfig,
    coin_info: EvmCoinInfo,
    block: BlockEnv,
    key: SigningKey,
}

impl Fixture {
    fn new() -> Self {
        Self {
            chain: ChainConfig::default(),
            coin_info: EvmCoinInfo::new("aevm", "aevm", "evm", 18).unwrap(),
            block: BlockEnv {
                number: 10,
                timestamp: 1_000,
                hash: B256::repeat_byte(0xbb),
                coinbase: COINBASE,
                base_fee: Some(U256::from(GWEI)),
            },
            key: SigningKey::from_slice(&[0x46; 32]).unwrap(),
        }
    }

    fn env(&self) -> ExecutionEnv<'_> {
        ExecutionEnv {
            chain: &self.chain,
            coin_info: &self.coin_info,
            block: &self.block,
            precompiles: &[],
        }
    }

    fn sender(&self) -> Address {
        SignedTransaction::address_of(&self.key)
    }

    fn ledger(&self, balance: U256) -> Chain {
        let mut ledger = Chain::default();
        ledger.store.insert_balance(self.sender(), balance);
        ledger
    }

    /// 50 000 gas at an effective price of 2 gwei, sending 1000 wei.
    fn payload(&self) -> DynamicFeeTx {
        DynamicFeeTx {
            chain_id: self.chain.chain_id,
            nonce: 0,
            gas_tip_cap: U256::from(GWEI),
            gas_fee_cap: U256::from(3 * GWEI),
            gas_limit: 50_000,
            to: Some(RECIPIENT),
            value: U256::from(1_000),
            ..Default::default()
        }
    }

    fn sign(&self, tx: DynamicFeeTx) -> SignedTransaction {
        SignedTransaction::sign(tx.into(), &self.key).unwrap()
    }
}

fn ether() -> U256 {
    U256::from(10u64.pow(18))
}

fn wei_for_gas(gas: u64) -> U256 {
    U256::from(gas) * U256::from(2 * GWEI)
}

#[test]
fn transfer_pays_for_used_gas_only() {
    let fixture = Fixture::new();
    let sender = fixture.sender();
    let mut ledger = fixture.ledger(ether());
    let tx = fixture.sign(fixture.payload());

    let result = apply_transaction(&mut ledger, &fixture.env(), &tx, 0, 0, |db, msg| {
        let to = msg.to.unwrap();
        db.sub_balance(msg.from, msg.value);
        db.add_balance(to, msg.value);
        VmOutcome::success(0, Bytes::new())
    })
    .unwrap();

    assert!(!result.failed());
    assert_eq!(result.hash, tx.hash());
    assert_eq!(result.gas_used, 21_000);
    assert_eq!(ledger.nonce(sender), 1);
    assert_eq!(ledger.balance(RECIPIENT), U256::from(1_000));
    assert_eq!(
        ledger.balance(sender),
        ether() - wei_for_gas(21_000) - U256::from(1_000)
    );
    assert_eq!(ledger.balance(FEE_COLLECTOR_ADDRESS), wei_for_gas(21_000));
}

#[test]
fn failed_execution_is_reverted_but_charged() {
    let fixture = Fixture::new();
    let sender = fixture.sender();
    let mut ledger = fixture.ledger(ether());
    let tx = fixture.sign(fixture.payload());

    let result = apply_transaction(&mut ledger, &fixture.env(), &tx, 0, 0, |db, msg| {
        db.add_balance(RECIPIENT, msg.value);
        db.set_state(RECIPIENT, B256::with_last_byte(1), B256::with_last_byte(1));
        db.add_log(Log::new(RECIPIENT, Vec::new(), Bytes::new()));
        db.add_refund(50_000);
        VmOutcome::failure(5_000, "execution reverted")
    })
    .unwrap();

    assert!(result.failed());
    assert_eq!(result.vm_error.as_deref(), Some("execution reverted"));
    assert_eq!(result.gas_used, 26_000);
    assert!(result.logs.is_empty());
    assert_eq!(ledger.store.get_account(RECIPIENT), None);
    assert_eq!(ledger.store.storage_len(&RECIPIENT), 0);
    assert_eq!(ledger.nonce(sender), 1);
    assert_eq!(ledger.balance(sender), ether() - wei_for_gas(26_000));
}

#[test]
fn refund_is_capped_by_quotient() {
    let fixture = Fixture::new();
    let sender = fixture.sender();
    let mut ledger = fixture.ledger(ether());
    let tx = fixture.sign(fixture.payload());

    let result = apply_transaction(&mut ledger, &fixture.env(), &tx, 0, 0, |db, _| {
        db.add_refund(100_000);
        VmOutcome::success(10_000, Bytes::new())
    })
    .unwrap();

    // 31 000 used, at most a fifth of it comes back.
    assert_eq!(result.gas_used, 31_000 - 6_200);
    assert_eq!(ledger.balance(sender), ether() - wei_for_gas(24_800));
}

#[test]
fn logs_carry_block_coordinates() {
    let fixture = Fixture::new();
    let mut ledger = fixture.ledger(ether());
    let tx = fixture.sign(fixture.payload());
    let topic = B256::repeat_byte(0x11);

    let result = apply_transaction(&mut ledger, &fixture.env(), &tx, 2, 7, |db, _| {
        db.add_log(Log::new(RECIPIENT, vec![topic], Bytes::from_static(b"hi")));
        db.add_log(Log::new(RECIPIENT, Vec::new(), Bytes::new()));
        VmOutcome::success(0, Bytes::from_static(&[0x01]))
    })
    .unwrap();

    assert_eq!(result.output, Bytes::from_static(&[0x01]));
    assert_eq!(result.logs.len(), 2);
    let first = &result.logs[0];
    assert_eq!(first.topics, vec![topic]);
    assert_eq!(first.tx_hash, tx.hash());
    assert_eq!(first.block_hash, fixture.block.hash);
    assert_eq!(first.tx_index, 2);
    assert_eq!(first.index, 7);
    assert_eq!(result.logs[1].index, 8);
}

#[derive(Debug, PartialEq, Eq)]
enum Rejection {
    ChainId,
    Nonce,
    FeeCap,
    Funds,
    IntrinsicGas,
}

fn rejection<S, B>(err: &TxExecutionError<S, B>) -> Option<Rejection> {
    match err {
        TxExecutionError::Tx(TxError::InvalidChainId { .. }) => Some(Rejection::ChainId),
        TxExecutionError::InvalidNonce { .. } => Some(Rejection::Nonce),
        TxExecutionError::Fee(FeeError::FeeCapBelowBaseFee { .. }) => Some(Rejection::FeeCap),
        TxExecutionError::Fee(FeeError::InsufficientFunds { .. }) => Some(Rejection::Funds),
        TxExecutionError::Fee(FeeError::Gas(GasError::IntrinsicGasTooLow { .. })) => {
            Some(Rejection::IntrinsicGas)
        }
        _ => None,
    }
}

#[rstest]
#[case::foreign_chain(|tx: &mut DynamicFeeTx| tx.chain_id = 1, ether(), Rejection::ChainId)]
#[case::future_nonce(|tx: &mut DynamicFeeTx| tx.nonce = 1, ether(), Rejection::Nonce)]
#[case::fee_cap_under_base_fee(
    |tx: &mut DynamicFeeTx| {
        tx.gas_fee_cap = U256::from(GWEI / 2);
        tx.gas_tip_cap = U256::from(1);
    },
    ether(),
    Rejection::FeeCap
)]
#[case::cannot_afford_cost(|_: &mut DynamicFeeTx| {}, U256::from(1_000), Rejection::Funds)]
#[case::gas_limit_under_intrinsic(
    |tx: &mut DynamicFeeTx| tx.gas_limit = 20_000,
    ether(),
    Rejection::IntrinsicGas
)]
fn rejected_transactions_leave_ledger_untouched(
    #[case] tweak: fn(&mut DynamicFeeTx),
    #[case] balance: U256,
    #[case] expected: Rejection,
) {
    let fixture = Fixture::new();
    let mut ledger = fixture.ledger(balance);
    let before = ledger.store.clone();
    let mut payload = fixture.payload();
    tweak(&mut payload);
    let tx = fixture.sign(payload);

    let err = apply_transaction(&mut ledger, &fixture.env(), &tx, 0, 0, |_, _| {
        panic!("rejected transactions never reach the vm")
    })
    .unwrap_err();

    assert_eq!(rejection(&err), Some(expected));
    assert_eq!(ledger.store, before);
}

#[test]
fn failed_refund_keeps_committed_state() {
    let fixture = Fixture::new();
    let sender = fixture.sender();
    let mut ledger = fixture.ledger(ether());
    ledger.fail_refunds = true;
    let tx = fixture.sign(fixture.payload());

    let err = apply_transaction(&mut ledger, &fixture.env(), &tx, 0, 0, |_, _| {
        VmOutcome::default()
    })
    .unwrap_err();

    let TxExecutionError::Refund(RefundError::RefundFailed {
        leftover_gas,
        amount,
        ..
    }) = err
    else {
        panic!("expected a refund failure, got {err:?}");
    };
    assert_eq!(leftover_gas, 29_000);
    assert_eq!(amount, wei_for_gas(29_000));
    assert_eq!(ledger.nonce(sender), 1);
    assert_eq!(ledger.balance(sender), ether() - wei_for_gas(50_000));
}
