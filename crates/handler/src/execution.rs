//! Transaction driver: validation, fee deduction, execution against a journaled ledger
//! view, commit and refund.
use crate::{
    check_sender_balance, post_execution::refund_gas, verify_fee, BankKeeper, BankWrapper,
    FeeError, Message, TxExecutionError, TxResult, VmOutcome, FEE_COLLECTOR,
};
use database::Store;
use gas::{intrinsic_gas_for_tx, leftover_gas, ChainConfig};
use primitives::{Address, EvmCoinInfo, SpecId, B256, U256};
use statedb::{StateDB, TxConfig};
use tracing::{debug, trace};
use transaction::SignedTransaction;

/// Block a transaction is applied in.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockEnv {
    /// Block height.
    pub number: u64,
    /// Block time in seconds.
    pub timestamp: u64,
    /// Block hash, stamped on logs.
    pub hash: B256,
    /// Block proposer, warmed before execution.
    pub coinbase: Address,
    /// Base fee, `None` when the fee market is disabled.
    pub base_fee: Option<U256>,
}

/// Chain level inputs of [`apply_transaction`].
#[derive(Clone, Copy, Debug)]
pub struct ExecutionEnv<'a> {
    /// Fork schedule and chain id.
    pub chain: &'a ChainConfig,
    /// Native coin of the chain.
    pub coin_info: &'a EvmCoinInfo,
    /// Current block.
    pub block: &'a BlockEnv,
    /// Precompile addresses, warmed before execution.
    pub precompiles: &'a [Address],
}

impl ExecutionEnv<'_> {
    /// Rules in force for the current block.
    pub fn spec_id(&self) -> SpecId {
        self.chain.spec_id(self.block.number, self.block.timestamp)
    }
}

/// Error of [`apply_transaction`] for a ledger `L`.
pub type LedgerTxError<L> = TxExecutionError<<L as Store>::Error, <L as BankKeeper>::Error>;

/// Applies a signed transaction to `ledger`.
///
/// The transaction is validated, its sender recovered and its fee checked and deducted
/// to the [`FEE_COLLECTOR`]. `vm` then runs against a fresh [`StateDB`] over the ledger.
/// When the VM reports an error every state change it made is reverted, but the gas it
/// spent is still charged. The view is finalised and committed, and the leftover gas,
/// refund included, is paid back to the sender.
///
/// An `Err` means the transaction was rejected or the ledger failed. Rejections leave
/// the ledger untouched.
///
/// # Panics
///
/// Panics if the VM reports more gas than the transaction left it.
pub fn apply_transaction<L, F>(
    ledger: &mut L,
    env: &ExecutionEnv<'_>,
    tx: &SignedTransaction,
    tx_index: u64,
    log_index: u64,
    vm: F,
) -> Result<TxResult, LedgerTxError<L>>
where
    L: Store + BankKeeper,
    F: FnOnce(&mut StateDB<&mut L>, &Message) -> VmOutcome,
{
    let data = tx.tx();
    data.validate()?;
    data.validate_chain_id(env.chain.chain_id)?;
    let from = tx.recover_signer()?;

    let spec_id = env.spec_id();
    let base_fee = env.block.base_fee;
    let denom = env.coin_info.extended_denom();
    let fees = verify_fee(data, denom, base_fee, spec_id, true)?;
    let intrinsic_gas = intrinsic_gas_for_tx(data, spec_id).map_err(FeeError::from)?;

    let expected = ledger
        .get_account(from)
        .map(|account| account.nonce)
        .unwrap_or_default();
    if data.nonce() != expected {
        return Err(TxExecutionError::InvalidNonce {
            expected,
            got: data.nonce(),
        });
    }

    let mut bank = BankWrapper::new(&mut *ledger, env.coin_info.clone());
    check_sender_balance(bank.get_balance(from), data)?;
    bank.send_coins_from_account_to_module(from, FEE_COLLECTOR, &fees)
        .map_err(TxExecutionError::FeeDeduction)?;

    let gas_price = data.effective_gas_price(base_fee);
    let message = Message {
        from,
        to: data.to(),
        nonce: data.nonce(),
        value: data.value(),
        input: data.input().clone(),
        gas_limit: data.gas_limit(),
        gas_price,
        intrinsic_gas,
        spec_id,
    };

    let tx_config = TxConfig::new(env.block.hash, tx.hash(), tx_index, log_index);
    let mut db = StateDB::new(&mut *ledger, tx_config);
    // Creations bump the nonce when the VM derives the contract address.
    if !data.is_create() {
        db.set_nonce(from, data.nonce() + 1);
    }
    db.prepare(
        spec_id,
        from,
        env.block.coinbase,
        data.to(),
        env.precompiles,
        data.access_list(),
    );

    let snapshot = db.snapshot();
    let outcome = vm(&mut db, &message);
    if let Some(reason) = &outcome.vm_error {
        trace!(target: "handler", tx = %tx.hash(), %reason, "reverting failed execution");
        db.revert_to_snapshot(snapshot);
    }

    let gas_used = intrinsic_gas.saturating_add(outcome.gas_used);
    let refund_quotient = ChainConfig::refund_quotient(spec_id);
    let leftover = leftover_gas(data.gas_limit(), gas_used, db.get_refund(), refund_quotient);
    let logs = db.logs().to_vec();

    db.finalise(spec_id.is_enabled_in(SpecId::SPURIOUS_DRAGON));
    db.commit().map_err(TxExecutionError::Commit)?;

    let mut bank = BankWrapper::new(&mut *ledger, env.coin_info.clone());
    refund_gas(&mut bank, from, leftover, gas_price, denom).map_err(TxExecutionError::Refund)?;

    let result = TxResult {
        hash: tx.hash(),
        gas_used: data.gas_limit() - leftover,
        logs,
        output: outcome.output,
        vm_error: outcome.vm_error,
    };
    debug!(
        target: "handler",
        tx = %result.hash,
        %from,
        gas_used = result.gas_used,
        failed = result.failed(),
        "applied transaction"
    );
    Ok(result)
}
