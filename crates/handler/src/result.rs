use primitives::{Address, Bytes, SpecId, B256, U256};
use statedb::Log;

/// The call handed to the VM after validation and fee deduction.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Message {
    /// Recovered sender.
    pub from: Address,
    /// Recipient, `None` for contract creation.
    pub to: Option<Address>,
    /// Transaction nonce.
    pub nonce: u64,
    /// Transferred value.
    pub value: U256,
    /// Call data or init code.
    pub input: Bytes,
    /// Gas limit of the transaction.
    pub gas_limit: u64,
    /// Effective price per gas.
    pub gas_price: U256,
    /// Gas charged before execution.
    pub intrinsic_gas: u64,
    /// Rules in force.
    pub spec_id: SpecId,
}

impl Message {
    /// Gas left to the VM once the intrinsic cost is paid.
    pub fn execution_gas(&self) -> u64 {
        self.gas_limit - self.intrinsic_gas
    }
}

/// What the VM reports back.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VmOutcome {
    /// Gas spent by execution, intrinsic gas excluded.
    pub gas_used: u64,
    /// Return data.
    pub output: Bytes,
    /// Failure reason. A failed execution is rolled back but still pays for its gas.
    pub vm_error: Option<String>,
}

impl VmOutcome {
    /// Successful execution spending `gas_used`.
    pub fn success(gas_used: u64, output: Bytes) -> Self {
        Self {
            gas_used,
            output,
            vm_error: None,
        }
    }

    /// Failed execution spending `gas_used`.
    pub fn failure(gas_used: u64, reason: impl Into<String>) -> Self {
        Self {
            gas_used,
            output: Bytes::new(),
            vm_error: Some(reason.into()),
        }
    }
}

/// Result of an applied transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TxResult {
    /// Transaction hash.
    pub hash: B256,
    /// Gas charged, refund deducted.
    pub gas_used: u64,
    /// Logs emitted by a successful execution.
    pub logs: Vec<Log>,
    /// Return data.
    pub output: Bytes,
    /// Failure reason of the VM, if any.
    pub vm_error: Option<String>,
}

impl TxResult {
    /// Whether the VM failed.
    pub fn failed(&self) -> bool {
        self.vm_error.is_some()
    }
}
