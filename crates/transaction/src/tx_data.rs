use crate::{AccessList, AccessListTx, DynamicFeeTx, LegacyTx, TxError, TxType};
use primitives::{Address, Bytes, B256, U256};

/// Unsigned transaction payload, one of the three fee shapes.
///
/// Every accessor is defined for every variant. Variants without a fee cap or a tip cap
/// report their gas price for both.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "camelCase"))]
pub enum TxData {
    /// Legacy transaction.
    Legacy(LegacyTx),
    /// EIP-2930 access list transaction.
    AccessList(AccessListTx),
    /// EIP-1559 dynamic fee transaction.
    DynamicFee(DynamicFeeTx),
}

impl From<LegacyTx> for TxData {
    fn from(tx: LegacyTx) -> Self {
        Self::Legacy(tx)
    }
}

impl From<AccessListTx> for TxData {
    fn from(tx: AccessListTx) -> Self {
        Self::AccessList(tx)
    }
}

impl From<DynamicFeeTx> for TxData {
    fn from(tx: DynamicFeeTx) -> Self {
        Self::DynamicFee(tx)
    }
}

impl TxData {
    /// Envelope type.
    pub const fn tx_type(&self) -> TxType {
        match self {
            Self::Legacy(_) => TxType::Legacy,
            Self::AccessList(_) => TxType::Eip2930,
            Self::DynamicFee(_) => TxType::Eip1559,
        }
    }

    /// Chain id. `None` for unprotected legacy transactions.
    pub fn chain_id(&self) -> Option<u64> {
        match self {
            Self::Legacy(tx) => tx.eip155_chain_id(),
            Self::AccessList(tx) => Some(tx.chain_id),
            Self::DynamicFee(tx) => Some(tx.chain_id),
        }
    }

    /// Sender nonce.
    pub const fn nonce(&self) -> u64 {
        match self {
            Self::Legacy(tx) => tx.nonce,
            Self::AccessList(tx) => tx.nonce,
            Self::DynamicFee(tx) => tx.nonce,
        }
    }

    /// Recipient, `None` for contract creation.
    pub const fn to(&self) -> Option<Address> {
        match self {
            Self::Legacy(tx) => tx.to,
            Self::AccessList(tx) => tx.to,
            Self::DynamicFee(tx) => tx.to,
        }
    }

    /// Returns `true` if the transaction deploys a contract.
    pub const fn is_create(&self) -> bool {
        self.to().is_none()
    }

    /// Transferred value.
    pub const fn value(&self) -> U256 {
        match self {
            Self::Legacy(tx) => tx.value,
            Self::AccessList(tx) => tx.value,
            Self::DynamicFee(tx) => tx.value,
        }
    }

    /// Call data or init code.
    pub const fn input(&self) -> &Bytes {
        match self {
            Self::Legacy(tx) => &tx.input,
            Self::AccessList(tx) => &tx.input,
            Self::DynamicFee(tx) => &tx.input,
        }
    }

    /// Gas limit.
    pub const fn gas_limit(&self) -> u64 {
        match self {
            Self::Legacy(tx) => tx.gas_limit,
            Self::AccessList(tx) => tx.gas_limit,
            Self::DynamicFee(tx) => tx.gas_limit,
        }
    }

    /// Access list. Legacy transactions have none.
    pub const fn access_list(&self) -> Option<&AccessList> {
        match self {
            Self::Legacy(_) => None,
            Self::AccessList(tx) => Some(&tx.access_list),
            Self::DynamicFee(tx) => Some(&tx.access_list),
        }
    }

    /// Gas price. The fee cap for dynamic fee transactions.
    pub const fn gas_price(&self) -> U256 {
        match self {
            Self::Legacy(tx) => tx.gas_price,
            Self::AccessList(tx) => tx.gas_price,
            Self::DynamicFee(tx) => tx.gas_fee_cap,
        }
    }

    /// Fee cap. The gas price for flat-fee transactions.
    pub const fn gas_fee_cap(&self) -> U256 {
        self.gas_price()
    }

    /// Tip cap. The gas price for flat-fee transactions.
    pub const fn gas_tip_cap(&self) -> U256 {
        match self {
            Self::Legacy(tx) => tx.gas_price,
            Self::AccessList(tx) => tx.gas_price,
            Self::DynamicFee(tx) => tx.gas_tip_cap,
        }
    }

    /// `gas_limit * gas_price`, the most the transaction can pay for gas.
    ///
    /// Saturates; [`TxData::validate`] rejects transactions where this overflows.
    pub fn fee(&self) -> U256 {
        U256::from(self.gas_limit()).saturating_mul(self.gas_price())
    }

    /// `fee + value`, the balance the sender needs up front.
    pub fn cost(&self) -> U256 {
        self.fee().saturating_add(self.value())
    }

    /// Price per gas actually paid under `base_fee`.
    ///
    /// Flat-fee transactions always pay their gas price. Dynamic fee transactions pay
    /// `min(gas_fee_cap, base_fee + gas_tip_cap)`, or their fee cap without a base fee.
    pub fn effective_gas_price(&self, base_fee: Option<U256>) -> U256 {
        match self {
            Self::DynamicFee(tx) => tx.effective_gas_price(base_fee),
            _ => self.gas_price(),
        }
    }

    /// `gas_limit * effective_gas_price(base_fee)`.
    pub fn effective_fee(&self, base_fee: Option<U256>) -> U256 {
        U256::from(self.gas_limit()).saturating_mul(self.effective_gas_price(base_fee))
    }

    /// `effective_fee(base_fee) + value`.
    pub fn effective_cost(&self, base_fee: Option<U256>) -> U256 {
        self.effective_fee(base_fee).saturating_add(self.value())
    }

    /// Tip per gas the block proposer receives under `base_fee`. `None` when the
    /// transaction cannot pay the base fee.
    pub fn effective_tip(&self, base_fee: U256) -> Option<U256> {
        match self {
            Self::DynamicFee(tx) => tx.effective_tip(base_fee),
            _ => self.gas_price().checked_sub(base_fee),
        }
    }

    /// Hash the sender signs.
    pub fn signature_hash(&self) -> B256 {
        match self {
            Self::Legacy(tx) => tx.signature_hash(),
            Self::AccessList(tx) => tx.signature_hash(),
            Self::DynamicFee(tx) => tx.signature_hash(),
        }
    }

    /// Stateless sanity checks.
    pub fn validate(&self) -> Result<(), TxError> {
        if self.gas_limit() == 0 {
            return Err(TxError::GasLimitZero);
        }
        if let Self::DynamicFee(tx) = self {
            if tx.gas_tip_cap > tx.gas_fee_cap {
                return Err(TxError::PriorityFeeGreaterThanMaxFee);
            }
        }
        let fee = U256::from(self.gas_limit())
            .checked_mul(self.gas_price())
            .ok_or(TxError::FeeOverflow)?;
        fee.checked_add(self.value()).ok_or(TxError::CostOverflow)?;
        Ok(())
    }

    /// Rejects transactions signed for another chain. Unprotected legacy transactions
    /// are accepted on any chain.
    pub fn validate_chain_id(&self, expected: u64) -> Result<(), TxError> {
        match self.chain_id() {
            Some(got) if got != expected => Err(TxError::InvalidChainId { got, expected }),
            _ => Ok(()),
        }
    }
}
