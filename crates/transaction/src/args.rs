use crate::{AccessList, AccessListTx, DynamicFeeTx, LegacyTx, TxData, TxError};
use primitives::{Address, Bytes, U256};

/// Loose transaction arguments, as received from a wallet or an `eth_call` request.
///
/// The fee shape is picked from the fields that are present: a fee cap or tip cap makes
/// a dynamic fee transaction, an access list with a gas price an access list
/// transaction, anything else a legacy transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct TxArgs {
    /// Chain id. Required for typed transactions.
    pub chain_id: Option<u64>,
    /// Sender nonce.
    pub nonce: u64,
    /// Recipient, `None` for contract creation.
    pub to: Option<Address>,
    /// Transferred value.
    pub value: U256,
    /// Gas limit.
    #[cfg_attr(feature = "serde", serde(rename = "gas"))]
    pub gas_limit: u64,
    /// Call data or init code.
    pub input: Bytes,
    /// Access list.
    pub access_list: Option<AccessList>,
    /// Flat gas price.
    pub gas_price: Option<U256>,
    /// EIP-1559 fee cap.
    pub max_fee_per_gas: Option<U256>,
    /// EIP-1559 tip cap.
    pub max_priority_fee_per_gas: Option<U256>,
}

impl TxArgs {
    /// Builds the payload, rejecting a gas price mixed with dynamic fee fields.
    pub fn into_tx_data(self) -> Result<TxData, TxError> {
        let dynamic = self.max_fee_per_gas.is_some() || self.max_priority_fee_per_gas.is_some();
        if self.gas_price.is_some() && dynamic {
            return Err(TxError::MixedFeeFields);
        }

        if dynamic {
            let gas_fee_cap = self.max_fee_per_gas.ok_or(TxError::MissingFeeCap)?;
            return Ok(DynamicFeeTx {
                chain_id: self.chain_id.ok_or(TxError::MissingChainId)?,
                nonce: self.nonce,
                gas_tip_cap: self.max_priority_fee_per_gas.unwrap_or_default(),
                gas_fee_cap,
                gas_limit: self.gas_limit,
                to: self.to,
                value: self.value,
                input: self.input,
                access_list: self.access_list.unwrap_or_default(),
            }
            .into());
        }

        let gas_price = self.gas_price.unwrap_or_default();
        match self.access_list {
            Some(access_list) => Ok(AccessListTx {
                chain_id: self.chain_id.ok_or(TxError::MissingChainId)?,
                nonce: self.nonce,
                gas_price,
                gas_limit: self.gas_limit,
                to: self.to,
                value: self.value,
                input: self.input,
                access_list,
            }
            .into()),
            None => Ok(LegacyTx {
                chain_id: self.chain_id,
                nonce: self.nonce,
                gas_price,
                gas_limit: self.gas_limit,
                to: self.to,
                value: self.value,
                input: self.input,
            }
            .into()),
        }
    }
}
