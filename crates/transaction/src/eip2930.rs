use crate::{AccessList, TxType};
use alloy_rlp::{BufMut, Decodable, Encodable, Header};
use primitives::{keccak256, Address, Bytes, TxKind, B256, U256};

/// EIP-2930 transaction: flat gas price plus an access list.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct AccessListTx {
    /// Chain id, always part of the payload.
    pub chain_id: u64,
    /// Sender nonce.
    pub nonce: u64,
    /// Price per unit of gas.
    pub gas_price: U256,
    /// Maximum gas the transaction may consume.
    pub gas_limit: u64,
    /// Recipient, `None` for contract creation.
    pub to: Option<Address>,
    /// Transferred value.
    pub value: U256,
    /// Call data or init code.
    pub input: Bytes,
    /// Pre-declared accounts and slots.
    pub access_list: AccessList,
}

impl AccessListTx {
    pub(crate) fn fields_len(&self) -> usize {
        self.chain_id.length()
            + self.nonce.length()
            + self.gas_price.length()
            + self.gas_limit.length()
            + TxKind::from(self.to).length()
            + self.value.length()
            + self.input.length()
            + self.access_list.length()
    }

    pub(crate) fn encode_fields(&self, out: &mut dyn BufMut) {
        self.chain_id.encode(out);
        self.nonce.encode(out);
        self.gas_price.encode(out);
        self.gas_limit.encode(out);
        TxKind::from(self.to).encode(out);
        self.value.encode(out);
        self.input.encode(out);
        self.access_list.encode(out);
    }

    pub(crate) fn decode_fields(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        Ok(Self {
            chain_id: Decodable::decode(buf)?,
            nonce: Decodable::decode(buf)?,
            gas_price: Decodable::decode(buf)?,
            gas_limit: Decodable::decode(buf)?,
            to: TxKind::decode(buf)?.to().copied(),
            value: Decodable::decode(buf)?,
            input: Decodable::decode(buf)?,
            access_list: Decodable::decode(buf)?,
        })
    }

    /// Hash the sender signs: `keccak256(0x01 || rlp(fields))`.
    pub fn signature_hash(&self) -> B256 {
        let payload_length = self.fields_len();
        let mut out = Vec::with_capacity(payload_length + 5);
        out.put_u8(TxType::Eip2930 as u8);
        Header {
            list: true,
            payload_length,
        }
        .encode(&mut out);
        self.encode_fields(&mut out);
        keccak256(&out)
    }
}
