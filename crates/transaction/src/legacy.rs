use alloy_rlp::{BufMut, Decodable, Encodable, Header};
use primitives::{keccak256, Address, Bytes, TxKind, B256, U256};

/// Legacy transaction with a flat gas price.
///
/// The chain id is not part of the payload; it is folded into the signature `v` value
/// when the transaction is EIP-155 protected.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct LegacyTx {
    /// Chain id for EIP-155 replay protection. `None` and `Some(0)` both mean
    /// unprotected.
    pub chain_id: Option<u64>,
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
}

impl LegacyTx {
    /// Chain id used for replay protection, treating zero as absent.
    #[inline]
    pub fn eip155_chain_id(&self) -> Option<u64> {
        self.chain_id.filter(|id| *id != 0)
    }

    pub(crate) fn fields_len(&self) -> usize {
        self.nonce.length()
            + self.gas_price.length()
            + self.gas_limit.length()
            + TxKind::from(self.to).length()
            + self.value.length()
            + self.input.length()
    }

    pub(crate) fn encode_fields(&self, out: &mut dyn BufMut) {
        self.nonce.encode(out);
        self.gas_price.encode(out);
        self.gas_limit.encode(out);
        TxKind::from(self.to).encode(out);
        self.value.encode(out);
        self.input.encode(out);
    }

    pub(crate) fn decode_fields(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        Ok(Self {
            chain_id: None,
            nonce: Decodable::decode(buf)?,
            gas_price: Decodable::decode(buf)?,
            gas_limit: Decodable::decode(buf)?,
            to: TxKind::decode(buf)?.to().copied(),
            value: Decodable::decode(buf)?,
            input: Decodable::decode(buf)?,
        })
    }

    /// Hash the sender signs: the six payload fields, plus `chain_id, 0, 0` when
    /// EIP-155 protected.
    pub fn signature_hash(&self) -> B256 {
        let eip155 = self.eip155_chain_id();
        let payload_length = self.fields_len() + eip155.map_or(0, |id| id.length() + 2);
        let mut out = Vec::with_capacity(payload_length + 4);
        Header {
            list: true,
            payload_length,
        }
        .encode(&mut out);
        self.encode_fields(&mut out);
        if let Some(id) = eip155 {
            id.encode(&mut out);
            0u8.encode(&mut out);
            0u8.encode(&mut out);
        }
        keccak256(&out)
    }
}
