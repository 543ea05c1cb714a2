use crate::{
    error::SigningError, AccessListTx, DecodeError, DynamicFeeTx, LegacyTx, RecoveryError,
    TxData, TxType,
};
use alloy_primitives::Signature;
use alloy_rlp::{BufMut, Decodable, Encodable, Header};
use k256::ecdsa::SigningKey;
use primitives::{keccak256, Address, B256, SECP256K1N_HALF, U256};

/// A transaction payload with its signature and cached hash.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedTransaction {
    tx: TxData,
    signature: Signature,
    hash: B256,
}

impl SignedTransaction {
    /// Pairs a payload with its signature.
    pub fn new(tx: TxData, signature: Signature) -> Self {
        let mut signed = Self {
            tx,
            signature,
            hash: B256::ZERO,
        };
        signed.hash = keccak256(signed.encoded_2718());
        signed
    }

    /// Signs `tx` with `key`.
    pub fn sign(tx: TxData, key: &SigningKey) -> Result<Self, RecoveryError> {
        let prehash = tx.signature_hash();
        let (signature, recovery_id) = key
            .sign_prehash_recoverable(prehash.as_slice())
            .map_err(|err| RecoveryError::Signing(SigningError(err)))?;
        let bytes = signature.to_bytes();
        let signature = Signature::new(
            U256::from_be_slice(&bytes[..32]),
            U256::from_be_slice(&bytes[32..]),
            recovery_id.is_y_odd(),
        );
        Ok(Self::new(tx, signature))
    }

    /// Address controlled by `key`.
    pub fn address_of(key: &SigningKey) -> Address {
        Address::from_private_key(key)
    }

    /// Unsigned payload.
    pub const fn tx(&self) -> &TxData {
        &self.tx
    }

    /// Signature.
    pub const fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Transaction hash: keccak256 of the EIP-2718 encoding.
    pub const fn hash(&self) -> B256 {
        self.hash
    }

    /// Splits into payload and signature.
    pub fn into_parts(self) -> (TxData, Signature) {
        (self.tx, self.signature)
    }

    /// Legacy `v`: `27 + parity`, or `35 + 2 * chain_id + parity` when a chain id is set.
    ///
    /// A zero chain id keeps the `35 + parity` form it was decoded from, although its
    /// signature hash is the unprotected one.
    fn legacy_v(&self, tx: &LegacyTx) -> u64 {
        let parity = self.signature.v() as u64;
        match tx.chain_id {
            Some(id) => id.saturating_mul(2).saturating_add(35 + parity),
            None => 27 + parity,
        }
    }

    fn signature_len(&self) -> usize {
        self.signature.r().length() + self.signature.s().length()
    }

    fn encode_signature(&self, out: &mut dyn BufMut) {
        self.signature.r().encode(out);
        self.signature.s().encode(out);
    }

    /// Appends the EIP-2718 encoding: a bare RLP list for legacy transactions,
    /// `type || rlp(fields ++ signature)` otherwise.
    pub fn encode_2718(&self, out: &mut dyn BufMut) {
        match &self.tx {
            TxData::Legacy(tx) => {
                let v = self.legacy_v(tx);
                Header {
                    list: true,
                    payload_length: tx.fields_len() + v.length() + self.signature_len(),
                }
                .encode(out);
                tx.encode_fields(out);
                v.encode(out);
            }
            TxData::AccessList(tx) => {
                out.put_u8(TxType::Eip2930 as u8);
                Header {
                    list: true,
                    payload_length: tx.fields_len() + 1 + self.signature_len(),
                }
                .encode(out);
                tx.encode_fields(out);
                self.signature.v().encode(out);
            }
            TxData::DynamicFee(tx) => {
                out.put_u8(TxType::Eip1559 as u8);
                Header {
                    list: true,
                    payload_length: tx.fields_len() + 1 + self.signature_len(),
                }
                .encode(out);
                tx.encode_fields(out);
                self.signature.v().encode(out);
            }
        }
        self.encode_signature(out);
    }

    /// EIP-2718 encoding as a byte vector.
    pub fn encoded_2718(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.encode_2718(&mut out);
        out
    }

    /// Decodes an EIP-2718 encoded transaction. The whole input must be consumed.
    pub fn decode_2718(bytes: &[u8]) -> Result<Self, DecodeError> {
        let first = *bytes.first().ok_or(DecodeError::Empty)?;
        let mut buf = bytes;
        let (tx, signature) = if first >= alloy_rlp::EMPTY_LIST_CODE {
            decode_legacy(&mut buf)?
        } else {
            let tx_type = TxType::try_from(first)?;
            buf = &buf[1..];
            match tx_type {
                TxType::Eip2930 => {
                    let (tx, signature) = decode_typed(&mut buf, AccessListTx::decode_fields)?;
                    (TxData::AccessList(tx), signature)
                }
                TxType::Eip1559 => {
                    let (tx, signature) = decode_typed(&mut buf, DynamicFeeTx::decode_fields)?;
                    (TxData::DynamicFee(tx), signature)
                }
                TxType::Legacy => return Err(DecodeError::UnsupportedType(first)),
            }
        };
        if !buf.is_empty() {
            return Err(DecodeError::TrailingBytes(buf.len()));
        }
        Ok(Self {
            tx,
            signature,
            hash: keccak256(bytes),
        })
    }

    /// Recovers the sender address.
    ///
    /// Signatures with a high `s` are rejected. A legacy transaction with a zero chain id
    /// is recovered as unprotected.
    pub fn recover_signer(&self) -> Result<Address, RecoveryError> {
        let (r, s) = (self.signature.r(), self.signature.s());
        if r.is_zero() || s.is_zero() {
            return Err(RecoveryError::ZeroRS);
        }
        if s > SECP256K1N_HALF {
            return Err(RecoveryError::HighS);
        }
        Ok(self
            .signature
            .recover_address_from_prehash(&self.tx.signature_hash())?)
    }
}

/// Checks that a list body consumed exactly the length its header announced.
fn check_consumed(header: &Header, started: usize, remaining: usize) -> alloy_rlp::Result<()> {
    let consumed = started - remaining;
    if consumed != header.payload_length {
        return Err(alloy_rlp::Error::ListLengthMismatch {
            expected: header.payload_length,
            got: consumed,
        });
    }
    Ok(())
}

fn decode_list_header(buf: &mut &[u8]) -> alloy_rlp::Result<Header> {
    let header = Header::decode(buf)?;
    if !header.list {
        return Err(alloy_rlp::Error::UnexpectedString);
    }
    if buf.len() < header.payload_length {
        return Err(alloy_rlp::Error::InputTooShort);
    }
    Ok(header)
}

fn decode_legacy(buf: &mut &[u8]) -> Result<(TxData, Signature), DecodeError> {
    let header = decode_list_header(buf)?;
    let started = buf.len();
    let mut tx = LegacyTx::decode_fields(buf)?;
    let v = u64::decode(buf)?;
    let r = U256::decode(buf)?;
    let s = U256::decode(buf)?;
    check_consumed(&header, started, buf.len())?;

    let (parity, chain_id) = match v {
        27 | 28 => (v == 28, None),
        v if v >= 35 => ((v - 35) % 2 == 1, Some((v - 35) / 2)),
        v => return Err(DecodeError::InvalidV(v)),
    };
    tx.chain_id = chain_id;
    Ok((TxData::Legacy(tx), Signature::new(r, s, parity)))
}

fn decode_typed<T>(
    buf: &mut &[u8],
    decode_fields: fn(&mut &[u8]) -> alloy_rlp::Result<T>,
) -> Result<(T, Signature), DecodeError> {
    let header = decode_list_header(buf)?;
    let started = buf.len();
    let tx = decode_fields(buf)?;
    let parity = bool::decode(buf)?;
    let r = U256::decode(buf)?;
    let s = U256::decode(buf)?;
    check_consumed(&header, started, buf.len())?;
    Ok((tx, Signature::new(r, s, parity)))
}
