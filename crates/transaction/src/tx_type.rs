use crate::DecodeError;

/// Transaction envelope type (EIP-2718).
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TxType {
    /// Legacy transaction type.
    #[default]
    Legacy = 0,
    /// EIP-2930 Access List transaction type.
    Eip2930 = 1,
    /// EIP-1559 Fee market change transaction type.
    Eip1559 = 2,
}

impl From<TxType> for u8 {
    fn from(tx_type: TxType) -> u8 {
        tx_type as u8
    }
}

impl TryFrom<u8> for TxType {
    type Error = DecodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => Self::Legacy,
            1 => Self::Eip2930,
            2 => Self::Eip1559,
            _ => return Err(DecodeError::UnsupportedType(value)),
        })
    }
}
