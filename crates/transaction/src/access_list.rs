use alloy_rlp::{RlpDecodable, RlpDecodableWrapper, RlpEncodable, RlpEncodableWrapper};
use primitives::{Address, B256};

/// Address and the storage keys a transaction declares it will touch (EIP-2930).
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, RlpEncodable, RlpDecodable)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct AccessListItem {
    /// Account address that would be loaded at the start of execution.
    pub address: Address,
    /// Keys of storage that would be loaded at the start of execution.
    pub storage_keys: Vec<B256>,
}

/// List of [`AccessListItem`]s.
#[derive(
    Clone, Debug, Default, PartialEq, Eq, Hash, RlpEncodableWrapper, RlpDecodableWrapper,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct AccessList(pub Vec<AccessListItem>);

impl AccessList {
    /// Number of addresses.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no address is listed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total number of storage keys across all addresses.
    pub fn storage_key_count(&self) -> usize {
        self.0.iter().map(|item| item.storage_keys.len()).sum()
    }

    /// Iterates the items.
    pub fn iter(&self) -> impl Iterator<Item = &AccessListItem> {
        self.0.iter()
    }

    /// Iterates `(address, storage keys)` pairs.
    pub fn flattened(&self) -> impl Iterator<Item = (Address, &[B256])> {
        self.0
            .iter()
            .map(|item| (item.address, item.storage_keys.as_slice()))
    }
}

impl From<Vec<AccessListItem>> for AccessList {
    fn from(items: Vec<AccessListItem>) -> Self {
        Self(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_rlp::{Decodable, Encodable};

    #[test]
    fn counts_addresses_and_keys() {
        let list = AccessList(vec![
            AccessListItem {
                address: Address::with_last_byte(1),
                storage_keys: vec![B256::ZERO, B256::with_last_byte(1)],
            },
            AccessListItem {
                address: Address::with_last_byte(2),
                storage_keys: vec![],
            },
        ]);
        assert_eq!(list.len(), 2);
        assert_eq!(list.storage_key_count(), 2);

        let mut buf = Vec::new();
        list.encode(&mut buf);
        assert_eq!(AccessList::decode(&mut buf.as_slice()).unwrap(), list);
    }

    #[test]
    fn empty_list_is_an_empty_rlp_list() {
        let mut buf = Vec::new();
        AccessList::default().encode(&mut buf);
        assert_eq!(buf, vec![0xc0]);
    }
}
