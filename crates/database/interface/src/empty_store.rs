//! Empty store implementation.
use crate::Store;
use core::convert::Infallible;
use primitives::{Address, Bytes, StorageKey, StorageValue, B256};
use state::Account;

/// A store that holds nothing and discards every write.
///
/// Useful for simulating a transaction against a blank state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EmptyStore;

impl EmptyStore {
    /// Create a new empty store.
    pub const fn new() -> Self {
        Self
    }
}

impl Store for EmptyStore {
    type Error = Infallible;

    #[inline]
    fn get_account(&self, _address: Address) -> Option<Account> {
        None
    }

    #[inline]
    fn get_code(&self, _code_hash: B256) -> Option<Bytes> {
        None
    }

    #[inline]
    fn get_state(&self, _address: Address, _key: StorageKey) -> StorageValue {
        B256::ZERO
    }

    #[inline]
    fn for_each_storage(
        &self,
        _address: Address,
        _f: &mut dyn FnMut(StorageKey, StorageValue) -> bool,
    ) {
    }

    fn set_account(&mut self, _address: Address, _account: Account) -> Result<(), Self::Error> {
        Ok(())
    }

    fn delete_account(&mut self, _address: Address) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_code(&mut self, _code_hash: B256, _code: Bytes) {}

    fn delete_code(&mut self, _code_hash: B256) {}

    fn set_state(&mut self, _address: Address, _key: StorageKey, _value: StorageValue) {}

    fn delete_state(&mut self, _address: Address, _key: StorageKey) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use primitives::keccak256;

    #[test]
    fn reads_are_empty_after_writes() {
        let mut store = EmptyStore::new();
        let address = Address::with_last_byte(1);
        store.set_code(keccak256([1]), Bytes::from_static(&[1]));
        store.set_state(address, B256::ZERO, B256::with_last_byte(1));

        assert_eq!(store.get_code(keccak256([1])), None);
        assert_eq!(store.get_state(address, B256::ZERO), B256::ZERO);
        let mut visited = 0;
        store.for_each_storage(address, &mut |_, _| {
            visited += 1;
            true
        });
        assert_eq!(visited, 0);
    }
}
