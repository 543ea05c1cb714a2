use core::convert::Infallible;
use database_interface::Store;
use primitives::{Address, Bytes, StorageKey, StorageValue, B256};
use state::Account;
use std::collections::{BTreeMap, BTreeSet};

/// Pending writes layered over a [`Store`].
///
/// The overlay records every write instead of applying it. Reads through
/// [`StoreOverlay::with_base`] see the pending writes first and fall back to the base
/// store. [`StoreOverlay::write_to`] applies the writes in key order, so two overlays
/// holding the same writes produce identical store mutations.
///
/// Cloning an overlay is how a nested call takes a private snapshot that can be
/// restored if the call reverts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StoreOverlay {
    /// Account writes. `None` is a deletion.
    accounts: BTreeMap<Address, Option<Account>>,
    /// Code writes. `None` is a deletion.
    contracts: BTreeMap<B256, Option<Bytes>>,
    /// Slot writes. `None` is a deletion.
    storage: BTreeMap<(Address, StorageKey), Option<StorageValue>>,
    /// Accounts deleted through the overlay. Their base storage is hidden.
    cleared: BTreeSet<Address>,
}

impl StoreOverlay {
    /// Creates an empty overlay.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if nothing was written.
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
            && self.contracts.is_empty()
            && self.storage.is_empty()
            && self.cleared.is_empty()
    }

    /// Pairs the overlay with its base store.
    pub fn with_base<'a, S: Store>(&'a mut self, base: &'a S) -> CacheStore<'a, S> {
        CacheStore {
            overlay: self,
            base,
        }
    }

    /// Account at `address` as seen through the overlay.
    pub fn account<S: Store>(&self, base: &S, address: Address) -> Option<Account> {
        match self.accounts.get(&address) {
            Some(account) => *account,
            None => base.get_account(address),
        }
    }

    /// Code as seen through the overlay.
    pub fn code<S: Store>(&self, base: &S, code_hash: B256) -> Option<Bytes> {
        match self.contracts.get(&code_hash) {
            Some(code) => code.clone(),
            None => base.get_code(code_hash),
        }
    }

    /// Slot value as seen through the overlay.
    pub fn state<S: Store>(&self, base: &S, address: Address, key: StorageKey) -> StorageValue {
        match self.storage.get(&(address, key)) {
            Some(value) => value.unwrap_or_default(),
            None if self.cleared.contains(&address) => B256::ZERO,
            None => base.get_state(address, key),
        }
    }

    /// Visits the storage of `address` as seen through the overlay, in key order.
    pub fn for_each_storage<S: Store>(
        &self,
        base: &S,
        address: Address,
        f: &mut dyn FnMut(StorageKey, StorageValue) -> bool,
    ) {
        let mut merged = BTreeMap::new();
        if !self.cleared.contains(&address) {
            base.for_each_storage(address, &mut |key, value| {
                merged.insert(key, value);
                true
            });
        }
        for ((_, key), value) in self
            .storage
            .range((address, B256::ZERO)..=(address, B256::repeat_byte(0xff)))
        {
            match value {
                Some(value) => merged.insert(*key, *value),
                None => merged.remove(key),
            };
        }
        for (key, value) in merged {
            if value.is_zero() {
                continue;
            }
            if !f(key, value) {
                break;
            }
        }
    }

    fn set_account(&mut self, address: Address, account: Account) {
        self.accounts.insert(address, Some(account));
    }

    fn delete_account(&mut self, address: Address) {
        self.accounts.insert(address, None);
        let keys: Vec<_> = self
            .storage
            .range((address, B256::ZERO)..=(address, B256::repeat_byte(0xff)))
            .map(|(key, _)| *key)
            .collect();
        for key in keys {
            self.storage.remove(&key);
        }
        self.cleared.insert(address);
    }

    fn set_code(&mut self, code_hash: B256, code: Bytes) {
        self.contracts.insert(code_hash, Some(code));
    }

    fn delete_code(&mut self, code_hash: B256) {
        self.contracts.insert(code_hash, None);
    }

    fn set_state(&mut self, address: Address, key: StorageKey, value: StorageValue) {
        self.storage.insert((address, key), Some(value));
    }

    fn delete_state(&mut self, address: Address, key: StorageKey) {
        self.storage.insert((address, key), None);
    }

    /// Applies every pending write to `store`.
    ///
    /// Deletions of whole accounts go first so a re-created account starts from a clean
    /// record. Code, accounts and slots follow, each in ascending key order.
    pub fn write_to<S: Store>(self, store: &mut S) -> Result<(), S::Error> {
        for address in &self.cleared {
            store.delete_account(*address)?;
        }
        for (code_hash, code) in self.contracts {
            match code {
                Some(code) => store.set_code(code_hash, code),
                None => store.delete_code(code_hash),
            }
        }
        for (address, account) in self.accounts {
            if let Some(account) = account {
                store.set_account(address, account)?;
            }
        }
        for ((address, key), value) in self.storage {
            match value {
                Some(value) if !value.is_zero() => store.set_state(address, key, value),
                _ => store.delete_state(address, key),
            }
        }
        Ok(())
    }
}

/// A [`Store`] view that reads through a [`StoreOverlay`] into a base store and writes
/// only to the overlay.
///
/// Writes never fail; errors of the base store surface when the overlay is written back.
#[derive(Debug)]
pub struct CacheStore<'a, S> {
    overlay: &'a mut StoreOverlay,
    base: &'a S,
}

impl<S: Store> Store for CacheStore<'_, S> {
    type Error = Infallible;

    fn get_account(&self, address: Address) -> Option<Account> {
        self.overlay.account(self.base, address)
    }

    fn get_code(&self, code_hash: B256) -> Option<Bytes> {
        self.overlay.code(self.base, code_hash)
    }

    fn get_state(&self, address: Address, key: StorageKey) -> StorageValue {
        self.overlay.state(self.base, address, key)
    }

    fn for_each_storage(
        &self,
        address: Address,
        f: &mut dyn FnMut(StorageKey, StorageValue) -> bool,
    ) {
        self.overlay.for_each_storage(self.base, address, f)
    }

    fn set_account(&mut self, address: Address, account: Account) -> Result<(), Self::Error> {
        self.overlay.set_account(address, account);
        Ok(())
    }

    fn delete_account(&mut self, address: Address) -> Result<(), Self::Error> {
        self.overlay.delete_account(address);
        Ok(())
    }

    fn set_code(&mut self, code_hash: B256, code: Bytes) {
        self.overlay.set_code(code_hash, code)
    }

    fn delete_code(&mut self, code_hash: B256) {
        self.overlay.delete_code(code_hash)
    }

    fn set_state(&mut self, address: Address, key: StorageKey, value: StorageValue) {
        self.overlay.set_state(address, key, value)
    }

    fn delete_state(&mut self, address: Address, key: StorageKey) {
        self.overlay.delete_state(address, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemoryStore;
    use primitives::U256;

    fn slot(byte: u8) -> B256 {
        B256::with_last_byte(byte)
    }

    fn base() -> (InMemoryStore, Address) {
        let address = Address::with_last_byte(1);
        let mut store = InMemoryStore::new();
        store.insert_balance(address, U256::from(10));
        store.set_state(address, slot(1), slot(1));
        store.set_state(address, slot(2), slot(2));
        (store, address)
    }

    #[test]
    fn writes_stay_in_the_overlay() {
        let (store, address) = base();
        let mut overlay = StoreOverlay::new();
        {
            let mut cache = overlay.with_base(&store);
            cache
                .set_account(address, Account::from_balance(U256::from(20)))
                .unwrap();
            cache.set_state(address, slot(1), slot(9));
            cache.delete_state(address, slot(2));

            assert_eq!(cache.get_account(address).unwrap().balance, U256::from(20));
            assert_eq!(cache.get_state(address, slot(1)), slot(9));
            assert_eq!(cache.get_state(address, slot(2)), B256::ZERO);
        }
        assert_eq!(store.get_account(address).unwrap().balance, U256::from(10));
        assert_eq!(store.get_state(address, slot(1)), slot(1));
        assert!(!overlay.is_empty());
    }

    #[test]
    fn deleted_account_hides_base_storage() {
        let (store, address) = base();
        let mut overlay = StoreOverlay::new();
        let mut cache = overlay.with_base(&store);
        cache.delete_account(address).unwrap();
        cache.set_state(address, slot(3), slot(3));

        assert_eq!(cache.get_account(address), None);
        assert_eq!(cache.get_state(address, slot(1)), B256::ZERO);
        let mut seen = Vec::new();
        cache.for_each_storage(address, &mut |k, v| {
            seen.push((k, v));
            true
        });
        assert_eq!(seen, vec![(slot(3), slot(3))]);
    }

    #[test]
    fn merged_iteration_prefers_overlay() {
        let (store, address) = base();
        let mut overlay = StoreOverlay::new();
        let mut cache = overlay.with_base(&store);
        cache.set_state(address, slot(2), slot(7));
        cache.set_state(address, slot(3), slot(8));
        cache.delete_state(address, slot(1));

        let mut seen = Vec::new();
        cache.for_each_storage(address, &mut |k, v| {
            seen.push((k, v));
            true
        });
        assert_eq!(seen, vec![(slot(2), slot(7)), (slot(3), slot(8))]);
    }

    #[test]
    fn write_back_applies_everything() {
        let (mut store, address) = base();
        let other = Address::with_last_byte(2);
        let mut overlay = StoreOverlay::new();
        {
            let mut cache = overlay.with_base(&store);
            cache.delete_account(address).unwrap();
            cache
                .set_account(address, Account::from_balance(U256::from(5)))
                .unwrap();
            cache.set_state(address, slot(4), slot(4));
            cache
                .set_account(other, Account::from_balance(U256::from(6)))
                .unwrap();
            cache.set_code(slot(0xcc), Bytes::from_static(&[0x00]));
        }
        overlay.write_to(&mut store).unwrap();

        assert_eq!(store.get_account(address).unwrap().balance, U256::from(5));
        assert_eq!(store.get_state(address, slot(1)), B256::ZERO);
        assert_eq!(store.get_state(address, slot(4)), slot(4));
        assert_eq!(store.get_account(other).unwrap().balance, U256::from(6));
        assert!(store.get_code(slot(0xcc)).is_some());
    }

    #[test]
    fn snapshots_are_independent_clones() {
        let (store, address) = base();
        let mut overlay = StoreOverlay::new();
        overlay.with_base(&store).set_state(address, slot(1), slot(5));
        let snapshot = overlay.clone();

        overlay.with_base(&store).set_state(address, slot(1), slot(6));
        assert_eq!(snapshot.state(&store, address, slot(1)), slot(5));

        overlay = snapshot;
        assert_eq!(overlay.state(&store, address, slot(1)), slot(5));
    }
}
