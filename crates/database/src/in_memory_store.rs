use core::convert::Infallible;
use database_interface::Store;
use primitives::{keccak256, Address, Bytes, HashMap, StorageKey, StorageValue, B256, U256};
use state::Account;
use std::collections::BTreeMap;

/// A [Store] implementation that keeps everything in memory.
///
/// Accounts and storage are kept in ordered maps so that iteration, and therefore
/// [`Store::for_each_storage`], is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InMemoryStore {
    /// Account records.
    pub accounts: BTreeMap<Address, Account>,
    /// Code by hash.
    pub contracts: HashMap<B256, Bytes>,
    /// Storage of every account. Zero values are never stored.
    pub storage: BTreeMap<Address, BTreeMap<StorageKey, StorageValue>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an account record, keeping its storage.
    pub fn insert_account(&mut self, address: Address, account: Account) {
        self.accounts.insert(address, account);
    }

    /// Inserts an externally owned account holding `balance`.
    pub fn insert_balance(&mut self, address: Address, balance: U256) {
        self.accounts
            .entry(address)
            .or_default()
            .balance = balance;
    }

    /// Inserts a contract account with `code` and returns its code hash.
    pub fn insert_contract(&mut self, address: Address, code: Bytes, balance: U256) -> B256 {
        let code_hash = keccak256(&code);
        self.contracts.insert(code_hash, code);
        self.accounts
            .insert(address, Account::new(balance, 1, code_hash));
        code_hash
    }

    /// Inserts a storage slot. A zero value removes the slot.
    pub fn insert_account_storage(&mut self, address: Address, key: StorageKey, value: StorageValue) {
        if value.is_zero() {
            self.delete_state(address, key);
        } else {
            self.storage.entry(address).or_default().insert(key, value);
        }
    }

    /// Replaces all storage of `address`.
    pub fn replace_account_storage(
        &mut self,
        address: Address,
        storage: impl IntoIterator<Item = (StorageKey, StorageValue)>,
    ) {
        let slots: BTreeMap<_, _> = storage.into_iter().filter(|(_, v)| !v.is_zero()).collect();
        if slots.is_empty() {
            self.storage.remove(&address);
        } else {
            self.storage.insert(address, slots);
        }
    }

    /// Number of persisted slots of `address`.
    pub fn storage_len(&self, address: &Address) -> usize {
        self.storage.get(address).map_or(0, BTreeMap::len)
    }
}

impl Store for InMemoryStore {
    type Error = Infallible;

    fn get_account(&self, address: Address) -> Option<Account> {
        self.accounts.get(&address).copied()
    }

    fn get_code(&self, code_hash: B256) -> Option<Bytes> {
        self.contracts.get(&code_hash).cloned()
    }

    fn get_state(&self, address: Address, key: StorageKey) -> StorageValue {
        self.storage
            .get(&address)
            .and_then(|slots| slots.get(&key))
            .copied()
            .unwrap_or_default()
    }

    fn for_each_storage(
        &self,
        address: Address,
        f: &mut dyn FnMut(StorageKey, StorageValue) -> bool,
    ) {
        let Some(slots) = self.storage.get(&address) else {
            return;
        };
        for (key, value) in slots {
            if !f(*key, *value) {
                break;
            }
        }
    }

    fn set_account(&mut self, address: Address, account: Account) -> Result<(), Self::Error> {
        self.accounts.insert(address, account);
        Ok(())
    }

    fn delete_account(&mut self, address: Address) -> Result<(), Self::Error> {
        self.accounts.remove(&address);
        self.storage.remove(&address);
        Ok(())
    }

    fn set_code(&mut self, code_hash: B256, code: Bytes) {
        self.contracts.insert(code_hash, code);
    }

    fn delete_code(&mut self, code_hash: B256) {
        self.contracts.remove(&code_hash);
    }

    fn set_state(&mut self, address: Address, key: StorageKey, value: StorageValue) {
        self.insert_account_storage(address, key, value);
    }

    fn delete_state(&mut self, address: Address, key: StorageKey) {
        if let Some(slots) = self.storage.get_mut(&address) {
            slots.remove(&key);
            if slots.is_empty() {
                self.storage.remove(&address);
            }
        }
    }
}
