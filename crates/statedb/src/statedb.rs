//! The journaled ledger view.
use crate::{
    cache_context::CacheContext,
    journal::{Journal, JournalEntry, Revision, RevisionId},
    AccessList, Log, StateDbError, TxConfig,
};
use database::{Store, StoreOverlay};
use primitives::{keccak256, Address, Bytes, HashMap, SpecId, StorageKey, StorageValue, B256, U256};
use state::{Account, ObjectStatus, StateObject, StateObjects, Storage};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, trace};
use transaction::AccessList as TxAccessList;

/// Everything a journal entry may need to undo.
#[derive(Debug, Clone, Default)]
pub struct LedgerState {
    /// Live state objects.
    pub objects: StateObjects,
    /// Refund counter.
    pub refund: u64,
    /// Logs emitted in this transaction.
    pub logs: Vec<Log>,
    /// Warm addresses and slots.
    pub access_list: AccessList,
    /// EIP-1153 transient storage.
    pub transient_storage: HashMap<(Address, StorageKey), StorageValue>,
    /// Cache context shared with native calls, created on first use.
    pub cache: Option<CacheContext>,
}

/// Journaled in-memory view over a [`Store`] for one transaction.
///
/// Objects are loaded lazily and every mutation is journaled so it can be undone with
/// [`StateDB::revert_to_snapshot`]. Nothing reaches the store before [`StateDB::commit`].
///
/// Reads take `&mut self` because loading an object caches it in the view.
#[derive(Debug)]
pub struct StateDB<S> {
    pub(crate) store: S,
    pub(crate) state: LedgerState,
    pub(crate) journal: Journal,
    revisions: Vec<Revision>,
    next_revision_id: RevisionId,
    /// Addresses removed by `finalise`. They are deleted from the store on commit.
    pub(crate) evicted: BTreeSet<Address>,
    /// Addresses that survived `finalise` and still have to be committed.
    pending: BTreeSet<Address>,
    tx_config: TxConfig,
    pub(crate) precompile_calls: usize,
}

/// Store reads routed through the cache context when it exists.
struct Reader<'a, S> {
    base: &'a S,
    overlay: Option<&'a StoreOverlay>,
}

impl<'a, S: Store> Reader<'a, S> {
    fn new(base: &'a S, cache: &'a Option<CacheContext>) -> Self {
        Self {
            base,
            overlay: cache.as_ref().map(|cache| &cache.overlay),
        }
    }

    fn account(&self, address: Address) -> Option<Account> {
        match self.overlay {
            Some(overlay) => overlay.account(self.base, address),
            None => self.base.get_account(address),
        }
    }

    fn code(&self, code_hash: B256) -> Option<Bytes> {
        match self.overlay {
            Some(overlay) => overlay.code(self.base, code_hash),
            None => self.base.get_code(code_hash),
        }
    }

    fn state(&self, address: Address, key: StorageKey) -> StorageValue {
        match self.overlay {
            Some(overlay) => overlay.state(self.base, address, key),
            None => self.base.get_state(address, key),
        }
    }

    fn for_each_storage(&self, address: Address, f: &mut dyn FnMut(StorageKey, StorageValue) -> bool) {
        match self.overlay {
            Some(overlay) => overlay.for_each_storage(self.base, address, f),
            None => self.base.for_each_storage(address, f),
        }
    }

    fn fetch(&self, evicted: &BTreeSet<Address>, address: Address) -> Option<StateObject> {
        if evicted.contains(&address) {
            return None;
        }
        self.account(address)
            .map(|account| StateObject::new(address, account))
    }
}

impl<S: Store> StateDB<S> {
    /// Creates a view over `store` for the transaction described by `tx_config`.
    pub fn new(store: S, tx_config: TxConfig) -> Self {
        Self {
            store,
            state: LedgerState::default(),
            journal: Journal::new(),
            revisions: Vec::new(),
            next_revision_id: 0,
            evicted: BTreeSet::new(),
            pending: BTreeSet::new(),
            tx_config,
            precompile_calls: 0,
        }
    }

    /// Underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consumes the view and returns the store. Uncommitted changes are dropped.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Transaction context stamped into logs.
    pub fn tx_config(&self) -> &TxConfig {
        &self.tx_config
    }

    /// Replaces the transaction context.
    pub fn set_tx_config(&mut self, tx_config: TxConfig) {
        self.tx_config = tx_config;
    }

    /// The journal of this transaction.
    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    fn state_object(&mut self, address: Address) -> Option<&mut StateObject> {
        let reader = Reader::new(&self.store, &self.state.cache);
        let evicted = &self.evicted;
        self.state
            .objects
            .get_mut_or_fetch(address, |address| reader.fetch(evicted, address))
    }

    /// Live object at `address`. Only called right after it was loaded or created.
    fn live_object(&mut self, address: Address) -> &mut StateObject {
        self.state
            .objects
            .get_mut(&address)
            .expect("object is live after load or creation")
    }

    fn get_or_new_state_object(&mut self, address: Address) -> &mut StateObject {
        if self.state_object(address).is_none() {
            self.create_object(address);
        }
        self.live_object(address)
    }

    /// Replaces whatever lives at `address` with a fresh empty object and returns the
    /// previous account record.
    fn create_object(&mut self, address: Address) -> Option<Account> {
        // Load first so an existing account is journaled as a reset.
        let _ = self.state_object(address);
        let prev = self
            .state
            .objects
            .insert(StateObject::new(address, Account::default()));
        match prev {
            Some(prev) => {
                let account = prev.account;
                self.journal.append(JournalEntry::ResetObject {
                    prev: Box::new(prev),
                });
                Some(account)
            }
            None => {
                self.journal.append(JournalEntry::CreateObject { address });
                None
            }
        }
    }

    /// Returns `true` if an object exists at `address`, including self-destructed ones.
    pub fn exist(&mut self, address: Address) -> bool {
        self.state_object(address).is_some()
    }

    /// Returns `true` if no object exists at `address` or it is empty (EIP-161).
    pub fn empty(&mut self, address: Address) -> bool {
        self.state_object(address)
            .is_none_or(|object| object.is_empty())
    }

    /// Balance of `address`, zero if absent.
    pub fn get_balance(&mut self, address: Address) -> U256 {
        self.state_object(address)
            .map(|object| object.account.balance)
            .unwrap_or_default()
    }

    /// Nonce of `address`, zero if absent.
    pub fn get_nonce(&mut self, address: Address) -> u64 {
        self.state_object(address)
            .map(|object| object.account.nonce)
            .unwrap_or_default()
    }

    /// Code hash of `address`, the zero hash if absent.
    pub fn get_code_hash(&mut self, address: Address) -> B256 {
        self.state_object(address)
            .map(|object| object.code_hash())
            .unwrap_or_default()
    }

    /// Code of `address`, empty if absent or not a contract.
    pub fn get_code(&mut self, address: Address) -> Bytes {
        let reader = Reader::new(&self.store, &self.state.cache);
        let evicted = &self.evicted;
        let Some(object) = self
            .state
            .objects
            .get_mut_or_fetch(address, |address| reader.fetch(evicted, address))
        else {
            return Bytes::new();
        };
        if let Some(code) = &object.code {
            return code.clone();
        }
        if !object.account.is_contract() {
            return Bytes::new();
        }
        let code = reader.code(object.code_hash()).unwrap_or_default();
        object.code = Some(code.clone());
        code
    }

    /// Code size of `address`.
    pub fn get_code_size(&mut self, address: Address) -> usize {
        self.get_code(address).len()
    }

    /// Committed value of a slot, ignoring writes of this transaction.
    pub fn get_committed_state(&mut self, address: Address, key: StorageKey) -> StorageValue {
        let reader = Reader::new(&self.store, &self.state.cache);
        let evicted = &self.evicted;
        let Some(object) = self
            .state
            .objects
            .get_mut_or_fetch(address, |address| reader.fetch(evicted, address))
        else {
            return B256::ZERO;
        };
        if let Some(value) = object.origin_storage.get(&key) {
            return *value;
        }
        // Storage of an evicted account is deleted on commit.
        let value = if evicted.contains(&address) {
            B256::ZERO
        } else {
            reader.state(address, key)
        };
        object.origin_storage.insert(key, value);
        value
    }

    /// Current value of a slot.
    pub fn get_state(&mut self, address: Address, key: StorageKey) -> StorageValue {
        let dirty = match self.state_object(address) {
            Some(object) => object.dirty_storage.get(&key).copied(),
            None => return B256::ZERO,
        };
        match dirty {
            Some(value) => value,
            None => self.get_committed_state(address, key),
        }
    }

    /// Returns `true` if `address` was self-destructed in this transaction.
    pub fn has_self_destructed(&mut self, address: Address) -> bool {
        self.state_object(address)
            .is_some_and(|object| object.is_self_destructed())
    }

    /// Visits the storage of `address` in ascending key order until `f` returns `false`.
    ///
    /// Dirty slots shadow persisted ones. Zero values are treated as deleted.
    pub fn for_each_storage(&mut self, address: Address, mut f: impl FnMut(StorageKey, StorageValue) -> bool) {
        let Some(object) = self.state_object(address) else {
            return;
        };
        let dirty = object.dirty_storage.clone();

        let mut merged = BTreeMap::new();
        if !self.evicted.contains(&address) {
            let reader = Reader::new(&self.store, &self.state.cache);
            reader.for_each_storage(address, &mut |key, value| {
                merged.insert(key, value);
                true
            });
        }
        merged.extend(dirty);

        for (key, value) in merged {
            if value.is_zero() {
                continue;
            }
            if !f(key, value) {
                break;
            }
        }
    }

    /// Creates a fresh account at `address`.
    ///
    /// A previous object is replaced, but its balance carries over so value sent to an
    /// address before it is created is not lost.
    pub fn create_account(&mut self, address: Address) {
        if let Some(prev) = self.create_object(address) {
            self.live_object(address).account.balance = prev.balance;
        }
    }

    /// Marks the account at `address` as created by a contract creation in this
    /// transaction. Does nothing if no object exists.
    pub fn create_contract(&mut self, address: Address) {
        let Some(object) = self.state_object(address) else {
            return;
        };
        if object.is_new_contract() {
            return;
        }
        object.status.insert(ObjectStatus::NewContract);
        self.journal.append(JournalEntry::CreateContract { address });
    }

    /// Adds `amount` to the balance of `address` and returns the previous balance.
    ///
    /// A zero amount changes nothing and creates no object.
    ///
    /// # Panics
    ///
    /// Panics if the balance overflows.
    pub fn add_balance(&mut self, address: Address, amount: U256) -> U256 {
        if amount.is_zero() {
            return self.get_balance(address);
        }
        let prev = self.get_or_new_state_object(address).account.balance;
        let Some(balance) = prev.checked_add(amount) else {
            panic!("balance of {address} overflows: {prev} + {amount}");
        };
        self.set_balance(address, balance);
        prev
    }

    /// Subtracts `amount` from the balance of `address` and returns the previous balance.
    ///
    /// A zero amount changes nothing and creates no object.
    ///
    /// # Panics
    ///
    /// Panics if the balance is lower than `amount`. Callers check funds first.
    pub fn sub_balance(&mut self, address: Address, amount: U256) -> U256 {
        if amount.is_zero() {
            return self.get_balance(address);
        }
        let prev = self.get_or_new_state_object(address).account.balance;
        let Some(balance) = prev.checked_sub(amount) else {
            panic!("balance of {address} underflows: {prev} - {amount}");
        };
        self.set_balance(address, balance);
        prev
    }

    /// Sets the balance of `address`.
    pub fn set_balance(&mut self, address: Address, amount: U256) {
        let object = self.get_or_new_state_object(address);
        let prev = core::mem::replace(&mut object.account.balance, amount);
        self.journal
            .append(JournalEntry::Balance { address, prev });
    }

    /// Sets the nonce of `address`.
    pub fn set_nonce(&mut self, address: Address, nonce: u64) {
        let object = self.get_or_new_state_object(address);
        let prev = core::mem::replace(&mut object.account.nonce, nonce);
        self.journal.append(JournalEntry::Nonce { address, prev });
    }

    /// Sets the code of `address` and its hash.
    ///
    /// Setting empty code on an account that is not a contract does nothing.
    pub fn set_code(&mut self, address: Address, code: Bytes) {
        if code.is_empty()
            && !self
                .state_object(address)
                .is_some_and(|object| object.account.is_contract())
        {
            return;
        }
        let code_hash = keccak256(&code);
        let object = self.get_or_new_state_object(address);
        let prev_dirty = object.is_dirty_code();
        let entry = JournalEntry::Code {
            address,
            prev_code: object.code.replace(code),
            prev_hash: core::mem::replace(&mut object.account.code_hash, code_hash),
            prev_dirty,
        };
        object.status.insert(ObjectStatus::DirtyCode);
        self.journal.append(entry);
    }

    /// Writes a storage slot. Writing the current value does nothing.
    pub fn set_state(&mut self, address: Address, key: StorageKey, value: StorageValue) {
        self.get_or_new_state_object(address);
        if self.get_state(address, key) == value {
            return;
        }
        let prev = self.live_object(address).dirty_storage.insert(key, value);
        self.journal
            .append(JournalEntry::Storage { address, key, prev });
    }

    /// Replaces the whole storage of `address`. Persisted slots missing from `storage`
    /// read as zero afterwards and are deleted on commit.
    pub fn set_storage(&mut self, address: Address, storage: Storage) {
        self.get_or_new_state_object(address);
        let mut stale = Vec::new();
        self.for_each_storage(address, |key, _| {
            if !storage.contains_key(&key) {
                stale.push(key);
            }
            true
        });
        for key in stale {
            self.set_state(address, key, B256::ZERO);
        }
        let mut slots: Vec<_> = storage.into_iter().collect();
        slots.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        for (key, value) in slots {
            self.set_state(address, key, value);
        }
    }

    /// Marks `address` as self-destructed and zeroes its balance. Returns the balance
    /// before destruction.
    ///
    /// The object stays readable until commit.
    pub fn self_destruct(&mut self, address: Address) -> U256 {
        let Some(object) = self.state_object(address) else {
            return U256::ZERO;
        };
        let prev = object.account.balance;
        let destructed = object.is_self_destructed();
        if !prev.is_zero() {
            self.set_balance(address, U256::ZERO);
        }
        if !destructed {
            self.live_object(address)
                .status
                .insert(ObjectStatus::SelfDestructed);
            self.journal
                .append(JournalEntry::SelfDestruct { address });
        }
        prev
    }

    /// EIP-6780 self-destruct: only destroys accounts created in this transaction.
    ///
    /// Returns the balance and whether the account was destroyed. Otherwise the balance
    /// is left untouched.
    pub fn self_destruct_6780(&mut self, address: Address) -> (U256, bool) {
        let Some(object) = self.state_object(address) else {
            return (U256::ZERO, false);
        };
        let (new_contract, balance) = (object.is_new_contract(), object.account.balance);
        if new_contract {
            (self.self_destruct(address), true)
        } else {
            (balance, false)
        }
    }

    /// Takes a snapshot of the journal.
    pub fn snapshot(&mut self) -> RevisionId {
        let id = self.next_revision_id;
        self.next_revision_id += 1;
        self.revisions.push(Revision {
            id,
            journal_index: self.journal.len(),
        });
        id
    }

    /// Undoes every change made after snapshot `id` was taken. Later snapshots are
    /// discarded.
    ///
    /// # Panics
    ///
    /// Panics if `id` is unknown or was already discarded.
    pub fn revert_to_snapshot(&mut self, id: RevisionId) {
        let Ok(index) = self
            .revisions
            .binary_search_by_key(&id, |revision| revision.id)
        else {
            panic!("revision id {id} cannot be reverted");
        };
        let journal_index = self.revisions[index].journal_index;
        trace!(
            target: "statedb",
            id,
            entries = self.journal.len() - journal_index,
            "revert to snapshot"
        );
        self.journal.revert(&mut self.state, journal_index);
        self.revisions.truncate(index);
    }

    /// Adds gas to the refund counter.
    pub fn add_refund(&mut self, gas: u64) {
        self.journal.append(JournalEntry::Refund {
            prev: self.state.refund,
        });
        self.state.refund += gas;
    }

    /// Removes gas from the refund counter.
    ///
    /// # Panics
    ///
    /// Panics if `gas` exceeds the counter.
    pub fn sub_refund(&mut self, gas: u64) {
        let refund = self.state.refund;
        if gas > refund {
            panic!("refund counter below zero (gas: {gas} > refund: {refund})");
        }
        self.journal.append(JournalEntry::Refund { prev: refund });
        self.state.refund = refund - gas;
    }

    /// Current refund counter.
    pub fn get_refund(&self) -> u64 {
        self.state.refund
    }

    /// Appends a log, stamping it with the transaction context.
    pub fn add_log(&mut self, mut log: Log) {
        self.journal.append(JournalEntry::AddLog);
        log.block_hash = self.tx_config.block_hash;
        log.tx_hash = self.tx_config.tx_hash;
        log.tx_index = self.tx_config.tx_index;
        log.index = self.tx_config.log_index + self.state.logs.len() as u64;
        self.state.logs.push(log);
    }

    /// Logs emitted so far.
    pub fn logs(&self) -> &[Log] {
        &self.state.logs
    }

    /// Reads transient storage.
    pub fn get_transient_state(&self, address: Address, key: StorageKey) -> StorageValue {
        self.state
            .transient_storage
            .get(&(address, key))
            .copied()
            .unwrap_or_default()
    }

    /// Writes transient storage.
    pub fn set_transient_state(&mut self, address: Address, key: StorageKey, value: StorageValue) {
        let prev = self.get_transient_state(address, key);
        if prev == value {
            return;
        }
        self.journal
            .append(JournalEntry::TransientStorage { address, key, prev });
        if value.is_zero() {
            self.state.transient_storage.remove(&(address, key));
        } else {
            self.state.transient_storage.insert((address, key), value);
        }
    }

    /// Resets the access list and transient storage for a new transaction.
    ///
    /// From Berlin the sender, the destination, the precompiles and the transaction
    /// access list are warm. From Shanghai the coinbase is warm too (EIP-3651).
    pub fn prepare(
        &mut self,
        spec: SpecId,
        sender: Address,
        coinbase: Address,
        destination: Option<Address>,
        precompiles: &[Address],
        access_list: Option<&TxAccessList>,
    ) {
        let mut warm = AccessList::new();
        if spec.is_enabled_in(SpecId::BERLIN) {
            warm.add_address(sender);
            if let Some(destination) = destination {
                warm.add_address(destination);
            }
            for precompile in precompiles {
                warm.add_address(*precompile);
            }
            for item in access_list.into_iter().flat_map(|list| list.iter()) {
                warm.add_address(item.address);
                for key in &item.storage_keys {
                    warm.add_slot(item.address, *key);
                }
            }
            if spec.is_enabled_in(SpecId::SHANGHAI) {
                warm.add_address(coinbase);
            }
        }
        self.state.access_list = warm;
        self.state.transient_storage.clear();
    }

    /// Warms `address`.
    pub fn add_address_to_access_list(&mut self, address: Address) {
        if self.state.access_list.add_address(address) {
            self.journal
                .append(JournalEntry::AccessListAccount { address });
        }
    }

    /// Warms `slot` of `address`, warming the address too.
    pub fn add_slot_to_access_list(&mut self, address: Address, slot: StorageKey) {
        let (address_added, slot_added) = self.state.access_list.add_slot(address, slot);
        if address_added {
            self.journal
                .append(JournalEntry::AccessListAccount { address });
        }
        if slot_added {
            self.journal
                .append(JournalEntry::AccessListSlot { address, slot });
        }
    }

    /// Returns `true` if `address` is warm.
    pub fn address_in_access_list(&self, address: Address) -> bool {
        self.state.access_list.contains_address(&address)
    }

    /// Returns whether the address and the slot are warm.
    pub fn slot_in_access_list(&self, address: Address, slot: StorageKey) -> (bool, bool) {
        self.state.access_list.contains(&address, &slot)
    }

    /// Ends a transaction inside the view.
    ///
    /// Self-destructed objects, and empty ones when `delete_empty_objects` is set, are
    /// evicted. The journal and every snapshot are dropped.
    pub fn finalise(&mut self, delete_empty_objects: bool) {
        for address in self.journal.sorted_dirties() {
            let Some(object) = self.state.objects.get_mut(&address) else {
                continue;
            };
            if object.is_self_destructed() || (delete_empty_objects && object.is_empty()) {
                self.state.objects.remove(&address);
                self.pending.remove(&address);
                self.evicted.insert(address);
                trace!(target: "statedb", %address, "evicted on finalise");
            } else {
                object.status.remove(ObjectStatus::NewContract);
                self.pending.insert(address);
            }
        }
        self.journal.clear();
        self.revisions.clear();
    }

    pub(crate) fn touched_addresses(&self) -> BTreeSet<Address> {
        let mut addresses = self.pending.clone();
        addresses.extend(self.evicted.iter().copied());
        addresses.extend(self.journal.sorted_dirties());
        addresses
    }

    /// Writes every touched object to the store in ascending address order.
    ///
    /// Destroyed and evicted accounts are deleted. Other objects write dirty code, the
    /// account record and dirty slots, zero slots being deleted. When a cache context
    /// exists, objects are flushed into it and the overlay is written back instead.
    ///
    /// The view starts over empty afterwards; logs and the transaction context are kept.
    pub fn commit(&mut self) -> Result<(), StateDbError<S::Error>> {
        let addresses = self.touched_addresses();
        let cached = self.state.cache.is_some();
        match self.state.cache.take() {
            Some(mut cache) => {
                let mut target = cache.overlay.with_base(&self.store);
                write_objects(&mut target, &self.state.objects, &self.evicted, &addresses)
                    .unwrap_or_else(|(_, never)| match never {});
                cache
                    .overlay
                    .write_to(&mut self.store)
                    .map_err(StateDbError::WriteBack)?;
            }
            None => {
                write_objects(&mut self.store, &self.state.objects, &self.evicted, &addresses)
                    .map_err(|(address, source)| StateDbError::Commit { address, source })?;
            }
        }
        debug!(target: "statedb", accounts = addresses.len(), cached, "committed");

        self.state.objects.clear();
        self.state.refund = 0;
        self.state.access_list = AccessList::new();
        self.state.transient_storage.clear();
        self.journal.clear();
        self.revisions.clear();
        self.evicted.clear();
        self.pending.clear();
        self.precompile_calls = 0;
        Ok(())
    }
}

pub(crate) fn write_objects<T: Store>(
    target: &mut T,
    objects: &StateObjects,
    evicted: &BTreeSet<Address>,
    addresses: &BTreeSet<Address>,
) -> Result<(), (Address, T::Error)> {
    for &address in addresses {
        if evicted.contains(&address) {
            target
                .delete_account(address)
                .map_err(|err| (address, err))?;
        }
        let Some(object) = objects.get(&address) else {
            continue;
        };
        if object.is_self_destructed() {
            target
                .delete_account(address)
                .map_err(|err| (address, err))?;
            continue;
        }
        if object.is_dirty_code() {
            if let Some(code) = &object.code {
                if code.is_empty() {
                    target.delete_code(object.code_hash());
                } else {
                    target.set_code(object.code_hash(), code.clone());
                }
            }
        }
        target
            .set_account(address, object.account)
            .map_err(|err| (address, err))?;
        for (key, value) in object.sorted_dirty_storage() {
            if value.is_zero() {
                target.delete_state(address, key);
            } else {
                target.set_state(address, key, value);
            }
        }
    }
    Ok(())
}
