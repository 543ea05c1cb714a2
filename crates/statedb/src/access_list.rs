//! EIP-2929 warm address and slot sets.
use primitives::{Address, HashMap, HashSet, StorageKey};

/// Addresses and slots accessed during a transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessList {
    addresses: HashMap<Address, HashSet<StorageKey>>,
}

impl AccessList {
    /// Creates an empty access list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `address` is warm.
    pub fn contains_address(&self, address: &Address) -> bool {
        self.addresses.contains_key(address)
    }

    /// Returns whether the address and the slot are warm.
    pub fn contains(&self, address: &Address, slot: &StorageKey) -> (bool, bool) {
        match self.addresses.get(address) {
            Some(slots) => (true, slots.contains(slot)),
            None => (false, false),
        }
    }

    /// Warms `address`. Returns `true` if it was cold.
    pub fn add_address(&mut self, address: Address) -> bool {
        if self.addresses.contains_key(&address) {
            return false;
        }
        self.addresses.insert(address, HashSet::default());
        true
    }

    /// Warms `slot` of `address`, warming the address too.
    ///
    /// Returns whether the address and the slot were newly added.
    pub fn add_slot(&mut self, address: Address, slot: StorageKey) -> (bool, bool) {
        let address_added = self.add_address(address);
        let slots = self.addresses.entry(address).or_default();
        (address_added, slots.insert(slot))
    }

    /// Removes `address`.
    ///
    /// # Panics
    ///
    /// Panics if the address still holds slots. Slots are journaled after their address,
    /// so they are always removed first.
    pub fn delete_address(&mut self, address: &Address) {
        if let Some(slots) = self.addresses.get(address) {
            assert!(
                slots.is_empty(),
                "access list address {address} removed while it still holds slots"
            );
        }
        self.addresses.remove(address);
    }

    /// Removes `slot` of `address`, keeping the address warm.
    pub fn delete_slot(&mut self, address: &Address, slot: &StorageKey) {
        if let Some(slots) = self.addresses.get_mut(address) {
            slots.remove(slot);
        }
    }

    /// Number of warm addresses.
    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    /// Returns `true` if nothing is warm.
    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }
}
