use crate::Account;
use bitflags::bitflags;
use primitives::{Address, Bytes, HashMap, StorageKey, StorageValue, B256};

/// Contract storage of one account.
pub type Storage = HashMap<StorageKey, StorageValue>;

bitflags! {
    /// Per-transaction flags of a [`StateObject`].
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct ObjectStatus: u8 {
        /// Account was destroyed. It stays readable until commit.
        const SelfDestructed = 0b0000_0001;
        /// Account was created by CREATE/CREATE2 in this transaction (EIP-6780).
        const NewContract = 0b0000_0010;
        /// Code was replaced and must be written on commit.
        const DirtyCode = 0b0000_0100;
    }
}

/// In-memory projection of one account for the duration of a transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StateObject {
    /// Address of the account.
    pub address: Address,
    /// Current account record.
    pub account: Account,
    /// Committed slot values read from the store.
    pub origin_storage: Storage,
    /// Slots written during this transaction. Last write wins.
    pub dirty_storage: Storage,
    /// Account code, present only once loaded or set.
    pub code: Option<Bytes>,
    /// Transaction flags.
    pub status: ObjectStatus,
}

impl StateObject {
    /// Wraps an account record loaded from the store or freshly created.
    pub fn new(address: Address, account: Account) -> Self {
        Self {
            address,
            account,
            ..Default::default()
        }
    }

    /// Returns `true` if the object was self-destructed.
    #[inline]
    pub fn is_self_destructed(&self) -> bool {
        self.status.contains(ObjectStatus::SelfDestructed)
    }

    /// Returns `true` if the object was created by a contract creation in this
    /// transaction.
    #[inline]
    pub fn is_new_contract(&self) -> bool {
        self.status.contains(ObjectStatus::NewContract)
    }

    /// Returns `true` if the code must be written on commit.
    #[inline]
    pub fn is_dirty_code(&self) -> bool {
        self.status.contains(ObjectStatus::DirtyCode)
    }

    /// Returns `true` if the account is empty as defined by EIP-161.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.account.is_empty()
    }

    /// Code hash of the account.
    #[inline]
    pub fn code_hash(&self) -> B256 {
        self.account.code_hash
    }

    /// Slot value as seen by this transaction, if it is already cached.
    ///
    /// Dirty values shadow committed ones.
    #[inline]
    pub fn cached_state(&self, key: &StorageKey) -> Option<StorageValue> {
        self.dirty_storage
            .get(key)
            .or_else(|| self.origin_storage.get(key))
            .copied()
    }

    /// Dirty slots sorted by key.
    pub fn sorted_dirty_storage(&self) -> Vec<(StorageKey, StorageValue)> {
        let mut slots: Vec<_> = self.dirty_storage.iter().map(|(k, v)| (*k, *v)).collect();
        slots.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use primitives::U256;

    #[test]
    fn dirty_storage_shadows_origin() {
        let mut object = StateObject::new(Address::with_last_byte(1), Account::default());
        let key = B256::with_last_byte(1);
        assert_eq!(object.cached_state(&key), None);

        object.origin_storage.insert(key, B256::with_last_byte(2));
        assert_eq!(object.cached_state(&key), Some(B256::with_last_byte(2)));

        object.dirty_storage.insert(key, B256::with_last_byte(3));
        assert_eq!(object.cached_state(&key), Some(B256::with_last_byte(3)));
    }

    #[test]
    fn status_flags() {
        let mut object = StateObject::new(Address::ZERO, Account::from_balance(U256::from(1)));
        assert!(!object.is_self_destructed());
        object.status.insert(ObjectStatus::SelfDestructed | ObjectStatus::NewContract);
        assert!(object.is_self_destructed());
        assert!(object.is_new_contract());
        assert!(!object.is_dirty_code());
        object.status.remove(ObjectStatus::SelfDestructed);
        assert!(!object.is_self_destructed());
    }

    #[test]
    fn dirty_storage_is_sorted() {
        let mut object = StateObject::default();
        for byte in [9u8, 3, 7] {
            object
                .dirty_storage
                .insert(B256::with_last_byte(byte), B256::with_last_byte(byte));
        }
        let keys: Vec<_> = object
            .sorted_dirty_storage()
            .into_iter()
            .map(|(k, _)| k[31])
            .collect();
        assert_eq!(keys, vec![3, 7, 9]);
    }
}
