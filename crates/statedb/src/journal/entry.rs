//! Journal entries and how each one is undone.
use crate::{cache_context::CacheSnapshot, LedgerState};
use primitives::{Address, Bytes, StorageKey, StorageValue, B256, U256};
use state::{ObjectStatus, StateObject};

/// One reversible mutation of the ledger view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JournalEntry {
    /// A fresh object was created where none was live.
    /// Action: Create object
    /// Revert: Remove object
    CreateObject {
        /// Address of the object.
        address: Address,
    },
    /// A live object was replaced by a fresh one.
    /// Action: Replace object
    /// Revert: Put the previous object back
    ResetObject {
        /// The replaced object.
        prev: Box<StateObject>,
    },
    /// Object was marked as created by a contract creation in this transaction.
    /// Action: Set new contract flag
    /// Revert: Clear new contract flag
    CreateContract {
        /// Address of the object.
        address: Address,
    },
    /// Object was marked self-destructed.
    /// Action: Set self-destructed flag
    /// Revert: Clear self-destructed flag
    SelfDestruct {
        /// Address of the object.
        address: Address,
    },
    /// Balance changed.
    /// Action: Set balance
    /// Revert: Restore previous balance
    Balance {
        /// Address of the object.
        address: Address,
        /// Balance before the change.
        prev: U256,
    },
    /// Nonce changed.
    /// Action: Set nonce
    /// Revert: Restore previous nonce
    Nonce {
        /// Address of the object.
        address: Address,
        /// Nonce before the change.
        prev: u64,
    },
    /// Code changed.
    /// Action: Set code and code hash, mark code dirty
    /// Revert: Restore code, hash and dirty flag
    Code {
        /// Address of the object.
        address: Address,
        /// Code before the change.
        prev_code: Option<Bytes>,
        /// Code hash before the change.
        prev_hash: B256,
        /// Whether the code was already dirty.
        prev_dirty: bool,
    },
    /// Storage slot changed.
    /// Action: Write dirty slot
    /// Revert: Restore previous dirty value, or drop the slot if it was clean
    Storage {
        /// Address of the object.
        address: Address,
        /// Slot key.
        key: StorageKey,
        /// Dirty value before the change, `None` if the slot was clean.
        prev: Option<StorageValue>,
    },
    /// Refund counter changed.
    /// Action: Add or subtract refund
    /// Revert: Restore previous counter
    Refund {
        /// Counter before the change.
        prev: u64,
    },
    /// Log appended.
    /// Action: Push log
    /// Revert: Pop log
    AddLog,
    /// Address added to the access list.
    /// Action: Insert address
    /// Revert: Remove address
    AccessListAccount {
        /// Added address.
        address: Address,
    },
    /// Slot added to the access list.
    /// Action: Insert slot
    /// Revert: Remove slot
    AccessListSlot {
        /// Address owning the slot.
        address: Address,
        /// Added slot.
        slot: StorageKey,
    },
    /// Transient storage changed (EIP-1153).
    /// Action: Write transient slot
    /// Revert: Restore previous value
    TransientStorage {
        /// Address owning the slot.
        address: Address,
        /// Slot key.
        key: StorageKey,
        /// Value before the change.
        prev: StorageValue,
    },
    /// A native precompile call was about to modify the cache context.
    /// Action: Snapshot cache context
    /// Revert: Restore cache context and events from the snapshot
    PrecompileCall {
        /// Cache context before the call.
        snapshot: Box<CacheSnapshot>,
    },
}

impl JournalEntry {
    /// Address whose object this entry modifies, if any. Such addresses are the ones
    /// that get committed.
    pub fn dirtied(&self) -> Option<Address> {
        match self {
            Self::CreateObject { address }
            | Self::CreateContract { address }
            | Self::SelfDestruct { address }
            | Self::Balance { address, .. }
            | Self::Nonce { address, .. }
            | Self::Code { address, .. }
            | Self::Storage { address, .. } => Some(*address),
            Self::ResetObject { prev } => Some(prev.address),
            Self::Refund { .. }
            | Self::AddLog
            | Self::AccessListAccount { .. }
            | Self::AccessListSlot { .. }
            | Self::TransientStorage { .. }
            | Self::PrecompileCall { .. } => None,
        }
    }

    /// Undoes the mutation.
    ///
    /// # Panics
    ///
    /// Panics if the object the entry refers to is not live. Entries are undone in
    /// reverse order, so the object always exists unless the journal was corrupted.
    pub fn undo(self, state: &mut LedgerState) {
        match self {
            Self::CreateObject { address } => {
                state.objects.remove(&address);
            }
            Self::ResetObject { prev } => {
                state.objects.insert(*prev);
            }
            Self::CreateContract { address } => {
                object(state, &address).status.remove(ObjectStatus::NewContract);
            }
            Self::SelfDestruct { address } => {
                object(state, &address)
                    .status
                    .remove(ObjectStatus::SelfDestructed);
            }
            Self::Balance { address, prev } => {
                object(state, &address).account.balance = prev;
            }
            Self::Nonce { address, prev } => {
                object(state, &address).account.nonce = prev;
            }
            Self::Code {
                address,
                prev_code,
                prev_hash,
                prev_dirty,
            } => {
                let object = object(state, &address);
                object.code = prev_code;
                object.account.code_hash = prev_hash;
                object.status.set(ObjectStatus::DirtyCode, prev_dirty);
            }
            Self::Storage { address, key, prev } => {
                let object = object(state, &address);
                match prev {
                    Some(value) => object.dirty_storage.insert(key, value),
                    None => object.dirty_storage.remove(&key),
                };
            }
            Self::Refund { prev } => {
                state.refund = prev;
            }
            Self::AddLog => {
                state.logs.pop();
            }
            Self::AccessListAccount { address } => {
                state.access_list.delete_address(&address);
            }
            Self::AccessListSlot { address, slot } => {
                state.access_list.delete_slot(&address, &slot);
            }
            Self::TransientStorage { address, key, prev } => {
                if prev.is_zero() {
                    state.transient_storage.remove(&(address, key));
                } else {
                    state.transient_storage.insert((address, key), prev);
                }
            }
            Self::PrecompileCall { snapshot } => {
                state.cache = Some(snapshot.restore());
            }
        }
    }
}

fn object<'a>(state: &'a mut LedgerState, address: &Address) -> &'a mut StateObject {
    match state.objects.get_mut(address) {
        Some(object) => object,
        None => panic!("journal entry refers to {address} which is not live"),
    }
}
