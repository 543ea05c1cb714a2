//! Undo log of the ledger view.
mod entry;

pub use entry::JournalEntry;

use crate::LedgerState;
use primitives::{Address, HashMap};

/// Identifier of a point in the journal returned by `snapshot`.
///
/// Ids increase strictly for the lifetime of a ledger view and are never reused.
pub type RevisionId = usize;

/// A snapshot marker: the journal length at the time the snapshot was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Revision {
    /// Id handed out to the caller.
    pub id: RevisionId,
    /// Journal length when the snapshot was taken.
    pub journal_index: usize,
}

/// Ordered list of journal entries plus a multiset of the addresses they modify.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Journal {
    entries: Vec<JournalEntry>,
    /// Number of entries touching each address.
    dirties: HashMap<Address, usize>,
}

impl Journal {
    /// Creates an empty journal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry and counts the address it dirties.
    pub fn append(&mut self, entry: JournalEntry) {
        if let Some(address) = entry.dirtied() {
            *self.dirties.entry(address).or_default() += 1;
        }
        self.entries.push(entry);
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing was journaled.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in append order.
    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    /// Returns `true` if at least one entry touches `address`.
    pub fn is_dirty(&self, address: &Address) -> bool {
        self.dirties.contains_key(address)
    }

    /// Dirty addresses in ascending order.
    pub fn sorted_dirties(&self) -> Vec<Address> {
        let mut dirties: Vec<_> = self.dirties.keys().copied().collect();
        dirties.sort_unstable();
        dirties
    }

    /// Undoes every entry at or after `index`, newest first.
    ///
    /// An address leaves the dirty set only once all entries touching it are undone.
    pub fn revert(&mut self, state: &mut LedgerState, index: usize) {
        for entry in self.entries.drain(index..).rev() {
            if let Some(address) = entry.dirtied() {
                if let Some(count) = self.dirties.get_mut(&address) {
                    *count -= 1;
                    if *count == 0 {
                        self.dirties.remove(&address);
                    }
                }
            }
            entry.undo(state);
        }
    }

    /// Forgets every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.dirties.clear();
    }
}
