//! Cache context shared with native precompile calls.
//!
//! A precompile that moves native state cannot see journaled objects directly. Before
//! such a call the ledger view flushes its dirty objects into a [`StoreOverlay`] and hands
//! the call a [`CacheStore`] over it. Every call is preceded by a journal entry holding a
//! clone of the overlay so a revert can roll the call back.
use crate::{StateDB, StateDbError};
use database::{CacheStore, Store, StoreOverlay};

/// Maximum number of native precompile calls per transaction.
pub const MAX_PRECOMPILE_CALLS: usize = 7;

/// An event emitted by a native call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Event {
    /// Event type, such as `transfer`.
    pub kind: String,
    /// Key/value attributes in emission order.
    pub attributes: Vec<(String, String)>,
}

impl Event {
    /// Creates an event without attributes.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            attributes: Vec::new(),
        }
    }

    /// Appends an attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }
}

/// Overlay and events of the running transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheContext {
    /// Pending store writes.
    pub overlay: StoreOverlay,
    /// Events emitted by native calls.
    pub events: Vec<Event>,
}

/// Copy of a [`CacheContext`] taken before a native call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheSnapshot {
    overlay: StoreOverlay,
    events: Vec<Event>,
}

impl CacheSnapshot {
    /// Creates a snapshot from its parts.
    pub fn new(overlay: StoreOverlay, events: Vec<Event>) -> Self {
        Self { overlay, events }
    }

    pub(crate) fn restore(self) -> CacheContext {
        CacheContext {
            overlay: self.overlay,
            events: self.events,
        }
    }
}

impl<S: Store> StateDB<S> {
    /// Returns a store view over the cache context, creating it on first use.
    ///
    /// Dirty objects are flushed into the overlay first so the caller sees every change
    /// journaled so far. The overlay as it was before the flush is journaled, so reverting
    /// past this call also drops whatever was flushed or written through the returned view.
    /// Unlike [`run_precompile`](Self::run_precompile) this does not count as a native call.
    pub fn cache_context(&mut self) -> CacheStore<'_, S> {
        let snapshot = self.cache_snapshot();
        self.journal.append(crate::JournalEntry::PrecompileCall { snapshot });
        self.flush_to_cache();
        let cache = self.state.cache.get_or_insert_with(CacheContext::default);
        cache.overlay.with_base(&self.store)
    }

    /// Returns `true` once a cache context exists.
    pub fn has_cache_context(&self) -> bool {
        self.state.cache.is_some()
    }

    /// Clones the current overlay. An empty overlay is returned before the cache context
    /// exists.
    pub fn multi_store_snapshot(&self) -> StoreOverlay {
        self.state
            .cache
            .as_ref()
            .map(|cache| cache.overlay.clone())
            .unwrap_or_default()
    }

    /// Events emitted by native calls so far.
    pub fn events(&self) -> &[Event] {
        self.state
            .cache
            .as_ref()
            .map(|cache| cache.events.as_slice())
            .unwrap_or_default()
    }

    /// Journals a native call so that reverting past it restores `snapshot` and `events`.
    ///
    /// Fails with [`StateDbError::PrecompileCallsExceeded`] once [`MAX_PRECOMPILE_CALLS`]
    /// calls were recorded in this transaction. Exceeding the cap is a hard error rather
    /// than an abort: the call is refused before anything is journaled, so the view stays
    /// consistent and the caller decides how to fail the transaction.
    pub fn add_precompile_fn(
        &mut self,
        snapshot: StoreOverlay,
        events: Vec<Event>,
    ) -> Result<(), StateDbError<S::Error>> {
        if self.precompile_calls >= MAX_PRECOMPILE_CALLS {
            return Err(StateDbError::PrecompileCallsExceeded {
                limit: MAX_PRECOMPILE_CALLS,
            });
        }
        self.precompile_calls += 1;
        self.journal.append(crate::JournalEntry::PrecompileCall {
            snapshot: Box::new(CacheSnapshot::new(snapshot, events)),
        });
        Ok(())
    }

    /// Runs a native call against the cache context.
    ///
    /// Takes the snapshot, journals the call and flushes dirty objects before handing
    /// the overlay and the event list to `call`.
    pub fn run_precompile<R>(
        &mut self,
        call: impl FnOnce(&mut CacheStore<'_, S>, &mut Vec<Event>) -> R,
    ) -> Result<R, StateDbError<S::Error>> {
        let snapshot = self.multi_store_snapshot();
        let events = self.events().to_vec();
        self.add_precompile_fn(snapshot, events)?;

        self.flush_to_cache();
        let cache = self.state.cache.get_or_insert_with(CacheContext::default);
        let mut store = cache.overlay.with_base(&self.store);
        Ok(call(&mut store, &mut cache.events))
    }

    fn cache_snapshot(&self) -> Box<CacheSnapshot> {
        Box::new(CacheSnapshot::new(
            self.multi_store_snapshot(),
            self.events().to_vec(),
        ))
    }

    fn flush_to_cache(&mut self) {
        let addresses = self.touched_addresses();
        let cache = self.state.cache.get_or_insert_with(CacheContext::default);
        let mut target = cache.overlay.with_base(&self.store);
        crate::statedb::write_objects(&mut target, &self.state.objects, &self.evicted, &addresses)
            .unwrap_or_else(|(_, never)| match never {});
    }
}
