//! Store implementations: a plain in-memory store and the write-back overlay used for
//! cache contexts.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod in_memory_store;
mod overlay;

pub use database_interface::{self as interface, EmptyStore, Store, StoreErrorMarker};
pub use in_memory_store::InMemoryStore;
pub use overlay::{CacheStore, StoreOverlay};
