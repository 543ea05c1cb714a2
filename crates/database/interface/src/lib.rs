//! Persistent store interface.
//!
//! The ledger view reads through a [`Store`] lazily and writes to it only on commit. How
//! the store batches and commits its own writes is outside this interface: the store's
//! transaction boundary is the authority for atomicity.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

use core::convert::Infallible;

use auto_impl::auto_impl;
use primitives::{address, Address, Bytes, StorageKey, StorageValue, B256};
use state::Account;

pub mod empty_store;

pub use empty_store::EmptyStore;

/// Address with all `0xff..ff` in it. Used for testing.
pub const FFADDRESS: Address = address!("0xffffffffffffffffffffffffffffffffffffffff");
/// Address with all `0xee..ee` in it. Used for testing.
pub const EEADDRESS: Address = address!("0xeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee");

/// Store error marker is needed to implement From conversion for Error type.
pub trait StoreErrorMarker: core::error::Error + Send + Sync + 'static {}

/// Implement marker for `Infallible`.
impl StoreErrorMarker for Infallible {}

/// Persistent account, code and storage store.
///
/// Reads never fail: a missing record reads as absent or as the zero value. Only the
/// account-level writes report errors, the way a keeper rejects an account it cannot
/// persist.
#[auto_impl(&mut, Box)]
pub trait Store {
    /// The store error type.
    type Error: StoreErrorMarker;

    /// Gets the account record at `address`.
    fn get_account(&self, address: Address) -> Option<Account>;

    /// Gets code by its hash.
    fn get_code(&self, code_hash: B256) -> Option<Bytes>;

    /// Gets a storage slot. Missing slots read as the zero hash.
    fn get_state(&self, address: Address, key: StorageKey) -> StorageValue;

    /// Visits every persisted slot of `address` in ascending key order until `f` returns
    /// `false`.
    fn for_each_storage(
        &self,
        address: Address,
        f: &mut dyn FnMut(StorageKey, StorageValue) -> bool,
    );

    /// Writes the account record.
    fn set_account(&mut self, address: Address, account: Account) -> Result<(), Self::Error>;

    /// Removes the account record together with all of its storage.
    ///
    /// Code is content addressed and may be shared, so it is left in place.
    fn delete_account(&mut self, address: Address) -> Result<(), Self::Error>;

    /// Writes code under its hash.
    fn set_code(&mut self, code_hash: B256, code: Bytes);

    /// Removes code stored under `code_hash`.
    fn delete_code(&mut self, code_hash: B256);

    /// Writes a storage slot.
    fn set_state(&mut self, address: Address, key: StorageKey, value: StorageValue);

    /// Removes a storage slot.
    fn delete_state(&mut self, address: Address, key: StorageKey);
}
