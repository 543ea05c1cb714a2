//! Account records and the in-memory state objects the ledger view works on.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod account;
mod object;
mod objects;

pub use account::Account;
pub use object::{ObjectStatus, StateObject, Storage};
pub use objects::{ObjectId, StateObjects};
pub use primitives;
