//! Logs and the transaction context stamped into them.
use primitives::{Address, Bytes, B256};

/// Block and transaction coordinates of the transaction being executed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TxConfig {
    /// Hash of the enclosing block.
    pub block_hash: B256,
    /// Hash of the transaction.
    pub tx_hash: B256,
    /// Index of the transaction in the block.
    pub tx_index: u64,
    /// Number of logs emitted by earlier transactions of the block.
    pub log_index: u64,
}

impl TxConfig {
    /// Creates a context for the transaction at `tx_index` of `block_hash`.
    pub fn new(block_hash: B256, tx_hash: B256, tx_index: u64, log_index: u64) -> Self {
        Self {
            block_hash,
            tx_hash,
            tx_index,
            log_index,
        }
    }

    /// Context for calls that are not part of a block, such as `eth_call`.
    pub fn empty_with_hash(tx_hash: B256) -> Self {
        Self {
            tx_hash,
            ..Default::default()
        }
    }
}

/// A log emitted by a contract.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Log {
    /// Emitting contract.
    pub address: Address,
    /// Indexed topics.
    pub topics: Vec<B256>,
    /// Unindexed data.
    pub data: Bytes,
    /// Hash of the enclosing block.
    pub block_hash: B256,
    /// Hash of the emitting transaction.
    pub tx_hash: B256,
    /// Index of the emitting transaction in the block.
    pub tx_index: u64,
    /// Index of the log in the block.
    pub index: u64,
}

impl Log {
    /// Creates a log. Block coordinates are filled in by the ledger view.
    pub fn new(address: Address, topics: Vec<B256>, data: Bytes) -> Self {
        Self {
            address,
            topics,
            data,
            ..Default::default()
        }
    }
}
