use core::hash::{Hash, Hasher};
use primitives::{B256, KECCAK_EMPTY, U256};

/// Persistent account record: balance, nonce and code hash.
///
/// Balances are always 18-decimal amounts.
#[derive(Clone, Copy, Debug, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Account {
    /// Account balance.
    pub balance: U256,
    /// Account nonce.
    pub nonce: u64,
    /// Keccak-256 hash of the account code.
    pub code_hash: B256,
}

impl Default for Account {
    fn default() -> Self {
        Self {
            balance: U256::ZERO,
            nonce: 0,
            code_hash: KECCAK_EMPTY,
        }
    }
}

impl PartialEq for Account {
    fn eq(&self, other: &Self) -> bool {
        self.balance == other.balance
            && self.nonce == other.nonce
            && self.code_hash == other.code_hash
    }
}

impl Hash for Account {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.balance.hash(state);
        self.nonce.hash(state);
        self.code_hash.hash(state);
    }
}

impl Account {
    /// Creates a new account record.
    #[inline]
    pub const fn new(balance: U256, nonce: u64, code_hash: B256) -> Self {
        Self {
            balance,
            nonce,
            code_hash,
        }
    }

    /// Creates an account without code holding `balance`.
    #[inline]
    pub fn from_balance(balance: U256) -> Self {
        Self {
            balance,
            ..Default::default()
        }
    }

    /// Returns `true` if the account has code.
    ///
    /// A zero code hash is treated like the empty code hash; some stores use it for
    /// accounts that were never assigned code.
    #[inline]
    pub fn is_contract(&self) -> bool {
        !self.has_no_code_hash()
    }

    /// Returns `true` if the code hash is the empty hash or zero.
    #[inline]
    pub fn has_no_code_hash(&self) -> bool {
        self.code_hash == KECCAK_EMPTY || self.code_hash.is_zero()
    }

    /// Returns `true` if the account is empty as defined by EIP-161: zero balance,
    /// zero nonce and no code.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.balance.is_zero() && self.nonce == 0 && self.has_no_code_hash()
    }
}
