#![allow(non_camel_case_types)]

pub use SpecId::*;

/// Hardforks relevant to transaction and gas rules, ordered by activation.
///
/// Only the forks that change a rule this crate family implements are listed; the
/// intermediate ones (DAO, Tangerine, Muir Glacier, ...) map onto their predecessor.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpecId {
    /// Frontier, base transaction rules.
    FRONTIER = 0,
    /// Homestead, contract creation surcharge.
    HOMESTEAD = 1,
    /// Spurious Dragon, EIP-155 replay protection and EIP-161 empty account removal.
    SPURIOUS_DRAGON = 2,
    /// Istanbul, cheaper non-zero calldata (EIP-2028).
    ISTANBUL = 3,
    /// Berlin, access lists (EIP-2929/2930).
    BERLIN = 4,
    /// London, base fee (EIP-1559) and reduced refunds (EIP-3529).
    LONDON = 5,
    /// Shanghai, init code metering (EIP-3860).
    SHANGHAI = 6,
    /// Cancun, transient storage (EIP-1153) and restricted selfdestruct (EIP-6780).
    CANCUN = 7,
    /// Prague.
    PRAGUE = 8,
    /// Latest known rules.
    #[default]
    LATEST = u8::MAX,
}

impl SpecId {
    /// Returns the `SpecId` for the given `u8`.
    #[inline]
    pub const fn try_from_u8(spec_id: u8) -> Option<Self> {
        Some(match spec_id {
            0 => FRONTIER,
            1 => HOMESTEAD,
            2 => SPURIOUS_DRAGON,
            3 => ISTANBUL,
            4 => BERLIN,
            5 => LONDON,
            6 => SHANGHAI,
            7 => CANCUN,
            8 => PRAGUE,
            u8::MAX => LATEST,
            _ => return None,
        })
    }

    /// Returns `true` if the given specification ID is enabled in this spec.
    #[inline]
    pub const fn is_enabled_in(self, other: Self) -> bool {
        self as u8 >= other as u8
    }
}

/// String identifiers for hardforks.
pub mod id {
    #![allow(missing_docs)]
    pub const FRONTIER: &str = "Frontier";
    pub const HOMESTEAD: &str = "Homestead";
    pub const SPURIOUS_DRAGON: &str = "Spurious";
    pub const ISTANBUL: &str = "Istanbul";
    pub const BERLIN: &str = "Berlin";
    pub const LONDON: &str = "London";
    pub const SHANGHAI: &str = "Shanghai";
    pub const CANCUN: &str = "Cancun";
    pub const PRAGUE: &str = "Prague";
    pub const LATEST: &str = "Latest";
}

impl From<&str> for SpecId {
    fn from(name: &str) -> Self {
        match name {
            id::FRONTIER => Self::FRONTIER,
            id::HOMESTEAD => Self::HOMESTEAD,
            id::SPURIOUS_DRAGON => Self::SPURIOUS_DRAGON,
            id::ISTANBUL => Self::ISTANBUL,
            id::BERLIN => Self::BERLIN,
            id::LONDON => Self::LONDON,
            id::SHANGHAI => Self::SHANGHAI,
            id::CANCUN => Self::CANCUN,
            id::PRAGUE => Self::PRAGUE,
            _ => Self::LATEST,
        }
    }
}

impl From<SpecId> for &'static str {
    fn from(spec_id: SpecId) -> Self {
        match spec_id {
            SpecId::FRONTIER => id::FRONTIER,
            SpecId::HOMESTEAD => id::HOMESTEAD,
            SpecId::SPURIOUS_DRAGON => id::SPURIOUS_DRAGON,
            SpecId::ISTANBUL => id::ISTANBUL,
            SpecId::BERLIN => id::BERLIN,
            SpecId::LONDON => id::LONDON,
            SpecId::SHANGHAI => id::SHANGHAI,
            SpecId::CANCUN => id::CANCUN,
            SpecId::PRAGUE => id::PRAGUE,
            SpecId::LATEST => id::LATEST,
        }
    }
}

impl core::fmt::Display for SpecId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(<&'static str>::from(*self))
    }
}
