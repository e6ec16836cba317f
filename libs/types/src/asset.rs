//! Amounts, token ids, and asset references
//!
//! Amounts are unsigned integral units — the smallest denomination of the
//! asset in question. All arithmetic on them is checked at the point of
//! use; overflow is surfaced as an error, never wrapped.

use crate::address::Address;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An asset amount in its smallest indivisible unit.
pub type Amount = u128;

/// Identifier of one asset class within a semi-fungible contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenId(u128);

impl TokenId {
    /// Create from a raw id.
    pub const fn new(id: u128) -> Self {
        Self(id)
    }

    /// Get the raw id.
    pub const fn value(&self) -> u128 {
        self.0
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u128> for TokenId {
    fn from(id: u128) -> Self {
        Self(id)
    }
}

/// Which external collaborator a transfer goes through, and therefore
/// which transfer discipline applies (push vs. pull, single vs. multi-id).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetRef {
    /// The ledger's built-in unit of value, moved without an asset contract.
    Native,
    /// Interchangeable-unit balances moved via authorize-then-pull transfer.
    Fungible(Address),
    /// Per-id balances supporting single-id and batched multi-id transfers.
    SemiFungible(Address),
}

impl AssetRef {
    /// The collaborator contract address, if the asset has one.
    pub fn contract(&self) -> Option<&Address> {
        match self {
            AssetRef::Native => None,
            AssetRef::Fungible(addr) | AssetRef::SemiFungible(addr) => Some(addr),
        }
    }
}

impl fmt::Display for AssetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetRef::Native => write!(f, "native"),
            AssetRef::Fungible(addr) => write!(f, "fungible:{}", addr),
            AssetRef::SemiFungible(addr) => write!(f, "semi-fungible:{}", addr),
        }
    }
}
