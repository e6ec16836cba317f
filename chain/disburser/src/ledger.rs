//! Accounting ledger — monotonic disbursement counters
//!
//! Counts everything the engine has ever disbursed on behalf of
//! callers, keyed by asset kind. Counters only grow: they are bumped
//! once per successfully completed transfer, by exactly the amount
//! transferred, and are never decremented, reset, or touched by
//! recovery (recovery moves the engine's own balance, which is
//! orthogonal to amounts disbursed for callers).

use crate::errors::EngineError;
use crate::journal::{BatchJournal, LedgerEntry};
use std::collections::HashMap;
use types::prelude::*;

/// Process-wide disbursement totals, owned by the engine and read-only
/// externally.
#[derive(Debug, Clone, Default)]
pub struct AccountingLedger {
    /// Total native currency disbursed.
    native: Amount,
    /// Total fungible units disbursed, per token contract.
    fungible: HashMap<Address, Amount>,
    /// Total semi-fungible units disbursed, per (token contract, id).
    semi_fungible: HashMap<(Address, TokenId), Amount>,
}

impl AccountingLedger {
    /// Create a ledger with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total native currency disbursed.
    pub fn total_native(&self) -> Amount {
        self.native
    }

    /// Total units of `token` disbursed.
    pub fn total_fungible(&self, token: &Address) -> Amount {
        self.fungible.get(token).copied().unwrap_or(0)
    }

    /// Total units of `(token, id)` disbursed.
    pub fn total_semi_fungible(&self, token: &Address, id: TokenId) -> Amount {
        self.semi_fungible.get(&(*token, id)).copied().unwrap_or(0)
    }

    /// Apply a completed batch's journal, all-or-nothing.
    ///
    /// New counter values are staged first so an overflow on any entry
    /// leaves every counter as it was.
    pub(crate) fn apply(&mut self, journal: &BatchJournal) -> Result<(), EngineError> {
        let mut native = self.native;
        let mut fungible: Vec<(Address, Amount)> = Vec::new();
        let mut semi: Vec<((Address, TokenId), Amount)> = Vec::new();

        for entry in journal.entries() {
            match entry {
                LedgerEntry::Native { amount } => {
                    native = native.checked_add(*amount).ok_or(EngineError::Overflow)?;
                }
                LedgerEntry::Fungible { token, amount } => {
                    let current = fungible
                        .iter()
                        .find(|(t, _)| t == token)
                        .map(|(_, v)| *v)
                        .unwrap_or_else(|| self.total_fungible(token));
                    let next = current.checked_add(*amount).ok_or(EngineError::Overflow)?;
                    match fungible.iter_mut().find(|(t, _)| t == token) {
                        Some(slot) => slot.1 = next,
                        None => fungible.push((*token, next)),
                    }
                }
                LedgerEntry::SemiFungible { token, id, amount } => {
                    let key = (*token, *id);
                    let current = semi
                        .iter()
                        .find(|(k, _)| *k == key)
                        .map(|(_, v)| *v)
                        .unwrap_or_else(|| self.total_semi_fungible(token, *id));
                    let next = current.checked_add(*amount).ok_or(EngineError::Overflow)?;
                    match semi.iter_mut().find(|(k, _)| *k == key) {
                        Some(slot) => slot.1 = next,
                        None => semi.push((key, next)),
                    }
                }
            }
        }

        self.native = native;
        for (token, value) in fungible {
            self.fungible.insert(token, value);
        }
        for (key, value) in semi {
            self.semi_fungible.insert(key, value);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u64) -> Address {
        Address::from_low_u64(n)
    }

    #[test]
    fn test_fresh_ledger_reads_zero() {
        let ledger = AccountingLedger::new();
        assert_eq!(ledger.total_native(), 0);
        assert_eq!(ledger.total_fungible(&addr(1)), 0);
        assert_eq!(ledger.total_semi_fungible(&addr(1), TokenId::new(1)), 0);
    }

    #[test]
    fn test_apply_accumulates_per_key() {
        let mut ledger = AccountingLedger::new();
        let token = addr(9);

        let mut journal = BatchJournal::new();
        journal.record(LedgerEntry::Native { amount: 5 });
        journal.record(LedgerEntry::Fungible { token, amount: 100 });
        journal.record(LedgerEntry::Fungible { token, amount: 200 });
        journal.record(LedgerEntry::SemiFungible {
            token,
            id: TokenId::new(1),
            amount: 30,
        });
        ledger.apply(&journal).unwrap();

        assert_eq!(ledger.total_native(), 5);
        assert_eq!(ledger.total_fungible(&token), 300);
        assert_eq!(ledger.total_semi_fungible(&token, TokenId::new(1)), 30);
        assert_eq!(ledger.total_semi_fungible(&token, TokenId::new(2)), 0);
    }

    #[test]
    fn test_apply_is_monotonic_across_batches() {
        let mut ledger = AccountingLedger::new();

        for _ in 0..3 {
            let mut journal = BatchJournal::new();
            journal.record(LedgerEntry::Native { amount: 10 });
            ledger.apply(&journal).unwrap();
        }
        assert_eq!(ledger.total_native(), 30);
    }

    #[test]
    fn test_apply_overflow_leaves_ledger_untouched() {
        let mut ledger = AccountingLedger::new();
        let token = addr(2);

        let mut seed = BatchJournal::new();
        seed.record(LedgerEntry::Fungible {
            token,
            amount: u128::MAX,
        });
        ledger.apply(&seed).unwrap();

        let mut journal = BatchJournal::new();
        journal.record(LedgerEntry::Native { amount: 7 });
        journal.record(LedgerEntry::Fungible { token, amount: 1 });
        assert_eq!(ledger.apply(&journal), Err(EngineError::Overflow));

        // Nothing from the failed journal landed, not even the native entry.
        assert_eq!(ledger.total_native(), 0);
        assert_eq!(ledger.total_fungible(&token), u128::MAX);
    }

    #[test]
    fn test_apply_overflow_within_one_journal() {
        let mut ledger = AccountingLedger::new();
        let mut journal = BatchJournal::new();
        journal.record(LedgerEntry::Native { amount: u128::MAX });
        journal.record(LedgerEntry::Native { amount: 1 });
        assert_eq!(ledger.apply(&journal), Err(EngineError::Overflow));
        assert_eq!(ledger.total_native(), 0);
    }
}
