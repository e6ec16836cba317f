//! Batch journal — staged ledger mutations for atomic batches
//!
//! A disbursement loop records one entry per successful collaborator
//! transfer instead of writing counters directly. The journal is
//! applied to the live ledger only after every step of the batch
//! (transfers, refund, sweep) has succeeded; on any failure it is
//! simply dropped, so a failed batch leaves the ledger untouched.

use serde::{Deserialize, Serialize};
use types::prelude::*;

/// One intended ledger increment, keyed the way the ledger counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEntry {
    /// Native currency moved to one recipient.
    Native { amount: Amount },
    /// Fungible units of `token` moved to one recipient.
    Fungible { token: Address, amount: Amount },
    /// Semi-fungible units of `(token, id)` moved to one recipient.
    SemiFungible {
        token: Address,
        id: TokenId,
        amount: Amount,
    },
}

/// Ordered record of a batch's intended ledger increments.
#[derive(Debug, Clone, Default)]
pub struct BatchJournal {
    entries: Vec<LedgerEntry>,
}

impl BatchJournal {
    /// Create an empty journal.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Record one completed transfer.
    pub fn record(&mut self, entry: LedgerEntry) {
        self.entries.push(entry);
    }

    /// Entries in recording order.
    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    /// Number of recorded entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_journal_records_in_order() {
        let mut journal = BatchJournal::new();
        assert!(journal.is_empty());

        journal.record(LedgerEntry::Native { amount: 1 });
        journal.record(LedgerEntry::Fungible {
            token: Address::from_low_u64(9),
            amount: 2,
        });

        assert_eq!(journal.len(), 2);
        assert_eq!(journal.entries()[0], LedgerEntry::Native { amount: 1 });
    }

    #[test]
    fn test_journal_entry_serde() {
        let entry = LedgerEntry::SemiFungible {
            token: Address::from_low_u64(4),
            id: TokenId::new(7),
            amount: 30,
        };
        let json = serde_json::to_string(&entry).unwrap();
        let deserialized: LedgerEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(entry, deserialized);
    }
}
