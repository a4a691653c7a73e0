use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Deposit,
    Withdrawal,
}

/// One balance-affecting operation. Never changed once it is in a log.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LedgerEntry {
    pub sequence: u64,
    pub kind: EntryKind,
    pub amount: Decimal,
    /// Running balance once this entry is applied.
    pub balance_after: Decimal,
    pub timestamp: DateTime<Utc>,
}

impl LedgerEntry {
    /// Signed effect of the entry on the balance.
    pub fn delta(&self) -> Decimal {
        match self.kind {
            EntryKind::Deposit => self.amount,
            EntryKind::Withdrawal => -self.amount,
        }
    }
}

/// Append-only entry log of a single account.
///
/// The running balance lives next to the entries and is only updated by
/// [`EntryLog::append`], so the two always agree.
#[derive(Debug)]
pub struct EntryLog {
    opening_balance: Decimal,
    balance: Decimal,
    entries: Vec<LedgerEntry>,
}

impl EntryLog {
    pub fn new(opening_balance: Decimal) -> Self {
        Self {
            opening_balance,
            balance: opening_balance,
            entries: Vec::new(),
        }
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn next_sequence(&self) -> u64 {
        self.entries.len() as u64
    }

    /// Balance after applying `delta`, or `None` when it leaves the
    /// representable range.
    pub fn checked_balance(&self, delta: Decimal) -> Option<Decimal> {
        self.balance.checked_add(delta)
    }

    /// Entries carry their resulting balance, computed with
    /// [`EntryLog::checked_balance`], so appending cannot fail.
    pub fn append(&mut self, entry: LedgerEntry) {
        debug_assert_eq!(entry.sequence, self.next_sequence());
        debug_assert_eq!(self.checked_balance(entry.delta()), Some(entry.balance_after));
        self.balance = entry.balance_after;
        self.entries.push(entry);
    }

    pub fn snapshot(&self) -> History {
        History {
            opening_balance: self.opening_balance,
            closing_balance: self.balance,
            entries: self.entries.clone(),
        }
    }
}

/// Point-in-time copy of an account's entry log.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct History {
    opening_balance: Decimal,
    closing_balance: Decimal,
    entries: Vec<LedgerEntry>,
}

impl History {
    pub fn opening_balance(&self) -> Decimal {
        self.opening_balance
    }

    /// Balance at the moment the snapshot was taken.
    pub fn closing_balance(&self) -> Decimal {
        self.closing_balance
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LedgerEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all entries of one kind, `None` on overflow.
    pub fn total_of(&self, kind: EntryKind) -> Option<Decimal> {
        self.entries
            .iter()
            .filter(|entry| entry.kind == kind)
            .try_fold(Decimal::ZERO, |total, entry| total.checked_add(entry.amount))
    }

    /// Balance recomputed from the opening balance and every entry, in log
    /// order. Every intermediate value is a balance the account actually had,
    /// so this only fails on a corrupted log.
    pub fn replayed_balance(&self) -> Option<Decimal> {
        self.entries
            .iter()
            .try_fold(self.opening_balance, |balance, entry| {
                balance.checked_add(entry.delta())
            })
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a LedgerEntry;
    type IntoIter = std::slice::Iter<'a, LedgerEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::prelude::{FromPrimitive, Zero};

    use super::*;

    fn entry(log: &EntryLog, kind: EntryKind, amount: u32) -> LedgerEntry {
        let amount = Decimal::from_u32(amount).unwrap();
        let delta = match kind {
            EntryKind::Deposit => amount,
            EntryKind::Withdrawal => -amount,
        };
        LedgerEntry {
            sequence: log.next_sequence(),
            kind,
            amount,
            balance_after: log.checked_balance(delta).unwrap(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn append_keeps_balance_in_step() {
        let mut log = EntryLog::new(Decimal::from_u32(10).unwrap());
        assert!(log.is_empty());
        assert_eq!(log.balance(), Decimal::from_u32(10).unwrap());

        log.append(entry(&log, EntryKind::Deposit, 5));
        log.append(entry(&log, EntryKind::Withdrawal, 12));
        assert_eq!(log.len(), 2);
        assert_eq!(log.next_sequence(), 2);
        assert_eq!(log.balance(), Decimal::from_u32(3).unwrap());
    }

    #[test]
    fn checked_balance_at_the_limits() {
        let log = EntryLog::new(Decimal::MAX);
        assert_eq!(log.checked_balance(Decimal::ONE), None);
        assert_eq!(
            log.checked_balance(Decimal::NEGATIVE_ONE),
            Some(Decimal::MAX - Decimal::ONE)
        );
    }

    #[test]
    fn totals_over_the_range_do_not_panic() {
        let mut log = EntryLog::new(Decimal::ZERO);
        // deposit MAX twice with a withdrawal in between
        for kind in [EntryKind::Deposit, EntryKind::Withdrawal, EntryKind::Deposit] {
            let delta = match kind {
                EntryKind::Deposit => Decimal::MAX,
                EntryKind::Withdrawal => -Decimal::MAX,
            };
            let entry = LedgerEntry {
                sequence: log.next_sequence(),
                kind,
                amount: Decimal::MAX,
                balance_after: log.checked_balance(delta).unwrap(),
                timestamp: Utc::now(),
            };
            log.append(entry);
        }
        let history = log.snapshot();
        assert_eq!(history.total_of(EntryKind::Deposit), None);
        assert_eq!(history.replayed_balance(), Some(Decimal::MAX));
    }

    #[test]
    fn snapshot_is_detached_from_log() {
        let mut log = EntryLog::new(Decimal::zero());
        log.append(entry(&log, EntryKind::Deposit, 7));
        let history = log.snapshot();

        log.append(entry(&log, EntryKind::Withdrawal, 2));
        assert_eq!(history.len(), 1);
        assert_eq!(history.closing_balance(), Decimal::from_u32(7).unwrap());
        assert_eq!(log.snapshot().len(), 2);
    }

    #[test]
    fn history_totals() {
        let mut log = EntryLog::new(Decimal::from_u32(100).unwrap());
        log.append(entry(&log, EntryKind::Deposit, 50));
        log.append(entry(&log, EntryKind::Deposit, 25));
        log.append(entry(&log, EntryKind::Withdrawal, 30));
        let history = log.snapshot();

        assert_eq!(history.opening_balance(), Decimal::from_u32(100).unwrap());
        assert_eq!(history.total_of(EntryKind::Deposit), Decimal::from_u32(75));
        assert_eq!(history.total_of(EntryKind::Withdrawal), Decimal::from_u32(30));
        assert_eq!(history.replayed_balance(), Some(history.closing_balance()));
        assert_eq!(history.entries()[2].balance_after, Decimal::from_u32(145).unwrap());
        assert_eq!(
            (&history).into_iter().map(|e| e.sequence).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
    }
}
