use chrono::Utc;
use parking_lot::{Mutex, MutexGuard};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use crate::{
    command::{AccountCommand, CommandError, TransactionAction},
    entry_log::{EntryKind, EntryLog, History, LedgerEntry},
};

pub type AccountId = u64;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Open,
    Closed,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccountError {
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error("Insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        requested: Decimal,
        available: Decimal,
    },
    #[error("Account {id} is closed, no further operations are allowed")]
    AccountClosed { id: AccountId },
    #[error("Depositing {amount} would overflow the balance of account {id}")]
    BalanceOverflow { id: AccountId, amount: Decimal },
}

/// Mutable part of an account, only reachable through the account lock.
#[derive(Debug)]
pub struct AccountState {
    id: AccountId,
    log: EntryLog,
    status: AccountStatus,
}

impl AccountState {
    pub fn balance(&self) -> Decimal {
        self.log.balance()
    }

    pub fn status(&self) -> AccountStatus {
        self.status
    }

    pub fn apply(&mut self, entry: LedgerEntry) {
        self.log.append(entry);
    }

    /// Validates the command against the current state and produces the entry
    /// to apply. Does not modify anything.
    pub fn handle_command(&self, command: &AccountCommand) -> Result<LedgerEntry, AccountError> {
        if self.status == AccountStatus::Closed {
            return Err(AccountError::AccountClosed { id: self.id });
        }

        let (kind, balance_after) = match command.action {
            TransactionAction::Deposit => {
                let balance_after = self.log.checked_balance(command.amount).ok_or(
                    AccountError::BalanceOverflow {
                        id: self.id,
                        amount: command.amount,
                    },
                )?;
                (EntryKind::Deposit, balance_after)
            }
            TransactionAction::Withdraw => {
                if self.balance() < command.amount {
                    return Err(AccountError::InsufficientFunds {
                        requested: command.amount,
                        available: self.balance(),
                    });
                }
                // amount <= balance, so this stays within range
                (EntryKind::Withdrawal, self.balance() - command.amount)
            }
        };
        Ok(LedgerEntry {
            sequence: self.log.next_sequence(),
            kind,
            amount: command.amount,
            balance_after,
            timestamp: Utc::now(),
        })
    }

    pub(crate) fn close(&mut self) {
        self.status = AccountStatus::Closed;
    }
}

/// A bank account shared between the directory and every caller holding it.
#[derive(Debug)]
pub struct Account {
    id: AccountId,
    owner: String,
    state: Mutex<AccountState>,
}

/// Serializable view of an account at one instant.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AccountSummary {
    pub id: AccountId,
    pub owner: String,
    pub balance: Decimal,
    pub entries: usize,
    pub status: AccountStatus,
}

impl Account {
    pub(crate) fn open(id: AccountId, owner: String, opening_balance: Decimal) -> Self {
        Self {
            id,
            owner,
            state: Mutex::new(AccountState {
                id,
                log: EntryLog::new(opening_balance),
                status: AccountStatus::Open,
            }),
        }
    }

    pub fn id(&self) -> AccountId {
        self.id
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn deposit(&self, amount: Decimal) -> Result<(), AccountError> {
        self.execute(TransactionAction::Deposit, amount)
    }

    pub fn withdraw(&self, amount: Decimal) -> Result<(), AccountError> {
        self.execute(TransactionAction::Withdraw, amount)
    }

    pub fn current_balance(&self) -> Decimal {
        self.state.lock().balance()
    }

    pub fn history(&self) -> History {
        self.state.lock().log.snapshot()
    }

    pub fn status(&self) -> AccountStatus {
        self.state.lock().status
    }

    pub fn is_closed(&self) -> bool {
        self.status() == AccountStatus::Closed
    }

    pub fn summary(&self) -> AccountSummary {
        Self::summarize(self, &self.state.lock())
    }

    pub(crate) fn summarize(&self, state: &AccountState) -> AccountSummary {
        AccountSummary {
            id: self.id,
            owner: self.owner.clone(),
            balance: state.balance(),
            entries: state.log.len(),
            status: state.status,
        }
    }

    /// Holds the account lock. Callers taking several account locks must
    /// take them in ascending id order.
    pub(crate) fn lock(&self) -> MutexGuard<'_, AccountState> {
        self.state.lock()
    }

    fn execute(&self, action: TransactionAction, amount: Decimal) -> Result<(), AccountError> {
        let command = AccountCommand::parse_command(action, amount)?;
        let result = {
            let mut state = self.state.lock();
            state.handle_command(&command).map(|entry| {
                let sequence = entry.sequence;
                state.apply(entry);
                (sequence, state.balance())
            })
        };
        match result {
            Ok((sequence, balance)) => {
                tracing::debug!(account = self.id, ?action, %amount, sequence, %balance, "applied");
                Ok(())
            }
            Err(err) => {
                tracing::debug!(account = self.id, ?action, %amount, error = %err, "rejected");
                Err(err)
            }
        }
    }
}
