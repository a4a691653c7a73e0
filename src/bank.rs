use std::sync::Arc;

use parking_lot::RwLock;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
    account::{Account, AccountError, AccountId, AccountSummary},
    command::{CommandError, OpenAccountCommand, TransferCommand},
    config::BankConfig,
    directory::{AccountDirectory, DirectoryError, in_memory_directory::InMemoryDirectory},
    entry_log::History,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BankError {
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error(transparent)]
    Account(#[from] AccountError),
    #[error(transparent)]
    Directory(#[from] DirectoryError),
    #[error("Total balance of open accounts exceeds the representable range")]
    TotalOverflow,
}

/// Coordinator owning the account directory.
///
/// Lock order is always the directory first, then account locks in ascending
/// id order. Single-account operations only take the account lock.
#[derive(Debug)]
pub struct Bank<D = InMemoryDirectory> {
    name: String,
    directory: RwLock<D>,
}

impl Bank {
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_config(BankConfig {
            name: name.into(),
            ..Default::default()
        })
    }

    pub fn from_config(config: BankConfig) -> Self {
        Self::with_directory(config.name, InMemoryDirectory::new(config.id_reuse))
    }
}

impl<D> Bank<D>
where
    D: AccountDirectory,
{
    pub fn with_directory(name: impl Into<String>, directory: D) -> Self {
        Self {
            name: name.into(),
            directory: RwLock::new(directory),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The returned account is the same instance the bank keeps, so changes
    /// made through either are visible to both.
    pub fn create_account(
        &self,
        id: AccountId,
        owner: impl Into<String>,
        initial_balance: Decimal,
    ) -> Result<Arc<Account>, BankError> {
        let command = OpenAccountCommand::parse_command(id, owner, initial_balance)?;
        let account = Arc::new(Account::open(
            command.id,
            command.owner,
            command.initial_balance,
        ));
        let inserted = self.directory.write().insert(account.clone());
        if let Err(err) = inserted {
            tracing::debug!(bank = %self.name, account = id, error = %err, "account not created");
            return Err(err.into());
        }
        tracing::info!(bank = %self.name, account = id, %initial_balance, "account created");
        Ok(account)
    }

    pub fn get_account(&self, id: AccountId) -> Result<Arc<Account>, BankError> {
        Ok(self.directory.read().get(id)?)
    }

    /// Closes the account and drops it from lookups. Holders of the account
    /// can still read it, but every mutation fails with
    /// [`AccountError::AccountClosed`].
    pub fn close_account(&self, id: AccountId) -> Result<(), BankError> {
        let closing_balance = {
            let mut directory = self.directory.write();
            let account = directory.remove(id)?;
            let mut state = account.lock();
            state.close();
            state.balance()
        };
        tracing::info!(bank = %self.name, account = id, %closing_balance, "account closed");
        Ok(())
    }

    /// Sum of the balances of all open accounts, taken while every one of
    /// them is locked. Each balance fits in a [`Decimal`] but their sum may
    /// not, which is reported as [`BankError::TotalOverflow`].
    pub fn total_balance(&self) -> Result<Decimal, BankError> {
        let total = {
            let directory = self.directory.read();
            let states: Vec<_> = directory.accounts().map(|account| account.lock()).collect();
            states
                .iter()
                .try_fold(Decimal::ZERO, |total, state| total.checked_add(state.balance()))
        };
        total.ok_or_else(|| {
            tracing::debug!(bank = %self.name, "total balance overflowed");
            BankError::TotalOverflow
        })
    }

    /// Summaries of all open accounts, ordered by id, from one consistent
    /// snapshot.
    pub fn accounts(&self) -> Vec<AccountSummary> {
        let directory = self.directory.read();
        let locked: Vec<_> = directory
            .accounts()
            .map(|account| (account, account.lock()))
            .collect();
        locked
            .iter()
            .map(|(account, state)| account.summarize(state))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.directory.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.directory.read().is_empty()
    }

    pub fn deposit(&self, id: AccountId, amount: Decimal) -> Result<(), BankError> {
        Ok(self.get_account(id)?.deposit(amount)?)
    }

    pub fn withdraw(&self, id: AccountId, amount: Decimal) -> Result<(), BankError> {
        Ok(self.get_account(id)?.withdraw(amount)?)
    }

    pub fn balance(&self, id: AccountId) -> Result<Decimal, BankError> {
        Ok(self.get_account(id)?.current_balance())
    }

    pub fn history(&self, id: AccountId) -> Result<History, BankError> {
        Ok(self.get_account(id)?.history())
    }

    /// Moves `amount` from one account to another. Either both entries are
    /// recorded or neither is.
    pub fn transfer(
        &self,
        from: AccountId,
        to: AccountId,
        amount: Decimal,
    ) -> Result<(), BankError> {
        let command = TransferCommand::parse_command(from, to, amount)?;
        let (source, target) = {
            let directory = self.directory.read();
            (directory.get(from)?, directory.get(to)?)
        };
        match apply_transfer(&command, &source, &target) {
            Ok(()) => {
                tracing::info!(bank = %self.name, from, to, %amount, "transfer applied");
                Ok(())
            }
            Err(err) => {
                tracing::debug!(
                    bank = %self.name, from, to, %amount, error = %err,
                    "transfer rejected"
                );
                Err(err.into())
            }
        }
    }
}

fn apply_transfer(
    command: &TransferCommand,
    source: &Account,
    target: &Account,
) -> Result<(), AccountError> {
    let (mut source_state, mut target_state) = if source.id() < target.id() {
        let source_state = source.lock();
        (source_state, target.lock())
    } else {
        let target_state = target.lock();
        (source.lock(), target_state)
    };
    // validate both halves before touching either log, applying cannot fail
    let debit = source_state.handle_command(&command.debit())?;
    let credit = target_state.handle_command(&command.credit())?;
    source_state.apply(debit);
    target_state.apply(credit);
    Ok(())
}
