use std::sync::Arc;

use thiserror::Error;

use crate::account::{Account, AccountId};

pub mod in_memory_directory;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("Account {id} already exists")]
    DuplicateAccount { id: AccountId },
    #[error("Account {id} not found")]
    AccountNotFound { id: AccountId },
}

/// Storage of open accounts, keyed by id.
///
/// Implementations are not synchronized themselves; the [`crate::bank::Bank`]
/// guards the directory with a single read/write lock.
pub trait AccountDirectory {
    /// Fails with [`DirectoryError::DuplicateAccount`] when the id is taken,
    /// including ids reserved by closed accounts.
    fn insert(&mut self, account: Arc<Account>) -> Result<(), DirectoryError>;

    fn get(&self, id: AccountId) -> Result<Arc<Account>, DirectoryError>;

    /// Removes the account from active lookups and returns it.
    fn remove(&mut self, id: AccountId) -> Result<Arc<Account>, DirectoryError>;

    fn contains(&self, id: AccountId) -> bool;

    /// Number of open accounts.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Open accounts in ascending id order.
    fn accounts(&self) -> impl Iterator<Item = &Arc<Account>>;
}
