use std::{
    collections::{BTreeMap, BTreeSet, btree_map::Entry},
    sync::Arc,
};

use crate::{
    account::{Account, AccountId},
    config::IdReusePolicy,
};

use super::{AccountDirectory, DirectoryError};

#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    open: BTreeMap<AccountId, Arc<Account>>,
    retired: BTreeSet<AccountId>,
    id_reuse: IdReusePolicy,
}

impl InMemoryDirectory {
    pub fn new(id_reuse: IdReusePolicy) -> Self {
        Self {
            id_reuse,
            ..Default::default()
        }
    }

    /// Ids of closed accounts that can no longer be assigned.
    pub fn retired(&self) -> impl Iterator<Item = AccountId> + '_ {
        self.retired.iter().copied()
    }
}

impl AccountDirectory for InMemoryDirectory {
    fn insert(&mut self, account: Arc<Account>) -> Result<(), DirectoryError> {
        let id = account.id();
        if self.retired.contains(&id) {
            return Err(DirectoryError::DuplicateAccount { id });
        }
        match self.open.entry(id) {
            Entry::Occupied(_) => Err(DirectoryError::DuplicateAccount { id }),
            Entry::Vacant(entry) => {
                entry.insert(account);
                Ok(())
            }
        }
    }

    fn get(&self, id: AccountId) -> Result<Arc<Account>, DirectoryError> {
        self.open
            .get(&id)
            .cloned()
            .ok_or(DirectoryError::AccountNotFound { id })
    }

    fn remove(&mut self, id: AccountId) -> Result<Arc<Account>, DirectoryError> {
        let account = self
            .open
            .remove(&id)
            .ok_or(DirectoryError::AccountNotFound { id })?;
        if self.id_reuse == IdReusePolicy::Reserve {
            self.retired.insert(id);
        }
        Ok(account)
    }

    fn contains(&self, id: AccountId) -> bool {
        self.open.contains_key(&id)
    }

    fn len(&self) -> usize {
        self.open.len()
    }

    fn accounts(&self) -> impl Iterator<Item = &Arc<Account>> {
        self.open.values()
    }
}
