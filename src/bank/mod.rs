//! The account store.
//!
//! Maps account ids to accounts. The map itself is only written during setup;
//! balance updates lock the single account they touch, so transactions on
//! different accounts never wait on each other.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::warn;

use crate::Amount;
use crate::model::AccountId;

mod account;
pub use account::Account;

mod error;
pub use error::{AccountError, BankError};

/// A collection of accounts safe to share between tasks.
#[derive(Debug, Default)]
pub struct Bank {
    accounts: RwLock<HashMap<AccountId, Arc<Account>>>,
}

/// Public API
impl Bank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account. Registering an id twice replaces the first account (last writer wins).
    pub fn add_account(&self, account: Account) {
        let id = account.id();
        if let Some(previous) = self.accounts.write().insert(id, Arc::new(account)) {
            warn!(
                account = id,
                balance = %previous.balance(),
                "account registered twice, replacing previous entry"
            );
        }
    }

    pub fn get_account(&self, id: AccountId) -> Option<Arc<Account>> {
        self.accounts.read().get(&id).cloned()
    }

    /// Credit an account and return its new balance.
    pub fn deposit(&self, id: AccountId, amount: Amount) -> Result<Amount, BankError> {
        self.lookup(id)?.deposit(amount)
    }

    /// Debit an account if it holds enough, returning its new balance.
    pub fn withdraw(&self, id: AccountId, amount: Amount) -> Result<Amount, BankError> {
        self.lookup(id)?.withdraw(amount)
    }

    /// Snapshot of the registered ids in ascending order.
    pub fn account_ids(&self) -> Vec<AccountId> {
        let mut ids: Vec<_> = self.accounts.read().keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Snapshot of every balance, sorted by account id.
    pub fn balances(&self) -> Vec<(AccountId, Amount)> {
        let accounts: Vec<Arc<Account>> = self.accounts.read().values().cloned().collect();
        let mut balances: Vec<_> = accounts.iter().map(|a| (a.id(), a.balance())).collect();
        balances.sort_unstable_by_key(|(id, _)| *id);
        balances
    }

    pub fn len(&self) -> usize {
        self.accounts.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.read().is_empty()
    }
}

/// Private API
impl Bank {
    /// Clone the account handle so the map lock is released before the balance lock is taken.
    fn lookup(&self, id: AccountId) -> Result<Arc<Account>, BankError> {
        self.get_account(id).ok_or(BankError::AccountNotFound(id))
    }
}
