//! Error types for account construction and balance updates.

use thiserror::Error;

use crate::Amount;
use crate::model::AccountId;

/// Error while constructing an account.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccountError {
    #[error("account {0} cannot open with negative balance {1}")]
    NegativeBalance(AccountId, Amount),
}

/// Error returned by [`Bank`](super::Bank) balance operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BankError {
    #[error("account {0} not found")]
    AccountNotFound(AccountId),

    #[error("insufficient funds for account {account}: available {available}, requested {requested}")]
    InsufficientFunds {
        account: AccountId,
        available: Amount,
        requested: Amount,
    },

    #[error("deposit of {amount} would overflow the balance of account {account}")]
    BalanceOverflow { account: AccountId, amount: Amount },
}
