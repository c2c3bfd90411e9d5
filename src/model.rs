//! Core domain types for the bank simulation.

use std::fmt;

use crate::Amount;

/// Account identifier.
pub type AccountId = u32;

/// Account id reserved for the shutdown sentinel. Never registered as a real account.
pub const SENTINEL_ACCOUNT: AccountId = 0;

/// A pending deposit or withdrawal against one account.
///
/// A positive amount is a deposit, a negative amount is a withdrawal of its magnitude.
/// The request `(0, 0)` is the sentinel ("poison pill") that tells a processor to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionRequest {
    account: AccountId,
    amount: Amount,
}

/// What a request asks a processor to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    Deposit(Amount),
    /// Carries the magnitude to debit.
    Withdrawal(Amount),
    Stop,
}

impl TransactionRequest {
    pub fn new(account: AccountId, amount: Amount) -> Self {
        Self { account, amount }
    }

    /// The in-band stop marker.
    pub fn sentinel() -> Self {
        Self::new(SENTINEL_ACCOUNT, Amount::ZERO)
    }

    pub fn account(&self) -> AccountId {
        self.account
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn is_sentinel(&self) -> bool {
        self.account == SENTINEL_ACCOUNT
    }

    pub fn instruction(&self) -> Instruction {
        if self.is_sentinel() {
            Instruction::Stop
        } else if self.amount.is_negative() {
            Instruction::Withdrawal(self.amount.abs())
        } else {
            Instruction::Deposit(self.amount)
        }
    }
}

impl fmt::Display for TransactionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "account {}: {}", self.account, self.amount)
    }
}
