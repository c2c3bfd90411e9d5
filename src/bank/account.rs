use parking_lot::Mutex;

use super::error::{AccountError, BankError};
use crate::Amount;
use crate::model::AccountId;

/// A bank account: an immutable id and a balance that never goes negative.
///
/// The balance sits behind its own lock, so updates to one account serialize
/// without blocking any other account.
#[derive(Debug)]
pub struct Account {
    id: AccountId,
    balance: Mutex<Amount>,
}

impl Account {
    pub fn new(id: AccountId, balance: Amount) -> Result<Self, AccountError> {
        if balance.is_negative() {
            return Err(AccountError::NegativeBalance(id, balance));
        }
        Ok(Self {
            id,
            balance: Mutex::new(balance),
        })
    }

    pub fn id(&self) -> AccountId {
        self.id
    }

    pub fn balance(&self) -> Amount {
        *self.balance.lock()
    }

    /// Credit the account and return the new balance. The amount's sign is not checked.
    pub fn deposit(&self, amount: Amount) -> Result<Amount, BankError> {
        let mut balance = self.balance.lock();
        *balance = balance.checked_add(amount).ok_or(BankError::BalanceOverflow {
            account: self.id,
            amount,
        })?;
        Ok(*balance)
    }

    /// Debit the account if it holds at least `amount`, returning the new balance.
    pub fn withdraw(&self, amount: Amount) -> Result<Amount, BankError> {
        let mut balance = self.balance.lock();
        if *balance < amount {
            return Err(BankError::InsufficientFunds {
                account: self.id,
                available: *balance,
                requested: amount,
            });
        }
        *balance -= amount;
        Ok(*balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_opening_balance_is_rejected() {
        let result = Account::new(1, Amount::from_cents(-1));
        assert_eq!(
            result.unwrap_err(),
            AccountError::NegativeBalance(1, Amount::from_cents(-1))
        );
    }

    #[test]
    fn zero_opening_balance_is_allowed() {
        let account = Account::new(1, Amount::ZERO).unwrap();
        assert_eq!(account.balance(), Amount::ZERO);
    }

    #[test]
    fn deposit_returns_new_balance() {
        let account = Account::new(1, Amount::from_units(100)).unwrap();
        assert_eq!(
            account.deposit(Amount::from_units(50)),
            Ok(Amount::from_units(150))
        );
        assert_eq!(account.balance(), Amount::from_units(150));
    }

    #[test]
    fn overflowing_deposit_leaves_balance_unchanged() {
        let top = Amount::from_cents(i64::MAX - 10);
        let account = Account::new(1, top).unwrap();
        assert_eq!(
            account.deposit(Amount::from_cents(11)),
            Err(BankError::BalanceOverflow {
                account: 1,
                amount: Amount::from_cents(11),
            })
        );
        assert_eq!(account.balance(), top);
        assert!(!account.balance().is_negative());
    }

    #[test]
    fn withdraw_exact_balance_succeeds() {
        let account = Account::new(1, Amount::from_units(100)).unwrap();
        assert_eq!(account.withdraw(Amount::from_units(100)), Ok(Amount::ZERO));
    }

    #[test]
    fn overdraw_leaves_balance_unchanged() {
        let account = Account::new(1, Amount::from_units(100)).unwrap();
        let result = account.withdraw(Amount::from_cents(10_001));
        assert_eq!(
            result,
            Err(BankError::InsufficientFunds {
                account: 1,
                available: Amount::from_units(100),
                requested: Amount::from_cents(10_001),
            })
        );
        assert_eq!(account.balance(), Amount::from_units(100));
    }
}
