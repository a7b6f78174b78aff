//! Account handles and the balance mutation primitives.
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockWriteGuard, Weak};

use serde::ser::{Serialize, SerializeStruct, Serializer};
use thiserror::Error;

use crate::bank::{
    Bank,
    types::{AccountId, Money},
};

static NEXT_ACCOUNT_ID: AtomicU64 = AtomicU64::new(0);

/// Mutable account state behind the shared handle.
#[derive(Debug)]
pub(crate) struct AccountInner {
    /// Display name of the holder, not a unique key.
    owner: String,

    /// The current balance.
    balance: Money,

    /// Non-owning link to the bank that registered this account.
    bank: Weak<Bank>,
}

impl AccountInner {
    /// Overdraft-guarded subtraction; commits only when the result stays
    /// non-negative. Landing on exactly zero succeeds.
    pub(crate) fn debit(&mut self, amount: Money) -> Result<(), BankError> {
        let new_balance = self.balance - amount;
        if new_balance < Money::ZERO {
            return Err(BankError::InsufficientFunds);
        }
        self.balance = new_balance;
        Ok(())
    }

    /// Unguarded addition; the sign of `amount` is not validated.
    pub(crate) fn credit(&mut self, amount: Money) {
        self.balance += amount;
    }
}

/// Represents a bank account. Cloning yields another handle to the same
/// underlying account, so a bank's collection and outside callers observe
/// one shared balance.
#[derive(Debug, Clone)]
pub struct Account {
    /// Process-unique id, assigned at construction. Lock-ordering key only;
    /// it takes no part in equality.
    id: AccountId,

    inner: Arc<RwLock<AccountInner>>,
}

impl Account {
    /// Creates an account with the given owner and opening balance.
    /// The opening balance is taken as-is; a negative value is permitted.
    pub fn new(owner: impl Into<String>, opening_balance: Money) -> Self {
        Account {
            id: NEXT_ACCOUNT_ID.fetch_add(1, Ordering::Relaxed),
            inner: Arc::new(RwLock::new(AccountInner {
                owner: owner.into(),
                balance: opening_balance,
                bank: Weak::new(),
            })),
        }
    }

    /// Gets the owner's display name.
    pub fn get_owner(&self) -> String {
        self.inner.read().unwrap().owner.clone()
    }

    /// Sets the owner's display name.
    pub fn set_owner(&self, owner: impl Into<String>) {
        self.inner.write().unwrap().owner = owner.into();
    }

    /// Gets the current balance.
    pub fn get_balance(&self) -> Money {
        self.inner.read().unwrap().balance
    }

    /// Sets the balance directly, without validation.
    pub fn set_balance(&self, balance: Money) {
        self.inner.write().unwrap().balance = balance;
    }

    /// Gets the bank this account is registered with, or `None` if it has
    /// not been added to one (or the bank is gone).
    pub fn get_bank(&self) -> Option<Arc<Bank>> {
        self.inner.read().unwrap().bank.upgrade()
    }

    /// Subtracts `amount` from the balance. Fails with
    /// [`BankError::InsufficientFunds`] when the result would be negative,
    /// leaving the balance unchanged; debiting down to exactly zero
    /// succeeds.
    pub fn debit(&self, amount: Money) -> Result<(), BankError> {
        self.write().debit(amount)
    }

    /// Adds `amount` to the balance. Never fails; a negative `amount`
    /// effectively debits without the overdraft check.
    pub fn credit(&self, amount: Money) {
        self.write().credit(amount);
    }

    pub(crate) fn id(&self) -> AccountId {
        self.id
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, AccountInner> {
        self.inner.write().unwrap()
    }

    /// Points the back-reference at `bank`. Called by `Bank::add_account`.
    pub(crate) fn attach_bank(&self, bank: &Weak<Bank>) {
        self.inner.write().unwrap().bank = bank.clone();
    }
}

impl Default for Account {
    /// An account with an empty owner and a zero balance.
    fn default() -> Self {
        Account::new("", Money::ZERO)
    }
}

/// Accounts compare by value: equal owner strings and numerically equal
/// balances ("100" equals "100.00"), regardless of identity or bank
/// linkage.
impl PartialEq for Account {
    fn eq(&self, other: &Self) -> bool {
        let (owner, balance) = {
            let inner = self.inner.read().unwrap();
            (inner.owner.clone(), inner.balance)
        };
        let other = other.inner.read().unwrap();
        owner == other.owner && balance == other.balance
    }
}

/// Encodes the account as an `owner`/`balance` record; the balance keeps
/// its canonical minimal decimal form.
impl Serialize for Account {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let inner = self.inner.read().unwrap();
        let mut record = serializer.serialize_struct("Account", 2)?;
        record.serialize_field("owner", &inner.owner)?;
        record.serialize_field("balance", &inner.balance)?;
        record.end()
    }
}

/// Errors that can occur while operating on accounts.
#[derive(Error, Debug)]
pub enum BankError {
    /// A debit would have driven the balance negative.
    #[error("Dinero insuficiente")]
    InsufficientFunds,
    /// An instruction named an owner with no matching account.
    #[error("Unknown account: {0}")]
    UnknownAccount(String),
    /// An instruction is missing a field its kind requires.
    #[error("Invalid instruction")]
    InvalidInstruction,
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use crate::bank::{Account, Bank, BankError, Money};

    #[test]
    fn test_new_account() {
        let account = Account::new("Carlos", dec!(100.00));
        assert_eq!(account.get_owner(), "Carlos");
        assert_eq!(account.get_balance(), dec!(100.00));
        assert!(account.get_bank().is_none());
    }

    #[test]
    fn test_default_account() {
        let account = Account::default();
        assert_eq!(account.get_owner(), "");
        assert_eq!(account.get_balance(), Money::ZERO);
    }

    #[test]
    fn test_accessors() {
        let account = Account::default();
        account.set_owner("Carlos");
        account.set_balance(dec!(100.00));
        assert_eq!(account.get_owner(), "Carlos");
        assert_eq!(account.get_balance(), dec!(100.00));
    }

    #[test]
    fn test_negative_opening_balance_is_permitted() {
        let account = Account::new("Andres", dec!(-50));
        assert_eq!(account.get_balance(), dec!(-50));
    }

    #[test]
    fn test_value_equality() {
        let account = Account::new("John Doe", dec!(8900.9997));
        let other = Account::new("John Doe", dec!(8900.9997));
        assert_eq!(account, other);
    }

    #[test]
    fn test_value_equality_ignores_scale() {
        let account = Account::new("John Doe", dec!(100));
        let other = Account::new("John Doe", dec!(100.00));
        assert_eq!(account, other);
    }

    #[test]
    fn test_value_equality_ignores_bank_linkage() {
        let account = Account::new("John Doe", dec!(100));
        let other = Account::new("John Doe", dec!(100));
        Bank::new().add_account(other.clone());
        assert_eq!(account, other);
    }

    #[test]
    fn test_inequality() {
        assert_ne!(
            Account::new("John", dec!(100)),
            Account::new("Jane", dec!(100))
        );
        assert_ne!(
            Account::new("John", dec!(100)),
            Account::new("John", dec!(200))
        );
    }

    #[test]
    fn test_debit() {
        let account = Account::new("Andres", dec!(1000.12345));
        account.debit(dec!(100)).unwrap();
        assert_eq!(account.get_balance(), dec!(900.12345));
    }

    #[test]
    fn test_debit_down_to_zero() {
        let account = Account::new("Andres", dec!(250));
        account.debit(dec!(250)).unwrap();
        assert_eq!(account.get_balance(), Money::ZERO);
    }

    #[test]
    fn test_debit_insufficient_funds() {
        let account = Account::new("Andres", dec!(1000.12345));
        let error = account.debit(dec!(2000)).unwrap_err();
        assert!(matches!(error, BankError::InsufficientFunds));
        assert_eq!(error.to_string(), "Dinero insuficiente");
        assert_eq!(account.get_balance(), dec!(1000.12345));
    }

    #[test]
    fn test_credit() {
        let account = Account::new("Andres", dec!(1000.12345));
        account.credit(dec!(100));
        assert_eq!(account.get_balance(), dec!(1100.12345));
    }

    #[test]
    fn test_negative_credit_skips_overdraft_check() {
        let account = Account::new("Andres", dec!(100));
        account.credit(dec!(-250));
        assert_eq!(account.get_balance(), dec!(-150));
    }

    #[test]
    fn test_clones_share_state() {
        let account = Account::new("Andres", dec!(100));
        let alias = account.clone();
        alias.credit(dec!(50));
        assert_eq!(account.get_balance(), dec!(150));
    }

    #[test]
    fn test_csv_encoding_uses_minimal_decimal_form() {
        let account = Account::new("John doe", dec!(2500));
        account.debit(dec!(500)).unwrap();
        let mut writer = csv::Writer::from_writer(vec![]);
        writer.serialize(&account).unwrap();
        let data = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert_eq!(data, "owner,balance\nJohn doe,2000\n");
    }
}
