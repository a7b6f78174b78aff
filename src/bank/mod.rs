//! Banking module: accounts, the bank aggregate, and the instruction teller.
mod account;
mod instruction;
mod teller;
mod types;

pub use account::*;
pub use instruction::*;
pub use teller::*;
pub use types::*;

use std::sync::{Arc, RwLock, Weak};

/// A bank: a labeled, insertion-ordered collection of accounts.
///
/// Banks are handed around as `Arc<Bank>` so that registered accounts can
/// hold a non-owning back-reference to their bank.
#[derive(Debug)]
pub struct Bank {
    /// The bank's display name.
    name: RwLock<String>,

    /// Registered accounts, in insertion order. Duplicates are allowed.
    accounts: RwLock<Vec<Account>>,

    /// Handle to self, cloned into accounts as their back-reference.
    weak_self: Weak<Bank>,
}

impl Bank {
    /// Creates a bank with an empty name and no accounts.
    pub fn new() -> Arc<Self> {
        Arc::new_cyclic(|weak_self| Bank {
            name: RwLock::new(String::new()),
            accounts: RwLock::new(Vec::new()),
            weak_self: weak_self.clone(),
        })
    }

    /// Gets the bank's name.
    pub fn get_name(&self) -> String {
        self.name.read().unwrap().clone()
    }

    /// Sets the bank's name.
    pub fn set_name(&self, name: impl Into<String>) {
        *self.name.write().unwrap() = name.into();
    }

    /// Gets the registered accounts in insertion order. The handles share
    /// state with the collection, so balances read through them are live.
    pub fn get_accounts(&self) -> Vec<Account> {
        self.accounts.read().unwrap().clone()
    }

    /// Appends `account` to the collection and points its back-reference at
    /// this bank. No duplicate check and no capacity limit.
    pub fn add_account(&self, account: Account) {
        let mut accounts = self.accounts.write().unwrap();
        account.attach_bank(&self.weak_self);
        accounts.push(account);
    }

    /// Moves `amount` from `source` to `destination` by debiting the source
    /// and then crediting the destination. The debit's overdraft check is
    /// the only validation; when it fails, the error propagates and the
    /// destination is never credited. Neither account needs to be
    /// registered with this bank.
    ///
    /// Both accounts stay exclusively locked for the duration of the pair,
    /// acquired in ascending id order so that two transfers moving money in
    /// opposite directions cannot deadlock.
    pub fn transfer(
        &self,
        source: &Account,
        destination: &Account,
        amount: Money,
    ) -> Result<(), BankError> {
        if source.id() == destination.id() {
            // Same underlying account: one lock, debit then credit.
            let mut inner = source.write();
            inner.debit(amount)?;
            inner.credit(amount);
            return Ok(());
        }

        let (mut source_guard, mut destination_guard) = if source.id() < destination.id() {
            let source_guard = source.write();
            let destination_guard = destination.write();
            (source_guard, destination_guard)
        } else {
            let destination_guard = destination.write();
            let source_guard = source.write();
            (source_guard, destination_guard)
        };
        source_guard.debit(amount)?;
        destination_guard.credit(amount);
        Ok(())
    }
}
