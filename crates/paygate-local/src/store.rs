//! In-memory account store and transaction ledger.
//!
//! Neither type synchronizes on its own. [`GatewayLocal`](crate::GatewayLocal)
//! keeps both behind a single lock so that register, update and payment
//! operations are linearizable.

use std::collections::HashMap;

use paygate_types::account::{Account, Credentials};
use paygate_types::gateway::GatewayError;
use paygate_types::transaction::Transaction;

/// Accounts keyed by username. Usernames are unique and case-sensitive.
#[derive(Debug, Default)]
pub struct AccountStore {
    accounts: HashMap<String, Account>,
}

impl AccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a fresh account for `credentials`.
    pub fn register(&mut self, credentials: &Credentials) -> Result<&Account, GatewayError> {
        if self.accounts.contains_key(&credentials.username) {
            return Err(GatewayError::Conflict(credentials.username.clone()));
        }
        let account = Account::new(&credentials.username, &credentials.password);
        Ok(self
            .accounts
            .entry(credentials.username.clone())
            .or_insert(account))
    }

    /// Looks up the account and checks the password verbatim.
    pub fn login(&self, credentials: &Credentials) -> Result<&Account, GatewayError> {
        self.accounts
            .get(&credentials.username)
            .filter(|account| account.password_matches(&credentials.password))
            .ok_or(GatewayError::Unauthenticated)
    }

    /// Like [`AccountStore::login`], for operations that mutate the account.
    pub fn login_mut(&mut self, credentials: &Credentials) -> Result<&mut Account, GatewayError> {
        self.accounts
            .get_mut(&credentials.username)
            .filter(|account| account.password_matches(&credentials.password))
            .ok_or(GatewayError::Unauthenticated)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

/// Append-only list of every recorded transaction across all accounts.
#[derive(Debug, Default)]
pub struct Ledger {
    history: Vec<Transaction>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a transaction and returns its position in the ledger.
    pub fn append(&mut self, transaction: Transaction) -> usize {
        let index = self.history.len();
        self.history.push(transaction);
        index
    }

    /// Transactions of one user, in append order.
    pub fn for_user<'a>(&'a self, username: &'a str) -> impl Iterator<Item = &'a Transaction> {
        self.history
            .iter()
            .filter(move |transaction| transaction.username() == username)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transaction> {
        self.history.iter()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}
