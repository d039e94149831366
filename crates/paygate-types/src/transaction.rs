//! Recorded payment attempts.

use crate::catalog::Item;

/// One payment attempt that passed validation.
///
/// The outcome is fixed at creation. Transactions are appended to the owning
/// account's history and to the global ledger, and never removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    username: String,
    item: Item,
    successful: bool,
}

impl Transaction {
    pub fn new(username: impl Into<String>, item: Item, successful: bool) -> Self {
        Self {
            username: username.into(),
            item,
            successful,
        }
    }

    /// Username of the account that attempted the payment.
    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn item(&self) -> &Item {
        &self.item
    }

    pub fn successful(&self) -> bool {
        self.successful
    }
}

/// Result of a payment that passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentOutcome {
    Approved,
    /// Processed, but declined by the simulated network.
    Declined,
}

impl PaymentOutcome {
    pub fn is_approved(&self) -> bool {
        matches!(self, PaymentOutcome::Approved)
    }
}
