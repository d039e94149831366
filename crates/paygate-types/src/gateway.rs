//! Core trait defining the operations of a payment gateway.
//!
//! Implementors own the account store and the ledger. The HTTP layer only
//! talks to this trait and converts [`GatewayError`] into status codes.

use crate::account::{Account, Credentials, PaymentDetails, PaymentMethod};
use crate::catalog::{Catalog, Item};
use crate::transaction::{PaymentOutcome, Transaction};

/// Result of [`Gateway::process_payment`] once the payment passed validation.
#[derive(Debug, Clone)]
pub struct PaymentReceipt {
    pub outcome: PaymentOutcome,
    /// Snapshot of the paying account after the transaction was recorded.
    pub account: Account,
}

/// Trait defining the asynchronous interface of a payment gateway.
///
/// Every operation that touches an account authenticates with the
/// [`Credentials`] supplied alongside it; there is no session concept.
pub trait Gateway {
    /// Creates an account with no payment method and an empty history.
    ///
    /// # Errors
    ///
    /// [`GatewayError::Conflict`] if the username is already taken.
    fn register(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<Account, GatewayError>> + Send;

    /// # Errors
    ///
    /// [`GatewayError::Unauthenticated`] if no account matches.
    fn login(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<Account, GatewayError>> + Send;

    fn catalog(&self) -> &Catalog;

    /// Overwrites the payment method of the authenticated account.
    ///
    /// No validation happens here; it is deferred to payment time.
    fn update_payment_method(
        &self,
        credentials: &Credentials,
        method: Option<PaymentMethod>,
        details: PaymentDetails,
    ) -> impl Future<Output = Result<Account, GatewayError>> + Send;

    /// Charges the authenticated account's active payment method for `item`.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::MethodNotSet`] if no method is selected.
    /// - [`GatewayError::ValidationFailed`] if the stored fields fail the format rules.
    /// - [`GatewayError::UnknownItem`] if only catalog items may be bought and `item` is not one.
    ///
    /// None of these record a transaction.
    fn process_payment(
        &self,
        credentials: &Credentials,
        item: Item,
    ) -> impl Future<Output = Result<PaymentReceipt, GatewayError>> + Send;

    /// Transactions of the authenticated account, read from the global ledger.
    fn transactions(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<Vec<Transaction>, GatewayError>> + Send;
}

/// Errors surfaced by a [`Gateway`].
///
/// The display string is the message shown to clients.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Username already exists")]
    Conflict(String),
    #[error("Invalid credentials")]
    Unauthenticated,
    #[error("Invalid payment details")]
    ValidationFailed(PaymentMethod),
    #[error("Payment method not set")]
    MethodNotSet,
    #[error("Malformed request: {0}")]
    MalformedRequest(String),
    #[error("Unknown product: {0}")]
    UnknownItem(String),
    /// Unexpected failure. The detail is for logs only.
    #[error("Server error")]
    Internal(String),
}
