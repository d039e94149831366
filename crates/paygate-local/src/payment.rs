//! Simulated payment processing.
//!
//! A payment goes through three steps:
//!
//! 1. The account must have a payment method selected.
//! 2. The stored credentials of that method must pass the format rules in
//!    [`paygate_types::validation`].
//! 3. The [`PaymentPolicy`] decides whether the validated payment is approved.
//!
//! Failures in steps 1 and 2 are rejections and leave no trace. Every payment
//! that reaches step 3 is recorded, approved or not, in the account history and
//! in the [`Ledger`].

use rand::Rng;

use paygate_types::account::Account;
use paygate_types::catalog::Item;
use paygate_types::gateway::GatewayError;
use paygate_types::transaction::{PaymentOutcome, Transaction};
use paygate_types::validation;

use crate::store::Ledger;

/// Decides whether a validated payment succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PaymentPolicy {
    /// Every validated payment succeeds.
    #[default]
    AlwaysApprove,
    /// A validated payment succeeds with the given probability.
    Probabilistic { success_rate: f64 },
}

#[derive(Debug, thiserror::Error, PartialEq)]
#[error("Success rate must be between 0.0 and 1.0, got {0}")]
pub struct InvalidSuccessRate(pub f64);

impl PaymentPolicy {
    /// A rate of exactly `1.0` is the deterministic policy.
    pub fn from_success_rate(success_rate: f64) -> Result<Self, InvalidSuccessRate> {
        if !(0.0..=1.0).contains(&success_rate) {
            return Err(InvalidSuccessRate(success_rate));
        }
        if success_rate == 1.0 {
            Ok(PaymentPolicy::AlwaysApprove)
        } else {
            Ok(PaymentPolicy::Probabilistic { success_rate })
        }
    }

    fn decide(&self) -> PaymentOutcome {
        let approved = match self {
            PaymentPolicy::AlwaysApprove => true,
            PaymentPolicy::Probabilistic { success_rate } => {
                rand::rng().random_bool(*success_rate)
            }
        };
        if approved {
            PaymentOutcome::Approved
        } else {
            PaymentOutcome::Declined
        }
    }
}

/// Runs a payment of `item` against the active method of `account`.
pub fn process_payment(
    account: &mut Account,
    item: Item,
    policy: &PaymentPolicy,
    ledger: &mut Ledger,
) -> Result<PaymentOutcome, GatewayError> {
    let method = account
        .payment_method()
        .ok_or(GatewayError::MethodNotSet)?;
    if !validation::validate(method, account.details()) {
        return Err(GatewayError::ValidationFailed(method.clone()));
    }

    let outcome = policy.decide();
    let transaction = Transaction::new(account.username(), item, outcome.is_approved());
    account.record(transaction.clone());
    let index = ledger.append(transaction);
    tracing::debug!(
        username = account.username(),
        ledger_index = index,
        ?outcome,
        "Transaction recorded"
    );
    Ok(outcome)
}
