//! Local gateway implementation.
//!
//! This module provides [`GatewayLocal`], a [`Gateway`](paygate_types::gateway::Gateway)
//! implementation that keeps every account and the global ledger in process
//! memory.
//!
//! # Concurrency
//!
//! The account store and the ledger live behind one [`Mutex`]. Each operation
//! takes the lock, performs its lookup or mutation, clones the data it needs
//! for the response, and releases the lock before returning. The lock is never
//! held across an `.await`.
//!
//! A poisoned lock is reported as [`GatewayError::Internal`] instead of
//! panicking the request.
//!
//! # Example
//!
//! ```ignore
//! use paygate_local::{GatewayLocal, PaymentPolicy};
//! use paygate_types::catalog::Catalog;
//!
//! let gateway = GatewayLocal::new(Catalog::default(), PaymentPolicy::AlwaysApprove);
//! let account = gateway.register(&Credentials::new("bob", "pw1")).await?;
//! ```

use std::sync::{Mutex, MutexGuard};

use paygate_types::account::{Account, Credentials, PaymentDetails, PaymentMethod};
use paygate_types::catalog::{Catalog, Item};
use paygate_types::gateway::{Gateway, GatewayError, PaymentReceipt};
use paygate_types::transaction::Transaction;

use crate::payment::{self, PaymentPolicy};
use crate::store::{AccountStore, Ledger};

#[derive(Debug, Default)]
struct GatewayState {
    accounts: AccountStore,
    ledger: Ledger,
}

/// Which items may be bought.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItemPolicy {
    /// Any name and price supplied by the client is accepted.
    #[default]
    AdHoc,
    /// The item must match a catalog entry by name and price.
    CatalogOnly,
}

/// An in-memory [`Gateway`].
#[derive(Debug)]
pub struct GatewayLocal {
    catalog: Catalog,
    payment_policy: PaymentPolicy,
    item_policy: ItemPolicy,
    state: Mutex<GatewayState>,
}

impl GatewayLocal {
    /// Creates an empty gateway serving `catalog`. Ad-hoc items are accepted.
    pub fn new(catalog: Catalog, payment_policy: PaymentPolicy) -> Self {
        GatewayLocal {
            catalog,
            payment_policy,
            item_policy: ItemPolicy::default(),
            state: Mutex::new(GatewayState::default()),
        }
    }

    pub fn with_item_policy(mut self, item_policy: ItemPolicy) -> Self {
        self.item_policy = item_policy;
        self
    }

    fn state(&self) -> Result<MutexGuard<'_, GatewayState>, GatewayError> {
        self.state
            .lock()
            .map_err(|_| GatewayError::Internal("gateway state lock poisoned".to_string()))
    }

    /// Copy of the global ledger in append order.
    pub fn ledger(&self) -> Result<Vec<Transaction>, GatewayError> {
        Ok(self.state()?.ledger.iter().cloned().collect())
    }

    fn check_item(&self, item: &Item) -> Result<(), GatewayError> {
        match self.item_policy {
            ItemPolicy::AdHoc => Ok(()),
            ItemPolicy::CatalogOnly if self.catalog.contains(item) => Ok(()),
            ItemPolicy::CatalogOnly => Err(GatewayError::UnknownItem(item.name.clone())),
        }
    }
}

impl Default for GatewayLocal {
    fn default() -> Self {
        GatewayLocal::new(Catalog::default(), PaymentPolicy::default())
    }
}

impl Gateway for GatewayLocal {
    async fn register(&self, credentials: &Credentials) -> Result<Account, GatewayError> {
        let mut state = self.state()?;
        let account = state.accounts.register(credentials)?;
        Ok(account.clone())
    }

    async fn login(&self, credentials: &Credentials) -> Result<Account, GatewayError> {
        let state = self.state()?;
        let account = state.accounts.login(credentials)?;
        Ok(account.clone())
    }

    fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    async fn update_payment_method(
        &self,
        credentials: &Credentials,
        method: Option<PaymentMethod>,
        details: PaymentDetails,
    ) -> Result<Account, GatewayError> {
        let mut state = self.state()?;
        let account = state.accounts.login_mut(credentials)?;
        account.set_payment_method(method, details);
        Ok(account.clone())
    }

    async fn process_payment(
        &self,
        credentials: &Credentials,
        item: Item,
    ) -> Result<PaymentReceipt, GatewayError> {
        let mut state = self.state()?;
        let GatewayState { accounts, ledger } = &mut *state;
        let account = accounts.login_mut(credentials)?;
        if account.payment_method().is_none() {
            return Err(GatewayError::MethodNotSet);
        }
        self.check_item(&item)?;
        let outcome = payment::process_payment(account, item, &self.payment_policy, ledger)?;
        Ok(PaymentReceipt {
            outcome,
            account: account.clone(),
        })
    }

    async fn transactions(
        &self,
        credentials: &Credentials,
    ) -> Result<Vec<Transaction>, GatewayError> {
        let state = self.state()?;
        let account = state.accounts.login(credentials)?;
        Ok(state
            .ledger
            .for_user(account.username())
            .cloned()
            .collect())
    }
}
