//! Request and response bodies of the gateway HTTP surface.
//!
//! Requests are flat JSON objects; every value may be sent as a string, and
//! prices are also accepted as numbers. Responses always carry a top-level
//! `success` flag, optionally followed by `message`, `user`, `products` or
//! `transactions`.
//!
//! Sensitive fields are masked when an [`Account`] is rendered into a
//! [`UserView`]; the CVV is never rendered.

use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as, skip_serializing_none};

use crate::account::{Account, Credentials, PaymentDetails, PaymentMethod};
use crate::catalog::{Catalog, Item};
use crate::mask::{mask_account_number, mask_card_number};
use crate::transaction::Transaction;
use crate::util::Price;

/// Body of `/api/register`, `/api/login` and `/api/transactions`.
#[derive(Debug, Clone, Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

impl From<CredentialsRequest> for Credentials {
    fn from(value: CredentialsRequest) -> Self {
        Credentials::new(value.username, value.password)
    }
}

/// Body of `/api/payment-method`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethodRequest {
    pub username: String,
    pub password: String,
    pub payment_method: Option<String>,
    pub card_number: Option<String>,
    pub card_expiry: Option<String>,
    #[serde(rename = "cardCVV")]
    pub card_cvv: Option<String>,
    pub bank_account: Option<String>,
    pub upi_id: Option<String>,
}

impl PaymentMethodRequest {
    /// Splits the request into credentials, the selected method and the
    /// supplied details. A missing or blank method unsets it.
    pub fn into_parts(self) -> (Credentials, Option<PaymentMethod>, PaymentDetails) {
        let method = self
            .payment_method
            .filter(|name| !name.trim().is_empty())
            .map(|name| match name.parse::<PaymentMethod>() {
                Ok(method) => method,
                Err(never) => match never {},
            });
        let details = PaymentDetails {
            card_number: self.card_number,
            card_expiry: self.card_expiry,
            card_cvv: self.card_cvv,
            bank_account: self.bank_account,
            mobile_handle: self.upi_id,
        };
        (
            Credentials::new(self.username, self.password),
            method,
            details,
        )
    }
}

/// Body of `/api/payment`.
///
/// The product is taken from the request as-is; whether it must match the
/// catalog is up to the gateway.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub username: String,
    pub password: String,
    pub product_name: String,
    pub product_price: Price,
}

impl PaymentRequest {
    pub fn into_parts(self) -> (Credentials, Item) {
        (
            Credentials::new(self.username, self.password),
            Item::new(self.product_name, self.product_price),
        )
    }
}

/// One entry of a transaction history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionView {
    pub product: Item,
    pub successful: bool,
}

impl From<&Transaction> for TransactionView {
    fn from(transaction: &Transaction) -> Self {
        Self {
            product: transaction.item().clone(),
            successful: transaction.successful(),
        }
    }
}

/// An account as shown to clients.
///
/// Only the fields of the active payment method are present. Card and bank
/// account numbers are masked.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub username: String,
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_expiry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_account: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upi_id: Option<String>,
    pub transactions: Vec<TransactionView>,
}

impl From<&Account> for UserView {
    fn from(account: &Account) -> Self {
        let details = account.details();
        let mut view = UserView {
            username: account.username().to_string(),
            payment_method: account.payment_method().cloned(),
            card_number: None,
            card_expiry: None,
            bank_account: None,
            upi_id: None,
            transactions: account
                .transactions()
                .iter()
                .map(TransactionView::from)
                .collect(),
        };
        match account.payment_method() {
            Some(PaymentMethod::CreditCard) => {
                if let Some(number) = &details.card_number {
                    view.card_number = Some(mask_card_number(number));
                    view.card_expiry = details.card_expiry.clone();
                }
            }
            Some(PaymentMethod::BankAccount) => {
                view.bank_account = details.bank_account.as_deref().map(mask_account_number);
            }
            Some(PaymentMethod::MobileHandle) => {
                view.upi_id = details.mobile_handle.clone();
            }
            Some(PaymentMethod::ExternalWallet | PaymentMethod::Unrecognized(_)) | None => {}
        }
        view
    }
}

/// Envelope of every JSON response.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user: Option<UserView>,
    #[serde(default)]
    pub products: Option<Vec<Item>>,
    #[serde(default)]
    pub transactions: Option<Vec<TransactionView>>,
}

impl ApiResponse {
    fn new(success: bool) -> Self {
        Self {
            success,
            message: None,
            user: None,
            products: None,
            transactions: None,
        }
    }

    pub fn success() -> Self {
        Self::new(true)
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(false).with_message(message)
    }

    /// Success flag decided by the caller, e.g. for a declined payment.
    pub fn with_success(mut self, success: bool) -> Self {
        self.success = success;
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_user(mut self, account: &Account) -> Self {
        self.user = Some(UserView::from(account));
        self
    }

    pub fn with_products(mut self, catalog: &Catalog) -> Self {
        self.products = Some(catalog.items().to_vec());
        self
    }

    pub fn with_transactions<'a>(
        mut self,
        transactions: impl IntoIterator<Item = &'a Transaction>,
    ) -> Self {
        self.transactions = Some(transactions.into_iter().map(TransactionView::from).collect());
        self
    }
}
