//! Registered accounts and their payment profile.
//!
//! An [`Account`] owns its password, the currently selected [`PaymentMethod`],
//! the credential fields stored for every method it has ever used, and its own
//! transaction history.
//!
//! # Stored credentials
//!
//! Switching to another method never clears fields stored for a previous one.
//! Only the fields of the active method are validated at payment time and
//! rendered in responses; the rest stay dormant until that method is selected
//! again.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::transaction::Transaction;

/// The payment channel selected by an account.
///
/// Wire names follow the web client (`"Credit Card"`, `"Bank Account"`, `"UPI"`,
/// `"PayPal"`); the descriptive variant names are accepted as aliases. Anything
/// else is kept verbatim as [`PaymentMethod::Unrecognized`] and never validates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PaymentMethod {
    CreditCard,
    BankAccount,
    /// A mobile payment handle such as `alice@payapp`.
    MobileHandle,
    /// A trusted third-party checkout with no locally stored credential.
    ExternalWallet,
    Unrecognized(String),
}

impl PaymentMethod {
    pub fn as_str(&self) -> &str {
        match self {
            PaymentMethod::CreditCard => "Credit Card",
            PaymentMethod::BankAccount => "Bank Account",
            PaymentMethod::MobileHandle => "UPI",
            PaymentMethod::ExternalWallet => "PayPal",
            PaymentMethod::Unrecognized(name) => name,
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let method = match s {
            "Credit Card" | "CreditCard" => PaymentMethod::CreditCard,
            "Bank Account" | "BankAccount" => PaymentMethod::BankAccount,
            "UPI" | "MobileHandle" => PaymentMethod::MobileHandle,
            "PayPal" | "ExternalWallet" => PaymentMethod::ExternalWallet,
            other => PaymentMethod::Unrecognized(other.to_string()),
        };
        Ok(method)
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Method-specific credential fields.
///
/// Used both for the details supplied with a method update and for the
/// fields an [`Account`] keeps between updates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentDetails {
    pub card_number: Option<String>,
    pub card_expiry: Option<String>,
    pub card_cvv: Option<String>,
    pub bank_account: Option<String>,
    pub mobile_handle: Option<String>,
}

/// Username and password supplied with a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// A registered user.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    username: String,
    password: String,
    payment_method: Option<PaymentMethod>,
    details: PaymentDetails,
    transactions: Vec<Transaction>,
}

impl Account {
    /// Creates an account with no payment method and an empty history.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            payment_method: None,
            details: PaymentDetails::default(),
            transactions: Vec::new(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Compares the stored password verbatim.
    pub fn password_matches(&self, password: &str) -> bool {
        self.password == password
    }

    pub fn payment_method(&self) -> Option<&PaymentMethod> {
        self.payment_method.as_ref()
    }

    pub fn details(&self) -> &PaymentDetails {
        &self.details
    }

    /// Transaction history in append order.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Selects a payment method and copies the fields relevant to it.
    ///
    /// The method is overwritten unconditionally (`None` unsets it). Fields of
    /// other methods are left as they were. No validation happens here.
    pub fn set_payment_method(&mut self, method: Option<PaymentMethod>, details: PaymentDetails) {
        match &method {
            Some(PaymentMethod::CreditCard) => {
                self.details.card_number = details.card_number;
                self.details.card_expiry = details.card_expiry;
                self.details.card_cvv = details.card_cvv;
            }
            Some(PaymentMethod::BankAccount) => {
                self.details.bank_account = details.bank_account;
            }
            Some(PaymentMethod::MobileHandle) => {
                self.details.mobile_handle = details.mobile_handle;
            }
            Some(PaymentMethod::ExternalWallet | PaymentMethod::Unrecognized(_)) | None => {}
        }
        self.payment_method = method;
    }

    pub fn record(&mut self, transaction: Transaction) {
        self.transactions.push(transaction);
    }
}
